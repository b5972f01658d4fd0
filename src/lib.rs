pub mod candidates;
pub mod crossword;
pub mod grid;
pub mod layout_search;
pub mod sequences;
pub mod types;
pub mod util;
pub mod word_list;

/// Render every popped search state into the trace log (expensive; off by default).
pub const LOG_SEARCH_PROCESS: bool = cfg!(feature = "log_search_process");

/// Re-verify every emitted layout from scratch and panic if it's inconsistent.
pub const CHECK_INVARIANTS: bool = cfg!(feature = "check_invariants");

/// The expected maximum length for a single word; longer words and sequences spill to the heap.
pub const MAX_WORD_LENGTH: usize = 21;
