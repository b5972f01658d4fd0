use smallvec::SmallVec;

use crate::MAX_WORD_LENGTH;

/// How a gap (an empty cell inside a sequence) is written when a pattern is shown as text.
pub const GAP_MARKER: char = '.';

/// A run of cells where `Some(letter)` is a fixed letter and `None` is a gap that any single
/// letter can fill.
pub type Pattern = SmallVec<[Option<char>; MAX_WORD_LENGTH]>;

/// Find every offset at which `pattern` occurs inside `word`, including overlapping occurrences.
pub fn match_offsets<'a>(
    pattern: &'a [Option<char>],
    word: &'a [char],
) -> impl Iterator<Item = usize> + 'a {
    let last_offset = (word.len() + 1).saturating_sub(pattern.len());

    (0..last_offset).filter(move |&offset| {
        !pattern.is_empty()
            && pattern
                .iter()
                .zip(&word[offset..])
                .all(|(cell, &letter)| cell.map_or(true, |expected| expected == letter))
    })
}

/// Render a pattern as text, using `GAP_MARKER` for gaps.
#[must_use]
pub fn pattern_to_string(pattern: &[Option<char>]) -> String {
    pattern
        .iter()
        .map(|cell| cell.unwrap_or(GAP_MARKER))
        .collect()
}

/// Parse a pattern from text, treating `GAP_MARKER` as a gap.
#[must_use]
pub fn pattern_from_str(text: &str) -> Pattern {
    text.chars()
        .map(|c| if c == GAP_MARKER { None } else { Some(c) })
        .collect()
}
