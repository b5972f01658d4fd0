//! This module implements layout generation as a best-first search over partial crosswords. We
//! start from the first word placed horizontally at the origin; at each step we take the most
//! compact pending layout, report it if it contains no unresolved letter runs, and then branch on
//! every single word that could be added to it. Layouts with a letter run that no remaining word
//! can cover are dropped on the spot, which is what keeps the search tractable.

use float_ord::FloatOrd;
use log::{debug, info, trace};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::time::{Duration, Instant};

use crate::candidates::{generate_candidates, Expansion};
use crate::crossword::Crossword;
use crate::grid::DisplayGlyphs;
use crate::sequences::{extract_sequences, is_valid_crossword, Sequence};
use crate::{CHECK_INVARIANTS, LOG_SEARCH_PROCESS};

/// A struct tracking stats about the search process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Layouts taken off the frontier.
    pub states: usize,
    pub solutions: usize,
    pub dead_ends: usize,

    /// Layouts pushed onto the frontier, not counting the seed.
    pub children: usize,
    pub max_frontier: usize,

    /// Time spent inside the search itself, excluding time the caller spends between solutions.
    pub total_time: Duration,
}

/// Problems with the input to a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    NoWords,
    EmptyWord(usize),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoWords => write!(f, "Word list is empty"),
            SearchError::EmptyWord(idx) => write!(f, "Word {idx} is empty"),
        }
    }
}

/// Calculate how compact a layout is, where lower is better: the half-perimeter of its bounding
/// box divided by the square of the number of words it contains.
#[must_use]
pub fn score_crossword(crossword: &Crossword) -> f32 {
    let word_count = crossword.used_word_count() as f32;
    (crossword.grid.width() + crossword.grid.height()) as f32 / (word_count * word_count)
}

/// A frontier entry wrapping a layout with its ordering key. `BinaryHeap` is a max-heap, so the
/// key is reversed to pop the lowest score first; ties go to the layout that was pushed first.
struct FrontierEntry {
    key: Reverse<(FloatOrd<f32>, usize)>,
    crossword: Crossword,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// A lazy search for valid layouts of a word list. Each call to `next` resumes the search until
/// the next valid layout is found; dropping the iterator abandons whatever is left.
pub struct LayoutSearch {
    words: Vec<String>,
    glyphs: DisplayGlyphs,
    frontier: BinaryHeap<FrontierEntry>,

    /// The layout we last returned, which still needs to be expanded before the search continues.
    pending: Option<(Crossword, Vec<Sequence>)>,

    pushed_count: usize,
    statistics: Statistics,
    finished: bool,
}

impl Debug for LayoutSearch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutSearch")
            .field("words", &self.words.len())
            .field("frontier", &self.frontier.len())
            .field("statistics", &self.statistics)
            .finish()
    }
}

impl LayoutSearch {
    /// Set up a search over `words`, seeding the frontier with the first word placed horizontally
    /// at the origin. The order of the remaining words doesn't affect which layouts exist, only the
    /// order in which equally-scored ones are found.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<LayoutSearch, SearchError> {
        let words: Vec<String> = words.iter().map(|word| word.as_ref().to_string()).collect();

        if words.is_empty() {
            return Err(SearchError::NoWords);
        }
        if let Some(idx) = words.iter().position(String::is_empty) {
            return Err(SearchError::EmptyWord(idx));
        }

        let seed = Crossword::seeded(&words[0]).expect("Seeding an empty grid can't conflict");

        let mut search = LayoutSearch {
            glyphs: DisplayGlyphs::for_words(&words),
            words,
            frontier: BinaryHeap::new(),
            pending: None,
            pushed_count: 0,
            statistics: Statistics::default(),
            finished: false,
        };
        search.push(seed);

        Ok(search)
    }

    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    #[must_use]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    fn push(&mut self, crossword: Crossword) {
        self.frontier.push(FrontierEntry {
            key: Reverse((FloatOrd(score_crossword(&crossword)), self.pushed_count)),
            crossword,
        });
        self.pushed_count += 1;
        self.statistics.max_frontier = self.statistics.max_frontier.max(self.frontier.len());
    }

    /// Replace a layout with its children, or drop it if it's a dead end.
    fn expand(&mut self, crossword: &Crossword, sequences: &[Sequence]) {
        match generate_candidates(&self.words, crossword, sequences) {
            Expansion::DeadEnd => {
                self.statistics.dead_ends += 1;
                debug!(
                    "Dead end after {:?}",
                    crossword.used_words().collect::<Vec<_>>()
                );
            }
            Expansion::Children(children) => {
                self.statistics.children += children.len();
                for child in children {
                    self.push(child);
                }
            }
        }
    }

    /// Panic if a layout we're about to report is internally inconsistent.
    fn check_solution(&self, crossword: &Crossword) {
        if !crossword.is_consistent() {
            panic!(
                "Inconsistent bookkeeping in layout:\n{}",
                crossword.render(self.glyphs)
            );
        }
        if !crossword.is_all_words_valid() {
            panic!(
                "Accidental letter run in layout:\n{}",
                crossword.render(self.glyphs)
            );
        }
    }
}

impl Iterator for LayoutSearch {
    type Item = Crossword;

    fn next(&mut self) -> Option<Crossword> {
        let start = Instant::now();

        if let Some((crossword, sequences)) = self.pending.take() {
            self.expand(&crossword, &sequences);
        }

        while let Some(FrontierEntry { key, crossword }) = self.frontier.pop() {
            self.statistics.states += 1;

            let Reverse((FloatOrd(score), _)) = key;
            trace!(
                "{} candidates, expanding {:?} (score {score})",
                self.frontier.len(),
                crossword.used_words().collect::<Vec<_>>()
            );
            if LOG_SEARCH_PROCESS {
                trace!("\n{}", crossword.render(self.glyphs));
            }

            let sequences = extract_sequences(&crossword);

            if is_valid_crossword(&sequences) {
                if CHECK_INVARIANTS {
                    self.check_solution(&crossword);
                }

                self.statistics.solutions += 1;
                debug!(
                    "Found layout {} with score {score}: {:?}",
                    self.statistics.solutions,
                    crossword.used_words().collect::<Vec<_>>()
                );

                self.pending = Some((crossword.clone(), sequences));
                self.statistics.total_time += start.elapsed();
                return Some(crossword);
            }

            self.expand(&crossword, &sequences);
        }

        self.statistics.total_time += start.elapsed();
        if !self.finished {
            self.finished = true;
            info!("Search finished: {:?}", self.statistics);
        }

        None
    }
}

/// Start a search for layouts of `words`; see `LayoutSearch`.
pub fn find_layouts<S: AsRef<str>>(words: &[S]) -> Result<LayoutSearch, SearchError> {
    LayoutSearch::new(words)
}

/// Filter a stream of layouts down to the ones that score strictly better than everything before
/// them, pairing each with its score.
pub fn improving_layouts<I>(layouts: I) -> impl Iterator<Item = (f32, Crossword)>
where
    I: IntoIterator<Item = Crossword>,
{
    let mut best_score = f32::INFINITY;

    layouts.into_iter().filter_map(move |crossword| {
        let score = score_crossword(&crossword);
        if score < best_score {
            best_score = score;
            Some((score, crossword))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::crossword::Crossword;
    use crate::grid::DisplayGlyphs;
    use crate::layout_search::{
        find_layouts, improving_layouts, score_crossword, LayoutSearch, SearchError,
    };
    use crate::sequences::{extract_sequences, is_valid_crossword};

    const WORDS: [&str; 3] = ["ANT", "ART", "RAT"];

    fn render(crossword: &Crossword) -> String {
        crossword.render(DisplayGlyphs::default())
    }

    #[test]
    fn test_finds_all_layouts_of_three_words() {
        let mut search = find_layouts(&WORDS).unwrap();
        let solutions: Vec<Crossword> = search.by_ref().collect();

        assert_eq!(solutions.len(), 15);
        assert_eq!(solutions[0].used_words().collect::<Vec<_>>(), ["ANT"]);
        assert_eq!(render(&solutions[0]), "#ANT#");

        let statistics = search.statistics();
        assert_eq!(statistics.states, 20);
        assert_eq!(statistics.solutions, 15);
        assert_eq!(statistics.dead_ends, 5);
        assert_eq!(statistics.children, 19);
        assert_eq!(search.frontier_len(), 0);
        assert!(search.next().is_none());
    }

    #[test]
    fn test_solutions_are_sound() {
        for solution in find_layouts(&WORDS).unwrap() {
            let words: Vec<&str> = solution.used_words().collect();
            let unique: HashSet<&str> = words.iter().copied().collect();
            assert_eq!(words.len(), unique.len(), "{words:?}");
            assert_eq!(words[0], "ANT");

            assert!(solution.is_consistent(), "\n{}", render(&solution));
            assert!(solution.is_all_words_valid(), "\n{}", render(&solution));
            assert!(is_valid_crossword(&extract_sequences(&solution)));
        }
    }

    #[test]
    fn test_dead_ends_never_lead_to_solutions() {
        // Stacking RAT under ANT leaves NA and TT uncovered with nothing left that contains them,
        // so no reported layout can include that arrangement.
        for solution in find_layouts(&WORDS).unwrap() {
            let stacked = solution.placements().iter().any(|placement| {
                placement.word == "RAT" && placement.position == (1, 0)
            });
            assert!(!stacked, "\n{}", render(&solution));
        }
    }

    #[test]
    fn test_search_is_lazy() {
        let mut search = find_layouts(&WORDS).unwrap();

        let first = search.next().unwrap();
        assert_eq!(first.used_word_count(), 1);
        assert_eq!(search.statistics().states, 1);
        // The seed hasn't been expanded yet.
        assert_eq!(search.frontier_len(), 0);

        let second = search.next().unwrap();
        assert_eq!(second.used_word_count(), 2);
        assert!(search.statistics().children >= 4);
    }

    #[test]
    fn test_single_word() {
        let solutions: Vec<_> = find_layouts(&["SOLO"]).unwrap().collect();
        assert_eq!(solutions.len(), 1);
        assert_eq!(render(&solutions[0]), "#SOLO#");
        assert_eq!(score_crossword(&solutions[0]), 7.0);
    }

    #[test]
    fn test_words_without_shared_letters() {
        let solutions: Vec<_> = find_layouts(&["ANT", "BUS", "ZIP"]).unwrap().collect();
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            LayoutSearch::new::<&str>(&[]).unwrap_err(),
            SearchError::NoWords
        );
        assert_eq!(
            LayoutSearch::new(&["ANT", ""]).unwrap_err(),
            SearchError::EmptyWord(1)
        );
    }

    #[test]
    fn test_improving_layouts() {
        let improving: Vec<(f32, Vec<String>)> = improving_layouts(find_layouts(&WORDS).unwrap())
            .map(|(score, crossword)| {
                (
                    score,
                    crossword.used_words().map(str::to_string).collect(),
                )
            })
            .collect();

        let scores: Vec<f32> = improving.iter().map(|&(score, _)| score).collect();
        assert_eq!(scores.len(), 4);
        assert_eq!(scores[0], 6.0);
        assert_eq!(scores[1], 2.5);
        assert!((scores[2] - 4.0 / 3.0).abs() < 1e-6);
        assert!((scores[3] - 11.0 / 9.0).abs() < 1e-6);
        assert!(scores.windows(2).all(|pair| pair[1] < pair[0]));

        assert_eq!(improving[0].1, ["ANT"]);
        assert_eq!(improving[3].1.len(), 3);
    }

    #[test]
    fn test_kana_words() {
        let words = [
            "でーた",
            "こみっと",
            "さーば",
            "ばぶる",
            "たぶれっと",
            "れーるず",
            "るーと",
        ];

        let solutions: Vec<_> = find_layouts(&words).unwrap().take(50).collect();
        assert_eq!(solutions.len(), 50);
        for solution in &solutions {
            assert!(solution.is_all_words_valid());
            assert!(solution.is_consistent());
        }
    }
}
