//! This module finds the open constraints of a partial layout. A "disconnected sequence" is a run
//! of letters on one line (optionally with gaps standing in for empty cells) that isn't yet known
//! to be part of a single placed word. Fully-determined runs longer than one letter have to be
//! covered by some future word; runs with gaps are optional anchors for new words.

use std::fmt;

use smallvec::smallvec;

use crate::crossword::Crossword;
use crate::grid::CellValue;
use crate::types::{offset_position, positions, Direction, Position};
use crate::util::{pattern_to_string, Pattern};

/// A disconnected sequence: a pattern anchored at `start` and running in `direction`.
#[derive(Clone, PartialEq, Eq)]
pub struct Sequence {
    pub start: Position,
    pub direction: Direction,
    pub pattern: Pattern,
}

impl Sequence {
    fn new(start: Position, direction: Direction) -> Sequence {
        Sequence {
            start,
            direction,
            pattern: smallvec![],
        }
    }

    /// The number of cells covered, gaps included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    #[must_use]
    pub fn has_gap(&self) -> bool {
        self.pattern.iter().any(Option::is_none)
    }

    #[must_use]
    pub fn ends_with_gap(&self) -> bool {
        matches!(self.pattern.last(), Some(None))
    }

    /// A hard sequence is a fully-determined run of two or more letters. The layout can't be
    /// valid until some word covers it.
    #[must_use]
    pub fn is_hard(&self) -> bool {
        self.len() > 1 && !self.has_gap()
    }

    /// The pattern as text, e.g. `"A.B"`.
    #[must_use]
    pub fn text(&self) -> String {
        pattern_to_string(&self.pattern)
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sequence({:?}, {:?}, {:?})",
            self.start,
            self.direction,
            self.text()
        )
    }
}

/// Move every in-progress sequence into `sequences`, dropping the ones that end in a gap since
/// they don't constrain anything.
fn flush_complete(active: &mut Vec<Sequence>, sequences: &mut Vec<Sequence>) {
    sequences.extend(active.drain(..).filter(|sequence| !sequence.ends_with_gap()));
}

/// Scan a single row or column, appending its disconnected sequences to `sequences`.
///
/// We keep a list of in-progress sequences. A letter that follows a gap is both a continuation of
/// the sequences before the gap and the possible start of a new word, so we track both readings at
/// once; each empty cell also emits the sequences as they stood just before it.
fn scan_line(
    crossword: &Crossword,
    start: Position,
    direction: Direction,
    length: usize,
    sequences: &mut Vec<Sequence>,
) {
    let mut active: Vec<Sequence> = vec![];

    for pos in positions(start, direction, length) {
        match crossword.grid.get(pos) {
            CellValue::Filled => flush_complete(&mut active, sequences),

            CellValue::Empty => {
                sequences.extend(active.iter().cloned());
                for sequence in &mut active {
                    sequence.pattern.push(None);
                }
            }

            CellValue::Letter(letter) => {
                // This letter continues a word we already know about, so nothing before it is
                // open any more and nothing new starts here.
                if crossword.is_connected(offset_position(pos, -1, direction), pos) {
                    active.clear();
                    continue;
                }

                if active.is_empty() || active.iter().any(Sequence::ends_with_gap) {
                    active.push(Sequence::new(pos, direction));
                }
                for sequence in &mut active {
                    sequence.pattern.push(Some(letter));
                }
            }
        }
    }

    flush_complete(&mut active, sequences);
}

/// Find all disconnected sequences in the crossword, scanning every row of its bounding box and
/// then every column.
#[must_use]
pub fn extract_sequences(crossword: &Crossword) -> Vec<Sequence> {
    let bounds = crossword.grid.bounding_box();
    let mut sequences = vec![];

    for row in bounds.row_min..=bounds.row_max {
        scan_line(
            crossword,
            (row, bounds.col_min),
            Direction::Horizontal,
            bounds.width(),
            &mut sequences,
        );
    }

    for col in bounds.col_min..=bounds.col_max {
        scan_line(
            crossword,
            (bounds.row_min, col),
            Direction::Vertical,
            bounds.height(),
            &mut sequences,
        );
    }

    sequences
}

/// A layout is valid (not necessarily complete or good) once no hard sequence remains.
#[must_use]
pub fn is_valid_crossword(sequences: &[Sequence]) -> bool {
    sequences
        .iter()
        .all(|sequence| sequence.len() <= 1 || sequence.has_gap())
}

#[cfg(test)]
mod tests {
    use crate::crossword::Crossword;
    use crate::grid::CellValue;
    use crate::sequences::{extract_sequences, is_valid_crossword, Sequence};
    use crate::types::Direction::{self, Horizontal, Vertical};
    use crate::types::Position;

    fn summarize(sequences: &[Sequence]) -> Vec<(Position, Direction, String)> {
        sequences
            .iter()
            .map(|sequence| (sequence.start, sequence.direction, sequence.text()))
            .collect()
    }

    fn set_letters(crossword: &mut Crossword, letters: &[(Position, char)]) {
        for &(pos, letter) in letters {
            crossword.grid.set(pos, CellValue::Letter(letter)).unwrap();
        }
    }

    #[test]
    fn test_empty_grid_has_no_sequences() {
        let sequences = extract_sequences(&Crossword::new());
        assert!(sequences.is_empty());
        assert!(is_valid_crossword(&sequences));
    }

    #[test]
    fn test_walled_letter_gives_one_sequence_per_line() {
        let mut crossword = Crossword::new();
        set_letters(&mut crossword, &[((0, 0), 'X')]);
        for pos in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            crossword.grid.set(pos, CellValue::Filled).unwrap();
        }

        let sequences = extract_sequences(&crossword);
        assert_eq!(
            summarize(&sequences),
            vec![
                ((0, 0), Horizontal, "X".to_string()),
                ((0, 0), Vertical, "X".to_string()),
            ]
        );
        assert!(sequences.iter().all(|sequence| sequence.len() == 1));
        assert!(is_valid_crossword(&sequences));
    }

    #[test]
    fn test_gapped_line_tracks_every_reading() {
        let mut crossword = Crossword::new();
        set_letters(&mut crossword, &[((0, 0), 'A'), ((0, 2), 'B'), ((0, 5), 'C')]);

        let horizontal: Vec<_> = summarize(&extract_sequences(&crossword))
            .into_iter()
            .filter(|&(_, direction, _)| direction == Horizontal)
            .map(|(pos, _, text)| (pos, text))
            .collect();

        assert_eq!(
            horizontal,
            vec![
                ((0, 0), "A".to_string()),
                ((0, 0), "A.B".to_string()),
                ((0, 2), "B".to_string()),
                ((0, 0), "A.B.".to_string()),
                ((0, 2), "B.".to_string()),
                ((0, 0), "A.B..C".to_string()),
                ((0, 2), "B..C".to_string()),
                ((0, 5), "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_walls_cut_sequences() {
        let mut crossword = Crossword::new();
        set_letters(&mut crossword, &[((0, 0), 'A'), ((0, 3), 'B')]);
        crossword.grid.set((0, 1), CellValue::Filled).unwrap();

        let horizontal: Vec<_> = summarize(&extract_sequences(&crossword))
            .into_iter()
            .filter(|&(_, direction, _)| direction == Horizontal)
            .map(|(_, _, text)| text)
            .collect();

        // The gap at (0, 2) can't reach back past the wall, and "A" isn't emitted twice.
        assert_eq!(horizontal, vec!["A", "B"]);
    }

    #[test]
    fn test_seed_word_is_valid_on_its_own() {
        let crossword = Crossword::seeded("ANT").unwrap();
        let sequences = extract_sequences(&crossword);

        assert_eq!(
            summarize(&sequences),
            vec![
                ((0, 0), Vertical, "A".to_string()),
                ((0, 1), Vertical, "N".to_string()),
                ((0, 2), Vertical, "T".to_string()),
            ]
        );
        assert!(is_valid_crossword(&sequences));
    }

    #[test]
    fn test_stacked_words_leave_hard_sequences() {
        let mut crossword = Crossword::seeded("ANT").unwrap();
        crossword.embed((1, 0), Horizontal, "RAT").unwrap();

        let sequences = extract_sequences(&crossword);
        let hard: Vec<_> = sequences
            .iter()
            .filter(|sequence| sequence.is_hard())
            .map(|sequence| (sequence.start, sequence.text()))
            .collect();

        assert_eq!(
            hard,
            vec![
                ((0, 0), "AR".to_string()),
                ((0, 1), "NA".to_string()),
                ((0, 2), "TT".to_string()),
            ]
        );
        assert!(!is_valid_crossword(&sequences));
    }

    #[test]
    fn test_crossing_words_are_valid() {
        let mut crossword = Crossword::seeded("ANT").unwrap();
        crossword.embed((0, 0), Vertical, "ART").unwrap();

        let sequences = extract_sequences(&crossword);
        assert!(sequences.iter().all(|sequence| !sequence.is_hard()));
        assert!(is_valid_crossword(&sequences));
    }
}
