//! This module implements a partial crossword layout: the grid, the record of which adjacent
//! cells belong to the same placed word, and the rules for placing a new word.

use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

use crate::grid::{render_grid, CellConflict, CellValue, DisplayGlyphs, Grid};
use crate::types::{offset_position, positions, Direction, Position};

/// A word together with where and in which direction it sits (or would sit) in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub position: Position,
    pub direction: Direction,
    pub word: String,
}

impl Placement {
    #[must_use]
    pub fn new(position: Position, direction: Direction, word: &str) -> Placement {
        Placement {
            position,
            direction,
            word: word.to_string(),
        }
    }

    /// The number of cells this placement covers.
    #[must_use]
    pub fn length(&self) -> usize {
        self.word.chars().count()
    }

    /// The covered positions, paired with the letter that goes in each one.
    pub fn cells(&self) -> impl Iterator<Item = (Position, char)> + '_ {
        positions(self.position, self.direction, self.length()).zip(self.word.chars())
    }
}

/// A set of ordered pairs of adjacent cells that hold consecutive letters of one placed word. This
/// is what tells a deliberate crossing apart from two words that merely happen to touch.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityLedger {
    pairs: HashSet<(Position, Position)>,
}

impl ConnectivityLedger {
    pub fn connect(&mut self, from: Position, to: Position) {
        self.pairs.insert((from, to));
    }

    #[must_use]
    pub fn is_connected(&self, from: Position, to: Position) -> bool {
        self.pairs.contains(&(from, to))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.pairs.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Reasons `Crossword::embed` can refuse a placement. Both mean the caller skipped `is_fit` or
/// the used-word check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    WordAlreadyUsed(String),
    CellConflict(CellConflict),
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedError::WordAlreadyUsed(word) => write!(f, "Word “{word}” is already placed"),
            EmbedError::CellConflict(conflict) => write!(f, "{conflict}"),
        }
    }
}

impl From<CellConflict> for EmbedError {
    fn from(conflict: CellConflict) -> Self {
        EmbedError::CellConflict(conflict)
    }
}

/// A single search state: the grid, its connectivity, and the words placed so far (in order).
#[derive(Debug, Clone, Default)]
pub struct Crossword {
    pub grid: Grid,
    pub connections: ConnectivityLedger,
    placements: Vec<Placement>,
}

impl Crossword {
    #[must_use]
    pub fn new() -> Crossword {
        Crossword::default()
    }

    /// Build the root search state: `word` placed horizontally at the origin.
    pub fn seeded(word: &str) -> Result<Crossword, EmbedError> {
        let mut crossword = Crossword::new();
        crossword.embed((0, 0), Direction::Horizontal, word)?;
        Ok(crossword)
    }

    /// Does this cell hold a letter (as opposed to being empty or a wall)?
    #[must_use]
    pub fn is_embedded(&self, pos: Position) -> bool {
        self.grid.is_letter(pos)
    }

    #[must_use]
    pub fn is_connected(&self, from: Position, to: Position) -> bool {
        self.connections.is_connected(from, to)
    }

    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The words placed so far, in the order they were placed.
    pub fn used_words(&self) -> impl Iterator<Item = &str> + '_ {
        self.placements.iter().map(|placement| placement.word.as_str())
    }

    #[must_use]
    pub fn used_word_count(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_used(&self, word: &str) -> bool {
        self.used_words().any(|used| used == word)
    }

    /// Could `word` be placed at `pos` running in `direction` without breaking anything? A
    /// placement fits when:
    /// * neither the cell just before it nor the cell just after it holds a letter,
    /// * every covered cell is either empty or already holds the matching letter, and
    /// * it doesn't run along an edge that's already part of a placed word.
    #[must_use]
    pub fn is_fit(&self, pos: Position, direction: Direction, word: &str) -> bool {
        let length = word.chars().count();

        if self.is_embedded(offset_position(pos, -1, direction))
            || self.is_embedded(offset_position(pos, length as isize, direction))
        {
            return false;
        }

        let mut previous: Option<Position> = None;
        for (cell, letter) in positions(pos, direction, length).zip(word.chars()) {
            match self.grid.get(cell) {
                CellValue::Empty => {}
                CellValue::Letter(existing) if existing == letter => {}
                _ => return false,
            }

            if previous.map_or(false, |previous| self.is_connected(previous, cell)) {
                return false;
            }
            previous = Some(cell);
        }

        true
    }

    /// Convenience wrapper around `is_fit` for a `Placement`.
    #[must_use]
    pub fn fits(&self, placement: &Placement) -> bool {
        self.is_fit(placement.position, placement.direction, &placement.word)
    }

    /// Commit a placement: write its letters, connect each consecutive pair of cells, wall off
    /// both ends, and record the word as used. The placement is expected to have passed `is_fit`;
    /// if it didn't, the state may be left partially written.
    pub fn embed(
        &mut self,
        pos: Position,
        direction: Direction,
        word: &str,
    ) -> Result<(), EmbedError> {
        if self.is_used(word) {
            return Err(EmbedError::WordAlreadyUsed(word.to_string()));
        }

        let placement = Placement::new(pos, direction, word);

        let mut previous: Option<Position> = None;
        for (cell, letter) in placement.cells() {
            self.grid.set(cell, CellValue::Letter(letter))?;
            if let Some(previous) = previous {
                self.connections.connect(previous, cell);
            }
            previous = Some(cell);
        }

        self.grid
            .set(offset_position(pos, -1, direction), CellValue::Filled)?;
        self.grid.set(
            offset_position(pos, placement.length() as isize, direction),
            CellValue::Filled,
        )?;

        self.placements.push(placement);
        Ok(())
    }

    /// Convenience wrapper around `embed` for a `Placement`.
    pub fn embed_placement(&mut self, placement: &Placement) -> Result<(), EmbedError> {
        self.embed(placement.position, placement.direction, &placement.word)
    }

    /// Check that every pair of adjacent letters in the grid is connected, i.e. that the layout
    /// contains no accidental letter runs.
    #[must_use]
    pub fn is_all_words_valid(&self) -> bool {
        self.grid
            .cells()
            .filter(|(_, value)| value.is_letter())
            .all(|(pos, _)| {
                [Direction::Horizontal, Direction::Vertical]
                    .into_iter()
                    .all(|direction| {
                        let next = offset_position(pos, 1, direction);
                        !self.is_embedded(next) || self.is_connected(pos, next)
                    })
            })
    }

    /// Check the state's bookkeeping from scratch: no word is used twice, and every connected pair
    /// is two consecutive letters of exactly one placement.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen_words = HashSet::new();
        if !self.used_words().all(|word| seen_words.insert(word)) {
            return false;
        }

        self.connections.pairs().all(|(from, to)| {
            self.placements
                .iter()
                .filter(|placement| {
                    let cells: Vec<Position> = placement.cells().map(|(pos, _)| pos).collect();
                    cells.windows(2).any(|pair| pair[0] == from && pair[1] == to)
                })
                .count()
                == 1
        })
    }

    #[must_use]
    pub fn render(&self, glyphs: DisplayGlyphs) -> String {
        render_grid(&self.grid, glyphs)
    }
}
