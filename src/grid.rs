//! This module implements the sparse, unbounded grid that layouts are built on, along with the
//! helpers for turning a grid into text.

use fancy_regex::Regex;
use lazy_static::lazy_static;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

use crate::types::{Coord, Position};

lazy_static! {
    /// Words made only of these characters are rendered with narrow ASCII glyphs.
    static ref ASCII_WORD: Regex = Regex::new("^[A-Za-z]*$").unwrap();
}

/// The contents of a single cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CellValue {
    Empty,

    /// A deliberate wall, written just before and just after every placed word so that nothing
    /// can extend it.
    Filled,

    Letter(char),
}

impl CellValue {
    #[must_use]
    pub fn is_letter(self) -> bool {
        matches!(self, CellValue::Letter(_))
    }
}

/// Returned when trying to overwrite a cell with a value other than the one it already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellConflict {
    pub position: Position,
    pub existing: CellValue,
    pub attempted: CellValue,
}

impl fmt::Display for CellConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Can’t set cell {:?} to {:?}; it already holds {:?}",
            self.position, self.attempted, self.existing
        )
    }
}

/// The smallest rectangle containing every non-empty cell, with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub row_min: Coord,
    pub row_max: Coord,
    pub col_min: Coord,
    pub col_max: Coord,
}

impl BoundingBox {
    #[must_use]
    pub fn width(&self) -> usize {
        (self.col_max - self.col_min + 1) as usize
    }

    #[must_use]
    pub fn height(&self) -> usize {
        (self.row_max - self.row_min + 1) as usize
    }
}

/// A sparse grid with no fixed size. Only non-empty cells are stored, and once a cell holds a
/// value it keeps it for the rest of the grid's life.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: HashMap<Position, CellValue>,

    /// Cached bounding box; cleared whenever a cell changes.
    bounds: Cell<Option<BoundingBox>>,
}

impl Grid {
    #[must_use]
    pub fn new() -> Grid {
        Grid::default()
    }

    /// Look up a cell, treating anything we haven't stored as empty.
    #[must_use]
    pub fn get(&self, pos: Position) -> CellValue {
        self.cells.get(&pos).copied().unwrap_or(CellValue::Empty)
    }

    #[must_use]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == CellValue::Empty
    }

    #[must_use]
    pub fn is_letter(&self, pos: Position) -> bool {
        self.get(pos).is_letter()
    }

    /// Set a cell. Writing the value a cell already holds is a no-op; writing anything else into
    /// a non-empty cell is refused.
    pub fn set(&mut self, pos: Position, value: CellValue) -> Result<(), CellConflict> {
        let existing = self.get(pos);
        if existing == value {
            return Ok(());
        }
        if existing != CellValue::Empty {
            return Err(CellConflict {
                position: pos,
                existing,
                attempted: value,
            });
        }

        self.cells.insert(pos, value);
        self.bounds.set(None);
        Ok(())
    }

    /// Iterate over every stored (non-empty) cell, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, CellValue)> + '_ {
        self.cells.iter().map(|(&pos, &value)| (pos, value))
    }

    /// The bounding box of all non-empty cells. An empty grid reports a single cell at the origin.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        if let Some(bounds) = self.bounds.get() {
            return bounds;
        }

        let bounds = if self.cells.is_empty() {
            BoundingBox {
                row_min: 0,
                row_max: 0,
                col_min: 0,
                col_max: 0,
            }
        } else {
            let mut bounds = BoundingBox {
                row_min: Coord::MAX,
                row_max: Coord::MIN,
                col_min: Coord::MAX,
                col_max: Coord::MIN,
            };
            for &(row, col) in self.cells.keys() {
                bounds.row_min = bounds.row_min.min(row);
                bounds.row_max = bounds.row_max.max(row);
                bounds.col_min = bounds.col_min.min(col);
                bounds.col_max = bounds.col_max.max(col);
            }
            bounds
        };

        self.bounds.set(Some(bounds));
        bounds
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.bounding_box().width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.bounding_box().height()
    }
}

/// The characters used to draw empty and filled cells when rendering a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGlyphs {
    pub empty: char,
    pub filled: char,
}

impl Default for DisplayGlyphs {
    fn default() -> Self {
        DisplayGlyphs {
            empty: '_',
            filled: '#',
        }
    }
}

impl DisplayGlyphs {
    /// Pick glyphs that line up with the alphabet of the given words: narrow ASCII glyphs for
    /// plain Latin words, full-width ones for anything else (e.g. kana). Only the first word is
    /// inspected.
    #[must_use]
    pub fn for_words<S: AsRef<str>>(words: &[S]) -> DisplayGlyphs {
        let is_ascii = words.first().map_or(true, |word| {
            ASCII_WORD.is_match(word.as_ref()).unwrap_or(false)
        });

        if is_ascii {
            DisplayGlyphs::default()
        } else {
            DisplayGlyphs {
                empty: '＿',
                filled: '凸',
            }
        }
    }
}

/// Turn the given grid into one line of text per row of its bounding box.
#[must_use]
pub fn render_grid(grid: &Grid, glyphs: DisplayGlyphs) -> String {
    let bounds = grid.bounding_box();

    (bounds.row_min..=bounds.row_max)
        .map(|row| {
            (bounds.col_min..=bounds.col_max)
                .map(|col| match grid.get((row, col)) {
                    CellValue::Empty => glyphs.empty,
                    CellValue::Filled => glyphs.filled,
                    CellValue::Letter(letter) => letter,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
