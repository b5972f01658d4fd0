#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// A signed coordinate along one axis of the (unbounded) grid.
pub type Coord = isize;

/// A cell location as `(row, col)`. Rows grow downward and columns grow rightward; the seed word
/// always starts at `(0, 0)`.
pub type Position = (Coord, Coord);

/// The direction that a word or sequence runs in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Move `pos` by `increment` cells along `direction` (negative increments move backward).
#[must_use]
pub fn offset_position(pos: Position, increment: Coord, direction: Direction) -> Position {
    let (row, col) = pos;
    match direction {
        Direction::Horizontal => (row, col + increment),
        Direction::Vertical => (row + increment, col),
    }
}

/// Generate the positions of `length` consecutive cells starting at `pos`.
pub fn positions(
    pos: Position,
    direction: Direction,
    length: usize,
) -> impl Iterator<Item = Position> {
    (0..length).map(move |idx| offset_position(pos, idx as Coord, direction))
}
