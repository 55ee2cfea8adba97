//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules engine, session bookkeeping, presentation layer).
//!
//! # Cells and Colors
//!
//! - A [`Color`] is a small integer in `[0, colors)`; mapping it to a sprite or
//!   palette entry is the caller's business.
//! - A [`Cell`] is `Option<Color>`; `None` only exists transiently while a
//!   clear/gravity/refill pass is running.
//! - [`EMPTY`] is the reserved value used when a cell has to be written as a
//!   plain byte. It sits outside every legal color range.
//!
//! # Retry Limits
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_SHUFFLE_ATTEMPTS` | 500 | Permutations tried by a reshuffle |
//! | `DEFAULT_REGENERATE_ATTEMPTS` | 100 | Fresh fills tried once permutations run out |
//! | `DEFAULT_MAX_CASCADES` | 1000 | Cascade passes allowed for a single swap |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Coord, SwapOutcome, MIN_COLORS};
//!
//! let a = Coord::new(2, 3);
//! assert!(a.is_adjacent(Coord::new(2, 4)));
//! assert!(a.is_adjacent(Coord::new(1, 3)));
//! assert!(!a.is_adjacent(Coord::new(3, 4)));
//! assert!(!a.is_adjacent(a));
//!
//! let outcome = SwapOutcome::rejected();
//! assert!(!outcome.success);
//! assert_eq!(MIN_COLORS, 3);
//! ```

use std::fmt;

/// Tile color identifier
pub type Color = u8;

/// Cell type for the board
///
/// - `None`: Cell is empty (only during a cascade pass)
/// - `Some(Color)`: Cell holds a tile of the given color
pub type Cell = Option<Color>;

/// Byte value written for an empty cell
pub const EMPTY: Color = Color::MAX;

/// Fewest colors that can fill a board without ever completing a triple
pub const MIN_COLORS: Color = 3;

/// Shortest run that counts as a match
pub const MATCH_LEN: usize = 3;

/// Default number of random permutations tried by a reshuffle
pub const DEFAULT_SHUFFLE_ATTEMPTS: u32 = 500;

/// Default number of fresh fills tried after the permutations run out
pub const DEFAULT_REGENERATE_ATTEMPTS: u32 = 100;

/// Default cap on cascade passes for one swap
pub const DEFAULT_MAX_CASCADES: u32 = 1000;

/// Grid coordinate, `row` counted from the top and `col` from the left
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Two coordinates are adjacent iff their Manhattan distance is exactly 1
    pub fn is_adjacent(&self, other: Coord) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Neighbor to the right (may be out of bounds)
    pub fn right(&self) -> Coord {
        Coord::new(self.row, self.col + 1)
    }

    /// Neighbor below (may be out of bounds)
    pub fn down(&self) -> Coord {
        Coord::new(self.row + 1, self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Result of a swap request
///
/// A rejected swap (not adjacent, out of bounds, or no match) leaves the board
/// untouched and reports zero counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwapOutcome {
    pub success: bool,
    /// Tiles cleared across every cascade pass
    pub cleared: u32,
    /// Clear/gravity/refill passes executed (>= 1 on success)
    pub cascades: u32,
    /// The settled board was dead and got reshuffled before returning
    pub reshuffled: bool,
}

impl SwapOutcome {
    pub const fn rejected() -> Self {
        Self {
            success: false,
            cleared: 0,
            cascades: 0,
            reshuffled: false,
        }
    }
}
