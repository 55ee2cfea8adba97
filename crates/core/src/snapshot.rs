use serde::{Deserialize, Serialize};

use crate::types::{Color, Coord, EMPTY};

/// Owned copy of the color matrix, handed to the presentation layer.
///
/// Cells are row-major; an empty cell would read as [`EMPTY`], which never
/// happens between engine calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Color>,
}

impl BoardSnapshot {
    pub fn get(&self, pos: Coord) -> Option<Color> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        self.cells.get(pos.row * self.cols + pos.col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[Color]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }

    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        if self.cols == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.cols).map(<[Color]>::to_vec).collect()
    }

    pub fn contains_empty(&self) -> bool {
        self.cells.contains(&EMPTY)
    }

    /// Coordinates whose color differs from `other` (same dimensions only).
    ///
    /// Lets a renderer animate just the tiles that changed after a swap.
    pub fn diff(&self, other: &BoardSnapshot) -> Vec<Coord> {
        if self.cols == 0 || self.rows != other.rows || self.cols != other.cols {
            return Vec::new();
        }
        self.cells
            .iter()
            .zip(&other.cells)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| Coord::new(i / self.cols, i % self.cols))
            .collect()
    }
}
