//! Grid module - the color matrix and the pure rules over it
//!
//! The grid is `rows x cols` cells stored in a flat row-major vector for cache
//! locality. Coordinates are `(row, col)`: row 0 is the top, and gravity pulls
//! tiles toward the highest row index.
//!
//! Nothing in here draws random numbers; refill and shuffling live on
//! [`Board`](crate::Board), which owns the RNG.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{Cell, Color, Coord, EMPTY, MATCH_LEN};

/// The color matrix - `rows x cols` cells using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell empty
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Build a grid from nested rows.
    ///
    /// Returns `None` if there are no rows, no columns, or the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Option<Self> {
        let cols = rows.first()?.len();
        if cols == 0 || rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        Some(Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Calculate flat index from a coordinate
    #[inline(always)]
    fn index(&self, pos: Coord) -> Option<usize> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        Some(pos.row * self.cols + pos.col)
    }

    #[inline(always)]
    fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index / self.cols, index % self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Coord) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at `pos`. Returns `None` if out of bounds.
    pub fn get(&self, pos: Coord) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set cell at `pos`. Returns false if out of bounds.
    pub fn set(&mut self, pos: Coord, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells. Returns false (and does nothing) if either is out of bounds.
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Cells as plain bytes, [`EMPTY`] for empty cells
    pub fn to_colors(&self) -> Vec<Color> {
        self.cells.iter().map(|cell| cell.unwrap_or(EMPTY)).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Walk one line (a row or a column) and report every run of at least
    /// [`MATCH_LEN`] equal colors as `(first_index, run_len)` along the line.
    ///
    /// `start` is the flat index of the first cell and `stride` the flat distance
    /// between consecutive cells. Empty cells never extend a run.
    fn scan_line(
        &self,
        start: usize,
        stride: usize,
        len: usize,
        mut on_match: impl FnMut(usize, usize),
    ) {
        let mut run_start = 0;
        // i == len closes the last run at the axis end.
        for i in 1..=len {
            let continues = i < len && {
                let prev = self.cells[start + (i - 1) * stride];
                let cur = self.cells[start + i * stride];
                cur.is_some() && cur == prev
            };
            if !continues {
                let run = i - run_start;
                if run >= MATCH_LEN {
                    on_match(run_start, run);
                }
                run_start = i;
            }
        }
    }

    /// Every coordinate that belongs to a horizontal or vertical run of 3+.
    ///
    /// Sorted row-major, without duplicates. Does not mutate the grid.
    pub fn find_matches(&self) -> Vec<Coord> {
        let mut found = Vec::new();

        for row in 0..self.rows {
            let start = row * self.cols;
            self.scan_line(start, 1, self.cols, |first, run| {
                found.extend((first..first + run).map(|col| Coord::new(row, col)));
            });
        }

        for col in 0..self.cols {
            self.scan_line(col, self.cols, self.rows, |first, run| {
                found.extend((first..first + run).map(|row| Coord::new(row, col)));
            });
        }

        found.sort_unstable();
        found.dedup();
        found
    }

    /// True if any run of 3+ exists anywhere on the grid
    pub fn has_matches(&self) -> bool {
        let mut hit = false;
        for row in 0..self.rows {
            self.scan_line(row * self.cols, 1, self.cols, |_, _| hit = true);
            if hit {
                return true;
            }
        }
        for col in 0..self.cols {
            self.scan_line(col, self.cols, self.rows, |_, _| hit = true);
            if hit {
                return true;
            }
        }
        false
    }

    /// Empty every listed cell; returns how many were actually non-empty.
    ///
    /// Out-of-bounds coordinates are ignored.
    pub fn clear(&mut self, positions: &[Coord]) -> usize {
        let mut count = 0;
        for &pos in positions {
            if let Some(idx) = self.index(pos) {
                if self.cells[idx].take().is_some() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Compact every column toward the bottom, keeping the tiles' order.
    ///
    /// Single write-pointer pass per column, no scratch storage. Empty cells
    /// end up at the top.
    pub fn apply_gravity(&mut self) {
        let cols = self.cols;
        for col in 0..cols {
            let mut write_row = self.rows;
            for read_row in (0..self.rows).rev() {
                let read = read_row * cols + col;
                if let Some(color) = self.cells[read] {
                    write_row -= 1;
                    if write_row != read_row {
                        self.cells[write_row * cols + col] = Some(color);
                        self.cells[read] = None;
                    }
                }
            }
        }
    }

    /// Cell content at `pos` as if `a` and `b` had been exchanged.
    #[inline(always)]
    fn cell_as_swapped(&self, pos: Coord, a: Coord, b: Coord) -> Cell {
        let src = if pos == a {
            b
        } else if pos == b {
            a
        } else {
            pos
        };
        self.cells[src.row * self.cols + src.col]
    }

    /// True if the run through `pos` (backward + forward, either axis) reaches
    /// [`MATCH_LEN`] once `a` and `b` are exchanged. All coordinates must be in bounds.
    fn anchors_match_as_swapped(&self, pos: Coord, a: Coord, b: Coord) -> bool {
        let Some(color) = self.cell_as_swapped(pos, a, b) else {
            return false;
        };
        let same = |p: Coord| self.cell_as_swapped(p, a, b) == Some(color);

        let mut horizontal = 1;
        let mut col = pos.col;
        while col > 0 && same(Coord::new(pos.row, col - 1)) {
            horizontal += 1;
            col -= 1;
        }
        let mut col = pos.col + 1;
        while col < self.cols && same(Coord::new(pos.row, col)) {
            horizontal += 1;
            col += 1;
        }
        if horizontal >= MATCH_LEN {
            return true;
        }

        let mut vertical = 1;
        let mut row = pos.row;
        while row > 0 && same(Coord::new(row - 1, pos.col)) {
            vertical += 1;
            row -= 1;
        }
        let mut row = pos.row + 1;
        while row < self.rows && same(Coord::new(row, pos.col)) {
            vertical += 1;
            row += 1;
        }
        vertical >= MATCH_LEN
    }

    /// True if exchanging `a` and `b` would put either of them in a run of 3+.
    ///
    /// Does not check adjacency. False when either coordinate is out of bounds.
    pub fn swap_creates_match(&self, a: Coord, b: Coord) -> bool {
        self.contains(a)
            && self.contains(b)
            && (self.anchors_match_as_swapped(a, a, b) || self.anchors_match_as_swapped(b, a, b))
    }

    /// First adjacent pair (row-major, right neighbor before down neighbor)
    /// whose exchange creates a match.
    pub fn find_valid_swap(&self) -> Option<(Coord, Coord)> {
        for idx in 0..self.cells.len() {
            let pos = self.coord_of(idx);
            let mut neighbors: ArrayVec<Coord, 2> = ArrayVec::new();
            if pos.col + 1 < self.cols {
                neighbors.push(pos.right());
            }
            if pos.row + 1 < self.rows {
                neighbors.push(pos.down());
            }
            for other in neighbors {
                if self.swap_creates_match(pos, other) {
                    return Some((pos, other));
                }
            }
        }
        None
    }

    pub fn has_any_valid_swap(&self) -> bool {
        self.find_valid_swap().is_some()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cols == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(self.cols) {
            let mut first = true;
            for cell in row {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                match cell {
                    Some(color) => write!(f, "{color}")?,
                    None => f.write_str(".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
