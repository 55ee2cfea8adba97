//! Board module - the match-3 rules engine
//!
//! A [`Board`] owns one [`Grid`] and the RNG that feeds it. Every public call
//! runs to completion and is all-or-nothing: a rejected swap leaves the grid
//! untouched, and a fatal error restores the grid to its pre-call contents and
//! poisons the board.
//!
//! Swap resolution:
//!
//! ```text
//! Idle -> AdjacencyChecked -> Swapped -> MatchCheck -+-> Reverted
//!                                                    |
//!                       +----------------------------+
//!                       v
//!        Clear -> Gravity -> Refill -> MatchCheck --(matches)--> Clear ...
//!                                          |
//!                                          +--(none)--> Stable
//! ```

use arrayvec::ArrayVec;
use tracing::{debug, trace, warn};

use crate::config::{BoardConfig, RetryLimits};
use crate::error::BoardError;
use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::types::{Cell, Color, Coord, SwapOutcome};

/// The rules engine for one level
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    colors: Color,
    limits: RetryLimits,
    rng: SimpleRng,
    /// Set after a fatal error; every later mutating call fails.
    poisoned: bool,
}

impl Board {
    /// Build and fill a board.
    ///
    /// The result has no runs of 3+ and at least one valid swap. Fails on an
    /// invalid config or when no playable arrangement can be found.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_entropy(),
        };

        let mut board = Self {
            grid: Grid::new(config.rows, config.cols),
            colors: config.colors,
            limits: config.limits,
            rng,
            poisoned: false,
        };
        board.fill_start_board();
        if !board.grid.has_any_valid_swap() {
            board.shuffle_until_playable()?;
        }

        debug!(
            rows = config.rows,
            cols = config.cols,
            colors = config.colors,
            seed = board.rng.seed(),
            "board created"
        );
        Ok(board)
    }

    /// Restore a board from an explicit layout.
    ///
    /// Dimensions come from `layout`; colors, seed and limits from `config`.
    /// The layout must be rectangular, use colors below `config.colors` and
    /// contain no match. It may be dead: check [`has_any_valid_swap`](Self::has_any_valid_swap)
    /// and [`reshuffle`](Self::reshuffle) as needed.
    pub fn from_rows(layout: Vec<Vec<Color>>, config: BoardConfig) -> Result<Self, BoardError> {
        let cells: Vec<Vec<Cell>> = layout
            .into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect();
        let grid = Grid::from_rows(cells)
            .ok_or_else(|| BoardError::InvalidLayout("layout must be a non-empty rectangle".into()))?;

        let config = BoardConfig {
            rows: grid.rows(),
            cols: grid.cols(),
            ..config
        };
        config.validate()?;

        if let Some(bad) = grid.cells().iter().flatten().find(|&&c| c >= config.colors) {
            return Err(BoardError::InvalidLayout(format!(
                "color {bad} is outside [0, {})",
                config.colors
            )));
        }
        if grid.has_matches() {
            return Err(BoardError::InvalidLayout("layout already contains a match".into()));
        }

        let rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_entropy(),
        };
        Ok(Self {
            grid,
            colors: config.colors,
            limits: config.limits,
            rng,
            poisoned: false,
        })
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn colors(&self) -> Color {
        self.colors
    }

    pub fn limits(&self) -> RetryLimits {
        self.limits
    }

    /// Seed of the board's RNG (the clock-derived one for unseeded boards)
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Owned copy of the current colors
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            cells: self.grid.to_colors(),
        }
    }

    pub fn has_any_valid_swap(&self) -> bool {
        self.grid.has_any_valid_swap()
    }

    /// First valid swap in row-major order, usable as a hint
    pub fn find_valid_swap(&self) -> Option<(Coord, Coord)> {
        self.grid.find_valid_swap()
    }

    /// Try to exchange two tiles and resolve the resulting cascade.
    ///
    /// Out-of-bounds, non-adjacent and non-matching pairs are rejected with
    /// the board unchanged. A resolved swap that leaves a dead board is
    /// followed by a reshuffle (`reshuffled` in the outcome).
    pub fn try_swap(&mut self, a: Coord, b: Coord) -> Result<SwapOutcome, BoardError> {
        self.ensure_usable()?;

        if !(self.grid.contains(a) && self.grid.contains(b)) {
            trace!(%a, %b, "swap rejected: out of bounds");
            return Ok(SwapOutcome::rejected());
        }
        if !a.is_adjacent(b) {
            trace!(%a, %b, "swap rejected: not adjacent");
            return Ok(SwapOutcome::rejected());
        }

        self.grid.swap(a, b);
        let matches = self.grid.find_matches();
        if matches.is_empty() {
            self.grid.swap(a, b);
            trace!(%a, %b, "swap rejected: no match");
            return Ok(SwapOutcome::rejected());
        }

        let mut before = self.grid.clone();
        before.swap(a, b);
        let result = self.resolve(matches);
        let outcome = self.poison_on_error(before, result)?;

        debug!(
            %a,
            %b,
            cleared = outcome.cleared,
            cascades = outcome.cascades,
            reshuffled = outcome.reshuffled,
            "swap resolved"
        );
        Ok(outcome)
    }

    /// Rearrange the board into a stable, playable layout.
    ///
    /// Tries random permutations of the current tiles first, then fresh fills.
    /// Exhausting both budgets is fatal.
    pub fn reshuffle(&mut self) -> Result<(), BoardError> {
        self.ensure_usable()?;
        let before = self.grid.clone();
        let result = self.shuffle_until_playable();
        self.poison_on_error(before, result)
    }

    fn ensure_usable(&self) -> Result<(), BoardError> {
        if self.poisoned {
            return Err(BoardError::Poisoned);
        }
        Ok(())
    }

    fn poison_on_error<T>(
        &mut self,
        before: Grid,
        result: Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        if result.is_err() {
            self.grid = before;
            self.poisoned = true;
        }
        result
    }

    fn resolve(&mut self, matches: Vec<Coord>) -> Result<SwapOutcome, BoardError> {
        let (cleared, cascades) = self.cascade(matches)?;

        let reshuffled = !self.grid.has_any_valid_swap();
        if reshuffled {
            self.shuffle_until_playable()?;
        }

        Ok(SwapOutcome {
            success: true,
            cleared,
            cascades,
            reshuffled,
        })
    }

    /// Clear -> gravity -> refill until no match is left.
    fn cascade(&mut self, mut matches: Vec<Coord>) -> Result<(u32, u32), BoardError> {
        let mut cleared = 0u32;
        let mut cascades = 0u32;

        while !matches.is_empty() {
            if cascades >= self.limits.max_cascades {
                return Err(BoardError::CascadeLimit {
                    limit: self.limits.max_cascades,
                });
            }

            let pass_cleared = self.cascade_pass(&matches);
            cleared += pass_cleared;
            cascades += 1;
            trace!(pass = cascades, cleared = pass_cleared, "cascade pass");

            matches = self.grid.find_matches();
        }

        Ok((cleared, cascades))
    }

    /// One pass: clear `matches`, let the survivors fall, then refill the
    /// holes left at the top. Returns the number of cells cleared.
    fn cascade_pass(&mut self, matches: &[Coord]) -> u32 {
        let cleared = self.grid.clear(matches) as u32;
        self.grid.apply_gravity();
        self.refill();
        cleared
    }

    /// Give every empty cell a uniformly random color. No triple avoidance:
    /// matches formed here feed the next cascade pass.
    fn refill(&mut self) {
        let colors = u32::from(self.colors);
        for cell in self.grid.cells_mut() {
            if cell.is_none() {
                *cell = Some(self.rng.next_range(colors) as Color);
            }
        }
    }

    /// Fill every cell row-major without completing a triple.
    fn fill_start_board(&mut self) {
        self.grid = Grid::new(self.grid.rows(), self.grid.cols());
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let pos = Coord::new(row, col);
                let color = self.pick_safe_color(pos);
                self.grid.set(pos, Some(color));
            }
        }
    }

    /// Random color for `pos` that does not complete a triple with the two
    /// cells to its left or the two cells above it.
    ///
    /// Draws uniformly among the permitted colors, which is the same
    /// distribution as redrawing until one fits but cannot spin. With at
    /// least three colors at most two are ever excluded.
    fn pick_safe_color(&mut self, pos: Coord) -> Color {
        let color_at = |grid: &Grid, row: usize, col: usize| grid.get(Coord::new(row, col)).flatten();

        let mut excluded: ArrayVec<Color, 2> = ArrayVec::new();
        if pos.col >= 2 {
            if let (Some(a), Some(b)) = (
                color_at(&self.grid, pos.row, pos.col - 1),
                color_at(&self.grid, pos.row, pos.col - 2),
            ) {
                if a == b {
                    excluded.push(a);
                }
            }
        }
        if pos.row >= 2 {
            if let (Some(a), Some(b)) = (
                color_at(&self.grid, pos.row - 1, pos.col),
                color_at(&self.grid, pos.row - 2, pos.col),
            ) {
                if a == b && !excluded.contains(&a) {
                    excluded.push(a);
                }
            }
        }
        excluded.sort_unstable();

        let permitted = u32::from(self.colors) - excluded.len() as u32;
        let mut color = self.rng.next_range(permitted) as Color;
        // Map [0, permitted) onto the colors that are not excluded.
        for &skip in &excluded {
            if color >= skip {
                color += 1;
            }
        }
        color
    }

    fn shuffle_until_playable(&mut self) -> Result<(), BoardError> {
        let colors = u32::from(self.colors);
        let mut pool: Vec<Color> = Vec::with_capacity(self.grid.cells().len());
        for cell in self.grid.cells() {
            let color = match cell {
                Some(color) => *color,
                None => self.rng.next_range(colors) as Color,
            };
            pool.push(color);
        }

        for attempt in 1..=self.limits.shuffle_attempts {
            self.rng.shuffle(&mut pool);
            for (cell, &color) in self.grid.cells_mut().iter_mut().zip(&pool) {
                *cell = Some(color);
            }
            if !self.grid.has_matches() && self.grid.has_any_valid_swap() {
                debug!(attempt, "board reshuffled");
                return Ok(());
            }
        }

        warn!(
            attempts = self.limits.shuffle_attempts,
            "no playable permutation, regenerating board"
        );
        for attempt in 1..=self.limits.regenerate_attempts {
            self.fill_start_board();
            if self.grid.has_any_valid_swap() {
                debug!(attempt, "board regenerated");
                return Ok(());
            }
        }

        Err(BoardError::ReshuffleExhausted {
            shuffle_attempts: self.limits.shuffle_attempts,
            regenerate_attempts: self.limits.regenerate_attempts,
        })
    }
}
