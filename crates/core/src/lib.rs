//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules, session bookkeeping and
//! configuration. It has **zero dependencies** on rendering, input or I/O
//! beyond reading a config file, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and refills
//! - **Testable**: Comprehensive unit tests for every rule
//! - **Portable**: The presentation layer only reads snapshots and sends swaps
//!
//! # Module Structure
//!
//! - [`board`]: the rules engine - construction, swaps, cascades, reshuffle
//! - [`grid`]: the color matrix with match detection, clearing and gravity
//! - [`rng`]: seeded LCG with Fisher-Yates shuffle
//! - [`snapshot`]: owned copies of the board for the caller
//! - [`config`]: board, level, scoring and retry-limit settings (JSON)
//! - [`scoring`]: points for a resolved swap
//! - [`session`]: one level being played (score, moves, win/lose)
//! - [`progress`]: level progression behind a storage port
//! - [`error`]: error types
//!
//! # Game Rules
//!
//! - **Matches**: 3 or more equal colors in a row or column
//! - **Swaps**: only orthogonal neighbors, and only if the swap makes a match
//! - **Cascades**: clear, let tiles fall, refill from the top, repeat until stable
//! - **Dead boards**: a board with no valid swap is reshuffled
//!
//! # Example
//!
//! ```
//! use match3_core::{Board, BoardConfig};
//!
//! let mut board = Board::new(BoardConfig::new(8, 8, 5).with_seed(12345)).unwrap();
//! assert!(board.has_any_valid_swap());
//!
//! let (a, b) = board.find_valid_swap().unwrap();
//! let outcome = board.try_swap(a, b).unwrap();
//! assert!(outcome.success);
//! assert!(outcome.cleared >= 3);
//! assert!(!board.grid().has_matches());
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod progress;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{BoardConfig, GameConfig, LevelConfig, RetryLimits, ScoringConfig};
pub use error::{BoardError, ConfigError, SessionError};
pub use grid::Grid;
pub use progress::{Campaign, MemoryProgressStore, ProgressStore};
pub use rng::SimpleRng;
pub use scoring::{outcome_score, swap_score};
pub use session::{Session, SessionSnapshot, SessionStatus};
pub use snapshot::BoardSnapshot;
