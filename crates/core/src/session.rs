//! Session module - one level being played
//!
//! A [`Session`] wraps a [`Board`] with the level's bookkeeping: score, moves
//! left and the win/lose decision. Only resolved swaps cost a move.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::config::{LevelConfig, RetryLimits, ScoringConfig};
use crate::error::SessionError;
use crate::scoring::outcome_score;
use crate::snapshot::BoardSnapshot;
use crate::types::{Coord, SwapOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Playing,
    Won,
    Lost,
}

impl SessionStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, SessionStatus::Playing)
    }
}

/// Everything a presentation layer needs to draw the level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub level: usize,
    pub score: u32,
    pub target_score: u32,
    pub moves_left: u32,
    pub status: SessionStatus,
    pub board: BoardSnapshot,
}

#[derive(Debug, Clone)]
pub struct Session {
    level: usize,
    board: Board,
    scoring: ScoringConfig,
    target_score: u32,
    score: u32,
    moves_left: u32,
    status: SessionStatus,
}

impl Session {
    pub fn new(
        level: usize,
        config: &LevelConfig,
        scoring: ScoringConfig,
        limits: RetryLimits,
        seed: Option<u32>,
    ) -> Result<Self, SessionError> {
        let board = Board::new(config.board_config(limits, seed))?;
        debug!(level, target = config.target_score, moves = config.moves, "session started");
        Ok(Self {
            level,
            board,
            scoring,
            target_score: config.target_score,
            score: 0,
            moves_left: config.moves,
            status: SessionStatus::Playing,
        })
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Forward a swap to the board and account for it.
    ///
    /// Rejected swaps are free. Swapping after the session ended is an error.
    pub fn try_swap(&mut self, a: Coord, b: Coord) -> Result<SwapOutcome, SessionError> {
        if self.is_over() {
            return Err(SessionError::Finished);
        }

        let outcome = self.board.try_swap(a, b)?;
        if !outcome.success {
            return Ok(outcome);
        }

        self.score = self
            .score
            .saturating_add(outcome_score(&outcome, &self.scoring));
        self.moves_left = self.moves_left.saturating_sub(1);

        if self.score >= self.target_score {
            self.status = SessionStatus::Won;
        } else if self.moves_left == 0 {
            self.status = SessionStatus::Lost;
        }
        if self.is_over() {
            info!(
                level = self.level,
                score = self.score,
                status = ?self.status,
                "session finished"
            );
        }

        Ok(outcome)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level,
            score: self.score,
            target_score: self.target_score,
            moves_left: self.moves_left,
            status: self.status,
            board: self.board.snapshot(),
        }
    }
}
