//! Scoring module - points for a resolved swap
//!
//! Every cleared tile is worth `base_per_tile`; every cascade pass after the
//! first adds `cascade_bonus_per_step`.

use crate::config::ScoringConfig;
use crate::types::SwapOutcome;

/// Points for a swap that cleared `cleared` tiles over `cascades` passes
pub fn swap_score(cleared: u32, cascades: u32, scoring: &ScoringConfig) -> u32 {
    let tiles = cleared.saturating_mul(scoring.base_per_tile);
    let bonus = cascades
        .saturating_sub(1)
        .saturating_mul(scoring.cascade_bonus_per_step);
    tiles.saturating_add(bonus)
}

/// Points for a swap outcome; rejected swaps score nothing
pub fn outcome_score(outcome: &SwapOutcome, scoring: &ScoringConfig) -> u32 {
    if !outcome.success {
        return 0;
    }
    swap_score(outcome.cleared, outcome.cascades, scoring)
}
