use std::path::PathBuf;

/// Errors raised while validating or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimensions must be at least 1x1 (got {rows}x{cols})")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("{colors} colors cannot fill a board without triples (need at least {min})")]
    TooFewColors { colors: u8, min: u8 },

    #[error("invalid retry limit: {0}")]
    InvalidLimit(&'static str),

    #[error("game config has no levels")]
    NoLevels,

    #[error("level {index} is invalid: {reason}")]
    InvalidLevel { index: usize, reason: String },

    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by the board engine.
///
/// Rejected moves are not errors; see [`SwapOutcome`](crate::types::SwapOutcome).
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error(
        "no playable arrangement after {shuffle_attempts} shuffles and {regenerate_attempts} regenerations"
    )]
    ReshuffleExhausted {
        shuffle_attempts: u32,
        regenerate_attempts: u32,
    },

    #[error("cascade did not settle within {limit} passes")]
    CascadeLimit { limit: u32 },

    #[error("board is unusable after an earlier fatal error")]
    Poisoned,
}

/// Errors raised by a game session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("session is already finished")]
    Finished,
}
