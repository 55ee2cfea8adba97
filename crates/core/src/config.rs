//! Configuration - board dimensions, retry budgets, scoring and level tables.
//!
//! Everything here is plain serde data. A [`GameConfig`] is usually loaded from
//! a JSON file; missing fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::types::{
    DEFAULT_MAX_CASCADES, DEFAULT_REGENERATE_ATTEMPTS, DEFAULT_SHUFFLE_ATTEMPTS, MIN_COLORS,
};

/// Attempt caps for the randomized loops of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryLimits {
    /// Random permutations tried by a reshuffle before falling back.
    pub shuffle_attempts: u32,
    /// Fresh fills tried once the permutations are exhausted.
    pub regenerate_attempts: u32,
    /// Cascade passes allowed for a single swap.
    pub max_cascades: u32,
}

impl Default for RetryLimits {
    fn default() -> Self {
        Self {
            shuffle_attempts: DEFAULT_SHUFFLE_ATTEMPTS,
            regenerate_attempts: DEFAULT_REGENERATE_ATTEMPTS,
            max_cascades: DEFAULT_MAX_CASCADES,
        }
    }
}

impl RetryLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cascades == 0 {
            return Err(ConfigError::InvalidLimit("max_cascades must be > 0"));
        }
        if self.shuffle_attempts == 0 && self.regenerate_attempts == 0 {
            return Err(ConfigError::InvalidLimit(
                "shuffle_attempts and regenerate_attempts cannot both be 0",
            ));
        }
        Ok(())
    }
}

/// Everything needed to build one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub colors: u8,
    /// Fixed seed for reproducible boards; `None` seeds from the clock.
    pub seed: Option<u32>,
    pub limits: RetryLimits,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            colors: 5,
            seed: None,
            limits: RetryLimits::default(),
        }
    }
}

impl BoardConfig {
    pub fn new(rows: usize, cols: usize, colors: u8) -> Self {
        Self {
            rows,
            cols,
            colors,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_limits(mut self, limits: RetryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::ZeroDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        // Two colors can leave a cell where both choices complete a triple.
        if self.colors < MIN_COLORS {
            return Err(ConfigError::TooFewColors {
                colors: self.colors,
                min: MIN_COLORS,
            });
        }
        self.limits.validate()
    }
}

/// Points awarded for a resolved swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_per_tile: u32,
    /// Bonus for every cascade pass after the first.
    pub cascade_bonus_per_step: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_per_tile: 10,
            cascade_bonus_per_step: 50,
        }
    }
}

/// One entry of the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub rows: usize,
    pub cols: usize,
    pub colors: u8,
    pub target_score: u32,
    pub moves: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            colors: 5,
            target_score: 1000,
            moves: 20,
        }
    }
}

impl LevelConfig {
    /// Board settings for this level. Colors are raised to the playable minimum.
    pub fn board_config(&self, limits: RetryLimits, seed: Option<u32>) -> BoardConfig {
        BoardConfig {
            rows: self.rows,
            cols: self.cols,
            colors: self.colors.max(MIN_COLORS),
            seed,
            limits,
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidLevel {
                index,
                reason: format!("dimensions {}x{} are empty", self.rows, self.cols),
            });
        }
        if self.moves == 0 {
            return Err(ConfigError::InvalidLevel {
                index,
                reason: "moves must be > 0".into(),
            });
        }
        Ok(())
    }
}

/// Top-level game configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub levels: Vec<LevelConfig>,
    pub scoring: ScoringConfig,
    pub limits: RetryLimits,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    rows: 6,
                    cols: 6,
                    colors: 4,
                    target_score: 500,
                    moves: 20,
                },
                LevelConfig {
                    rows: 8,
                    cols: 8,
                    colors: 5,
                    target_score: 1000,
                    moves: 20,
                },
                LevelConfig {
                    rows: 9,
                    cols: 7,
                    colors: 6,
                    target_score: 1500,
                    moves: 25,
                },
            ],
            scoring: ScoringConfig::default(),
            limits: RetryLimits::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (index, level) in self.levels.iter().enumerate() {
            level.validate(index)?;
        }
        self.limits.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_configs_validate() {
        assert!(BoardConfig::default().validate().is_ok());
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_board_config_rejects_zero_dimensions() {
        let err = BoardConfig::new(0, 5, 4).validate().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDimension { rows: 0, cols: 5 }));

        let err = BoardConfig::new(5, 0, 4).validate().unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDimension { .. }));
    }

    #[test]
    fn test_board_config_rejects_too_few_colors() {
        for colors in 0..MIN_COLORS {
            let err = BoardConfig::new(3, 3, colors).validate().unwrap_err();
            assert!(matches!(err, ConfigError::TooFewColors { .. }));
        }
        assert!(BoardConfig::new(3, 3, MIN_COLORS).validate().is_ok());
    }

    #[test]
    fn test_limits_validation() {
        let limits = RetryLimits {
            max_cascades: 0,
            ..RetryLimits::default()
        };
        assert!(limits.validate().is_err());

        let limits = RetryLimits {
            shuffle_attempts: 0,
            regenerate_attempts: 0,
            ..RetryLimits::default()
        };
        assert!(limits.validate().is_err());

        let limits = RetryLimits {
            shuffle_attempts: 0,
            ..RetryLimits::default()
        };
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_level_colors_raised_to_minimum() {
        let level = LevelConfig {
            colors: 1,
            ..LevelConfig::default()
        };
        let board = level.board_config(RetryLimits::default(), Some(3));
        assert_eq!(board.colors, MIN_COLORS);
        assert_eq!(board.seed, Some(3));
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(
            r#"{ "levels": [ { "rows": 5, "cols": 4, "target_score": 300 } ] }"#,
        )
        .unwrap();

        assert_eq!(config.levels.len(), 1);
        assert_eq!(config.levels[0].rows, 5);
        assert_eq!(config.levels[0].cols, 4);
        assert_eq!(config.levels[0].colors, 5);
        assert_eq!(config.levels[0].moves, 20);
        assert_eq!(config.scoring, ScoringConfig::default());
        assert_eq!(config.limits, RetryLimits::default());
    }

    #[test]
    fn test_json_without_levels_is_rejected() {
        let err = GameConfig::from_json_str(r#"{ "levels": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoLevels));
    }

    #[test]
    fn test_json_with_bad_level_is_rejected() {
        let err = GameConfig::from_json_str(r#"{ "levels": [ {}, { "moves": 0 } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel { index: 1, .. }));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = GameConfig::from_json_str("{ levels: nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "levels": [ {{ "rows": 4, "cols": 4, "colors": 3, "target_score": 90, "moves": 5 }} ],
                 "scoring": {{ "base_per_tile": 5 }} }}"#
        )
        .unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.levels[0].target_score, 90);
        assert_eq!(config.scoring.base_per_tile, 5);
        assert_eq!(config.scoring.cascade_bonus_per_step, 50);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::FileRead { .. })
        ));
        assert_eq!(
            GameConfig::load_or_default(&path).unwrap(),
            GameConfig::default()
        );
    }
}
