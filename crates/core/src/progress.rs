//! Progress module - which level the player is on
//!
//! Progress is kept behind the [`ProgressStore`] port and only touched at
//! session boundaries (load when a [`Campaign`] starts, save when it advances).
//! Hosts plug in whatever storage they have; [`MemoryProgressStore`] is the
//! in-process implementation.

use tracing::info;

use crate::config::GameConfig;
use crate::error::{ConfigError, SessionError};
use crate::session::{Session, SessionStatus};

/// Storage port for the player's level index.
pub trait ProgressStore {
    /// Stored level index, or `None` if nothing was saved yet.
    fn load_level(&self) -> Option<usize>;
    /// Persist the level index.
    fn save_level(&mut self, level: usize);
    /// Forget any saved progress.
    fn clear(&mut self);
}

/// Progress kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryProgressStore {
    level: Option<usize>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: usize) -> Self {
        Self { level: Some(level) }
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load_level(&self) -> Option<usize> {
        self.level
    }

    fn save_level(&mut self, level: usize) {
        self.level = Some(level);
    }

    fn clear(&mut self) {
        self.level = None;
    }
}

/// The level table plus the player's position in it.
#[derive(Debug)]
pub struct Campaign<S> {
    config: GameConfig,
    store: S,
    current: usize,
}

impl<S: ProgressStore> Campaign<S> {
    /// Validate `config` and resume from the stored level (clamped into range).
    pub fn new(config: GameConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let last = config.levels.len() - 1;
        let current = store.load_level().unwrap_or(0).min(last);
        Ok(Self {
            config,
            store,
            current,
        })
    }

    pub fn current_level(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.config.levels.len()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Start playing the current level.
    pub fn start_session(&self, seed: Option<u32>) -> Result<Session, SessionError> {
        let level = &self.config.levels[self.current];
        Session::new(
            self.current,
            level,
            self.config.scoring,
            self.config.limits,
            seed,
        )
    }

    /// Move to the next level (staying on the last one) and save it.
    pub fn advance(&mut self) -> usize {
        let next = (self.current + 1).min(self.level_count() - 1);
        self.current = next;
        self.store.save_level(next);
        info!(level = next, "progress saved");
        next
    }

    /// Record how a session on the current level ended.
    ///
    /// A win advances and saves progress and returns the level to play next.
    /// Losses, unfinished sessions and sessions from another level change nothing.
    pub fn finish_session(&mut self, session: &Session) -> Option<usize> {
        if session.status() != SessionStatus::Won || session.level() != self.current {
            return None;
        }
        Some(self.advance())
    }

    /// Drop saved progress and go back to the first level.
    pub fn reset_progress(&mut self) {
        self.store.clear();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryProgressStore::new();
        assert_eq!(store.load_level(), None);
        store.save_level(2);
        assert_eq!(store.load_level(), Some(2));
        store.clear();
        assert_eq!(store.load_level(), None);
    }

    #[test]
    fn test_campaign_resumes_and_clamps() {
        let campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::with_level(1)).unwrap();
        assert_eq!(campaign.current_level(), 1);

        let campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::with_level(99)).unwrap();
        assert_eq!(campaign.current_level(), 2);

        let campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::new()).unwrap();
        assert_eq!(campaign.current_level(), 0);
    }

    #[test]
    fn test_campaign_rejects_empty_level_table() {
        let config = GameConfig {
            levels: Vec::new(),
            ..GameConfig::default()
        };
        assert!(matches!(
            Campaign::new(config, MemoryProgressStore::new()),
            Err(ConfigError::NoLevels)
        ));
    }

    #[test]
    fn test_advance_saves_and_stops_at_last_level() {
        let mut campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::new()).unwrap();
        assert_eq!(campaign.advance(), 1);
        assert_eq!(campaign.store().load_level(), Some(1));
        assert_eq!(campaign.advance(), 2);
        assert_eq!(campaign.advance(), 2);
        assert_eq!(campaign.store().load_level(), Some(2));
    }

    fn play_out(session: &mut Session) {
        while !session.is_over() {
            let (a, b) = session.board().find_valid_swap().unwrap();
            session.try_swap(a, b).unwrap();
        }
    }

    #[test]
    fn test_finish_session_advances_only_on_win() {
        let level = LevelConfig {
            rows: 6,
            cols: 6,
            colors: 4,
            target_score: 1,
            moves: 3,
        };
        let config = GameConfig {
            levels: vec![
                level,
                LevelConfig {
                    target_score: u32::MAX,
                    moves: 1,
                    ..level
                },
            ],
            ..GameConfig::default()
        };
        let mut campaign = Campaign::new(config, MemoryProgressStore::new()).unwrap();

        let mut session = campaign.start_session(Some(4)).unwrap();
        assert_eq!(campaign.finish_session(&session), None);
        play_out(&mut session);
        assert_eq!(session.status(), SessionStatus::Won);
        assert_eq!(campaign.finish_session(&session), Some(1));
        assert_eq!(campaign.store().load_level(), Some(1));

        // The stale session belongs to level 0 and cannot advance again.
        assert_eq!(campaign.finish_session(&session), None);

        let mut session = campaign.start_session(Some(4)).unwrap();
        play_out(&mut session);
        assert_eq!(session.status(), SessionStatus::Lost);
        assert_eq!(campaign.finish_session(&session), None);
        assert_eq!(campaign.current_level(), 1);
    }

    #[test]
    fn test_reset_progress() {
        let mut campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::with_level(2)).unwrap();
        campaign.reset_progress();
        assert_eq!(campaign.current_level(), 0);
        assert_eq!(campaign.into_store().load_level(), None);
    }

    #[test]
    fn test_start_session_uses_current_level() {
        let mut campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::new()).unwrap();
        campaign.advance();
        let session = campaign.start_session(Some(12)).unwrap();
        let level = campaign.config().levels[1];
        assert_eq!(session.level(), 1);
        assert_eq!(session.board().rows(), level.rows);
        assert_eq!(session.board().cols(), level.cols);
        assert_eq!(session.moves_left(), level.moves);
    }
}
