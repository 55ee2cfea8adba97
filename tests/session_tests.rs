//! Session and campaign tests - playing levels end to end

use match3::core::{
    Campaign, GameConfig, LevelConfig, MemoryProgressStore, ProgressStore, ScoringConfig,
    SessionError, SessionStatus,
};
use match3::types::Coord;

fn one_level(target_score: u32, moves: u32) -> GameConfig {
    GameConfig {
        levels: vec![LevelConfig {
            rows: 7,
            cols: 7,
            colors: 5,
            target_score,
            moves,
        }],
        ..GameConfig::default()
    }
}

#[test]
fn test_autoplay_until_finished() {
    let campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::new()).unwrap();
    let mut session = campaign.start_session(Some(2024)).unwrap();

    let mut moves = 0;
    while !session.is_over() {
        let (a, b) = session.board().find_valid_swap().unwrap();
        let outcome = session.try_swap(a, b).unwrap();
        assert!(outcome.success);
        moves += 1;
        assert!(moves <= 20, "level should end within its move budget");
    }

    match session.status() {
        SessionStatus::Won => assert!(session.score() >= session.target_score()),
        SessionStatus::Lost => assert_eq!(session.moves_left(), 0),
        SessionStatus::Playing => unreachable!(),
    }
}

#[test]
fn test_score_accumulates_per_formula() {
    let config = one_level(u32::MAX, 50);
    let scoring = config.scoring;
    let campaign = Campaign::new(config, MemoryProgressStore::new()).unwrap();
    let mut session = campaign.start_session(Some(77)).unwrap();

    let mut expected = 0u32;
    for _ in 0..10 {
        let (a, b) = session.board().find_valid_swap().unwrap();
        let outcome = session.try_swap(a, b).unwrap();
        expected += outcome.cleared * scoring.base_per_tile
            + outcome.cascades.saturating_sub(1) * scoring.cascade_bonus_per_step;
    }
    assert_eq!(session.score(), expected);
    assert_eq!(session.moves_left(), 40);
}

#[test]
fn test_invalid_swaps_are_free() {
    let campaign = Campaign::new(one_level(1000, 5), MemoryProgressStore::new()).unwrap();
    let mut session = campaign.start_session(Some(9)).unwrap();
    let before = session.snapshot();

    for _ in 0..10 {
        let outcome = session
            .try_swap(Coord::new(0, 0), Coord::new(6, 6))
            .unwrap();
        assert!(!outcome.success);
    }
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_finished_session_refuses_swaps() {
    let campaign = Campaign::new(one_level(1, 5), MemoryProgressStore::new()).unwrap();
    let mut session = campaign.start_session(Some(3)).unwrap();
    let (a, b) = session.board().find_valid_swap().unwrap();
    session.try_swap(a, b).unwrap();
    assert_eq!(session.status(), SessionStatus::Won);

    let (a, b) = session.board().find_valid_swap().unwrap();
    assert!(matches!(session.try_swap(a, b), Err(SessionError::Finished)));
}

#[test]
fn test_winning_advances_campaign() {
    let mut config = GameConfig::default();
    config.levels[0].target_score = 1;
    let mut campaign = Campaign::new(config, MemoryProgressStore::new()).unwrap();
    assert_eq!(campaign.current_level(), 0);

    let mut session = campaign.start_session(Some(8)).unwrap();
    let (a, b) = session.board().find_valid_swap().unwrap();
    session.try_swap(a, b).unwrap();
    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(campaign.finish_session(&session), Some(1));
    let store = campaign.into_store();
    assert_eq!(store.load_level(), Some(1));

    // A new campaign over the same store resumes where the player left off.
    let campaign = Campaign::new(GameConfig::default(), store).unwrap();
    assert_eq!(campaign.current_level(), 1);
}

#[test]
fn test_custom_scoring_from_json() {
    let config = GameConfig::from_json_str(
        r#"{
            "levels": [ { "rows": 6, "cols": 6, "colors": 4, "target_score": 5, "moves": 3 } ],
            "scoring": { "base_per_tile": 1, "cascade_bonus_per_step": 0 }
        }"#,
    )
    .unwrap();
    assert_eq!(
        config.scoring,
        ScoringConfig {
            base_per_tile: 1,
            cascade_bonus_per_step: 0
        }
    );

    let campaign = Campaign::new(config, MemoryProgressStore::new()).unwrap();
    let mut session = campaign.start_session(Some(1)).unwrap();
    let (a, b) = session.board().find_valid_swap().unwrap();
    let outcome = session.try_swap(a, b).unwrap();
    assert_eq!(session.score(), outcome.cleared);
}

#[test]
fn test_session_snapshot_serializes() {
    let campaign = Campaign::new(GameConfig::default(), MemoryProgressStore::new()).unwrap();
    let session = campaign.start_session(Some(5)).unwrap();
    let json = serde_json::to_value(session.snapshot()).unwrap();

    assert_eq!(json["level"], 0);
    assert_eq!(json["score"], 0);
    assert_eq!(json["status"], "Playing");
    assert_eq!(json["board"]["rows"], 6);
    assert_eq!(json["board"]["cells"].as_array().unwrap().len(), 36);
}
