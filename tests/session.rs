//! End-to-end runs through the public API

use egg_survivor::autopilot::Autopilot;
use egg_survivor::leaderboard::{FileStore, LeaderboardStore, MemoryStore};
use egg_survivor::sim::{GameEvent, Msg, Timer};
use egg_survivor::view::DrawCommand;
use egg_survivor::{Session, Settings, SettingsError};

const SETTINGS: &str = include_str!("../settings.json");

fn settings() -> Settings {
    Settings::from_json_str(SETTINGS).expect("bundled settings are valid")
}

/// Fragile egg, so runs end quickly
fn fragile() -> Settings {
    Settings {
        egg_init_hp: 1,
        eggnemies_count: 40,
        ..settings()
    }
}

fn start(settings: Settings, seed: u64, store: impl LeaderboardStore + 'static) -> Session {
    Session::new(settings, seed, Box::new(store)).expect("valid settings")
}

fn play_until_over(session: &mut Session, max_ticks: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        events.extend_from_slice(session.tick());
        if session.snapshot().is_game_over {
            break;
        }
    }
    events
}

#[test]
fn bundled_settings_start_a_session() {
    let session = start(settings(), 1, MemoryStore::new());
    let model = session.snapshot();
    assert_eq!(model.eggnemies.len(), 5);
    assert!(model.bosses.is_empty());
    assert!(!model.is_game_over);
    assert!(matches!(session.view()[0], DrawCommand::Clear { .. }));
}

#[test]
fn same_seed_same_run() {
    let mut a = start(settings(), 77, MemoryStore::new());
    let mut b = start(settings(), 77, MemoryStore::new());
    let mut pilot_a = Autopilot::new();
    let mut pilot_b = Autopilot::new();

    for _ in 0..2_000 {
        if let Some(key) = pilot_a.next_key(a.snapshot()) {
            a.handle(Msg::KeyDown(key));
        }
        if let Some(key) = pilot_b.next_key(b.snapshot()) {
            b.handle(Msg::KeyDown(key));
        }
        a.tick();
        b.tick();
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn game_over_is_recorded_and_survives_restart() {
    let mut session = start(fragile(), 5, MemoryStore::new());
    let events = play_until_over(&mut session, 20_000);

    let model = session.snapshot();
    assert!(model.is_game_over, "a 1 HP egg among 40 eggnemies must fall");
    assert_eq!(model.egg.hp, 0);
    assert_eq!(model.leaderboard.len(), 1);
    assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    let board = model.leaderboard.clone();
    let ticks = model.ticks;

    // Frozen until restart
    session.tick();
    assert_eq!(session.snapshot().ticks, ticks);
    session.key_down("w");
    assert!(session.snapshot().is_game_over);

    session.key_down("r");
    let fresh = session.snapshot();
    assert!(!fresh.is_game_over);
    assert_eq!(fresh.ticks, 0);
    assert_eq!(fresh.egg.hp, 1);
    assert!(fresh.eggnemies.is_empty());
    assert_eq!(fresh.leaderboard, board);
}

#[test]
fn leaderboard_persists_across_sessions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("leaderboard.json");

    for seed in [11, 12, 13, 14] {
        let mut session = start(fragile(), seed, FileStore::new(&path));
        play_until_over(&mut session, 20_000);
        assert!(session.snapshot().is_game_over);
    }

    let board = FileStore::new(&path).read();
    assert_eq!(board.len(), 3);
    assert!(board.windows(2).all(|w| w[0] >= w[1]), "longest first: {board:?}");

    let session = start(settings(), 99, FileStore::new(&path));
    assert_eq!(session.snapshot().leaderboard, board);
}

#[test]
fn corrupt_leaderboard_starts_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("leaderboard.json");
    std::fs::write(&path, "[{\"minutes\": 1").expect("write");

    let session = start(settings(), 3, FileStore::new(&path));
    assert!(session.snapshot().leaderboard.is_empty());
}

#[test]
fn autopilot_makes_progress() {
    let mut session = start(settings(), 2024, MemoryStore::new());
    let mut pilot = Autopilot::new();
    for _ in 0..3_000 {
        if let Some(key) = pilot.next_key(session.snapshot()) {
            session.handle(Msg::KeyDown(key));
        }
        session.tick();
        if session.snapshot().is_game_over {
            break;
        }
    }
    let model = session.snapshot();
    assert!(model.defeated_eggnemies > 0, "autopilot never landed a kill");
    assert_eq!(model.egg.eggxperience, model.defeated_eggnemies);
    assert!(model.timer >= Timer::default());
}

#[test]
fn unusable_settings_never_start() {
    let broken = Settings {
        eggxperience_limit: 0,
        ..settings()
    };
    let err = Session::new(broken, 1, Box::new(MemoryStore::new())).err();
    assert!(matches!(
        err,
        Some(SettingsError::Invalid { field: "eggxperienceLimit", .. })
    ));
}
