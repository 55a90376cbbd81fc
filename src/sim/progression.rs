//! Clock, experience, upgrades and the end of a run

use super::state::{GameEvent, Model, Timer};
use crate::leaderboard::{self, LeaderboardStore};
use crate::settings::Settings;

/// Stat picked from the level-up menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upgrade {
    Hp,
    Attack,
    Speed,
}

pub fn update_ticks(model: &Model) -> Model {
    Model {
        ticks: model.ticks + 1,
        ..model.clone()
    }
}

/// Recompute the clock from the tick counter
pub fn update_time(model: &Model) -> Model {
    Model {
        timer: Timer::from_ticks(model.ticks, model.config.fps),
        ..model.clone()
    }
}

/// Sync experience with defeats and open the level-up menu when due
///
/// The menu is due whenever `eggxperience / eggxperienceLimit` exceeds the
/// current level. It stays open until an upgrade is chosen.
pub fn update_eggxperience(model: &Model, settings: &Settings) -> Model {
    let mut next = model.clone();
    next.egg.eggxperience = model.defeated_eggnemies;
    next.egg.level_up = next.egg.eggxperience / settings.eggxperience_limit > model.egg.level;

    if next.egg.level_up && !model.egg.level_up {
        let level = model.egg.level + 1;
        log::info!("Level {} reached at {} eggxperience", level, next.egg.eggxperience);
        next.push_event(GameEvent::LevelUp { level });
    }
    next
}

/// Apply the chosen upgrade and close the level-up menu
///
/// Ignored unless the menu is open.
pub fn choose_upgrade(model: &Model, settings: &Settings, upgrade: Upgrade) -> Model {
    if !model.egg.level_up {
        return model.clone();
    }

    let mut next = model.clone();
    let egg = &mut next.egg;
    match upgrade {
        Upgrade::Hp => {
            egg.hp += settings.hp_increment;
            egg.max_hp += settings.hp_increment;
        }
        Upgrade::Attack => egg.attack += settings.attack_increment,
        Upgrade::Speed => egg.speed += settings.speed_increment,
    }
    egg.level += 1;
    egg.level_up = false;
    log::debug!("Upgrade {:?} chosen, now level {}", upgrade, egg.level);
    next
}

/// End the run once the egg is out of HP
///
/// Records the final time on the leaderboard and persists it. A failed
/// write is logged and the in-memory board is kept. Does nothing once the
/// game is already over.
pub fn update_game_over(model: &Model, store: &mut dyn LeaderboardStore) -> Model {
    if model.is_game_over || model.egg.hp > 0 {
        return model.clone();
    }

    let time = model.timer;
    if let Some(rank) = leaderboard::potential_rank(&model.leaderboard, time) {
        log::info!("New #{} time: {}", rank, time);
    }
    let board = leaderboard::record(&model.leaderboard, time);
    if let Err(err) = store.write(&board) {
        log::warn!("Failed to save leaderboard: {}", err);
    }
    log::info!(
        "Game over after {} ({} eggnemies, {} bosses, score {})",
        time,
        model.defeated_eggnemies,
        model.defeated_bosses,
        model.score
    );

    let mut next = Model {
        is_game_over: true,
        leaderboard: board,
        ..model.clone()
    };
    next.push_event(GameEvent::GameOver { time });
    next
}

/// Fresh run in the same session
///
/// The camera and session constants carry over. The leaderboard is read
/// back from the store, falling back to the in-memory board when the
/// store has nothing.
pub fn restart(model: &Model, settings: &Settings, store: &dyn LeaderboardStore) -> Model {
    let persisted = store.read();
    let board = if persisted.is_empty() {
        model.leaderboard.clone()
    } else {
        persisted
    };
    log::info!("Restarting ({} best times on record)", board.len());

    Model {
        world: model.world,
        config: model.config.clone(),
        ..Model::new(settings, board)
    }
}
