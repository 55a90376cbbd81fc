//! Top-level step function
//!
//! Every host event becomes a [`Msg`]. [`update`] folds it into the current
//! snapshot through the pipeline stages and returns the next snapshot.

use glam::Vec2;
use rand::Rng;

use super::combat::{attack, update_boss, update_collision};
use super::movement::{move_egg, update_egg, update_eggnemies};
use super::progression::{
    Upgrade, choose_upgrade, restart, update_eggxperience, update_game_over, update_ticks,
    update_time,
};
use super::spawn::{spawn_boss, spawn_eggnemies};
use super::state::Model;
use crate::leaderboard::LeaderboardStore;
use crate::settings::Settings;

/// Recognized keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Left,
    Down,
    Right,
    Attack,
    Restart,
    Upgrade(Upgrade),
}

impl Key {
    /// Map a host key identifier (`"w"`, `"L"`, `"1"`...) to a key.
    /// Anything else is `None` and never reaches the simulation.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "w" => Some(Self::Up),
            "a" => Some(Self::Left),
            "s" => Some(Self::Down),
            "d" => Some(Self::Right),
            "l" => Some(Self::Attack),
            "r" => Some(Self::Restart),
            "1" => Some(Self::Upgrade(Upgrade::Hp)),
            "2" => Some(Self::Upgrade(Upgrade::Attack)),
            "3" => Some(Self::Upgrade(Upgrade::Speed)),
            _ => None,
        }
    }

    /// Unit step for movement keys
    pub fn direction(self) -> Option<Vec2> {
        match self {
            Self::Up => Some(Vec2::NEG_Y),
            Self::Left => Some(Vec2::NEG_X),
            Self::Down => Some(Vec2::Y),
            Self::Right => Some(Vec2::X),
            _ => None,
        }
    }
}

/// Input to a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Tick,
    KeyDown(Key),
}

/// Everything a step needs besides the snapshot
pub struct Env<'a, R: Rng + ?Sized> {
    pub settings: &'a Settings,
    pub rng: &'a mut R,
    pub store: &'a mut dyn LeaderboardStore,
}

/// Advance the game by one message
///
/// The returned snapshot's `events` hold only what this step did.
pub fn update<R: Rng + ?Sized>(msg: Msg, model: &Model, env: &mut Env<'_, R>) -> Model {
    let mut model = model.clone();
    model.events.clear();

    match msg {
        Msg::Tick => tick(&model, env),
        Msg::KeyDown(key) => key_down(key, &model, env),
    }
}

fn tick<R: Rng + ?Sized>(model: &Model, env: &mut Env<'_, R>) -> Model {
    if model.is_game_over {
        return model.clone();
    }

    let model = update_egg(model);
    let model = update_boss(&model);
    let model = update_eggnemies(&model, env.settings, env.rng);
    let model = update_collision(&model);
    let model = spawn_eggnemies(&model, env.settings, env.rng);
    let model = spawn_boss(&model, env.settings);
    let model = update_game_over(&model, env.store);
    let model = update_ticks(&model);
    let model = update_time(&model);
    update_eggxperience(&model, env.settings)
}

fn key_down<R: Rng + ?Sized>(key: Key, model: &Model, env: &mut Env<'_, R>) -> Model {
    if model.is_game_over {
        return match key {
            Key::Restart => restart(model, env.settings, env.store),
            _ => model.clone(),
        };
    }

    if model.egg.level_up {
        return match key {
            Key::Upgrade(upgrade) => choose_upgrade(model, env.settings, upgrade),
            _ => model.clone(),
        };
    }

    match key {
        Key::Attack => attack(model),
        Key::Restart | Key::Upgrade(_) => model.clone(),
        movement => match movement.direction() {
            Some(direction) => move_egg(model, direction),
            None => model.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::MemoryStore;
    use crate::settings::tests::sample;
    use crate::sim::state::{Eggnemy, GameEvent, Timer};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn run(model: &Model, msgs: &[Msg], seed: u64, store: &mut MemoryStore) -> Model {
        let settings = sample();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut env = Env {
            settings: &settings,
            rng: &mut rng,
            store,
        };
        msgs.iter()
            .fold(model.clone(), |m, msg| update(*msg, &m, &mut env))
    }

    fn initial(seed: u64) -> Model {
        let mut rng = Pcg32::seed_from_u64(seed);
        Model::initial(&sample(), Vec::new(), &mut rng)
    }

    fn eggnemy_on(model: &Model) -> Eggnemy {
        Eggnemy {
            id: 99,
            pos: model.egg.pos,
            size: Vec2::new(17.0, 30.0),
            vel: Vec2::ZERO,
            hp: 1,
            max_hp: 1,
            attack: 1,
            speed: 0.0,
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_key("w"), Some(Key::Up));
        assert_eq!(Key::from_key("D"), Some(Key::Right));
        assert_eq!(Key::from_key("l"), Some(Key::Attack));
        assert_eq!(Key::from_key("2"), Some(Key::Upgrade(Upgrade::Attack)));
        assert_eq!(Key::from_key("ArrowUp"), None);
        assert_eq!(Key::from_key(""), None);
    }

    #[test]
    fn test_every_binding_is_distinct() {
        let bound: HashSet<Key> = "wasdlr123"
            .chars()
            .filter_map(|c| Key::from_key(&c.to_string()))
            .collect();
        assert_eq!(bound.len(), 9);
        assert!(bound.contains(&Key::Upgrade(Upgrade::Speed)));
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut store = MemoryStore::new();
        let model = run(&initial(1), &[Msg::Tick; 30], 1, &mut store);
        assert_eq!(model.ticks, 30);
        assert_eq!(model.timer, Timer { minutes: 0, seconds: 1 });
    }

    #[test]
    fn test_tick_is_identity_after_game_over() {
        let mut store = MemoryStore::new();
        let mut model = initial(2);
        model.is_game_over = true;
        assert_eq!(run(&model, &[Msg::Tick], 2, &mut store), model);
    }

    #[test]
    fn test_movement_keys() {
        let mut store = MemoryStore::new();
        let model = initial(3);
        let start = model.egg.pos;
        let speed = model.egg.speed;

        let moved = run(&model, &[Msg::KeyDown(Key::Right)], 3, &mut store);
        assert_eq!(moved.egg.pos, start + Vec2::new(speed, 0.0));
        let moved = run(&model, &[Msg::KeyDown(Key::Up)], 3, &mut store);
        assert_eq!(moved.egg.pos, start - Vec2::new(0.0, speed));
        // Keys never advance time
        assert_eq!(moved.ticks, 0);
    }

    #[test]
    fn test_attack_key() {
        let mut store = MemoryStore::new();
        let mut model = Model::new(&sample(), Vec::new());
        model.eggnemies = vec![eggnemy_on(&model)];
        let hit = run(&model, &[Msg::KeyDown(Key::Attack)], 4, &mut store);
        assert!(hit.eggnemies.is_empty());
        assert_eq!(hit.defeated_eggnemies, 1);
    }

    #[test]
    fn test_level_up_menu_only_accepts_upgrades() {
        let mut store = MemoryStore::new();
        let mut model = initial(5);
        model.egg.level_up = true;

        for key in [Key::Up, Key::Attack, Key::Restart] {
            assert_eq!(run(&model, &[Msg::KeyDown(key)], 5, &mut store), model);
        }

        let chosen = run(
            &model,
            &[Msg::KeyDown(Key::Upgrade(Upgrade::Speed))],
            5,
            &mut store,
        );
        assert!(!chosen.egg.level_up);
        assert_eq!(chosen.egg.level, 1);
    }

    #[test]
    fn test_level_up_freezes_world() {
        let mut store = MemoryStore::new();
        let mut model = initial(6);
        model.egg.level_up = true;
        model.defeated_eggnemies = 3;

        let after = run(&model, &[Msg::Tick; 10], 6, &mut store);
        assert_eq!(after.eggnemies, model.eggnemies);
        assert_eq!(after.egg.hp, model.egg.hp);
        assert!(after.egg.level_up);
        assert_eq!(after.ticks, 10);
    }

    #[test]
    fn test_game_over_only_restarts() {
        let mut store = MemoryStore::new();
        let mut model = Model::new(&sample(), Vec::new());
        model.egg.hp = 0;
        model.ticks = 300;

        let over = run(&model, &[Msg::Tick], 7, &mut store);
        assert!(over.is_game_over);
        assert!(matches!(over.events.as_slice(), [GameEvent::GameOver { .. }]));

        for key in [Key::Up, Key::Attack, Key::Upgrade(Upgrade::Hp)] {
            let same = run(&over, &[Msg::KeyDown(key)], 7, &mut store);
            assert_eq!(same, Model { events: Vec::new(), ..over.clone() });
        }

        let fresh = run(&over, &[Msg::KeyDown(Key::Restart)], 7, &mut store);
        assert!(!fresh.is_game_over);
        assert_eq!(fresh.ticks, 0);
        assert_eq!(fresh.leaderboard, over.leaderboard);
    }

    #[test]
    fn test_events_cleared_each_step() {
        let mut store = MemoryStore::new();
        let mut model = Model::new(&sample(), Vec::new());
        model.eggnemies = vec![eggnemy_on(&model)];
        let hit = run(&model, &[Msg::KeyDown(Key::Attack)], 8, &mut store);
        assert!(!hit.events.is_empty());

        let mut still = hit.clone();
        still.egg.speed = 0.0;
        let next = run(&still, &[Msg::KeyDown(Key::Left)], 8, &mut store);
        assert!(next.events.is_empty());
    }

    #[test]
    fn test_determinism() {
        let msgs: Vec<Msg> = (0..600)
            .map(|i| match i % 7 {
                0 => Msg::KeyDown(Key::Right),
                3 => Msg::KeyDown(Key::Attack),
                5 => Msg::KeyDown(Key::Down),
                _ => Msg::Tick,
            })
            .collect();

        let a = run(&initial(42), &msgs, 42, &mut MemoryStore::new());
        let b = run(&initial(42), &msgs, 42, &mut MemoryStore::new());
        assert_eq!(a, b);
    }
}
