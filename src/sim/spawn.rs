//! Eggnemy and boss spawning
//!
//! Spawned stats grow linearly with `defeated_bosses`, so every boss kill
//! makes the following waves strictly harder.

use glam::Vec2;
use rand::Rng;

use super::collision::{Bounds, Rect};
use super::state::{Eggnemy, GameEvent, Model};
use crate::consts::*;
use crate::settings::Settings;

/// Base stats plus one growth step per defeated boss
struct Stats {
    hp: i32,
    attack: i32,
    speed: f32,
}

impl Stats {
    fn scaled(settings: &Settings, hp: i32, attack: i32, speed: f32, defeated_bosses: u32) -> Self {
        let tier = defeated_bosses as i32;
        Self {
            hp: hp + tier * settings.hp_increment,
            attack: attack + tier * settings.attack_increment,
            speed: speed + defeated_bosses as f32 * settings.speed_increment,
        }
    }
}

/// An ordinary eggnemy at `pos`, scaled to the current difficulty
pub fn make_eggnemy(id: u32, pos: Vec2, settings: &Settings, defeated_bosses: u32) -> Eggnemy {
    let stats = Stats::scaled(
        settings,
        settings.eggnemy_init_hp,
        settings.eggnemy_init_attack,
        settings.eggnemy_init_speed,
        defeated_bosses,
    );
    Eggnemy {
        id,
        pos,
        size: Vec2::new(settings.eggnemy_width, settings.eggnemy_height),
        vel: Vec2::ZERO,
        hp: stats.hp,
        max_hp: stats.hp,
        attack: stats.attack,
        speed: stats.speed,
    }
}

/// A boss at `pos`, scaled to the current difficulty
pub fn make_boss(id: u32, pos: Vec2, settings: &Settings, defeated_bosses: u32) -> Eggnemy {
    let stats = Stats::scaled(
        settings,
        settings.boss_init_hp,
        settings.boss_init_attack,
        settings.boss_init_speed,
        defeated_bosses,
    );
    Eggnemy {
        id,
        pos,
        size: Vec2::new(settings.boss_width, settings.boss_height),
        vel: Vec2::ZERO,
        hp: stats.hp,
        max_hp: stats.hp,
        attack: stats.attack,
        speed: stats.speed,
    }
}

/// Uniformly random point inside `area`
pub fn random_point<R: Rng + ?Sized>(area: Rect, rng: &mut R) -> Vec2 {
    Vec2::new(
        area.x + rng.random::<f32>() * area.width,
        area.y + rng.random::<f32>() * area.height,
    )
}

/// Append `count` eggnemies, each placed by `place`
fn append_eggnemies<R: Rng + ?Sized>(
    model: &Model,
    settings: &Settings,
    rng: &mut R,
    count: u32,
    mut place: impl FnMut(&Model, &mut R) -> Vec2,
) -> Model {
    let mut next = model.clone();
    for _ in 0..count {
        let pos = place(&next, rng);
        let id = next.eggnemies_spawned + 1;
        next.eggnemies
            .push(make_eggnemy(id, pos, settings, next.defeated_bosses));
        next.eggnemies_spawned = id;
    }
    next
}

/// Session start: `eggnemies_count` eggnemies anywhere in the play area
pub fn scatter_eggnemies<R: Rng + ?Sized>(model: &Model, settings: &Settings, rng: &mut R) -> Model {
    append_eggnemies(model, settings, rng, model.config.eggnemies_count, |m, rng| {
        random_point(m.config.world_bounds(), rng)
    })
}

/// Maybe spawn a small wave of eggnemies
///
/// Each call has a [`SPAWN_CHANCE`] of spawning 1 to [`MAX_SPAWN_BATCH`]
/// eggnemies. Each one lands either on screen or anywhere in the play area
/// (even odds). There is no cap on the total. Nothing spawns while the
/// level-up menu is open.
pub fn spawn_eggnemies<R: Rng + ?Sized>(model: &Model, settings: &Settings, rng: &mut R) -> Model {
    if model.egg.level_up || !rng.random_bool(SPAWN_CHANCE) {
        return model.clone();
    }

    let count = rng.random_range(1..=MAX_SPAWN_BATCH);
    let spawned = append_eggnemies(model, settings, rng, count, |m, rng| {
        let area = if rng.random_bool(0.5) {
            m.world.bounds()
        } else {
            m.config.world_bounds()
        };
        random_point(area, rng)
    });
    log::debug!(
        "Spawned {} eggnemies ({} alive)",
        count,
        spawned.living_eggnemies().count()
    );
    spawned
}

/// Spawn a boss when `defeated_eggnemies` reaches a new multiple of
/// `eggnemiesToSpawnBoss`
///
/// The boss appears in the middle of the camera view, so it always enters
/// on screen.
/// `last_boss_spawn_threshold` records the multiple that already produced a
/// boss, so each multiple spawns exactly once even across repeated calls.
pub fn spawn_boss(model: &Model, settings: &Settings) -> Model {
    let step = settings.eggnemies_to_spawn_boss;
    let threshold = model.defeated_eggnemies / step * step;
    if threshold == 0 || threshold <= model.last_boss_spawn_threshold {
        return model.clone();
    }

    let center = model.world.bounds().center();
    let pos = center - Vec2::new(settings.boss_width, settings.boss_height) / 2.0;
    let id = threshold / step;
    let boss = make_boss(id, pos, settings, model.defeated_bosses);
    log::info!(
        "Boss #{} spawned at {} defeats (hp {}, speed {})",
        id,
        threshold,
        boss.hp,
        boss.speed
    );

    let mut next = model.clone();
    next.bosses.push(boss);
    next.last_boss_spawn_threshold = threshold;
    next.push_event(GameEvent::BossSpawned { id });
    next
}
