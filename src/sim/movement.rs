//! Per-tick movement
//!
//! Hostiles steer by summing two forces, computed against the frozen
//! snapshot of the current tick so every entity moves simultaneously:
//! - attraction: unit vector toward the egg, scaled by the entity's speed
//! - repulsion: a push away from every overlapping living eggnemy
//!
//! The resulting velocity is added straight to position.

use glam::Vec2;
use rand::Rng;

use super::collision::{Bounds, overlaps};
use super::spawn;
use super::state::{Config, Egg, Eggnemy, Model, World};
use crate::consts::*;
use crate::settings::Settings;

/// Keep a box of `size` inside the play area
pub fn clamp_to_world(pos: Vec2, size: Vec2, config: &Config) -> Vec2 {
    let max = Vec2::new(config.world_width, config.world_height) - size;
    pos.clamp(Vec2::ZERO, max.max(Vec2::ZERO))
}

/// Clamp the egg to the play area and re-center the camera on it
pub fn update_egg(model: &Model) -> Model {
    let mut egg = model.egg.clone();
    egg.pos = clamp_to_world(egg.pos, egg.size, &model.config);
    let world = World::centered_on(egg.bounds(), &model.config);
    Model {
        egg,
        world,
        ..model.clone()
    }
}

/// Move the egg one step along `direction` (unit axis vector)
pub fn move_egg(model: &Model, direction: Vec2) -> Model {
    let mut egg = model.egg.clone();
    let target = egg.pos + direction * egg.speed;
    let pos = clamp_to_world(target, egg.size, &model.config);
    egg.vel = pos - egg.pos;
    egg.pos = pos;
    let world = World::centered_on(egg.bounds(), &model.config);
    Model {
        egg,
        world,
        ..model.clone()
    }
}

/// Pull from `from` toward `to`. Coincident points contribute nothing.
#[inline]
pub fn attraction(from: Vec2, to: Vec2, strength: f32) -> Vec2 {
    (to - from).normalize_or_zero() * strength
}

/// Push `subject` away from `other`
///
/// Coincident points fall back to the raw (zero) delta instead of being
/// normalized.
#[inline]
pub fn repulsion(subject: Vec2, other: Vec2) -> Vec2 {
    let delta = subject - other;
    let distance = delta.length();
    let direction = if distance == 0.0 {
        delta
    } else {
        delta / distance
    };
    direction * REPULSION_STRENGTH
}

/// Velocity of a hostile for this tick
///
/// `neighbours` must already exclude `subject` itself.
pub fn steer<'a>(
    subject: &Eggnemy,
    egg: &Egg,
    attraction_factor: f32,
    neighbours: impl IntoIterator<Item = &'a Eggnemy>,
) -> Vec2 {
    let pull = attraction(subject.pos, egg.pos, subject.speed * attraction_factor);
    neighbours
        .into_iter()
        .filter(|other| overlaps(subject, *other))
        .fold(pull, |vel, other| vel + repulsion(subject.pos, other.pos))
}

/// Apply a velocity to a hostile
pub fn advance(entity: &Eggnemy, vel: Vec2) -> Eggnemy {
    Eggnemy {
        pos: entity.pos + vel,
        vel,
        ..entity.clone()
    }
}

/// Move every living eggnemy toward the egg
///
/// Suspended while the game is over or the level-up menu is open. A field
/// down to its last eggnemy gets a respawn roll first, so the arena only
/// empties right after a boss phase. Dead eggnemies are dropped.
pub fn update_eggnemies<R: Rng + ?Sized>(model: &Model, settings: &Settings, rng: &mut R) -> Model {
    if model.is_game_over || model.egg.level_up {
        return model.clone();
    }

    let model = if model.living_eggnemies().count() <= LOW_POPULATION {
        spawn::spawn_eggnemies(model, settings, rng)
    } else {
        model.clone()
    };

    let living: Vec<&Eggnemy> = model.living_eggnemies().collect();
    let eggnemies = living
        .iter()
        .enumerate()
        .map(|(i, eggnemy)| {
            let others = living
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| *other);
            let vel = steer(eggnemy, &model.egg, EGGNEMY_ATTRACTION, others);
            advance(eggnemy, vel)
        })
        .collect();

    Model { eggnemies, ..model }
}
