//! Scripted player for demo/headless runs
//!
//! Chases the nearest living hostile and swings whenever something is in
//! reach. Upgrades are taken in a fixed HP, ATK, SPD rotation. A finished
//! run is left alone: restarting is the host's call.

use glam::Vec2;

use crate::sim::{Bounds, Eggnemy, Key, Model, Upgrade, overlaps};

const UPGRADE_ROTATION: [Upgrade; 3] = [Upgrade::Hp, Upgrade::Attack, Upgrade::Speed];

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    upgrades_taken: usize,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key to press before the next tick, if any
    pub fn next_key(&mut self, model: &Model) -> Option<Key> {
        if model.is_game_over {
            return None;
        }

        if model.egg.level_up {
            let upgrade = UPGRADE_ROTATION[self.upgrades_taken % UPGRADE_ROTATION.len()];
            self.upgrades_taken += 1;
            return Some(Key::Upgrade(upgrade));
        }

        let egg = &model.egg;
        let mut hostiles = model.living_eggnemies().chain(model.living_bosses());
        if hostiles.any(|h| overlaps(egg, h)) {
            return Some(Key::Attack);
        }

        let target = nearest(model)?;
        let delta = target.bounds().center() - egg.bounds().center();
        Some(chase_key(delta))
    }
}

fn nearest(model: &Model) -> Option<&Eggnemy> {
    let from = model.egg.bounds().center();
    model
        .living_eggnemies()
        .chain(model.living_bosses())
        .min_by(|a, b| {
            let da = a.bounds().center().distance_squared(from);
            let db = b.bounds().center().distance_squared(from);
            da.total_cmp(&db)
        })
}

/// Step along whichever axis is further off
fn chase_key(delta: Vec2) -> Key {
    if delta.x.abs() >= delta.y.abs() {
        if delta.x < 0.0 { Key::Left } else { Key::Right }
    } else if delta.y < 0.0 {
        Key::Up
    } else {
        Key::Down
    }
}
