//! Contact damage, the egg's attack, and boss upkeep
//!
//! Damage is applied by the attack; removal and bookkeeping of defeated
//! bosses is left to the next boss pass.

use super::collision::overlaps;
use super::movement::{advance, steer};
use super::state::{Eggnemy, GameEvent, Model};
use crate::consts::*;

/// Apply contact damage from everything touching the egg
///
/// Skipped while the level-up menu is open or while the invincibility
/// window from the last hit is still running. Every overlapping living
/// eggnemy and boss contributes once; the total is applied in one go, HP
/// floors at zero and the invincibility window restarts once.
pub fn update_collision(model: &Model) -> Model {
    let elapsed = model.ticks as i64 - model.first_collision_tick;
    if model.egg.level_up || elapsed < i64::from(model.config.egg_invincibility_frames) {
        return model.clone();
    }

    let egg = &model.egg;
    let eggnemy_hits = model.living_eggnemies().filter(|e| overlaps(egg, *e)).count() as i32;
    let boss_hits = model.living_bosses().filter(|b| overlaps(egg, *b)).count() as i32;
    let damage = eggnemy_hits * EGGNEMY_CONTACT_DAMAGE + boss_hits * BOSS_CONTACT_DAMAGE;
    if damage == 0 {
        return model.clone();
    }

    let mut next = model.clone();
    next.egg.hp = (egg.hp - damage).max(0);
    next.first_collision_tick = model.ticks as i64;
    next.push_event(GameEvent::Damaged {
        amount: damage,
        hp: next.egg.hp,
    });
    next
}

/// The egg strikes everything it currently overlaps
///
/// Eggnemies dropping to zero HP are removed immediately and counted.
/// Bosses are only damaged (floored at zero); [`update_boss`] reaps them.
pub fn attack(model: &Model) -> Model {
    if model.egg.level_up || model.is_game_over {
        return model.clone();
    }

    let egg = &model.egg;
    let mut defeated = 0u32;
    let eggnemies: Vec<Eggnemy> = model
        .eggnemies
        .iter()
        .filter_map(|e| {
            if !overlaps(egg, e) {
                return Some(e.clone());
            }
            let hp = e.hp - egg.attack;
            if hp <= 0 {
                defeated += 1;
                None
            } else {
                Some(Eggnemy { hp, ..e.clone() })
            }
        })
        .collect();

    let bosses = model
        .bosses
        .iter()
        .map(|b| {
            if b.is_alive() && overlaps(egg, b) {
                Eggnemy {
                    hp: (b.hp - egg.attack).max(0),
                    ..b.clone()
                }
            } else {
                b.clone()
            }
        })
        .collect();

    let mut next = Model {
        eggnemies,
        bosses,
        defeated_eggnemies: model.defeated_eggnemies + defeated,
        score: model.score + u64::from(defeated) * EGGNEMY_SCORE,
        ..model.clone()
    };
    if defeated > 0 {
        next.push_event(GameEvent::EggnemiesDefeated { count: defeated });
    }
    next
}

/// Reap defeated bosses, then move the survivors
///
/// Suspended while the level-up menu is open. Each reaped boss counts
/// toward `defeated_bosses` (not toward experience) and is worth
/// [`BOSS_SCORE`]. Survivors chase the egg and are pushed off overlapping
/// living eggnemies.
pub fn update_boss(model: &Model) -> Model {
    if model.egg.level_up {
        return model.clone();
    }

    let (alive, dead): (Vec<&Eggnemy>, Vec<&Eggnemy>) =
        model.bosses.iter().partition(|b| b.is_alive());
    let defeated = dead.len() as u32;

    let bosses = alive
        .into_iter()
        .map(|boss| {
            let vel = steer(boss, &model.egg, BOSS_ATTRACTION, model.living_eggnemies());
            advance(boss, vel)
        })
        .collect();

    let mut next = Model {
        bosses,
        defeated_bosses: model.defeated_bosses + defeated,
        score: model.score + u64::from(defeated) * BOSS_SCORE,
        ..model.clone()
    };
    if defeated > 0 {
        log::info!("Boss defeated ({} total)", next.defeated_bosses);
        next.push_event(GameEvent::BossDefeated { count: defeated });
    }
    next
}
