//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per message, snapshot in, snapshot out
//! - Seeded RNG only, injected by the caller
//! - Persistence only through [`crate::leaderboard::LeaderboardStore`]
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod movement;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Bounds, Rect, is_in_collision, overlaps};
pub use progression::Upgrade;
pub use state::{Config, Egg, Eggnemy, GameEvent, Model, Timer, World};
pub use tick::{Env, Key, Msg, update};
