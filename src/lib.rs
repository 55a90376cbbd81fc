//! Egg Survivor - a top-down boss survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, spawning, progression)
//! - `view`: Snapshot to draw-list render contract
//! - `session`: Host-facing owner of a running game
//! - `leaderboard`: Best survival times and their persistence
//! - `settings`: Data-driven game balance, loaded from JSON

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::{SettingsError, StoreError};
pub use leaderboard::{LeaderboardStore, MemoryStore};
pub use session::Session;
pub use settings::Settings;

/// Game constants not exposed in the settings file
pub mod consts {
    /// Eggnemies chase at half their speed stat
    pub const EGGNEMY_ATTRACTION: f32 = 0.5;
    pub const BOSS_ATTRACTION: f32 = 0.7;
    /// Push between overlapping hostiles, per overlap
    pub const REPULSION_STRENGTH: f32 = 1.4;

    /// Contact damage per overlapping hostile
    pub const EGGNEMY_CONTACT_DAMAGE: i32 = 1;
    pub const BOSS_CONTACT_DAMAGE: i32 = 3;

    /// Per-roll chance of a spawn wave
    pub const SPAWN_CHANCE: f64 = 0.01;
    /// Largest spawn wave
    pub const MAX_SPAWN_BATCH: u32 = 3;
    /// Living eggnemies at or below which movement triggers a spawn roll
    pub const LOW_POPULATION: usize = 1;

    pub const EGGNEMY_SCORE: u64 = 1;
    pub const BOSS_SCORE: u64 = 10;
}
