//! Game settings
//!
//! Read once at startup from `settings.json`. Every field is required:
//! a missing or mistyped value is a startup failure, never a silent default.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Session-constant tunables loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    // === Display ===
    /// Simulation ticks per second
    pub fps: u32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Size of the scrollable play area
    pub world_width: f32,
    pub world_height: f32,

    // === Egg ===
    #[serde(rename = "eggInitHP")]
    pub egg_init_hp: i32,
    pub egg_width: f32,
    pub egg_height: f32,
    pub egg_init_attack: i32,
    pub egg_init_speed: f32,
    /// Defeats needed per level
    pub eggxperience_limit: u32,

    // === Growth (level-up upgrades and per-boss difficulty) ===
    pub hp_increment: i32,
    pub attack_increment: i32,
    pub speed_increment: f32,

    // === Eggnemies ===
    /// Eggnemies placed at session start
    pub eggnemies_count: u32,
    pub eggnemy_width: f32,
    pub eggnemy_height: f32,
    #[serde(rename = "eggnemyInitHP")]
    pub eggnemy_init_hp: i32,
    pub eggnemy_init_attack: i32,
    pub eggnemy_init_speed: f32,

    // === Bosses ===
    pub boss_width: f32,
    pub boss_height: f32,
    #[serde(rename = "bossInitHP")]
    pub boss_init_hp: i32,
    pub boss_init_attack: i32,
    pub boss_init_speed: f32,
    /// A boss appears every time this many eggnemies have been defeated
    pub eggnemies_to_spawn_boss: u32,
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fps == 0 {
            return Err(invalid("fps", "must be at least 1"));
        }
        if self.eggxperience_limit == 0 {
            return Err(invalid("eggxperienceLimit", "must be at least 1"));
        }
        if self.eggnemies_to_spawn_boss == 0 {
            return Err(invalid("eggnemiesToSpawnBoss", "must be at least 1"));
        }

        let sizes = [
            ("screenWidth", self.screen_width),
            ("screenHeight", self.screen_height),
            ("worldWidth", self.world_width),
            ("worldHeight", self.world_height),
            ("eggWidth", self.egg_width),
            ("eggHeight", self.egg_height),
            ("eggnemyWidth", self.eggnemy_width),
            ("eggnemyHeight", self.eggnemy_height),
            ("bossWidth", self.boss_width),
            ("bossHeight", self.boss_height),
        ];
        for (field, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive size, got {value}")));
            }
        }

        if self.egg_width > self.world_width || self.egg_height > self.world_height {
            return Err(invalid("eggWidth", "egg does not fit inside the world"));
        }

        let hit_points = [
            ("eggInitHP", self.egg_init_hp),
            ("eggnemyInitHP", self.eggnemy_init_hp),
            ("bossInitHP", self.boss_init_hp),
        ];
        for (field, value) in hit_points {
            if value <= 0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let speeds = [
            ("eggInitSpeed", self.egg_init_speed),
            ("eggnemyInitSpeed", self.eggnemy_init_speed),
            ("bossInitSpeed", self.boss_init_speed),
            ("speedIncrement", self.speed_increment),
        ];
        for (field, value) in speeds {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }

        let increments = [
            ("hpIncrement", self.hp_increment),
            ("attackIncrement", self.attack_increment),
        ];
        for (field, value) in increments {
            if value < 0 {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}
