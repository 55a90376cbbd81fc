//! Game state and core simulation types
//!
//! Every step consumes a `&Model` and produces a new `Model`; nothing here
//! is mutated in place once a snapshot has been handed back to the host.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use super::spawn;
use crate::settings::Settings;

/// Camera viewport into the larger play area
///
/// Width and height are fixed for a session (the screen size); `x`/`y` pan
/// as the egg moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl World {
    /// Viewport centered on `target`, clamped so it never shows past the
    /// play area edges. A screen larger than the play area centers it.
    pub fn centered_on(target: Rect, config: &Config) -> Self {
        let center = target.center();
        Self {
            x: pan_axis(center.x, config.screen_width, config.world_width),
            y: pan_axis(center.y, config.screen_height, config.world_height),
            width: config.screen_width,
            height: config.screen_height,
        }
    }

    /// Map a world-space point into screen space
    pub fn to_screen(&self, pos: Vec2) -> Vec2 {
        pos - Vec2::new(self.x, self.y)
    }
}

fn pan_axis(center: f32, view: f32, extent: f32) -> f32 {
    if view >= extent {
        (extent - view) / 2.0
    } else {
        (center - view / 2.0).clamp(0.0, extent - view)
    }
}

impl Bounds for World {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Session-constant tunables derived from [`Settings`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub screen_width: f32,
    pub screen_height: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Ticks per second
    pub fps: u32,
    /// Grace period after taking damage
    pub egg_invincibility_frames: u32,
    /// Eggnemies placed at session start
    pub eggnemies_count: u32,
}

impl Config {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            screen_width: settings.screen_width,
            screen_height: settings.screen_height,
            world_width: settings.world_width,
            world_height: settings.world_height,
            fps: settings.fps,
            // One second of grace
            egg_invincibility_frames: settings.fps,
            eggnemies_count: settings.eggnemies_count,
        }
    }

    /// The whole play area in world space
    pub fn world_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.world_width, self.world_height)
    }
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    pub pos: Vec2,
    pub size: Vec2,
    /// Last movement step (informational only)
    pub vel: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub speed: f32,
    /// Mirrors `Model::defeated_eggnemies`
    pub eggxperience: u32,
    pub level: u32,
    /// Waiting for the player to pick an upgrade
    pub level_up: bool,
}

impl Egg {
    /// Fresh egg in the middle of the play area
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(settings.world_width / 2.0, settings.world_height / 2.0),
            size: Vec2::new(settings.egg_width, settings.egg_height),
            vel: Vec2::ZERO,
            hp: settings.egg_init_hp,
            max_hp: settings.egg_init_hp,
            attack: settings.egg_init_attack,
            speed: settings.egg_init_speed,
            eggxperience: 0,
            level: 0,
            level_up: false,
        }
    }
}

impl Bounds for Egg {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A hostile entity. Bosses share the shape and live in their own list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eggnemy {
    /// Unique within its owning list
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity applied on the last movement pass
    pub vel: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub speed: f32,
}

impl Eggnemy {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

impl Bounds for Eggnemy {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Elapsed play time. Always derived from the tick counter.
///
/// Field order matters: the derived ordering compares minutes first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timer {
    pub minutes: u32,
    pub seconds: u32,
}

impl Timer {
    pub fn from_ticks(ticks: u64, fps: u32) -> Self {
        let total_seconds = ticks / u64::from(fps.max(1));
        Self {
            minutes: (total_seconds / 60) as u32,
            seconds: (total_seconds % 60) as u32,
        }
    }

    /// Zero-padded `mm:ss`, as shown on the leaderboard
    pub fn padded(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// Notable transitions produced by a single step, drained by the host
/// for sound effects and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The egg took contact damage
    Damaged { amount: i32, hp: i32 },
    /// Eggnemies removed by an attack
    EggnemiesDefeated { count: u32 },
    BossSpawned { id: u32 },
    BossDefeated { count: u32 },
    /// Level-up menu opened
    LevelUp { level: u32 },
    GameOver { time: Timer },
}

/// Complete game state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub world: World,
    pub config: Config,
    pub egg: Egg,
    pub eggnemies: Vec<Eggnemy>,
    /// Total eggnemies ever spawned this run (id source)
    pub eggnemies_spawned: u32,
    pub bosses: Vec<Eggnemy>,
    pub defeated_bosses: u32,
    /// Last multiple of `eggnemiesToSpawnBoss` that produced a boss
    pub last_boss_spawn_threshold: u32,
    pub is_game_over: bool,
    pub score: u64,
    pub ticks: u64,
    /// Tick of the last damage taken
    pub first_collision_tick: i64,
    /// Ordinary defeats; doubles as experience
    pub defeated_eggnemies: u32,
    pub timer: Timer,
    /// Best survival times, longest first
    pub leaderboard: Vec<Timer>,
    /// Transitions made by the step that produced this snapshot
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Model {
    /// Blank run: fresh egg, no enemies, counters at zero
    pub fn new(settings: &Settings, leaderboard: Vec<Timer>) -> Self {
        let config = Config::from_settings(settings);
        let egg = Egg::new(settings);
        let world = World::centered_on(egg.bounds(), &config);
        Self {
            world,
            egg,
            eggnemies: Vec::new(),
            eggnemies_spawned: 0,
            bosses: Vec::new(),
            defeated_bosses: 0,
            last_boss_spawn_threshold: 0,
            is_game_over: false,
            score: 0,
            ticks: 0,
            // Vulnerable from the very first tick
            first_collision_tick: -i64::from(config.egg_invincibility_frames),
            defeated_eggnemies: 0,
            timer: Timer::default(),
            leaderboard,
            events: Vec::new(),
            config,
        }
    }

    /// Session start: a blank run with `eggnemiesCount` eggnemies scattered
    /// across the play area
    pub fn initial<R: Rng + ?Sized>(
        settings: &Settings,
        leaderboard: Vec<Timer>,
        rng: &mut R,
    ) -> Self {
        let model = Self::new(settings, leaderboard);
        spawn::scatter_eggnemies(&model, settings, rng)
    }

    pub fn living_eggnemies(&self) -> impl Iterator<Item = &Eggnemy> {
        self.eggnemies.iter().filter(|e| e.is_alive())
    }

    pub fn living_bosses(&self) -> impl Iterator<Item = &Eggnemy> {
        self.bosses.iter().filter(|b| b.is_alive())
    }

    /// Record a transition for the host
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
