//! Host-facing game session
//!
//! Owns everything a run needs between events: settings, the current
//! snapshot, the seeded RNG and the leaderboard store. Hosts feed it one
//! message at a time and drain the events of each step.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::SettingsError;
use crate::leaderboard::LeaderboardStore;
use crate::settings::Settings;
use crate::sim::{Env, GameEvent, Key, Model, Msg, update};
use crate::view::{DrawCommand, view};

pub struct Session {
    settings: Settings,
    model: Model,
    rng: Pcg32,
    store: Box<dyn LeaderboardStore>,
}

impl Session {
    /// Start a run with the persisted leaderboard and `eggnemiesCount`
    /// eggnemies scattered across the play area
    ///
    /// Settings the simulation cannot run with are rejected up front.
    pub fn new(
        settings: Settings,
        seed: u64,
        store: Box<dyn LeaderboardStore>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let model = Model::initial(&settings, store.read(), &mut rng);
        log::info!(
            "Session started (seed {}, {} eggnemies, {}x{} play area)",
            seed,
            model.eggnemies.len(),
            settings.world_width,
            settings.world_height
        );
        Ok(Self {
            settings,
            model,
            rng,
            store,
        })
    }

    /// Run one step; returns what it did
    pub fn handle(&mut self, msg: Msg) -> &[GameEvent] {
        let mut env = Env {
            settings: &self.settings,
            rng: &mut self.rng,
            store: self.store.as_mut(),
        };
        self.model = update(msg, &self.model, &mut env);
        &self.model.events
    }

    pub fn tick(&mut self) -> &[GameEvent] {
        self.handle(Msg::Tick)
    }

    /// Forward a host key identifier; unknown keys are ignored
    pub fn key_down(&mut self, key: &str) -> &[GameEvent] {
        match Key::from_key(key) {
            Some(key) => self.handle(Msg::KeyDown(key)),
            None => &[],
        }
    }

    pub fn snapshot(&self) -> &Model {
        &self.model
    }

    /// Draw list for the current snapshot
    pub fn view(&self) -> Vec<DrawCommand> {
        view(&self.model)
    }
}
