//! Sound effects
//!
//! Procedurally generated through the Web Audio API on wasm, so no sound
//! files ship with the game. Native builds only log what would have played.
//! Playback is fire-and-forget: every failure is ignored.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

const MASTER_VOLUME: f32 = 0.8;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Egg took contact damage
    Hit,
    /// Attack landed a kill
    Attack,
    /// Level-up menu opened
    LevelUp,
    /// A boss entered the arena
    BossSpawn,
    BossDefeated,
    GameOver,
}

impl SoundEffect {
    pub fn from_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Damaged { .. } => Self::Hit,
            GameEvent::EggnemiesDefeated { .. } => Self::Attack,
            GameEvent::BossSpawned { .. } => Self::BossSpawn,
            GameEvent::BossDefeated { .. } => Self::BossDefeated,
            GameEvent::LevelUp { .. } => Self::LevelUp,
            GameEvent::GameOver { .. } => Self::GameOver,
        }
    }

    /// Effects for one step's events, each at most once, in event order
    pub fn for_events(events: &[GameEvent]) -> Vec<Self> {
        let mut effects: Vec<Self> = Vec::with_capacity(events.len());
        for effect in events.iter().map(Self::from_event) {
            if !effects.contains(&effect) {
                effects.push(effect);
            }
        }
        effects
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { MASTER_VOLUME }
    }

    /// Play whatever one step's events call for
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in SoundEffect::for_events(events) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        log::debug!("Sound: {:?} at {:.2}", effect, vol);

        #[cfg(target_arch = "wasm32")]
        {
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Hit => self.play_hit(ctx, vol),
                SoundEffect::Attack => self.play_attack(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::BossSpawn => self.play_boss_spawn(ctx, vol),
                SoundEffect::BossDefeated => self.play_boss_defeated(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
            }
        }
    }
}

// === Sound generators ===

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// One enveloped note, optionally gliding to `glide_to`
    #[allow(clippy::too_many_arguments)]
    fn note(
        &self,
        ctx: &AudioContext,
        freq: f32,
        glide_to: Option<f32>,
        osc_type: OscillatorType,
        peak: f32,
        delay: f64,
        length: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(peak, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + length)
            .ok();
        if let Some(target) = glide_to {
            osc.frequency().set_value_at_time(freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(target, t + length)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length + 0.05).ok();
    }

    /// Hit - low thump dropping away
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        self.note(ctx, 180.0, Some(60.0), OscillatorType::Square, vol * 0.3, 0.0, 0.15);
    }

    /// Attack - short bright chirp
    fn play_attack(&self, ctx: &AudioContext, vol: f32) {
        self.note(ctx, 500.0, Some(900.0), OscillatorType::Triangle, vol * 0.3, 0.0, 0.08);
    }

    /// Level up - rising arpeggio
    fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            self.note(ctx, *freq, None, OscillatorType::Triangle, vol * 0.3, delay, 0.4);
        }
    }

    /// Boss spawn - ominous growl
    fn play_boss_spawn(&self, ctx: &AudioContext, vol: f32) {
        self.note(ctx, 110.0, Some(55.0), OscillatorType::Sawtooth, vol * 0.35, 0.0, 0.6);
        self.note(ctx, 116.0, Some(58.0), OscillatorType::Sawtooth, vol * 0.2, 0.05, 0.6);
    }

    /// Boss defeated - celebratory
    fn play_boss_defeated(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            self.note(ctx, *freq, None, OscillatorType::Triangle, vol * 0.25, delay, 0.25);
        }
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            self.note(ctx, *freq, None, OscillatorType::Sine, vol * 0.3, delay, 0.3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Timer;

    #[test]
    fn test_events_map_to_effects() {
        let events = vec![
            GameEvent::Damaged { amount: 1, hp: 9 },
            GameEvent::EggnemiesDefeated { count: 2 },
            GameEvent::Damaged { amount: 3, hp: 6 },
            GameEvent::GameOver { time: Timer::default() },
        ];
        assert_eq!(
            SoundEffect::for_events(&events),
            vec![SoundEffect::Hit, SoundEffect::Attack, SoundEffect::GameOver]
        );
        assert!(SoundEffect::for_events(&[]).is_empty());
    }

    #[test]
    fn test_muted_manager_is_silent() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        assert!(audio.is_muted());
        assert_eq!(audio.effective_volume(), 0.0);

        audio.set_muted(false);
        assert_eq!(audio.effective_volume(), MASTER_VOLUME);
        audio.set_muted(true);
        // Never fails, even with nothing to play through
        audio.play_events(&[GameEvent::LevelUp { level: 1 }]);
    }
}
