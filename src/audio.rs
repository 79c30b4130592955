//! Audio system using Web Audio API
//!
//! Procedurally generated beeps - no external files needed. Each effect is a
//! short table of tones so the event-to-sound mapping can be checked natively;
//! only [`AudioManager`] touches the browser.

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One beep: frequency, length, shape, peak gain and start offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub duration: f64,
    pub wave: Wave,
    pub gain: f32,
    pub delay: f64,
}

const fn tone(freq: f32, duration: f64, wave: Wave, gain: f32, delay: f64) -> Tone {
    Tone {
        freq,
        duration,
        wave,
        gain,
        delay,
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Coin,
    PowerUp,
    /// Enemy stomped or burned
    EnemyDefeat,
    /// Shell sent sliding
    Kick,
    /// Lost a power tier
    Hurt,
    Death,
    Fireball,
    LevelStart,
    GameOver,
    /// Game over with a new best score
    HighScore,
}

impl SoundEffect {
    /// Sound cue for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::FireballShot => Some(SoundEffect::Fireball),
            GameEvent::CoinCollected => Some(SoundEffect::Coin),
            GameEvent::PoweredUp(_) => Some(SoundEffect::PowerUp),
            GameEvent::EnemyDefeated { .. } => Some(SoundEffect::EnemyDefeat),
            GameEvent::ShellKicked => Some(SoundEffect::Kick),
            GameEvent::PlayerHurt => Some(SoundEffect::Hurt),
            GameEvent::PlayerDied { .. } => Some(SoundEffect::Death),
            // The first level starts on a key press; only later levels get a jingle
            GameEvent::LevelStarted(1) => None,
            GameEvent::LevelStarted(_) => Some(SoundEffect::LevelStart),
            GameEvent::GameOver {
                new_high_score: true,
                ..
            } => Some(SoundEffect::HighScore),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }

    /// Tones making up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Jump => JUMP,
            SoundEffect::Coin => COIN,
            SoundEffect::PowerUp | SoundEffect::LevelStart => POWER_UP,
            SoundEffect::EnemyDefeat => ENEMY_DEFEAT,
            SoundEffect::Kick => KICK,
            SoundEffect::Hurt => HURT,
            SoundEffect::Death => DEATH,
            SoundEffect::Fireball => FIREBALL,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::HighScore => HIGH_SCORE,
        }
    }
}

const JUMP: &[Tone] = &[tone(400.0, 0.1, Wave::Sine, 0.2, 0.0)];
const COIN: &[Tone] = &[
    tone(800.0, 0.15, Wave::Sine, 0.3, 0.0),
    tone(1000.0, 0.15, Wave::Sine, 0.3, 0.05),
];
const POWER_UP: &[Tone] = &[
    tone(300.0, 0.1, Wave::Sine, 0.3, 0.0),
    tone(400.0, 0.1, Wave::Sine, 0.3, 0.1),
    tone(500.0, 0.1, Wave::Sine, 0.3, 0.2),
];
const ENEMY_DEFEAT: &[Tone] = &[tone(200.0, 0.2, Wave::Square, 0.3, 0.0)];
const KICK: &[Tone] = &[tone(300.0, 0.08, Wave::Square, 0.25, 0.0)];
const HURT: &[Tone] = &[tone(250.0, 0.15, Wave::Sawtooth, 0.3, 0.0)];
const DEATH: &[Tone] = &[
    tone(150.0, 0.3, Wave::Sawtooth, 0.4, 0.0),
    tone(100.0, 0.3, Wave::Sawtooth, 0.4, 0.2),
];
const FIREBALL: &[Tone] = &[tone(600.0, 0.1, Wave::Square, 0.2, 0.0)];
/// Sad descending
const GAME_OVER: &[Tone] = &[
    tone(400.0, 0.3, Wave::Sine, 0.3, 0.0),
    tone(350.0, 0.3, Wave::Sine, 0.3, 0.2),
    tone(300.0, 0.3, Wave::Sine, 0.3, 0.4),
    tone(200.0, 0.3, Wave::Sine, 0.3, 0.6),
];
/// Celebratory run up
const HIGH_SCORE: &[Tone] = &[
    tone(500.0, 0.25, Wave::Triangle, 0.25, 0.0),
    tone(600.0, 0.25, Wave::Triangle, 0.25, 0.08),
    tone(700.0, 0.25, Wave::Triangle, 0.25, 0.16),
    tone(800.0, 0.25, Wave::Triangle, 0.25, 0.24),
    tone(1000.0, 0.25, Wave::Triangle, 0.25, 0.32),
];

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(&Settings::default())
        }
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.volume(true),
            }
        }

        /// Pick up volume/mute changes and the window focus state
        pub fn apply_settings(&mut self, settings: &Settings, focused: bool) {
            self.volume = settings.volume(focused);
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, tone);
            }
        }

        /// Create an oscillator with gain envelope
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

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let osc_type = match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;

            gain.gain().set_value_at_time(self.volume * tone.gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Jumped),
            Some(SoundEffect::Jump)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PoweredUp(PowerUpKind::Fire)),
            Some(SoundEffect::PowerUp)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::LevelStarted(1)), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::LevelStarted(2)),
            Some(SoundEffect::LevelStart)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver {
                score: 10,
                new_high_score: true
            }),
            Some(SoundEffect::HighScore)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver {
                score: 0,
                new_high_score: false
            }),
            Some(SoundEffect::GameOver)
        );
    }

    #[test]
    fn test_tones_are_audible() {
        let all = [
            SoundEffect::Jump,
            SoundEffect::Coin,
            SoundEffect::PowerUp,
            SoundEffect::EnemyDefeat,
            SoundEffect::Kick,
            SoundEffect::Hurt,
            SoundEffect::Death,
            SoundEffect::Fireball,
            SoundEffect::LevelStart,
            SoundEffect::GameOver,
            SoundEffect::HighScore,
        ];
        for effect in all {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{effect:?}");
            for t in tones {
                assert!(t.freq > 20.0 && t.duration > 0.0 && t.gain > 0.0);
            }
        }
        // Coin is a rising two-note chirp
        let coin = SoundEffect::Coin.tones();
        assert_eq!((coin[0].freq, coin[1].freq), (800.0, 1000.0));
        assert_eq!(coin[1].delay, 0.05);
    }
}
