//! Procedural sounds substituted for clips that failed to load.

use std::{f32::consts::TAU, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::SoundCue;

/// Envelope floor reached at the end of every sweep.
const SWEEP_FLOOR: f32 = 0.001;

/// Mono PCM buffer with samples in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Pcm {
    /// Samples per second.
    pub sample_rate: u32,
    /// Mono samples in the range -1.0..=1.0.
    pub samples: Vec<f32>,
}

impl Pcm {
    /// Playback length of the buffer.
    #[must_use]
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.samples.len() as u64 * 1_000_000_000 / u64::from(self.sample_rate))
    }
}

/// Sine tone whose pitch and gain both fall exponentially.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSweep {
    /// Pitch at the start of the sweep.
    pub start_hz: f32,
    /// Pitch at the end of the sweep.
    pub end_hz: f32,
    /// Total length.
    pub duration: Duration,
    /// Initial amplitude.
    pub gain: f32,
}

impl ToneSweep {
    /// Short pop standing in for the gunfire clip.
    pub const GUNFIRE: Self = Self {
        start_hz: 800.0,
        end_hz: 200.0,
        duration: Duration::from_millis(100),
        gain: 0.3,
    };

    /// Longer falling moan standing in for the enemy death clip.
    pub const DEATH: Self = Self {
        start_hz: 600.0,
        end_hz: 100.0,
        duration: Duration::from_millis(500),
        gain: 0.2,
    };

    /// Procedural substitute for a cue, if it has one.
    #[must_use]
    pub const fn for_cue(cue: SoundCue) -> Option<Self> {
        match cue {
            SoundCue::Gunfire => Some(Self::GUNFIRE),
            SoundCue::EnemyDeath => Some(Self::DEATH),
            SoundCue::Reload | SoundCue::WeaponSwitch | SoundCue::Ambient => None,
        }
    }

    /// Renders the sweep at the provided sample rate.
    #[must_use]
    pub fn render(&self, sample_rate: u32) -> Pcm {
        let rate = sample_rate as f32;
        let count = (self.duration.as_secs_f32() * rate).round() as usize;
        let length = self.duration.as_secs_f32();
        let mut phase = 0.0_f32;
        let mut samples = Vec::with_capacity(count);

        for index in 0..count {
            let progress = if length > 0.0 {
                index as f32 / rate / length
            } else {
                1.0
            };
            let frequency = self.start_hz * (self.end_hz / self.start_hz).powf(progress);
            let gain = self.gain * (SWEEP_FLOOR / self.gain).powf(progress);
            samples.push(phase.sin() * gain);
            phase = (phase + TAU * frequency / rate) % TAU;
        }

        Pcm {
            sample_rate,
            samples,
        }
    }
}

/// Low-passed white noise looped underneath the soundtrack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseBed {
    /// Length of one loop.
    pub duration: Duration,
    /// Peak amplitude of the raw noise.
    pub amplitude: f32,
    /// Cutoff of the one-pole low-pass filter.
    pub cutoff_hz: f32,
}

impl NoiseBed {
    /// Eerie wind bed.
    pub const WIND: Self = Self {
        duration: Duration::from_secs(2),
        amplitude: 0.1,
        cutoff_hz: 800.0,
    };

    /// Renders one loop of the bed using a deterministic noise seed.
    #[must_use]
    pub fn render(&self, sample_rate: u32, seed: u64) -> Pcm {
        let rate = sample_rate as f32;
        let count = (self.duration.as_secs_f32() * rate).round() as usize;
        let rc = 1.0 / (TAU * self.cutoff_hz);
        let dt = 1.0 / rate;
        let alpha = dt / (rc + dt);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut filtered = 0.0_f32;
        let samples = (0..count)
            .map(|_| {
                let raw = rng.gen_range(-1.0..1.0_f32) * self.amplitude;
                filtered += alpha * (raw - filtered);
                filtered
            })
            .collect();

        Pcm {
            sample_rate,
            samples,
        }
    }
}
