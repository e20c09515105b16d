#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that schedules scare apparitions close to the player.

use std::{f32::consts::TAU, time::Duration};

use asylum_core::{Command, EnemyKind, Event, GamePhase, PlayerSnapshot, Tuning};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Configuration parameters required to construct the horror scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    warmup: Duration,
    cooldown: Duration,
    chance: f32,
    distance: f32,
    speed: f32,
    height: f32,
    rng_seed: u64,
}

impl Config {
    /// Extracts scare parameters from the gameplay tuning.
    #[must_use]
    pub const fn from_tuning(tuning: &Tuning, rng_seed: u64) -> Self {
        Self {
            warmup: tuning.horror.warmup,
            cooldown: tuning.horror.cooldown,
            chance: tuning.horror.chance,
            distance: tuning.horror.distance,
            speed: tuning.horror.speed,
            height: tuning.horror.height,
            rng_seed,
        }
    }

    /// Overrides the per-step trigger probability.
    #[must_use]
    pub fn with_chance(mut self, chance: f32) -> Self {
        self.chance = chance;
        self
    }
}

/// Scheduler that emits apparition spawn requests.
#[derive(Debug)]
pub struct Horror {
    config: Config,
    accumulated: Duration,
    last_scare: Option<Duration>,
    rng: ChaCha8Rng,
}

impl Horror {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            accumulated: Duration::ZERO,
            last_scare: None,
            config,
        }
    }

    /// Consumes this step's events and requests at most one apparition.
    ///
    /// A scare becomes possible once more than the warmup of playing time
    /// accumulated and at least the cooldown passed since the previous one;
    /// each eligible step then fires with the configured probability. The
    /// world may still drop the apparition at the population cap, in which
    /// case both timers have been reset regardless.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        now: Duration,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::PhaseChanged {
                    to: GamePhase::Playing,
                    ..
                } => self.accumulated = Duration::ZERO,
                Event::TimeAdvanced { dt, .. } if phase == GamePhase::Playing => {
                    self.accumulated = self.accumulated.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if phase != GamePhase::Playing || self.accumulated <= self.config.warmup {
            return;
        }
        if let Some(last) = self.last_scare {
            if now.saturating_sub(last) < self.config.cooldown {
                return;
            }
        }
        if self.rng.gen::<f32>() >= self.config.chance {
            return;
        }

        let angle = self.rng.gen_range(0.0..TAU);
        let position = Vec3::new(
            player.position.x + angle.cos() * self.config.distance,
            self.config.height,
            player.position.z + angle.sin() * self.config.distance,
        );
        info!(?now, ?position, "scare scheduled");
        out.push(Command::SpawnEnemy {
            kind: EnemyKind::Apparition,
            position,
            speed: self.config.speed,
        });
        self.accumulated = Duration::ZERO;
        self.last_scare = Some(now);
    }
}
