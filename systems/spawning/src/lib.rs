#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn
//! commands on a ring around the map centre.

use std::{f32::consts::TAU, time::Duration};

use asylum_core::{Command, EnemyKind, Event, GamePhase, Tuning};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    spawn_interval: Duration,
    population_cap: usize,
    ring_inner: f32,
    ring_outer: f32,
    height: f32,
    base_speed: f32,
    speed_jitter: f32,
    front_load: u32,
    front_load_stagger: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, cap and seed
    /// with the default ring geometry.
    #[must_use]
    pub fn new(spawn_interval: Duration, population_cap: usize, rng_seed: u64) -> Self {
        let tuning = Tuning::default();
        Self {
            spawn_interval,
            population_cap,
            ..Self::from_tuning(&tuning, rng_seed)
        }
    }

    /// Extracts spawn parameters from the gameplay tuning.
    #[must_use]
    pub const fn from_tuning(tuning: &Tuning, rng_seed: u64) -> Self {
        Self {
            spawn_interval: tuning.spawning.interval,
            population_cap: tuning.enemies.population_cap,
            ring_inner: tuning.spawning.ring_inner,
            ring_outer: tuning.spawning.ring_outer,
            height: tuning.spawning.height,
            base_speed: tuning.spawning.base_speed,
            speed_jitter: tuning.spawning.speed_jitter,
            front_load: tuning.spawning.front_load,
            front_load_stagger: tuning.spawning.front_load_stagger,
            rng_seed,
        }
    }
}

/// Pure system that emits stalker spawn commands while the game is playing.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    last_spawn: Option<Duration>,
    front_loaded: Vec<Duration>,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            last_spawn: None,
            front_loaded: Vec::new(),
            config,
        }
    }

    /// Consumes events and the living population to emit spawn commands.
    ///
    /// The periodic timer is stamped whenever the interval elapsed, even when
    /// the cap suppresses the spawn itself.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        now: Duration,
        living_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::PhaseChanged {
                    to: GamePhase::Playing,
                    ..
                } => self.queue_front_load(now),
                Event::PhaseChanged {
                    from: GamePhase::Playing,
                    ..
                } => self.front_loaded.clear(),
                _ => {}
            }
        }

        if phase != GamePhase::Playing {
            return;
        }

        let mut budget = self.config.population_cap.saturating_sub(living_enemies);

        let due = self.front_loaded.iter().filter(|deadline| **deadline <= now).count();
        self.front_loaded.retain(|deadline| *deadline > now);
        for _ in 0..due {
            if budget == 0 {
                trace!("front-loaded spawn dropped at cap");
                continue;
            }
            budget -= 1;
            let command = self.ring_spawn();
            out.push(command);
        }

        let elapsed = self
            .last_spawn
            .map_or(true, |last| now.saturating_sub(last) > self.config.spawn_interval);
        if !elapsed {
            return;
        }
        self.last_spawn = Some(now);
        if budget == 0 {
            trace!(living_enemies, "periodic spawn skipped at cap");
            return;
        }
        let command = self.ring_spawn();
        out.push(command);
    }

    fn queue_front_load(&mut self, now: Duration) {
        self.last_spawn = None;
        self.front_loaded = (0..self.config.front_load)
            .map(|index| now + self.config.front_load_stagger * index)
            .collect();
        debug!(count = self.front_loaded.len(), "front-loaded spawns queued");
    }

    fn ring_spawn(&mut self) -> Command {
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = if self.config.ring_outer > self.config.ring_inner {
            self.rng.gen_range(self.config.ring_inner..self.config.ring_outer)
        } else {
            self.config.ring_inner
        };
        let speed = self.config.base_speed + self.rng.gen::<f32>() * self.config.speed_jitter;
        Command::SpawnEnemy {
            kind: EnemyKind::Stalker,
            position: Vec3::new(angle.cos() * distance, self.config.height, angle.sin() * distance),
            speed,
        }
    }
}
