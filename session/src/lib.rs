#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Step pipeline that wires the world and every pure system together.
//!
//! A [`Session`] owns the authoritative [`World`] plus one instance of each
//! system. [`Session::step`] runs a single frame: clock, controls, movement,
//! collision, loot, spawning, then reaping. Each stage reads fresh snapshots
//! and its commands are applied before the next stage runs.

use std::time::Duration;

use asylum_core::{Command, Event, InputEvent, Tuning};
use asylum_system_combat::{self as combat, Combat};
use asylum_system_controls::Controls;
use asylum_system_horror::{self as horror, Horror};
use asylum_system_loot::{self as loot, Loot};
use asylum_system_spawning::{self as spawning, Spawning};
use asylum_world::{self as world, query, World};
use glam::Vec3;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

mod clock;

pub use clock::SimulationClock;

/// Everything an adapter observed during one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    /// Monotonic frame timestamp.
    pub timestamp: Duration,
    /// Input edges in arrival order.
    pub inputs: &'a [InputEvent],
    /// Camera view direction in world space.
    pub facing: Vec3,
}

/// Explicit simulation context for one play session.
#[derive(Debug)]
pub struct Session {
    world: World,
    clock: SimulationClock,
    controls: Controls,
    combat: Combat,
    loot: Loot,
    spawning: Spawning,
    horror: Horror,
    commands: Vec<Command>,
}

impl Session {
    /// Creates a session whose randomness is fully derived from `seed`.
    #[must_use]
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);
        let spread_seed = seeds.next_u64();
        let loot_seed = seeds.next_u64();
        let spawn_seed = seeds.next_u64();
        let horror_seed = seeds.next_u64();
        debug!(seed, "session seeded");

        Self {
            clock: SimulationClock::new(tuning.clock.max_step),
            controls: Controls::new(),
            combat: Combat::new(combat::Config::from_tuning(&tuning)),
            loot: Loot::new(loot::Config::from_tuning(&tuning, loot_seed)),
            spawning: Spawning::new(spawning::Config::from_tuning(&tuning, spawn_seed)),
            horror: Horror::new(horror::Config::from_tuning(&tuning, horror_seed)),
            world: World::with_tuning(tuning, spread_seed),
            commands: Vec::new(),
        }
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Runs one simulation step, appending every event it produced.
    pub fn step(&mut self, frame: &FrameInput<'_>, out_events: &mut Vec<Event>) {
        let start = out_events.len();

        let dt = self.clock.advance(frame.timestamp);
        world::apply(&mut self.world, Command::Tick { dt }, out_events);

        self.controls.handle(
            query::phase(&self.world),
            frame.inputs,
            frame.facing,
            &mut self.commands,
        );
        self.flush(out_events);

        world::apply(&mut self.world, Command::AdvanceEntities, out_events);

        self.combat.handle(
            query::phase(&self.world),
            &query::player(&self.world),
            &query::projectile_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush(out_events);

        self.loot.handle(
            &out_events[start..],
            query::phase(&self.world),
            &query::player(&self.world),
            &query::pickup_view(&self.world),
            &mut self.commands,
        );
        self.flush(out_events);

        let phase = query::phase(&self.world);
        let now = query::now(&self.world);
        self.spawning.handle(
            &out_events[start..],
            phase,
            now,
            query::living_enemies(&self.world),
            &mut self.commands,
        );
        self.horror.handle(
            &out_events[start..],
            phase,
            now,
            &query::player(&self.world),
            &mut self.commands,
        );
        self.flush(out_events);

        world::apply(&mut self.world, Command::Reap, out_events);
    }

    fn flush(&mut self, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }
}
