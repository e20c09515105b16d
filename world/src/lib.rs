#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Asylum simulation.
//!
//! The world owns the entity registry, the player's body and weapons, and the
//! game phase. Adapters and systems never mutate it directly: they submit
//! [`Command`] values to [`apply`] and observe the resulting [`Event`] stream.
//! Outside [`GamePhase::Playing`] every command other than `Tick`, `Activate`
//! and `Restart` is a silent no-op.

use std::time::Duration;

use asylum_core::{
    planar_distance, Command, EnemyId, EnemyKind, EntityId, Event, GamePhase, PickupId,
    PickupKind, ProjectileId, Tuning,
};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

mod player;
mod registry;
mod weapons;

use player::Player;
use registry::{Enemy, EntityRegistry, Pickup, Projectile};
use weapons::Armory;

const DEFAULT_SPREAD_SEED: u64 = 0x5eed_a5f1_0b5c_11fe;

/// Represents the authoritative Asylum world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    phase: GamePhase,
    now: Duration,
    pending: Duration,
    tick_index: u64,
    player: Player,
    armory: Armory,
    registry: EntityRegistry,
    spread_rng: ChaCha8Rng,
}

impl World {
    /// Creates a world using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default(), DEFAULT_SPREAD_SEED)
    }

    /// Creates a world using the provided tuning and projectile spread seed.
    #[must_use]
    pub fn with_tuning(tuning: Tuning, spread_seed: u64) -> Self {
        Self {
            player: Player::spawn(&tuning.player),
            armory: Armory::new(tuning.weapons.clone()),
            registry: EntityRegistry::new(tuning.enemies.population_cap),
            spread_rng: ChaCha8Rng::seed_from_u64(spread_seed),
            phase: GamePhase::NotStarted,
            now: Duration::ZERO,
            pending: Duration::ZERO,
            tick_index: 0,
            tuning,
        }
    }

    fn enter_phase(&mut self, to: GamePhase, out_events: &mut Vec<Event>) {
        let from = self.phase;
        self.phase = to;
        info!(?from, ?to, now = ?self.now, "phase changed");
        out_events.push(Event::PhaseChanged { from, to });
    }

    fn begin_run(&mut self, out_events: &mut Vec<Event>) {
        self.pending = Duration::ZERO;
        self.enter_phase(GamePhase::Playing, out_events);
        out_events.push(Event::HealthChanged {
            health: self.player.health,
            max: self.tuning.player.max_health,
        });
        out_events.push(Event::ScoreChanged {
            score: self.player.score,
        });
        self.push_ammo(out_events);
    }

    fn reset_run(&mut self, out_events: &mut Vec<Event>) {
        for entity in self.registry.clear() {
            out_events.push(Event::Despawned { entity });
        }
        self.player = Player::spawn(&self.tuning.player);
        self.armory.refill_active();
    }

    fn push_ammo(&self, out_events: &mut Vec<Event>) {
        if let Some((ammo, capacity)) = self.armory.active_rounds() {
            out_events.push(Event::AmmoChanged {
                slot: self.armory.active_slot(),
                ammo,
                capacity,
            });
        }
    }

    fn push_health(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::HealthChanged {
            health: self.player.health,
            max: self.tuning.player.max_health,
        });
    }

    fn fire(&mut self, aim: Vec3, out_events: &mut Vec<Event>) {
        let Some(discharge) = self.armory.try_fire(self.now) else {
            return;
        };
        let base = aim.try_normalize().unwrap_or(Vec3::NEG_Z);
        let origin = self.player.position;

        for _ in 0..discharge.projectiles {
            let jitter = Vec3::new(
                self.spread_rng.gen::<f32>() - 0.5,
                self.spread_rng.gen::<f32>() - 0.5,
                self.spread_rng.gen::<f32>() - 0.5,
            ) * discharge.spread;
            let direction = (base + jitter).try_normalize().unwrap_or(base);
            let projectile = self.registry.projectiles.insert(
                Projectile {
                    position: origin,
                    direction,
                    speed: self.tuning.projectile.speed,
                    lifetime: self.tuning.projectile.lifetime_steps,
                    damage: discharge.damage,
                    consumed: false,
                },
                self.tick_index,
            );
            out_events.push(Event::ProjectileSpawned {
                projectile,
                position: origin,
                direction,
                tint: discharge.tint,
            });
        }

        out_events.push(Event::WeaponFired {
            slot: discharge.slot,
            projectiles: discharge.projectiles,
        });
        self.push_ammo(out_events);
    }

    fn advance_entities(&mut self) {
        let dt = self.pending.as_secs_f32();
        self.pending = Duration::ZERO;
        if dt <= 0.0 {
            return;
        }

        self.player.integrate(dt, &self.tuning.player);
        let target = self.player.position;
        let tick = self.tick_index;

        for projectile in self.registry.projectiles.settled_mut(tick) {
            if projectile.consumed || projectile.lifetime == 0 {
                continue;
            }
            projectile.position += projectile.direction * projectile.speed * dt;
            projectile.lifetime -= 1;
        }

        for enemy in self.registry.enemies.settled_mut(tick) {
            if !enemy.is_alive() {
                continue;
            }
            if let Some(heading) = (target - enemy.position).try_normalize() {
                enemy.position += heading * enemy.speed * dt;
                enemy.facing = heading;
            }
        }

        let spin = self.tuning.pickups.spin_per_step;
        for pickup in self.registry.pickups.settled_mut(tick) {
            pickup.spin = (pickup.spin + spin) % std::f32::consts::TAU;
        }
    }

    fn strike_enemy(
        &mut self,
        projectile_id: ProjectileId,
        enemy_id: EnemyId,
        out_events: &mut Vec<Event>,
    ) {
        let radius = self.tuning.projectile.hit_radius;
        let Some(projectile) = self.registry.projectiles.get(projectile_id) else {
            return;
        };
        if projectile.consumed {
            return;
        }
        let (origin, damage) = (projectile.position, projectile.damage);

        let born = self.registry.enemies.born(enemy_id);
        let Some(enemy) = self.registry.enemies.get_mut(enemy_id) else {
            return;
        };
        if !enemy.is_alive() || enemy.position.distance(origin) >= radius {
            return;
        }

        enemy.health = enemy.health.saturating_sub(damage);
        let remaining = enemy.health;
        let (kind, position) = (enemy.kind, enemy.position);
        if remaining == 0 {
            enemy.died_at = Some(self.now);
            // Enemies that never integrated are gone before anything drew them.
            enemy.remove_at = if born == Some(self.tick_index) {
                Some(self.now)
            } else {
                Some(self.now + self.tuning.enemies.death_animation)
            };
        }

        if let Some(projectile) = self.registry.projectiles.get_mut(projectile_id) {
            projectile.consumed = true;
        }

        out_events.push(Event::EnemyHit {
            enemy: enemy_id,
            projectile: projectile_id,
            remaining,
        });

        if remaining == 0 {
            self.player.score = self
                .player
                .score
                .saturating_add(self.tuning.enemies.score_per_kill);
            debug!(enemy = enemy_id.get(), ?kind, score = self.player.score, "enemy killed");
            out_events.push(Event::EnemyKilled {
                enemy: enemy_id,
                kind,
                position,
            });
            out_events.push(Event::ScoreChanged {
                score: self.player.score,
            });
        }
    }

    fn strike_player(&mut self, enemy_id: EnemyId, out_events: &mut Vec<Event>) {
        let radius = self.tuning.enemies.contact_radius;
        let now = self.now;
        let target = self.player.position;
        let Some(enemy) = self.registry.enemies.get_mut(enemy_id) else {
            return;
        };
        if !enemy.ready_to_attack(now) || enemy.position.distance(target) >= radius {
            return;
        }
        enemy.last_attack = Some(now);
        let amount = enemy.contact_damage;

        let health = self.player.hurt(amount);
        out_events.push(Event::PlayerDamaged {
            enemy: enemy_id,
            amount,
        });
        self.push_health(out_events);

        if health == 0 {
            info!(score = self.player.score, "player died");
            self.enter_phase(GamePhase::GameOver, out_events);
        }
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        position: Vec3,
        speed: f32,
        out_events: &mut Vec<Event>,
    ) {
        let profile = *self.tuning.enemy_profile(kind);
        let facing = (self.player.position - position)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        let enemy = Enemy {
            kind,
            position,
            facing,
            speed,
            health: profile.health,
            contact_damage: profile.contact_damage,
            attack_interval: profile.attack_interval,
            last_attack: None,
            died_at: None,
            remove_at: None,
        };

        match self.registry.spawn_enemy(enemy, self.tick_index) {
            Ok(enemy) => {
                debug!(enemy = enemy.get(), ?kind, ?position, "enemy spawned");
                out_events.push(Event::EnemySpawned {
                    enemy,
                    kind,
                    position,
                });
                if kind == EnemyKind::Apparition {
                    out_events.push(Event::ScareTriggered { enemy });
                }
            }
            Err(reason) => {
                debug!(?kind, ?reason, "enemy spawn rejected");
                out_events.push(Event::EnemySpawnRejected { kind, reason });
            }
        }
    }

    fn collect_pickup(&mut self, pickup_id: PickupId, out_events: &mut Vec<Event>) {
        let radius = self.tuning.pickups.collect_radius;
        let target = self.player.position;
        let Some(pickup) = self.registry.pickups.get_mut(pickup_id) else {
            return;
        };
        if pickup.collected || planar_distance(pickup.position, target) >= radius {
            return;
        }
        pickup.collected = true;
        let kind = pickup.kind;

        match kind {
            PickupKind::Health => {
                let _ = self
                    .player
                    .heal(self.tuning.pickups.health_restore, self.tuning.player.max_health);
                self.push_health(out_events);
            }
            PickupKind::Ammo => {
                self.armory.refill_active();
                self.push_ammo(out_events);
            }
        }
        out_events.push(Event::PickupCollected {
            pickup: pickup_id,
            kind,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.now = world.now.saturating_add(dt);
            if world.phase == GamePhase::Playing {
                world.pending = world.pending.saturating_add(dt);
            }
            out_events.push(Event::TimeAdvanced { dt, now: world.now });
        }
        Command::Activate => {
            if world.phase == GamePhase::NotStarted {
                world.begin_run(out_events);
            }
        }
        Command::Restart => {
            if world.phase == GamePhase::GameOver {
                world.reset_run(out_events);
                world.begin_run(out_events);
            }
        }
        command if world.phase != GamePhase::Playing => {
            trace!(?command, phase = ?world.phase, "command ignored outside play");
        }
        Command::SetMoveIntent { direction } => world.player.set_move_intent(direction),
        Command::Jump => {
            if world.player.try_jump(world.now, &world.tuning.player) {
                out_events.push(Event::Jumped);
            }
        }
        Command::FireWeapon { aim } => world.fire(aim, out_events),
        Command::ReloadWeapon => {
            if world.armory.reload() {
                out_events.push(Event::WeaponReloaded {
                    slot: world.armory.active_slot(),
                });
                world.push_ammo(out_events);
            }
        }
        Command::SwitchWeapon { slot } => {
            if let Some(from) = world.armory.switch_to(slot) {
                out_events.push(Event::WeaponSwitched { from, to: slot });
                world.push_ammo(out_events);
            }
        }
        Command::AdvanceEntities => world.advance_entities(),
        Command::SpawnEnemy {
            kind,
            position,
            speed,
        } => world.spawn_enemy(kind, position, speed, out_events),
        Command::StrikeEnemy { projectile, enemy } => {
            world.strike_enemy(projectile, enemy, out_events);
        }
        Command::StrikePlayer { enemy } => world.strike_player(enemy, out_events),
        Command::SpawnPickup { kind, position } => {
            let pickup = world.registry.pickups.insert(
                Pickup {
                    kind,
                    position,
                    spin: 0.0,
                    collected: false,
                },
                world.tick_index,
            );
            out_events.push(Event::PickupSpawned {
                pickup,
                kind,
                position,
            });
        }
        Command::CollectPickup { pickup } => world.collect_pickup(pickup, out_events),
        Command::Reap => {
            for entity in world.registry.reap(world.now) {
                if let EntityId::Enemy(enemy) = entity {
                    trace!(enemy = enemy.get(), "enemy reaped");
                }
                out_events.push(Event::Despawned { entity });
            }
        }
    }
}

/// Query functions that expose read-only world state to adapters and systems.
pub mod query {
    use std::time::Duration;

    use super::World;
    use asylum_core::{
        EnemySnapshot, EnemyView, GamePhase, PickupSnapshot, PickupView, PlayerSnapshot,
        ProjectileSnapshot, ProjectileView, Tuning, WeaponProfile, WeaponSlot,
    };

    /// Current game phase.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Simulation time accumulated from every tick.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            health: world.player.health,
            max_health: world.tuning.player.max_health,
            score: world.player.score,
            grounded: world.player.grounded,
        }
    }

    /// Number of enemies that are not dying.
    #[must_use]
    pub fn living_enemies(world: &World) -> usize {
        world.registry.living_enemies()
    }

    /// Captures a read-only view of every enemy, dying ones included.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .registry
            .enemies
            .iter()
            .map(|(id, enemy)| EnemySnapshot {
                id,
                kind: enemy.kind,
                position: enemy.position,
                facing: enemy.facing,
                health: enemy.health,
                contact_damage: enemy.contact_damage,
                ready_to_attack: enemy.ready_to_attack(world.now),
                dying_for: enemy.died_at.map(|died| world.now.saturating_sub(died)),
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of projectiles that have not hit anything.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .registry
            .projectiles
            .iter()
            .filter(|(_, projectile)| !projectile.consumed)
            .map(|(id, projectile)| ProjectileSnapshot {
                id,
                position: projectile.position,
                direction: projectile.direction,
                damage: projectile.damage,
                lifetime: projectile.lifetime,
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of pickups that are still on the ground.
    #[must_use]
    pub fn pickup_view(world: &World) -> PickupView {
        let snapshots = world
            .registry
            .pickups
            .iter()
            .filter(|(_, pickup)| !pickup.collected)
            .map(|(id, pickup)| PickupSnapshot {
                id,
                kind: pickup.kind,
                position: pickup.position,
                spin: pickup.spin,
            })
            .collect();
        PickupView::from_snapshots(snapshots)
    }

    /// Slot currently selected.
    #[must_use]
    pub fn active_slot(world: &World) -> WeaponSlot {
        world.armory.active_slot()
    }

    /// Static profile of a weapon slot.
    #[must_use]
    pub fn weapon_profile(world: &World, slot: WeaponSlot) -> Option<&WeaponProfile> {
        world.armory.profile(slot)
    }

    /// Rounds left in a slot's magazine.
    #[must_use]
    pub fn ammo(world: &World, slot: WeaponSlot) -> Option<u32> {
        world.armory.ammo(slot)
    }
}
