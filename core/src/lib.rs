#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Asylum simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presenters to react to. Systems consume event streams, read immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

mod tuning;

pub use tuning::{
    ClockTuning, EnemyProfile, EnemyTuning, HorrorTuning, PickupTuning, PlayerTuning,
    ProjectileTuning, SpawnTuning, Tuning, WeaponProfile,
};

/// Distance between two points projected onto the ground plane.
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

/// Top-level state of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Assets may be loading; nothing but the clock runs.
    #[default]
    NotStarted,
    /// Gameplay is live and every component processes each step.
    Playing,
    /// The player died; the simulation idles until a restart.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts the first run after the activation gesture.
    Activate,
    /// Resets the session after a game over and starts a new run.
    Restart,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the player's horizontal movement intent.
    SetMoveIntent {
        /// World-space direction with a magnitude of at most one.
        direction: Vec3,
    },
    /// Requests a jump from the ground.
    Jump,
    /// Pulls the trigger of the active weapon.
    FireWeapon {
        /// Camera facing in world space used as the base projectile heading.
        aim: Vec3,
    },
    /// Refills the active weapon's magazine.
    ReloadWeapon,
    /// Selects another weapon slot.
    SwitchWeapon {
        /// Slot requested by the player.
        slot: WeaponSlot,
    },
    /// Integrates player, projectile and enemy movement over the last tick.
    AdvanceEntities,
    /// Requests that a hostile actor enter the arena.
    SpawnEnemy {
        /// Variant of hostile actor to create.
        kind: EnemyKind,
        /// World-space spawn position.
        position: Vec3,
        /// Movement speed in world units per second.
        speed: f32,
    },
    /// Applies a projectile's payload to an enemy it reached.
    StrikeEnemy {
        /// Projectile that made contact.
        projectile: ProjectileId,
        /// Enemy that was reached.
        enemy: EnemyId,
    },
    /// Applies an enemy's contact damage to the player.
    StrikePlayer {
        /// Enemy delivering the attack.
        enemy: EnemyId,
    },
    /// Drops a collectible at the provided position.
    SpawnPickup {
        /// Kind of collectible.
        kind: PickupKind,
        /// World-space position of the collectible.
        position: Vec3,
    },
    /// Consumes a collectible the player touched.
    CollectPickup {
        /// Collectible being consumed.
        pickup: PickupId,
    },
    /// Structurally removes entities flagged during the step.
    Reap,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Simulation time after the tick.
        now: Duration,
    },
    /// Announces a game phase transition.
    PhaseChanged {
        /// Phase that was left.
        from: GamePhase,
        /// Phase that became active.
        to: GamePhase,
    },
    /// Confirms that the player left the ground.
    Jumped,
    /// Confirms that the active weapon discharged.
    WeaponFired {
        /// Slot that fired.
        slot: WeaponSlot,
        /// Number of projectiles released by the trigger pull.
        projectiles: u32,
    },
    /// Confirms that a projectile entered flight.
    ProjectileSpawned {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Launch position.
        position: Vec3,
        /// Normalised heading.
        direction: Vec3,
        /// Cosmetic tint inherited from the weapon.
        tint: Tint,
    },
    /// Confirms that the active magazine was refilled by a reload.
    WeaponReloaded {
        /// Slot that was reloaded.
        slot: WeaponSlot,
    },
    /// Confirms that the player selected a weapon slot.
    WeaponSwitched {
        /// Slot that was active before the switch.
        from: WeaponSlot,
        /// Slot that is active now.
        to: WeaponSlot,
    },
    /// Reports the ammo of the active weapon after any change.
    AmmoChanged {
        /// Active slot.
        slot: WeaponSlot,
        /// Rounds left in the magazine.
        ammo: u32,
        /// Magazine capacity of the slot.
        capacity: u32,
    },
    /// Confirms that a hostile actor entered the arena.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Spawn position.
        position: Vec3,
    },
    /// Reports that a spawn request was dropped.
    EnemySpawnRejected {
        /// Variant that was requested.
        kind: EnemyKind,
        /// Reason the request was dropped.
        reason: SpawnRejection,
    },
    /// Announces that a scare apparition materialised next to the player.
    ScareTriggered {
        /// Apparition that was created.
        enemy: EnemyId,
    },
    /// Reports that a projectile damaged an enemy.
    EnemyHit {
        /// Enemy that was damaged.
        enemy: EnemyId,
        /// Projectile that delivered the damage.
        projectile: ProjectileId,
        /// Health left after the hit.
        remaining: u32,
    },
    /// Reports that an enemy's health reached zero.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Position at the time of death.
        position: Vec3,
    },
    /// Reports the score after it changed.
    ScoreChanged {
        /// Current score.
        score: u32,
    },
    /// Reports that an enemy hurt the player.
    PlayerDamaged {
        /// Enemy that attacked.
        enemy: EnemyId,
        /// Damage applied before clamping.
        amount: u32,
    },
    /// Reports the player's health after any change.
    HealthChanged {
        /// Current health.
        health: u32,
        /// Maximum health.
        max: u32,
    },
    /// Confirms that a collectible was dropped.
    PickupSpawned {
        /// Identifier allocated to the collectible.
        pickup: PickupId,
        /// Kind of collectible.
        kind: PickupKind,
        /// Position of the collectible.
        position: Vec3,
    },
    /// Confirms that a collectible was consumed.
    PickupCollected {
        /// Collectible that was consumed.
        pickup: PickupId,
        /// Kind of collectible.
        kind: PickupKind,
    },
    /// Confirms that an entity left the registry.
    Despawned {
        /// Entity that was removed.
        entity: EntityId,
    },
}

/// Reasons a spawn request may be dropped by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The live enemy population already reached the cap.
    PopulationCap,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle of any entity stored in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    /// Hostile actor.
    Enemy(EnemyId),
    /// Projectile in flight.
    Projectile(ProjectileId),
    /// Collectible.
    Pickup(PickupId),
}

/// One-based weapon slot number as printed on the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponSlot(u8);

impl WeaponSlot {
    /// Creates a slot from its one-based number.
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Retrieves the one-based slot number.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based index into the weapon catalog, `None` for slot zero.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        usize::from(self.0).checked_sub(1)
    }
}

/// Packed `0xRRGGBB` colour used for cosmetic tints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tint(u32);

impl Tint {
    /// Creates a tint from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    /// Packed `0xRRGGBB` value.
    #[must_use]
    pub const fn hex(&self) -> u32 {
        self.0
    }

    /// Red, green and blue channels.
    #[must_use]
    pub const fn channels(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

/// Variants of hostile actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular enemy spawned periodically on the outer ring.
    Stalker,
    /// Weaker, faster enemy materialised next to the player by a scare.
    Apparition,
}

/// Kinds of collectible dropped by dying enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores part of the player's health.
    Health,
    /// Refills the active weapon's magazine.
    Ammo,
}

/// Keys the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move forward.
    W,
    /// Strafe left.
    A,
    /// Move backward.
    S,
    /// Strafe right.
    D,
    /// Jump.
    Space,
    /// Reload.
    R,
    /// Select slot 1.
    Digit1,
    /// Select slot 2.
    Digit2,
    /// Select slot 3.
    Digit3,
    /// Select slot 4.
    Digit4,
    /// Any key without a binding.
    Other,
}

/// Mouse buttons the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button.
    Primary,
    /// Right button.
    Secondary,
    /// Wheel button.
    Middle,
}

/// Raw input edges reported by the input device collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A key went down. Auto-repeat delivers this edge again.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// A mouse button went down.
    MouseDown(MouseButton),
    /// A mouse button was released.
    MouseUp(MouseButton),
    /// The end-of-run restart control was used.
    RestartRequested,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Eye position in world space.
    pub position: Vec3,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Current score.
    pub score: u32,
    /// Indicates whether the player stands on the ground.
    pub grounded: bool,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// World-space position.
    pub position: Vec3,
    /// Unit vector the enemy looks along.
    pub facing: Vec3,
    /// Current health.
    pub health: u32,
    /// Contact damage dealt per attack.
    pub contact_damage: u32,
    /// Indicates whether the attack cooldown has elapsed.
    pub ready_to_attack: bool,
    /// Time spent dying, `None` while alive.
    pub dying_for: Option<Duration>,
}

impl EnemySnapshot {
    /// Reports whether the enemy can still move, attack and be struck.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.dying_for.is_none()
    }
}

/// Read-only snapshot describing all enemies in creation order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies that are not dying.
    #[must_use]
    pub fn alive(&self) -> usize {
        self.snapshots.iter().filter(|enemy| enemy.is_alive()).count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// World-space position.
    pub position: Vec3,
    /// Normalised heading.
    pub direction: Vec3,
    /// Damage delivered on contact.
    pub damage: u32,
    /// Steps of flight left before expiry.
    pub lifetime: u32,
}

/// Read-only snapshot describing unconsumed projectiles in creation order.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an uncollected pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier assigned to the pickup.
    pub id: PickupId,
    /// Kind of collectible.
    pub kind: PickupKind,
    /// World-space position.
    pub position: Vec3,
    /// Cosmetic rotation around the vertical axis in radians.
    pub spin: f32,
}

/// Read-only snapshot describing uncollected pickups in creation order.
#[derive(Clone, Debug, Default)]
pub struct PickupView {
    snapshots: Vec<PickupSnapshot>,
}

impl PickupView {
    /// Creates a new pickup view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PickupSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pickup snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PickupSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PickupSnapshot> {
        self.snapshots
    }
}
