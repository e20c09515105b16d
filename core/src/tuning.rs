//! Gameplay constants shared by the world and the systems.
//!
//! Every structure deserialises from TOML with missing fields falling back
//! to the defaults below. Durations are written as whole milliseconds.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{EnemyKind, Tint, WeaponSlot};

/// Complete gameplay configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Clock limits.
    pub clock: ClockTuning,
    /// Player body and health.
    pub player: PlayerTuning,
    /// Weapon catalog ordered by slot number.
    pub weapons: Vec<WeaponProfile>,
    /// Projectile flight.
    pub projectile: ProjectileTuning,
    /// Enemy population and combat.
    pub enemies: EnemyTuning,
    /// Regular ring-spawned enemy.
    pub stalker: EnemyProfile,
    /// Scare apparition.
    pub apparition: EnemyProfile,
    /// Drops and collection.
    pub pickups: PickupTuning,
    /// Periodic spawning.
    pub spawning: SpawnTuning,
    /// Scare scheduling.
    pub horror: HorrorTuning,
}

impl Tuning {
    /// Profile used when spawning an enemy of the provided kind.
    #[must_use]
    pub const fn enemy_profile(&self, kind: EnemyKind) -> &EnemyProfile {
        match kind {
            EnemyKind::Stalker => &self.stalker,
            EnemyKind::Apparition => &self.apparition,
        }
    }

    /// Weapon profile stored for the provided slot.
    #[must_use]
    pub fn weapon(&self, slot: WeaponSlot) -> Option<&WeaponProfile> {
        slot.index().and_then(|index| self.weapons.get(index))
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            clock: ClockTuning::default(),
            player: PlayerTuning::default(),
            weapons: WeaponProfile::catalog(),
            projectile: ProjectileTuning::default(),
            enemies: EnemyTuning::default(),
            stalker: EnemyProfile {
                health: 100,
                contact_damage: 10,
                attack_interval: Duration::from_millis(1000),
            },
            apparition: EnemyProfile {
                health: 50,
                contact_damage: 15,
                attack_interval: Duration::from_millis(800),
            },
            pickups: PickupTuning::default(),
            spawning: SpawnTuning::default(),
            horror: HorrorTuning::default(),
        }
    }
}

/// Limits applied by the simulation clock.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    /// Largest delta a single step may integrate.
    #[serde(with = "millis")]
    pub max_step: Duration,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            max_step: Duration::from_millis(250),
        }
    }
}

/// Player body, movement and health.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Eye position at the start of every run.
    pub spawn: Vec3,
    /// Eye height while standing on the ground.
    pub eye_height: f32,
    /// Health at the start of every run.
    pub max_health: u32,
    /// Horizontal speed in units per second.
    pub move_speed: f32,
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// Upward speed applied by a jump.
    pub jump_speed: f32,
    /// Minimum time between two jumps.
    #[serde(with = "millis")]
    pub jump_cooldown: Duration,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 5.0, 0.0),
            eye_height: 5.0,
            max_health: 100,
            move_speed: 10.0,
            gravity: 30.0,
            jump_speed: 15.0,
            jump_cooldown: Duration::from_millis(500),
        }
    }
}

/// Static description of a weapon slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Name shown on the HUD.
    pub name: String,
    /// Minimum time between two discharges.
    #[serde(with = "millis")]
    pub fire_interval: Duration,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Magazine capacity.
    pub capacity: u32,
    /// Projectiles released per trigger pull.
    pub projectiles: u32,
    /// Per-axis jitter applied to each projectile heading.
    pub spread: f32,
    /// Cosmetic projectile colour.
    pub tint: Tint,
}

impl WeaponProfile {
    /// Default four-slot catalog.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        vec![
            Self::new("Pistol", 200, 25, 15, 1, 0.0, 0xffffff),
            Self::new("Shotgun", 800, 80, 8, 5, 0.3, 0xff8800),
            Self::new("Assault Rifle", 100, 35, 30, 1, 0.1, 0xffff00),
            Self::new("Plasma Gun", 1500, 150, 5, 1, 0.0, 0x00ffff),
        ]
    }

    fn new(
        name: &str,
        fire_interval_ms: u64,
        damage: u32,
        capacity: u32,
        projectiles: u32,
        spread: f32,
        tint: u32,
    ) -> Self {
        Self {
            name: name.to_owned(),
            fire_interval: Duration::from_millis(fire_interval_ms),
            damage,
            capacity,
            projectiles,
            spread,
            tint: Tint::from_hex(tint),
        }
    }
}

/// Projectile flight parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Flight speed in units per second.
    pub speed: f32,
    /// Steps a projectile may fly before expiring.
    pub lifetime_steps: u32,
    /// Distance at which a projectile connects with an enemy.
    pub hit_radius: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 50.0,
            lifetime_steps: 100,
            hit_radius: 2.0,
        }
    }
}

/// Enemy population and combat parameters shared by every kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Maximum number of living enemies.
    pub population_cap: usize,
    /// Distance at which an enemy reaches the player.
    pub contact_radius: f32,
    /// Time a dead enemy lingers before removal.
    #[serde(with = "millis")]
    pub death_animation: Duration,
    /// Score awarded per kill.
    pub score_per_kill: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            population_cap: 15,
            contact_radius: 3.0,
            death_animation: Duration::from_millis(1000),
            score_per_kill: 100,
        }
    }
}

/// Per-kind enemy statistics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Health at spawn.
    pub health: u32,
    /// Damage dealt per attack.
    pub contact_damage: u32,
    /// Minimum time between two attacks.
    #[serde(with = "millis")]
    pub attack_interval: Duration,
}

/// Drop and collection parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Height pickups float at.
    pub height: f32,
    /// Distance at which the player collects a pickup.
    pub collect_radius: f32,
    /// Probability of the first draw dropping health.
    pub health_chance: f32,
    /// Probability of the second draw dropping ammo.
    pub ammo_chance: f32,
    /// Health restored by a health pickup.
    pub health_restore: u32,
    /// Cosmetic rotation applied per step.
    pub spin_per_step: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            height: 1.0,
            collect_radius: 3.0,
            health_chance: 0.4,
            ammo_chance: 0.6,
            health_restore: 25,
            spin_per_step: 0.02,
        }
    }
}

/// Periodic ring spawning parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Interval that must be exceeded between periodic spawns.
    #[serde(with = "millis")]
    pub interval: Duration,
    /// Inner radius of the spawn ring around the map centre.
    pub ring_inner: f32,
    /// Outer radius of the spawn ring around the map centre.
    pub ring_outer: f32,
    /// Height enemies spawn at.
    pub height: f32,
    /// Minimum stalker speed.
    pub base_speed: f32,
    /// Uniform extra speed added on top of the base.
    pub speed_jitter: f32,
    /// Spawns queued when a run starts.
    pub front_load: u32,
    /// Delay between consecutive front-loaded spawns.
    #[serde(with = "millis")]
    pub front_load_stagger: Duration,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3000),
            ring_inner: 30.0,
            ring_outer: 50.0,
            height: 2.0,
            base_speed: 2.0,
            speed_jitter: 1.0,
            front_load: 3,
            front_load_stagger: Duration::from_millis(1000),
        }
    }
}

/// Scare scheduling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorrorTuning {
    /// Playing time that must accumulate before a scare may fire.
    #[serde(with = "millis")]
    pub warmup: Duration,
    /// Time that must pass between two scares.
    #[serde(with = "millis")]
    pub cooldown: Duration,
    /// Per-step probability once both gates are open.
    pub chance: f32,
    /// Distance from the player the apparition appears at.
    pub distance: f32,
    /// Apparition movement speed.
    pub speed: f32,
    /// Height the apparition appears at.
    pub height: f32,
}

impl Default for HorrorTuning {
    fn default() -> Self {
        Self {
            warmup: Duration::from_millis(20_000),
            cooldown: Duration::from_millis(45_000),
            chance: 0.05,
            distance: 8.0,
            speed: 3.0,
            height: 2.0,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
