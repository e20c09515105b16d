#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that drops pickups from dying enemies and collects the ones
//! the player walks into.

use asylum_core::{
    planar_distance, Command, Event, GamePhase, PickupKind, PickupView, PlayerSnapshot, Tuning,
};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Configuration parameters required to construct the loot system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    health_chance: f32,
    ammo_chance: f32,
    drop_height: f32,
    collect_radius: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration from explicit drop chances and radii.
    #[must_use]
    pub const fn new(
        health_chance: f32,
        ammo_chance: f32,
        drop_height: f32,
        collect_radius: f32,
        rng_seed: u64,
    ) -> Self {
        Self {
            health_chance,
            ammo_chance,
            drop_height,
            collect_radius,
            rng_seed,
        }
    }

    /// Extracts drop parameters from the gameplay tuning.
    #[must_use]
    pub const fn from_tuning(tuning: &Tuning, rng_seed: u64) -> Self {
        Self::new(
            tuning.pickups.health_chance,
            tuning.pickups.ammo_chance,
            tuning.pickups.height,
            tuning.pickups.collect_radius,
            rng_seed,
        )
    }
}

/// Loot system emitting `SpawnPickup` and `CollectPickup` commands.
#[derive(Debug)]
pub struct Loot {
    config: Config,
    rng: ChaCha8Rng,
}

impl Loot {
    /// Creates a new loot system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
        }
    }

    /// Rolls drops for this step's kills and requests collection of every
    /// pickup within reach of the player.
    ///
    /// Every kill gets exactly one roll, including a kill that lands in the
    /// same step as the player's death. Collection only happens while
    /// playing. Reach is measured on the ground plane since pickups float
    /// well below eye height. Collection requests may repeat across steps
    /// until the world reaps the pickup; the world applies each pickup's
    /// effect once.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        player: &PlayerSnapshot,
        pickups: &PickupView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::EnemyKilled { position, .. } = event {
                if let Some(kind) = self.roll() {
                    debug!(?kind, ?position, "pickup dropped");
                    out.push(Command::SpawnPickup {
                        kind,
                        position: Vec3::new(position.x, self.config.drop_height, position.z),
                    });
                }
            }
        }

        if phase != GamePhase::Playing {
            return;
        }

        for pickup in pickups.iter() {
            if planar_distance(pickup.position, player.position) < self.config.collect_radius {
                out.push(Command::CollectPickup { pickup: pickup.id });
            }
        }
    }

    fn roll(&mut self) -> Option<PickupKind> {
        let first = self.rng.gen::<f32>();
        if first < self.config.health_chance {
            return Some(PickupKind::Health);
        }
        let second = self.rng.gen::<f32>();
        (second < self.config.ammo_chance).then_some(PickupKind::Ammo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asylum_core::{EnemyId, EnemyKind, PickupId, PickupSnapshot};

    fn loot(seed: u64) -> Loot {
        Loot::new(Config::from_tuning(&Tuning::default(), seed))
    }

    fn player_at(position: Vec3) -> PlayerSnapshot {
        PlayerSnapshot {
            position,
            health: 100,
            max_health: 100,
            score: 0,
            grounded: true,
        }
    }

    #[test]
    fn drop_frequencies_follow_two_sequential_draws() {
        let mut system = loot(0x1f2e_3d4c);
        let rolls = 20_000;
        let (mut health, mut ammo, mut nothing) = (0, 0, 0);
        for _ in 0..rolls {
            match system.roll() {
                Some(PickupKind::Health) => health += 1,
                Some(PickupKind::Ammo) => ammo += 1,
                None => nothing += 1,
            }
        }

        let share = |count: i32| count as f32 / rolls as f32;
        assert!((share(health) - 0.40).abs() < 0.02);
        assert!((share(ammo) - 0.36).abs() < 0.02);
        assert!((share(nothing) - 0.24).abs() < 0.02);
    }

    #[test]
    fn certain_chances_always_drop_health_first() {
        let mut system = Loot::new(Config::new(1.0, 1.0, 1.0, 3.0, 9));
        let events = [
            Event::EnemyKilled {
                enemy: EnemyId::new(0),
                kind: EnemyKind::Stalker,
                position: Vec3::new(4.0, 2.0, -6.0),
            },
            Event::EnemyKilled {
                enemy: EnemyId::new(1),
                kind: EnemyKind::Apparition,
                position: Vec3::new(1.0, 3.5, 2.0),
            },
        ];
        let mut out = Vec::new();

        system.handle(
            &events,
            GamePhase::Playing,
            &player_at(Vec3::new(0.0, 5.0, 0.0)),
            &PickupView::default(),
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::SpawnPickup {
                    kind: PickupKind::Health,
                    position: Vec3::new(4.0, 1.0, -6.0),
                },
                Command::SpawnPickup {
                    kind: PickupKind::Health,
                    position: Vec3::new(1.0, 1.0, 2.0),
                },
            ]
        );
    }

    #[test]
    fn zero_chances_never_drop() {
        let mut system = Loot::new(Config::new(0.0, 0.0, 1.0, 3.0, 9));
        let events: Vec<Event> = (0..50)
            .map(|id| Event::EnemyKilled {
                enemy: EnemyId::new(id),
                kind: EnemyKind::Stalker,
                position: Vec3::ZERO,
            })
            .collect();
        let mut out = Vec::new();

        system.handle(
            &events,
            GamePhase::Playing,
            &player_at(Vec3::new(100.0, 5.0, 0.0)),
            &PickupView::default(),
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn only_pickups_in_reach_are_collected() {
        let mut system = loot(1);
        let pickups = PickupView::from_snapshots(vec![
            PickupSnapshot {
                id: PickupId::new(2),
                kind: PickupKind::Ammo,
                position: Vec3::new(2.0, 1.0, 0.0),
                spin: 0.0,
            },
            PickupSnapshot {
                id: PickupId::new(5),
                kind: PickupKind::Health,
                position: Vec3::new(0.0, 1.0, 9.0),
                spin: 0.0,
            },
        ]);
        let mut out = Vec::new();

        system.handle(
            &[],
            GamePhase::Playing,
            &player_at(Vec3::new(0.0, 2.5, 0.0)),
            &pickups,
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::CollectPickup {
                pickup: PickupId::new(2)
            }]
        );
    }

    #[test]
    fn kill_on_the_fatal_step_still_rolls_but_nothing_is_collected() {
        let mut system = Loot::new(Config::new(1.0, 1.0, 1.0, 3.0, 9));
        let events = [Event::EnemyKilled {
            enemy: EnemyId::new(0),
            kind: EnemyKind::Stalker,
            position: Vec3::new(2.0, 2.0, 0.0),
        }];
        let pickups = PickupView::from_snapshots(vec![PickupSnapshot {
            id: PickupId::new(4),
            kind: PickupKind::Ammo,
            position: Vec3::new(1.0, 1.0, 0.0),
            spin: 0.0,
        }]);
        let mut out = Vec::new();

        system.handle(
            &events,
            GamePhase::GameOver,
            &player_at(Vec3::ZERO),
            &pickups,
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::SpawnPickup {
                kind: PickupKind::Health,
                position: Vec3::new(2.0, 1.0, 0.0),
            }]
        );
    }
}
