#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves projectile and contact collisions into strike
//! commands.
//!
//! The resolver runs after the world integrated movement for the step. It
//! walks projectiles in creation order and pairs each with the first living
//! enemy inside the hit radius, then lets every living enemy in reach of the
//! player attack once its cooldown elapsed. Health is tracked locally across
//! the pass so an enemy killed by an earlier projectile absorbs no further
//! shots and a dead player takes no further hits.

use asylum_core::{
    Command, EnemyId, EnemyView, GamePhase, PlayerSnapshot, ProjectileView, Tuning,
};
use tracing::trace;

/// Distances used to detect contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    hit_radius: f32,
    contact_radius: f32,
}

impl Config {
    /// Creates a configuration from explicit radii.
    #[must_use]
    pub const fn new(hit_radius: f32, contact_radius: f32) -> Self {
        Self {
            hit_radius,
            contact_radius,
        }
    }

    /// Extracts the radii from the gameplay tuning.
    #[must_use]
    pub const fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.projectile.hit_radius, tuning.enemies.contact_radius)
    }
}

/// Collision resolver that emits `StrikeEnemy` and `StrikePlayer` commands.
#[derive(Debug)]
pub struct Combat {
    config: Config,
    remaining: Vec<(EnemyId, u32)>,
}

impl Combat {
    /// Creates a new resolver using the supplied radii.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            remaining: Vec::new(),
        }
    }

    /// Emits strike commands for every contact detected in the snapshots.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        player: &PlayerSnapshot,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Playing {
            return;
        }

        self.remaining.clear();
        self.remaining.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| (enemy.id, enemy.health)),
        );

        for projectile in projectiles.iter() {
            let target = enemies.iter().find(|enemy| {
                enemy.position.distance(projectile.position) < self.config.hit_radius
                    && self.health_of(enemy.id).map_or(false, |health| health > 0)
            });
            let Some(enemy) = target else {
                continue;
            };

            if let Some(entry) = self.remaining.iter_mut().find(|(id, _)| *id == enemy.id) {
                entry.1 = entry.1.saturating_sub(projectile.damage);
            }
            trace!(projectile = projectile.id.get(), enemy = enemy.id.get(), "projectile contact");
            out.push(Command::StrikeEnemy {
                projectile: projectile.id,
                enemy: enemy.id,
            });
        }

        let mut player_health = player.health;
        for enemy in enemies.iter() {
            if player_health == 0 {
                break;
            }
            if !enemy.ready_to_attack || self.health_of(enemy.id).map_or(true, |health| health == 0) {
                continue;
            }
            if enemy.position.distance(player.position) >= self.config.contact_radius {
                continue;
            }

            player_health = player_health.saturating_sub(enemy.contact_damage);
            out.push(Command::StrikePlayer { enemy: enemy.id });
        }
    }

    fn health_of(&self, enemy: EnemyId) -> Option<u32> {
        self.remaining
            .iter()
            .find(|(id, _)| *id == enemy)
            .map(|(_, health)| *health)
    }
}
