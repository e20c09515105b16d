//! Ordered, handle-keyed storage for every transient entity.

use std::{collections::BTreeMap, time::Duration};

use asylum_core::{
    EnemyId, EnemyKind, EntityId, PickupId, PickupKind, ProjectileId, SpawnRejection,
};
use glam::Vec3;

/// Identifier types allocated by an [`Arena`].
pub(crate) trait Handle: Copy + Ord {
    fn from_raw(raw: u32) -> Self;
}

impl Handle for EnemyId {
    fn from_raw(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl Handle for ProjectileId {
    fn from_raw(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl Handle for PickupId {
    fn from_raw(raw: u32) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    born: u64,
}

/// Entries keyed by monotonically allocated handles.
///
/// Handles are never reused, so iteration order equals creation order.
#[derive(Debug)]
pub(crate) struct Arena<K, T> {
    entries: BTreeMap<K, Slot<T>>,
    next: u32,
}

impl<K: Handle, T> Arena<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next: 0,
        }
    }

    /// Stores a value created during `tick` and returns its handle.
    pub(crate) fn insert(&mut self, value: T, tick: u64) -> K {
        let id = K::from_raw(self.next);
        self.next = self.next.wrapping_add(1);
        let _ = self.entries.insert(id, Slot { value, born: tick });
        id
    }

    pub(crate) fn get(&self, id: K) -> Option<&T> {
        self.entries.get(&id).map(|slot| &slot.value)
    }

    pub(crate) fn get_mut(&mut self, id: K) -> Option<&mut T> {
        self.entries.get_mut(&id).map(|slot| &mut slot.value)
    }

    /// Tick during which the entry was created.
    pub(crate) fn born(&self, id: K) -> Option<u64> {
        self.entries.get(&id).map(|slot| slot.born)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.entries.iter().map(|(id, slot)| (*id, &slot.value))
    }

    /// Mutable iteration over entries created before `tick`.
    pub(crate) fn settled_mut(&mut self, tick: u64) -> impl Iterator<Item = &mut T> {
        self.entries
            .values_mut()
            .filter(move |slot| slot.born < tick)
            .map(|slot| &mut slot.value)
    }

    /// Removes every entry matching the predicate and returns their handles.
    pub(crate) fn reap_where(&mut self, mut stale: impl FnMut(&T) -> bool) -> Vec<K> {
        let mut removed = Vec::new();
        self.entries.retain(|id, slot| {
            if stale(&slot.value) {
                removed.push(*id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Removes every entry. Handle allocation continues where it left off.
    pub(crate) fn clear(&mut self) -> Vec<K> {
        let removed = self.entries.keys().copied().collect();
        self.entries.clear();
        removed
    }
}

/// Hostile actor state.
#[derive(Debug)]
pub(crate) struct Enemy {
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec3,
    pub(crate) facing: Vec3,
    pub(crate) speed: f32,
    pub(crate) health: u32,
    pub(crate) contact_damage: u32,
    pub(crate) attack_interval: Duration,
    pub(crate) last_attack: Option<Duration>,
    pub(crate) died_at: Option<Duration>,
    pub(crate) remove_at: Option<Duration>,
}

impl Enemy {
    pub(crate) const fn is_alive(&self) -> bool {
        self.died_at.is_none()
    }

    pub(crate) fn ready_to_attack(&self, now: Duration) -> bool {
        self.is_alive()
            && self
                .last_attack
                .map_or(true, |last| now.saturating_sub(last) >= self.attack_interval)
    }
}

/// Projectile state.
#[derive(Debug)]
pub(crate) struct Projectile {
    pub(crate) position: Vec3,
    pub(crate) direction: Vec3,
    pub(crate) speed: f32,
    pub(crate) lifetime: u32,
    pub(crate) damage: u32,
    pub(crate) consumed: bool,
}

/// Collectible state.
#[derive(Debug)]
pub(crate) struct Pickup {
    pub(crate) kind: PickupKind,
    pub(crate) position: Vec3,
    pub(crate) spin: f32,
    pub(crate) collected: bool,
}

/// The three entity collections plus the enemy population cap.
#[derive(Debug)]
pub(crate) struct EntityRegistry {
    pub(crate) enemies: Arena<EnemyId, Enemy>,
    pub(crate) projectiles: Arena<ProjectileId, Projectile>,
    pub(crate) pickups: Arena<PickupId, Pickup>,
    population_cap: usize,
}

impl EntityRegistry {
    pub(crate) fn new(population_cap: usize) -> Self {
        Self {
            enemies: Arena::new(),
            projectiles: Arena::new(),
            pickups: Arena::new(),
            population_cap,
        }
    }

    pub(crate) fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|(_, enemy)| enemy.is_alive()).count()
    }

    /// Inserts an enemy unless the living population already reached the cap.
    pub(crate) fn spawn_enemy(&mut self, enemy: Enemy, tick: u64) -> Result<EnemyId, SpawnRejection> {
        if self.living_enemies() >= self.population_cap {
            return Err(SpawnRejection::PopulationCap);
        }
        Ok(self.enemies.insert(enemy, tick))
    }

    /// Removes consumed or expired projectiles, collected pickups and enemies
    /// whose death animation finished.
    pub(crate) fn reap(&mut self, now: Duration) -> Vec<EntityId> {
        let mut removed: Vec<EntityId> = self
            .projectiles
            .reap_where(|projectile| projectile.consumed || projectile.lifetime == 0)
            .into_iter()
            .map(EntityId::Projectile)
            .collect();
        removed.extend(
            self.enemies
                .reap_where(|enemy| enemy.remove_at.map_or(false, |deadline| now >= deadline))
                .into_iter()
                .map(EntityId::Enemy),
        );
        removed.extend(
            self.pickups
                .reap_where(|pickup| pickup.collected)
                .into_iter()
                .map(EntityId::Pickup),
        );
        removed
    }

    pub(crate) fn clear(&mut self) -> Vec<EntityId> {
        let mut removed: Vec<EntityId> = self
            .enemies
            .clear()
            .into_iter()
            .map(EntityId::Enemy)
            .collect();
        removed.extend(self.projectiles.clear().into_iter().map(EntityId::Projectile));
        removed.extend(self.pickups.clear().into_iter().map(EntityId::Pickup));
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stalker() -> Enemy {
        Enemy {
            kind: EnemyKind::Stalker,
            position: Vec3::ZERO,
            facing: Vec3::Z,
            speed: 2.0,
            health: 100,
            contact_damage: 10,
            attack_interval: Duration::from_millis(1000),
            last_attack: None,
            died_at: None,
            remove_at: None,
        }
    }

    #[test]
    fn handles_are_allocated_in_creation_order_and_never_reused() {
        let mut arena: Arena<PickupId, u8> = Arena::new();
        let first = arena.insert(1, 0);
        let second = arena.insert(2, 0);
        assert!(first < second);

        let _ = arena.clear();
        let third = arena.insert(3, 1);
        assert!(second < third);
        assert_eq!(arena.get(third), Some(&3));
        assert_eq!(arena.get(first), None);
    }

    #[test]
    fn settled_iteration_skips_entries_born_this_tick() {
        let mut arena: Arena<PickupId, u8> = Arena::new();
        let _ = arena.insert(1, 3);
        let _ = arena.insert(2, 4);
        let settled: Vec<u8> = arena.settled_mut(4).map(|value| *value).collect();
        assert_eq!(settled, vec![1]);
    }

    #[test]
    fn cap_counts_only_living_enemies() {
        let mut registry = EntityRegistry::new(2);
        let first = registry.spawn_enemy(stalker(), 0).expect("first");
        let _ = registry.spawn_enemy(stalker(), 0).expect("second");
        assert_eq!(
            registry.spawn_enemy(stalker(), 0),
            Err(SpawnRejection::PopulationCap)
        );

        if let Some(enemy) = registry.enemies.get_mut(first) {
            enemy.died_at = Some(Duration::ZERO);
        }
        assert!(registry.spawn_enemy(stalker(), 0).is_ok());
    }

    #[test]
    fn reap_waits_for_death_deadline() {
        let mut registry = EntityRegistry::new(15);
        let id = registry.spawn_enemy(stalker(), 0).expect("spawn");
        if let Some(enemy) = registry.enemies.get_mut(id) {
            enemy.died_at = Some(Duration::from_millis(100));
            enemy.remove_at = Some(Duration::from_millis(1100));
        }

        assert!(registry.reap(Duration::from_millis(1099)).is_empty());
        assert_eq!(
            registry.reap(Duration::from_millis(1100)),
            vec![EntityId::Enemy(id)]
        );
    }

    #[test]
    fn reap_removes_spent_projectiles_and_collected_pickups() {
        let mut registry = EntityRegistry::new(15);
        let spent = registry.projectiles.insert(
            Projectile {
                position: Vec3::ZERO,
                direction: Vec3::Z,
                speed: 50.0,
                lifetime: 0,
                damage: 25,
                consumed: false,
            },
            0,
        );
        let flying = registry.projectiles.insert(
            Projectile {
                position: Vec3::ZERO,
                direction: Vec3::Z,
                speed: 50.0,
                lifetime: 10,
                damage: 25,
                consumed: false,
            },
            0,
        );
        let taken = registry.pickups.insert(
            Pickup {
                kind: PickupKind::Ammo,
                position: Vec3::ZERO,
                spin: 0.0,
                collected: true,
            },
            0,
        );

        let removed = registry.reap(Duration::ZERO);
        assert_eq!(
            removed,
            vec![EntityId::Projectile(spent), EntityId::Pickup(taken)]
        );
        assert!(registry.projectiles.get(flying).is_some());
    }
}
