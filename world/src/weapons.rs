//! Weapon slots, magazines and the fire-rate gate.

use std::time::Duration;

use asylum_core::{Tint, WeaponProfile, WeaponSlot};

#[derive(Clone, Copy, Debug)]
struct Magazine {
    ammo: u32,
    last_fired: Option<Duration>,
}

/// Parameters of a successful trigger pull.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Discharge {
    pub(crate) slot: WeaponSlot,
    pub(crate) projectiles: u32,
    pub(crate) damage: u32,
    pub(crate) spread: f32,
    pub(crate) tint: Tint,
}

/// Fixed weapon catalog with per-slot ammo and cooldown state.
#[derive(Debug)]
pub(crate) struct Armory {
    profiles: Vec<WeaponProfile>,
    magazines: Vec<Magazine>,
    active: usize,
}

impl Armory {
    pub(crate) fn new(profiles: Vec<WeaponProfile>) -> Self {
        let magazines = profiles
            .iter()
            .map(|profile| Magazine {
                ammo: profile.capacity,
                last_fired: None,
            })
            .collect();
        Self {
            profiles,
            magazines,
            active: 0,
        }
    }

    pub(crate) fn active_slot(&self) -> WeaponSlot {
        WeaponSlot::new(u8::try_from(self.active + 1).unwrap_or(u8::MAX))
    }

    pub(crate) fn profile(&self, slot: WeaponSlot) -> Option<&WeaponProfile> {
        slot.index().and_then(|index| self.profiles.get(index))
    }

    pub(crate) fn ammo(&self, slot: WeaponSlot) -> Option<u32> {
        slot.index()
            .and_then(|index| self.magazines.get(index))
            .map(|magazine| magazine.ammo)
    }

    /// Ammo and capacity of the active slot.
    pub(crate) fn active_rounds(&self) -> Option<(u32, u32)> {
        let profile = self.profiles.get(self.active)?;
        let magazine = self.magazines.get(self.active)?;
        Some((magazine.ammo, profile.capacity))
    }

    /// Discharges the active weapon unless it is cooling down or empty.
    pub(crate) fn try_fire(&mut self, now: Duration) -> Option<Discharge> {
        let slot = self.active_slot();
        let profile = self.profiles.get(self.active)?;
        let magazine = self.magazines.get_mut(self.active)?;

        if let Some(last) = magazine.last_fired {
            if now.saturating_sub(last) < profile.fire_interval {
                return None;
            }
        }
        if magazine.ammo == 0 {
            return None;
        }

        magazine.ammo -= 1;
        magazine.last_fired = Some(now);
        Some(Discharge {
            slot,
            projectiles: profile.projectiles,
            damage: profile.damage,
            spread: profile.spread,
            tint: profile.tint,
        })
    }

    /// Refills the active magazine. Returns `false` when it was already full.
    pub(crate) fn reload(&mut self) -> bool {
        let Some(capacity) = self.profiles.get(self.active).map(|profile| profile.capacity) else {
            return false;
        };
        let Some(magazine) = self.magazines.get_mut(self.active) else {
            return false;
        };
        if magazine.ammo >= capacity {
            return false;
        }
        magazine.ammo = capacity;
        true
    }

    /// Selects a slot and returns the previously active one.
    pub(crate) fn switch_to(&mut self, slot: WeaponSlot) -> Option<WeaponSlot> {
        let index = slot.index().filter(|index| *index < self.profiles.len())?;
        let previous = self.active_slot();
        self.active = index;
        Some(previous)
    }

    /// Fills the active magazine regardless of its current content.
    pub(crate) fn refill_active(&mut self) {
        if let (Some(profile), Some(magazine)) = (
            self.profiles.get(self.active),
            self.magazines.get_mut(self.active),
        ) {
            magazine.ammo = profile.capacity;
        }
    }
}
