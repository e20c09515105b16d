use std::time::Duration;

use crate::Color;

/// Cosmetic effect with an explicit lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Effect {
    MuzzleFlash,
    ScreenFlash(Color),
    Shake(f32),
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    effect: Effect,
    started: Duration,
    deadline: Duration,
}

/// Set of running effects, each expiring on its own deadline.
#[derive(Debug, Default)]
pub(crate) struct EffectTimeline {
    active: Vec<Scheduled>,
}

impl EffectTimeline {
    pub(crate) fn schedule(&mut self, effect: Effect, now: Duration, lifetime: Duration) {
        self.active.push(Scheduled {
            effect,
            started: now,
            deadline: now.saturating_add(lifetime),
        });
    }

    pub(crate) fn expire(&mut self, now: Duration) {
        self.active.retain(|scheduled| scheduled.deadline > now);
    }

    pub(crate) fn muzzle_flash(&self) -> bool {
        self.active
            .iter()
            .any(|scheduled| scheduled.effect == Effect::MuzzleFlash)
    }

    /// Most recently started screen flash.
    pub(crate) fn screen_flash(&self) -> Option<Color> {
        self.active
            .iter()
            .filter_map(|scheduled| match scheduled.effect {
                Effect::ScreenFlash(color) => Some((scheduled.started, color)),
                _ => None,
            })
            .max_by_key(|(started, _)| *started)
            .map(|(_, color)| color)
    }

    /// Strongest running shake, zero when none is active.
    pub(crate) fn shake(&self) -> f32 {
        self.active
            .iter()
            .filter_map(|scheduled| match scheduled.effect {
                Effect::Shake(intensity) => Some(intensity),
                _ => None,
            })
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn effects_expire_independently() {
        let mut timeline = EffectTimeline::default();
        timeline.schedule(Effect::MuzzleFlash, ms(0), ms(100));
        timeline.schedule(Effect::Shake(0.3), ms(0), ms(300));

        timeline.expire(ms(99));
        assert!(timeline.muzzle_flash());
        timeline.expire(ms(100));
        assert!(!timeline.muzzle_flash());
        assert_eq!(timeline.shake(), 0.3);
        timeline.expire(ms(300));
        assert_eq!(timeline.shake(), 0.0);
    }

    #[test]
    fn overlapping_shakes_use_the_strongest() {
        let mut timeline = EffectTimeline::default();
        timeline.schedule(Effect::Shake(0.1), ms(0), ms(100));
        timeline.schedule(Effect::Shake(0.3), ms(50), ms(300));
        assert_eq!(timeline.shake(), 0.3);
    }

    #[test]
    fn newest_screen_flash_wins() {
        let red = Color::new(1.0, 0.0, 0.0, 0.3);
        let white = Color::new(1.0, 1.0, 1.0, 1.0);
        let mut timeline = EffectTimeline::default();
        timeline.schedule(Effect::ScreenFlash(red), ms(0), ms(200));
        timeline.schedule(Effect::ScreenFlash(white), ms(10), ms(50));
        assert_eq!(timeline.screen_flash(), Some(white));

        timeline.expire(ms(60));
        assert_eq!(timeline.screen_flash(), Some(red));
    }
}
