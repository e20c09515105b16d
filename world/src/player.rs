use std::time::Duration;

use asylum_core::PlayerTuning;
use glam::Vec3;

/// Player body, health and score.
#[derive(Debug)]
pub(crate) struct Player {
    pub(crate) position: Vec3,
    pub(crate) health: u32,
    pub(crate) score: u32,
    pub(crate) grounded: bool,
    vertical_speed: f32,
    move_intent: Vec3,
    jump_ready_at: Duration,
}

impl Player {
    pub(crate) fn spawn(tuning: &PlayerTuning) -> Self {
        Self {
            position: tuning.spawn,
            health: tuning.max_health,
            score: 0,
            grounded: tuning.spawn.y <= tuning.eye_height,
            vertical_speed: 0.0,
            move_intent: Vec3::ZERO,
            jump_ready_at: Duration::ZERO,
        }
    }

    /// Stores a horizontal movement direction of at most unit length.
    pub(crate) fn set_move_intent(&mut self, direction: Vec3) {
        let horizontal = Vec3::new(direction.x, 0.0, direction.z);
        self.move_intent = if horizontal.is_finite() {
            horizontal.clamp_length_max(1.0)
        } else {
            Vec3::ZERO
        };
    }

    pub(crate) fn try_jump(&mut self, now: Duration, tuning: &PlayerTuning) -> bool {
        if !self.grounded || now < self.jump_ready_at {
            return false;
        }
        self.vertical_speed = tuning.jump_speed;
        self.jump_ready_at = now + tuning.jump_cooldown;
        true
    }

    pub(crate) fn integrate(&mut self, dt: f32, tuning: &PlayerTuning) {
        self.position += self.move_intent * tuning.move_speed * dt;

        if !self.grounded {
            self.vertical_speed -= tuning.gravity * dt;
        }
        self.position.y += self.vertical_speed * dt;

        if self.position.y <= tuning.eye_height {
            self.position.y = tuning.eye_height;
            self.vertical_speed = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Applies damage, clamping at zero, and returns the remaining health.
    pub(crate) fn hurt(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Restores health up to `max` and returns the new value.
    pub(crate) fn heal(&mut self, amount: u32, max: u32) -> u32 {
        self.health = self.health.saturating_add(amount).min(max);
        self.health
    }
}
