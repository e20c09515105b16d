//! Scripted player used by the headless runner.

use asylum_core::{GamePhase, InputEvent, Key, MouseButton};
use asylum_world::{query, World};
use glam::Vec3;

const STRAFE_PERIOD: u64 = 180;

/// Clicks to start, shoots the nearest enemy, reloads when dry and restarts after death.
#[derive(Debug)]
pub(crate) struct Autopilot {
    facing: Vec3,
    frame: u64,
    strafe: Option<Key>,
}

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self {
            facing: Vec3::NEG_Z,
            frame: 0,
            strafe: None,
        }
    }

    /// Camera direction chosen by the last call to [`Autopilot::plan`].
    pub(crate) fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Appends the input edges for the next frame.
    pub(crate) fn plan(&mut self, world: &World, inputs: &mut Vec<InputEvent>) {
        self.frame += 1;
        match query::phase(world) {
            GamePhase::NotStarted => click(inputs),
            GamePhase::GameOver => {
                if let Some(key) = self.strafe.take() {
                    inputs.push(InputEvent::KeyUp(key));
                }
                inputs.push(InputEvent::RestartRequested);
            }
            GamePhase::Playing => {
                self.strafe(inputs);
                self.aim(world);
                let slot = query::active_slot(world);
                if query::ammo(world, slot) == Some(0) {
                    inputs.push(InputEvent::KeyDown(Key::R));
                    inputs.push(InputEvent::KeyUp(Key::R));
                } else {
                    click(inputs);
                }
            }
        }
    }

    fn strafe(&mut self, inputs: &mut Vec<InputEvent>) {
        if self.strafe.is_some() && self.frame % STRAFE_PERIOD != 0 {
            return;
        }
        let previous = self.strafe.take();
        let next = if previous == Some(Key::A) { Key::D } else { Key::A };
        if let Some(previous) = previous {
            inputs.push(InputEvent::KeyUp(previous));
        }
        inputs.push(InputEvent::KeyDown(next));
        self.strafe = Some(next);
    }

    fn aim(&mut self, world: &World) {
        let eye = query::player(world).position;
        let target = query::enemy_view(world)
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.position)
            .min_by(|a, b| a.distance_squared(eye).total_cmp(&b.distance_squared(eye)));
        if let Some(target) = target {
            self.facing = (target - eye).try_normalize().unwrap_or(self.facing);
        }
    }
}

fn click(inputs: &mut Vec<InputEvent>) {
    inputs.push(InputEvent::MouseDown(MouseButton::Primary));
    inputs.push(InputEvent::MouseUp(MouseButton::Primary));
}

#[cfg(test)]
mod tests {
    use asylum_core::{Command, EnemyKind};
    use asylum_world::apply;

    use super::*;

    #[test]
    fn clicks_to_start_the_run() {
        let world = World::new();
        let mut autopilot = Autopilot::new();
        let mut inputs = Vec::new();
        autopilot.plan(&world, &mut inputs);
        assert_eq!(
            inputs,
            vec![
                InputEvent::MouseDown(MouseButton::Primary),
                InputEvent::MouseUp(MouseButton::Primary),
            ]
        );
    }

    #[test]
    fn aims_at_the_nearest_living_enemy() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::Activate, &mut events);
        let eye = query::player(&world).position;
        for offset in [Vec3::new(20.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 40.0)] {
            apply(
                &mut world,
                Command::SpawnEnemy {
                    kind: EnemyKind::Stalker,
                    position: eye + offset,
                    speed: 0.0,
                },
                &mut events,
            );
        }

        let mut autopilot = Autopilot::new();
        let mut inputs = Vec::new();
        autopilot.plan(&world, &mut inputs);

        assert!(autopilot.facing().abs_diff_eq(Vec3::X, 1e-5));
        assert!(inputs.contains(&InputEvent::MouseDown(MouseButton::Primary)));
        assert!(inputs.contains(&InputEvent::KeyDown(Key::A)));
    }

    #[test]
    fn strafe_direction_alternates() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::Activate, &mut events);

        let mut autopilot = Autopilot::new();
        let mut pressed = Vec::new();
        for _ in 0..=STRAFE_PERIOD {
            let mut inputs = Vec::new();
            autopilot.plan(&world, &mut inputs);
            pressed.extend(inputs.into_iter().filter(|input| {
                matches!(input, InputEvent::KeyDown(Key::A | Key::D) | InputEvent::KeyUp(Key::A))
            }));
        }
        assert_eq!(
            pressed,
            vec![
                InputEvent::KeyDown(Key::A),
                InputEvent::KeyUp(Key::A),
                InputEvent::KeyDown(Key::D),
            ]
        );
    }
}
