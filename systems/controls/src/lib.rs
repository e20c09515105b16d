#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that translates raw input edges into world commands.

use asylum_core::{Command, GamePhase, InputEvent, Key, MouseButton, WeaponSlot};
use glam::Vec3;

#[derive(Clone, Copy, Debug, Default)]
struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::W => self.forward = held,
            Key::S => self.backward = held,
            Key::A => self.left = held,
            Key::D => self.right = held,
            _ => {}
        }
    }

    /// Camera-local direction with `-z` pointing forward.
    fn local(&self) -> Vec3 {
        let mut direction = Vec3::ZERO;
        if self.forward {
            direction.z -= 1.0;
        }
        if self.backward {
            direction.z += 1.0;
        }
        if self.left {
            direction.x -= 1.0;
        }
        if self.right {
            direction.x += 1.0;
        }
        direction.normalize_or_zero()
    }
}

/// Input translator that tracks held movement keys across frames.
#[derive(Debug, Default)]
pub struct Controls {
    held: HeldKeys,
}

impl Controls {
    /// Creates a translator with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the commands requested by this frame's input edges.
    ///
    /// `facing` is the camera's world-space view direction. While playing a
    /// `SetMoveIntent` is emitted every frame so releasing all keys stops the
    /// player.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        inputs: &[InputEvent],
        facing: Vec3,
        out: &mut Vec<Command>,
    ) {
        for input in inputs {
            match *input {
                InputEvent::KeyDown(key) => {
                    self.held.set(key, true);
                    if phase == GamePhase::Playing {
                        if let Some(command) = key_command(key) {
                            out.push(command);
                        }
                    }
                }
                InputEvent::KeyUp(key) => self.held.set(key, false),
                InputEvent::MouseDown(MouseButton::Primary) => match phase {
                    GamePhase::NotStarted => out.push(Command::Activate),
                    GamePhase::Playing => out.push(Command::FireWeapon { aim: facing }),
                    GamePhase::GameOver => {}
                },
                InputEvent::MouseDown(_) | InputEvent::MouseUp(_) => {}
                InputEvent::RestartRequested => {
                    if phase == GamePhase::GameOver {
                        out.push(Command::Restart);
                    }
                }
            }
        }

        if phase == GamePhase::Playing {
            out.push(Command::SetMoveIntent {
                direction: world_direction(self.held.local(), facing),
            });
        }
    }
}

fn key_command(key: Key) -> Option<Command> {
    let slot = |number| Some(Command::SwitchWeapon {
        slot: WeaponSlot::new(number),
    });
    match key {
        Key::Space => Some(Command::Jump),
        Key::R => Some(Command::ReloadWeapon),
        Key::Digit1 => slot(1),
        Key::Digit2 => slot(2),
        Key::Digit3 => slot(3),
        Key::Digit4 => slot(4),
        Key::W | Key::A | Key::S | Key::D | Key::Other => None,
    }
}

/// Rotates a camera-local direction onto the ground plane around `facing`.
fn world_direction(local: Vec3, facing: Vec3) -> Vec3 {
    if local == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let forward = Vec3::new(facing.x, 0.0, facing.z)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Z);
    let right = forward.cross(Vec3::Y);
    forward * -local.z + right * local.x
}
