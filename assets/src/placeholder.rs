//! Procedural stand-ins synthesised when an asset cannot be loaded.

use std::f32::consts::{FRAC_PI_2, PI};

use asylum_core::Tint;
use glam::Vec3;
use image::{Rgba, RgbaImage};

/// Geometric primitive making up part of a placeholder model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// Cylinder aligned with its local y axis.
    Cylinder {
        /// Radius of both caps.
        radius: f32,
        /// Distance between the caps.
        length: f32,
    },
    /// Axis-aligned box.
    Cuboid {
        /// Edge lengths along x, y and z.
        size: Vec3,
    },
}

/// Single coloured primitive placed relative to the model origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Part {
    /// Shape of the part.
    pub primitive: Primitive,
    /// Flat surface colour.
    pub color: Tint,
    /// Offset from the model origin.
    pub offset: Vec3,
    /// Rotation around the z axis in radians.
    pub roll: f32,
}

/// Model assembled from primitives when no model file could be loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderModel {
    /// Parts in draw order.
    pub parts: Vec<Part>,
    /// Uniform scale applied to the assembled parts.
    pub scale: f32,
    /// Position relative to the camera.
    pub mount: Vec3,
}

impl PlaceholderModel {
    /// Barrel, handle and body of the stand-in weapon.
    #[must_use]
    pub fn weapon() -> Self {
        Self {
            parts: vec![
                Part {
                    primitive: Primitive::Cylinder {
                        radius: 0.1,
                        length: 2.0,
                    },
                    color: Tint::from_hex(0x33_33_33),
                    offset: Vec3::new(1.0, 0.0, 0.0),
                    roll: FRAC_PI_2,
                },
                Part {
                    primitive: Primitive::Cuboid {
                        size: Vec3::new(0.3, 1.0, 0.2),
                    },
                    color: Tint::from_hex(0x22_22_22),
                    offset: Vec3::new(-0.2, -0.5, 0.0),
                    roll: 0.0,
                },
                Part {
                    primitive: Primitive::Cuboid {
                        size: Vec3::new(0.8, 0.4, 0.3),
                    },
                    color: Tint::from_hex(0x44_44_44),
                    offset: Vec3::new(0.2, 0.0, 0.0),
                    roll: 0.0,
                },
            ],
            scale: 0.5,
            mount: Vec3::new(0.5, -0.3, -0.5),
        }
    }
}

/// Edge length of the procedural face texture.
pub const FACE_SIZE: u32 = 256;

const FACE_BACKGROUND: Rgba<u8> = Rgba([0x22, 0x00, 0x00, 0xff]);
const FACE_FEATURE: Rgba<u8> = Rgba([0xff, 0x00, 0x00, 0xff]);
const EYES: [(f32, f32); 2] = [(80.0, 100.0), (176.0, 100.0)];
const EYE_RADIUS: f32 = 15.0;
const MOUTH_CENTRE: (f32, f32) = (128.0, 150.0);
const MOUTH_RADIUS: f32 = 30.0;
const MOUTH_STROKE: f32 = 3.0;

/// Dark red face with glowing eyes and a drooping mouth.
#[must_use]
pub fn face_texture() -> RgbaImage {
    RgbaImage::from_fn(FACE_SIZE, FACE_SIZE, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let in_eye = EYES
            .iter()
            .any(|(ex, ey)| (px - ex).hypot(py - ey) <= EYE_RADIUS);

        let (dx, dy) = (px - MOUTH_CENTRE.0, py - MOUTH_CENTRE.1);
        // Image rows grow downwards, so angles in [0, PI] cover the lower half.
        let angle = dy.atan2(dx);
        let on_mouth = (0.0..=PI).contains(&angle)
            && (dx.hypot(dy) - MOUTH_RADIUS).abs() <= MOUTH_STROKE / 2.0;

        if in_eye || on_mouth {
            FACE_FEATURE
        } else {
            FACE_BACKGROUND
        }
    })
}
