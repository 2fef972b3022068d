//! Fixed-point coordinate types for the wire protocol.
//!
//! World positions are authored and simulated as floats in block units. The
//! protocol carries them as integers in 1/32 block resolution.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Fixed-point units per world unit (1/32 block resolution).
pub const FIXED_POINT_SCALE: f32 = 32.0;

/// Converts a world-unit scalar to 1/32 fixed point.
///
/// The value is rounded to the nearest unit and is not clamped: results
/// outside the `i32` range wrap in two's complement.
#[must_use]
pub fn to_fixed(value: f32) -> i32 {
    (value * FIXED_POINT_SCALE).round() as i64 as i32
}

/// Three-axis position in 1/32 fixed-point units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct FixedPos {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
    /// Z coordinate
    pub z: i32,
}

impl FixedPos {
    /// Creates a new fixed-point position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Converts a world-space position, axis by axis.
    #[must_use]
    pub fn from_world(pos: Vec3) -> Self {
        Self {
            x: to_fixed(pos.x),
            y: to_fixed(pos.y),
            z: to_fixed(pos.z),
        }
    }
}
