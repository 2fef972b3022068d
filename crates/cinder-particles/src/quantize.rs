//! Conversions from authoring units to integer wire units.
//!
//! Two groups live here. Authoring-time conversions (`size_from_pixels`,
//! `spread_to_fixed`, `speed_to_fixed`) run once when a record is parsed and
//! never clamp. Broadcast-time conversions (`quantize_clamped` and its
//! wrappers) run every time a definition is sent and clamp to
//! `[0, i32::MAX]`.

use cinder_common::to_fixed;

/// Scale for fractional percentages (size and lifetime variation).
pub const PERCENT_SCALE: f32 = 100.0;

/// Scale for gravity and lifetime (1/10000 resolution).
pub const TEN_THOUSANDTHS_SCALE: f32 = 10_000.0;

/// Converts an authored pixel size to the wire size in half-pixels.
///
/// The doubled value is truncated to eight bits without a range check, so
/// a pixel size of 64 becomes -128.
#[must_use]
pub fn size_from_pixels(pixel_size: f32) -> i8 {
    (pixel_size * 2.0).round() as i64 as i8
}

/// Converts an authored spread multiplier to 1/32 fixed point.
///
/// Truncates to 16 bits; negative inputs wrap.
#[must_use]
pub fn spread_to_fixed(spread: f32) -> u16 {
    to_fixed(spread) as u16
}

/// Converts an authored speed to 1/32 fixed point. Never clamped.
#[must_use]
pub fn speed_to_fixed(speed: f32) -> i32 {
    to_fixed(speed)
}

/// Scales, rounds, and clamps a value into `[0, i32::MAX]`.
///
/// NaN maps to zero.
#[must_use]
pub fn quantize_clamped(value: f32, scale: f32) -> i32 {
    let scaled = (value * scale).round() as i64;
    scaled.clamp(0, i64::from(i32::MAX)) as i32
}

/// Wire size variation (percent).
#[must_use]
pub fn size_variation_wire(size_variation: f32) -> i32 {
    quantize_clamped(size_variation, PERCENT_SCALE)
}

/// Wire gravity (1/10000 units).
#[must_use]
pub fn gravity_wire(gravity: f32) -> i32 {
    quantize_clamped(gravity, TEN_THOUSANDTHS_SCALE)
}

/// Wire base lifetime (1/10000 seconds).
#[must_use]
pub fn base_lifetime_wire(base_lifetime: f32) -> i32 {
    quantize_clamped(base_lifetime, TEN_THOUSANDTHS_SCALE)
}

/// Wire lifetime variation (percent).
#[must_use]
pub fn lifetime_variation_wire(lifetime_variation: f32) -> i32 {
    quantize_clamped(lifetime_variation, PERCENT_SCALE)
}
