//! Record-to-definition parsing.
//!
//! Missing keys take their defaults. A present value that does not parse as
//! its key's numeric kind fails the whole record. Out-of-range numbers are
//! not rejected; they truncate into their wire field width.

use crate::definition::{CollisionFlags, ExpirationPolicy, ParticleDefinition, TextureRegion, Tint};
use crate::error::{ParticleError, ParticleResult};
use crate::quantize;
use crate::record::ParticleRecord;

/// Configuration keys recognised in a particle record.
pub mod keys {
    /// Atlas left edge (integer, default 0).
    pub const PIXEL_U1: &str = "pixelU1";
    /// Atlas top edge (integer, default 0).
    pub const PIXEL_V1: &str = "pixelV1";
    /// Atlas right edge (integer, default 10).
    pub const PIXEL_U2: &str = "pixelU2";
    /// Atlas bottom edge (integer, default 10).
    pub const PIXEL_V2: &str = "pixelV2";
    /// Red tint (integer, default 255).
    pub const TINT_RED: &str = "tintRed";
    /// Green tint (integer, default 255).
    pub const TINT_GREEN: &str = "tintGreen";
    /// Blue tint (integer, default 255).
    pub const TINT_BLUE: &str = "tintBlue";
    /// Animation frames (integer, default 1).
    pub const FRAME_COUNT: &str = "frameCount";
    /// Particles per spawn (integer, default 1).
    pub const PARTICLE_COUNT: &str = "particleCount";
    /// Size in pixels (decimal, default 8).
    pub const PIXEL_SIZE: &str = "pixelSize";
    /// Size variation fraction (decimal, default 0).
    pub const SIZE_VARIATION: &str = "sizeVariation";
    /// Spread multiplier (decimal, default 0).
    pub const SPREAD: &str = "spread";
    /// Speed (decimal, default 0).
    pub const SPEED: &str = "speed";
    /// Gravity (decimal, default 0).
    pub const GRAVITY: &str = "gravity";
    /// Lifetime in seconds (decimal, default 1).
    pub const BASE_LIFETIME: &str = "baseLifetime";
    /// Lifetime variation fraction (decimal, default 0).
    pub const LIFETIME_VARIATION: &str = "lifetimeVariation";
    /// Expire on ground contact (boolean, default false).
    pub const EXPIRE_UPON_TOUCHING_GROUND: &str = "expireUponTouchingGround";
    /// Collide with solid blocks (boolean, default true).
    pub const COLLIDES_SOLID: &str = "collidesSolid";
    /// Collide with liquids (boolean, default false).
    pub const COLLIDES_LIQUID: &str = "collidesLiquid";
    /// Collide with leaves (boolean, default false).
    pub const COLLIDES_LEAVES: &str = "collidesLeaves";
    /// Disable lighting (boolean, default false).
    pub const FULL_BRIGHT: &str = "fullBright";
}

/// Typed accessors over a record, reporting failures against its name.
struct Fields<'a> {
    record: &'a ParticleRecord,
}

impl Fields<'_> {
    fn integer(&self, key: &'static str, default: i32) -> ParticleResult<i32> {
        match self.record.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|source| ParticleError::InvalidInteger {
                name: self.record.name().to_string(),
                key,
                value: raw.to_string(),
                source,
            }),
        }
    }

    /// Integer truncated to a byte, wrapping like the wire field does.
    fn byte(&self, key: &'static str, default: u8) -> ParticleResult<u8> {
        self.integer(key, i32::from(default)).map(|v| v as u8)
    }

    fn decimal(&self, key: &'static str, default: f32) -> ParticleResult<f32> {
        match self.record.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|source| ParticleError::InvalidDecimal {
                name: self.record.name().to_string(),
                key,
                value: raw.to_string(),
                source,
            }),
        }
    }

    /// Lenient boolean: only `true` (any case) is true. Never fails.
    fn flag(&self, key: &'static str, default: bool) -> bool {
        self.record
            .get(key)
            .map_or(default, |raw| raw.trim().eq_ignore_ascii_case("true"))
    }
}

/// Parses one configuration record into a particle definition.
pub fn parse(record: &ParticleRecord) -> ParticleResult<ParticleDefinition> {
    let fields = Fields { record };

    let texture = TextureRegion {
        u1: fields.byte(keys::PIXEL_U1, 0)?,
        v1: fields.byte(keys::PIXEL_V1, 0)?,
        u2: fields.byte(keys::PIXEL_U2, 10)?,
        v2: fields.byte(keys::PIXEL_V2, 10)?,
    };

    let tint = Tint {
        red: fields.byte(keys::TINT_RED, 255)?,
        green: fields.byte(keys::TINT_GREEN, 255)?,
        blue: fields.byte(keys::TINT_BLUE, 255)?,
    };

    let frame_count = fields.byte(keys::FRAME_COUNT, 1)?;
    let particle_count = fields.byte(keys::PARTICLE_COUNT, 1)?;
    let pixel_size = fields.decimal(keys::PIXEL_SIZE, ParticleDefinition::DEFAULT_PIXEL_SIZE)?;

    let size_variation = fields.decimal(keys::SIZE_VARIATION, 0.0)?;
    let spread = fields.decimal(keys::SPREAD, 0.0)?;
    let speed = fields.decimal(keys::SPEED, 0.0)?;
    let gravity = fields.decimal(keys::GRAVITY, 0.0)?;
    let base_lifetime =
        fields.decimal(keys::BASE_LIFETIME, ParticleDefinition::DEFAULT_BASE_LIFETIME)?;
    let lifetime_variation = fields.decimal(keys::LIFETIME_VARIATION, 0.0)?;

    let collision = CollisionFlags {
        expiration: ExpirationPolicy::from_expire_on_ground(
            fields.flag(keys::EXPIRE_UPON_TOUCHING_GROUND, false),
        ),
        solid_ice: fields.flag(keys::COLLIDES_SOLID, true),
        water_lava_rope: fields.flag(keys::COLLIDES_LIQUID, false),
        leaf_draw: fields.flag(keys::COLLIDES_LEAVES, false),
    };

    let mut definition = ParticleDefinition::new(record.name());
    definition.texture = texture;
    definition.tint = tint;
    definition.frame_count = frame_count;
    definition.particle_count = particle_count;
    definition.size = quantize::size_from_pixels(pixel_size);
    definition.size_variation = size_variation;
    definition.spread = quantize::spread_to_fixed(spread);
    definition.speed = quantize::speed_to_fixed(speed);
    definition.gravity = gravity;
    definition.base_lifetime = base_lifetime;
    definition.lifetime_variation = lifetime_variation;
    definition.collision = collision;
    definition.full_bright = fields.flag(keys::FULL_BRIGHT, false);
    Ok(definition)
}
