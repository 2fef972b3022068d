//! Particle effect definitions.
//!
//! A definition holds everything a client needs to render one custom
//! particle effect. Integer fields are already in wire form; the four
//! `f32` timing and variation fields stay in authoring units until the
//! definition is broadcast (see [`crate::quantize`]).

use cinder_common::EffectId;
use serde::{Deserialize, Serialize};

use crate::quantize;

/// When a particle dies on contact with terrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationPolicy {
    /// Expires on touching any surface, including the ground.
    AnyCollision,
    /// Expires on touching walls and ceilings; rests on the ground.
    #[default]
    WallCeilingOnly,
}

impl ExpirationPolicy {
    /// Maps the `expireUponTouchingGround` config flag to a policy.
    #[must_use]
    pub const fn from_expire_on_ground(expire: bool) -> Self {
        if expire {
            Self::AnyCollision
        } else {
            Self::WallCeilingOnly
        }
    }
}

/// Which block classes a particle collides with, plus its expiration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionFlags {
    /// Expiration policy
    pub expiration: ExpirationPolicy,
    /// Collides with solid, slippery, and ice blocks
    pub solid_ice: bool,
    /// Collides with water, lava, and rope
    pub water_lava_rope: bool,
    /// Collides with leaves and other sprite-drawn blocks
    pub leaf_draw: bool,
}

impl CollisionFlags {
    /// Bit set when the particle expires on any collision.
    pub const EXPIRE_ON_ANY: u8 = 1 << 7;
    /// Bit set when colliding with solid/ice blocks.
    pub const SOLID_ICE: u8 = 1 << 6;
    /// Bit set when colliding with water/lava/rope.
    pub const WATER_LAVA_ROPE: u8 = 1 << 5;
    /// Bit set when colliding with leaves/draw blocks.
    pub const LEAF_DRAW: u8 = 1 << 4;

    /// Packs the flags into the single wire byte.
    #[must_use]
    pub const fn to_wire(self) -> u8 {
        let mut bits = 0;
        if matches!(self.expiration, ExpirationPolicy::AnyCollision) {
            bits |= Self::EXPIRE_ON_ANY;
        }
        if self.solid_ice {
            bits |= Self::SOLID_ICE;
        }
        if self.water_lava_rope {
            bits |= Self::WATER_LAVA_ROPE;
        }
        if self.leaf_draw {
            bits |= Self::LEAF_DRAW;
        }
        bits
    }
}

impl Default for CollisionFlags {
    fn default() -> Self {
        Self {
            expiration: ExpirationPolicy::WallCeilingOnly,
            solid_ice: true,
            water_lava_rope: false,
            leaf_draw: false,
        }
    }
}

/// Pixel rectangle in the shared particle texture atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureRegion {
    /// Left edge
    pub u1: u8,
    /// Top edge
    pub v1: u8,
    /// Right edge
    pub u2: u8,
    /// Bottom edge
    pub v2: u8,
}

impl TextureRegion {
    /// Creates a new texture region.
    #[must_use]
    pub const fn new(u1: u8, v1: u8, u2: u8, v2: u8) -> Self {
        Self { u1, v1, u2, v2 }
    }
}

impl Default for TextureRegion {
    fn default() -> Self {
        Self::new(0, 0, 10, 10)
    }
}

/// RGB tint multiplied into the particle texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl Tint {
    /// No tint.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a new tint.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One authored particle effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDefinition {
    /// Lookup name (the config record's base name).
    pub name: String,
    /// Atlas region.
    pub texture: TextureRegion,
    /// Color tint.
    pub tint: Tint,
    /// Number of animation frames.
    pub frame_count: u8,
    /// Particles emitted per spawn.
    pub particle_count: u8,
    /// Particle size in half-pixels. Wraps for pixel sizes of 64 and up.
    pub size: i8,
    /// Size variation as a fraction (0.5 = ±50%).
    pub size_variation: f32,
    /// Emission spread in 1/32 block units.
    pub spread: u16,
    /// Initial speed in 1/32 block units.
    pub speed: i32,
    /// Gravity in blocks per tick squared.
    pub gravity: f32,
    /// Lifetime in seconds.
    pub base_lifetime: f32,
    /// Lifetime variation as a fraction.
    pub lifetime_variation: f32,
    /// Collision behavior.
    pub collision: CollisionFlags,
    /// Skip lighting when rendering.
    pub full_bright: bool,
    /// Assigned by the catalog on registration.
    #[serde(skip)]
    effect_id: Option<EffectId>,
}

impl ParticleDefinition {
    /// Default pixel size for a new definition.
    pub const DEFAULT_PIXEL_SIZE: f32 = 8.0;

    /// Default lifetime in seconds.
    pub const DEFAULT_BASE_LIFETIME: f32 = 1.0;

    /// Creates a definition with every field at its configuration default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: TextureRegion::default(),
            tint: Tint::WHITE,
            frame_count: 1,
            particle_count: 1,
            size: quantize::size_from_pixels(Self::DEFAULT_PIXEL_SIZE),
            size_variation: 0.0,
            spread: 0,
            speed: 0,
            gravity: 0.0,
            base_lifetime: Self::DEFAULT_BASE_LIFETIME,
            lifetime_variation: 0.0,
            collision: CollisionFlags::default(),
            full_bright: false,
            effect_id: None,
        }
    }

    /// Returns the identifier assigned at registration, if any.
    #[must_use]
    pub const fn effect_id(&self) -> Option<EffectId> {
        self.effect_id
    }

    /// Returns true once the catalog has assigned an identifier.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.effect_id.is_some()
    }

    pub(crate) fn assign_id(&mut self, id: EffectId) {
        self.effect_id = Some(id);
    }
}
