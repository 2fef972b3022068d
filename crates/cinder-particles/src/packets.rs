//! Custom-particle wire packets.
//!
//! Both packets are fixed size and big-endian. Layout, after the opcode byte:
//!
//! ```text
//! DefineEffect (0x30, 36 bytes)
//!   id u8 | u1 v1 u2 v2 u8 | r g b u8 | frames u8 | count u8 | size i8
//!   size_variation i32 | spread u16 | speed i32 | gravity i32
//!   base_lifetime i32 | lifetime_variation i32 | collide_flags u8 | full_bright u8
//!
//! SpawnEffect (0x31, 26 bytes)
//!   id u8 | pos x y z i32 | origin x y z i32
//! ```

use cinder_common::{EffectId, FixedPos};

use crate::definition::{ParticleDefinition, TextureRegion, Tint};
use crate::quantize;

/// Fully quantized definition, ready to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefineEffect {
    /// Identifier the client binds this definition to
    pub effect_id: EffectId,
    /// Atlas region
    pub texture: TextureRegion,
    /// Color tint
    pub tint: Tint,
    /// Animation frames
    pub frame_count: u8,
    /// Particles per spawn
    pub particle_count: u8,
    /// Size in half-pixels
    pub size: i8,
    /// Size variation in percent
    pub size_variation: i32,
    /// Spread in 1/32 units
    pub spread: u16,
    /// Speed in 1/32 units
    pub speed: i32,
    /// Gravity in 1/10000 units
    pub gravity: i32,
    /// Lifetime in 1/10000 seconds
    pub base_lifetime: i32,
    /// Lifetime variation in percent
    pub lifetime_variation: i32,
    /// Packed collision flags
    pub collide_flags: u8,
    /// 1 to skip lighting, 0 otherwise
    pub full_bright: u8,
}

impl DefineEffect {
    /// Packet opcode.
    pub const OPCODE: u8 = 0x30;
    /// Encoded size in bytes, including the opcode.
    pub const SIZE: usize = 36;

    /// Quantizes a definition for broadcast under the given identifier.
    #[must_use]
    pub fn from_definition(definition: &ParticleDefinition, effect_id: EffectId) -> Self {
        Self {
            effect_id,
            texture: definition.texture,
            tint: definition.tint,
            frame_count: definition.frame_count,
            particle_count: definition.particle_count,
            size: definition.size,
            size_variation: quantize::size_variation_wire(definition.size_variation),
            spread: definition.spread,
            speed: definition.speed,
            gravity: quantize::gravity_wire(definition.gravity),
            base_lifetime: quantize::base_lifetime_wire(definition.base_lifetime),
            lifetime_variation: quantize::lifetime_variation_wire(definition.lifetime_variation),
            collide_flags: definition.collision.to_wire(),
            full_bright: u8::from(definition.full_bright),
        }
    }

    /// Appends the encoded packet to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.reserve(Self::SIZE);
        buf.push(Self::OPCODE);
        buf.push(self.effect_id.raw());
        buf.extend_from_slice(&[
            self.texture.u1,
            self.texture.v1,
            self.texture.u2,
            self.texture.v2,
            self.tint.red,
            self.tint.green,
            self.tint.blue,
            self.frame_count,
            self.particle_count,
        ]);
        buf.extend_from_slice(&self.size.to_be_bytes());
        buf.extend_from_slice(&self.size_variation.to_be_bytes());
        buf.extend_from_slice(&self.spread.to_be_bytes());
        buf.extend_from_slice(&self.speed.to_be_bytes());
        buf.extend_from_slice(&self.gravity.to_be_bytes());
        buf.extend_from_slice(&self.base_lifetime.to_be_bytes());
        buf.extend_from_slice(&self.lifetime_variation.to_be_bytes());
        buf.push(self.collide_flags);
        buf.push(self.full_bright);
    }
}

/// Spawn command for one registered effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnEffect {
    /// Effect to spawn
    pub effect_id: EffectId,
    /// Spawn position
    pub position: FixedPos,
    /// Point particles move away from
    pub origin: FixedPos,
}

impl SpawnEffect {
    /// Packet opcode.
    pub const OPCODE: u8 = 0x31;
    /// Encoded size in bytes, including the opcode.
    pub const SIZE: usize = 26;

    /// Appends the encoded packet to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.reserve(Self::SIZE);
        buf.push(Self::OPCODE);
        buf.push(self.effect_id.raw());
        for coord in [
            self.position.x,
            self.position.y,
            self.position.z,
            self.origin.x,
            self.origin.y,
            self.origin.z,
        ] {
            buf.extend_from_slice(&coord.to_be_bytes());
        }
    }
}

/// Any packet the particle catalog emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPacket {
    /// Binds a definition to an identifier on the client.
    Define(DefineEffect),
    /// Spawns a defined effect.
    Spawn(SpawnEffect),
}

impl EffectPacket {
    /// Returns the packet opcode.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::Define(_) => DefineEffect::OPCODE,
            Self::Spawn(_) => SpawnEffect::OPCODE,
        }
    }

    /// Returns the effect identifier the packet refers to.
    #[must_use]
    pub const fn effect_id(&self) -> EffectId {
        match self {
            Self::Define(p) => p.effect_id,
            Self::Spawn(p) => p.effect_id,
        }
    }

    /// Appends the encoded packet to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Define(p) => p.encode(buf),
            Self::Spawn(p) => p.encode(buf),
        }
    }

    /// Encodes into a fresh buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(DefineEffect::SIZE);
        self.encode(&mut buf);
        buf
    }
}

impl From<DefineEffect> for EffectPacket {
    fn from(packet: DefineEffect) -> Self {
        Self::Define(packet)
    }
}

impl From<SpawnEffect> for EffectPacket {
    fn from(packet: SpawnEffect) -> Self {
        Self::Spawn(packet)
    }
}
