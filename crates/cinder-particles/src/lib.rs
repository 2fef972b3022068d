//! # Cinder Particles
//!
//! Server-side custom particle effects.
//!
//! This crate provides:
//! - Parsing of per-particle TOML records into definitions
//! - A bounded catalog of 255 live definitions keyed by effect identifier
//! - Quantization of authoring units into fixed-point wire fields
//! - DefineEffect / SpawnEffect wire packets
//! - Recipient traits the server implements to receive those packets

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod definition;
pub mod error;
pub mod loader;
pub mod packets;
pub mod parser;
pub mod quantize;
pub mod recipient;
pub mod record;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::{LoadSummary, ParticleCatalog, MAX_DEFINED_EFFECTS};
    pub use crate::definition::{CollisionFlags, ExpirationPolicy, ParticleDefinition, TextureRegion, Tint};
    pub use crate::error::{ParticleError, ParticleResult};
    pub use crate::packets::{DefineEffect, EffectPacket, SpawnEffect};
    pub use crate::recipient::{NoRecipients, Recipient, RecipientDirectory, RecordingRecipient};
    pub use crate::record::ParticleRecord;
}

pub use prelude::*;
