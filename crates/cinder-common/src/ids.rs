//! ID types for protocol-visible resources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier a particle effect is known by on the wire.
///
/// The protocol carries it as a single byte, so there are exactly
/// [`EffectId::SLOT_COUNT`] possible values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(u8);

impl EffectId {
    /// Number of distinct effect identifiers (one per catalog slot).
    pub const SLOT_COUNT: usize = 256;

    /// Creates an effect ID from a raw value.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Creates an effect ID from a slot index, if it fits in a byte.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().map(Self)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns the slot index this ID addresses.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for EffectId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
