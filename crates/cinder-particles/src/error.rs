//! Error types for particle loading and registration.

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or registering particles.
#[derive(Debug, Error)]
pub enum ParticleError {
    /// The particle directory could not be listed or created.
    #[error("Failed to scan particle directory {path:?}: {source}")]
    Directory {
        /// Directory that was being scanned
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A record's backing file could not be read.
    #[error("Failed to read particle record '{name}': {source}")]
    Read {
        /// Record name
        name: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A record's backing file is not valid TOML.
    #[error("Failed to parse particle record '{name}': {source}")]
    Syntax {
        /// Record name
        name: String,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// An integer-valued key holds text that is not an integer.
    #[error("Particle record '{name}': {key} = {value:?} is not an integer: {source}")]
    InvalidInteger {
        /// Record name
        name: String,
        /// Offending key
        key: &'static str,
        /// Raw value
        value: String,
        /// Underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// A decimal-valued key holds text that is not a number.
    #[error("Particle record '{name}': {key} = {value:?} is not a number: {source}")]
    InvalidDecimal {
        /// Record name
        name: String,
        /// Offending key
        key: &'static str,
        /// Raw value
        value: String,
        /// Underlying parse error
        #[source]
        source: ParseFloatError,
    },

    /// Every usable slot in the catalog is taken.
    #[error("Particle catalog is full ({occupied} effects defined), cannot register '{name}'")]
    CapacityExceeded {
        /// Name of the definition that was rejected
        name: String,
        /// Number of occupied slots at the time
        occupied: usize,
    },
}

impl ParticleError {
    /// Returns true for failures that come from a configuration record
    /// (read, syntax, or value errors), as opposed to catalog state.
    #[must_use]
    pub const fn is_record_failure(&self) -> bool {
        matches!(
            self,
            Self::Read { .. }
                | Self::Syntax { .. }
                | Self::InvalidInteger { .. }
                | Self::InvalidDecimal { .. }
        )
    }
}

/// Result type for particle operations.
pub type ParticleResult<T> = Result<T, ParticleError>;
