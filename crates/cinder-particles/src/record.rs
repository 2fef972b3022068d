//! Raw configuration records.
//!
//! A record is the untyped key/value form of one particle definition, named
//! after the file it came from. Values are kept as text so that the parser
//! decides each key's numeric kind.

use ahash::AHashMap;

use crate::error::{ParticleError, ParticleResult};

/// Untyped key/value configuration for one particle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleRecord {
    name: String,
    values: AHashMap<String, String>,
}

impl ParticleRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: AHashMap::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of keys present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a record from the top-level entries of a TOML document.
    ///
    /// Strings are taken verbatim; every other value uses its TOML text.
    pub fn from_toml_str(name: impl Into<String>, content: &str) -> ParticleResult<Self> {
        let name = name.into();
        let table: toml::Table = match content.parse() {
            Ok(table) => table,
            Err(source) => return Err(ParticleError::Syntax { name, source }),
        };

        let mut record = Self::new(name);
        for (key, value) in table {
            let text = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            record.values.insert(key, text);
        }
        Ok(record)
    }
}
