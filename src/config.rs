use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::prediction::ProjectionOptions;
use crate::species::{SpeciesProfile, SpeciesTable};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Engine settings. Every field is optional in JSON; missing fields take the
/// built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    /// Used by projections when the caller passes no options.
    #[serde(default)]
    pub projection: ProjectionOptions,
    /// Replaces or adds species profiles, keyed by species code.
    #[serde(default)]
    pub species_overrides: HashMap<String, SpeciesProfile>,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn species_table(&self) -> SpeciesTable {
        SpeciesTable::with_overrides(&self.species_overrides)
    }
}
