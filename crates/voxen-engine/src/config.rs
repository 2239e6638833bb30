//! Engine configuration.
//!
//! One serde-backed struct bundling the tick and physics parameters, loaded
//! from JSON at startup.

use serde::{Deserialize, Serialize};

use crate::physics::PhysicsConfig;
use crate::tick::TickConfig;
use crate::EngineError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub tick: TickConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing sections fall back to their
    /// defaults.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] when the JSON is malformed or has the wrong
    /// shape.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|error| EngineError::Config(error.to_string()))
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
