use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DialogueError, Result};

/// Engine tunables.
///
/// The engine itself has a single knob: how deep a chain of conditional
/// branch nodes may go before resolution is abandoned as misconfigured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of conditional nodes crossed in one resolution.
    #[serde(default = "default_max_resolve_depth")]
    pub max_resolve_depth: usize,
}

fn default_max_resolve_depth() -> usize {
    64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_resolve_depth: default_max_resolve_depth(),
        }
    }
}

impl EngineConfig {
    /// Load the config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| DialogueError::ConfigNotFound(path.display().to_string()))?;

        toml::from_str(&content).map_err(|e| DialogueError::Config(e.to_string()))
    }
}
