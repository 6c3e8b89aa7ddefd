//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Query engine settings
    pub engine: EngineConfig,
    /// Editor settings
    pub editor: EditorConfig,
}

/// Query engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The sqlite binary invoked for every query
    pub program: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "sqlite3".to_string(),
        }
    }
}

/// Editor-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Placeholder text shown while the editor is empty
    pub placeholder: String,
    /// Maximum in-memory history entries to keep
    pub max_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder: "Write SQL...".to_string(),
            max_history: 100,
        }
    }
}
