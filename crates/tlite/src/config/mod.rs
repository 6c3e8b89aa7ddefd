//! Configuration module for tlite.
//!
//! Handles loading configuration from default values and the config file
//! (~/.config/tlite/config.toml).

mod schema;

pub use schema::{Config, EditorConfig, EngineConfig};

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Returns the config directory path.
///
/// Checks `TLITE_CONFIG_DIR` first, then falls back to the system default
/// (~/.config/tlite on Linux/macOS).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TLITE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|p| p.join("tlite"))
}

/// Returns the default config file path (~/.config/tlite/config.toml)
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration from the default path or return defaults
pub fn load_config() -> Result<Config> {
    if let Some(path) = config_path() {
        if path.exists() {
            return load_config_from(&path);
        }
    }
    Ok(Config::default())
}

/// Load configuration from a specific path
pub fn load_config_from(path: &PathBuf) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.program, "sqlite3");
        assert_eq!(config.editor.placeholder, "Write SQL...");
        assert!(config.editor.max_history > 0);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[engine]
program = "/opt/sqlite/bin/sqlite3"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.program, "/opt/sqlite/bin/sqlite3");
        // Other sections keep their defaults
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\nmax_history = 7\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.editor.max_history, 7);
        assert_eq!(config.engine.program, "sqlite3");
    }

    #[test]
    fn test_load_config_from_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml [").unwrap();

        assert!(load_config_from(&path).is_err());
    }
}
