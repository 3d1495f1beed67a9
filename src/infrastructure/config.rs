//! Configuration file management.
//!
//! Handles loading and creating the TOML configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, ConvertError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Scrivener Vault Configuration
# Auto-generated - edit as needed

[conversion]
# Prefix folder and file names with their binder position ("01 Chapter 1")
prefix_positions = false

# Mirror the Trash folder instead of skipping it
include_trash = false

# Maximum length of a single file or folder name, in bytes
max_name_bytes = 255

[output]
# Report format: "text" or "json"
format = "text"
"#;

/// Load configuration from an explicit path, the default location, or defaults.
///
/// # Errors
/// Returns error if an explicit file is missing, or a file exists but cannot
/// be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConvertError::Config {
                message: format!("Config file not found: {}", path.display()),
            });
        }
        return load_config_from_file(path);
    }

    let config_path = AppConfig::default_config_path();
    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConvertError::io(format!("Failed to read config file: {}", path.display()), e)
    })?;

    let config = toml::from_str(&content).map_err(|e| ConvertError::Config {
        message: format!("Failed to parse config file: {e}"),
    })?;

    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Create the default configuration file if it doesn't exist.
///
/// Returns the path of the configuration file.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: Option<&Path>) -> Result<PathBuf> {
    let config_path = path.map_or_else(AppConfig::default_config_path, Path::to_path_buf);

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConvertError::io("Failed to create config directory", e))?;
        }

        fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| ConvertError::io("Failed to create default config", e))?;

        tracing::info!(path = %config_path.display(), "Created default configuration");
    }

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(!config.conversion.prefix_positions);
        assert_eq!(config.conversion.max_name_bytes, 255);
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_ensure_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested/config.toml");

        let created = ensure_config_exists(Some(&config_path)).unwrap();
        assert_eq!(created, config_path);

        let loaded = load_config(Some(&config_path)).unwrap();
        assert!(!loaded.conversion.include_trash);
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[conversion]\nprefix_positions = true\n").unwrap();

        ensure_config_exists(Some(&config_path)).unwrap();
        assert!(load_config_from_file(&config_path).unwrap().conversion.prefix_positions);
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[conversion\n").unwrap();
        assert!(load_config_from_file(&config_path).is_err());
    }
}
