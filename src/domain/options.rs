//! Conversion options and application configuration.
//!
//! `ConvertOptions` is passed to every conversion explicitly; the engine keeps
//! no state between runs. `AppConfig` is the on-disk shape read by the CLI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-run conversion options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Prefix names with their two-digit binder position ("01 Chapter").
    #[serde(default)]
    pub prefix_positions: bool,

    /// Mirror the trash folder instead of skipping it.
    #[serde(default)]
    pub include_trash: bool,

    /// Byte ceiling for a single file or directory name.
    #[serde(default = "default_max_name_bytes")]
    pub max_name_bytes: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prefix_positions: false,
            include_trash: false,
            max_name_bytes: default_max_name_bytes(),
        }
    }
}

const fn default_max_name_bytes() -> usize {
    255
}

/// Output configuration for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format: text or json.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Conversion options.
    #[serde(default)]
    pub conversion: ConvertOptions,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Get the default configuration directory.
    #[must_use]
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scrivener-vault")
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert!(!options.prefix_positions);
        assert!(!options.include_trash);
        assert_eq!(options.max_name_bytes, 255);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("[conversion]\ninclude_trash = true\n").unwrap();
        assert!(config.conversion.include_trash);
        assert_eq!(config.conversion.max_name_bytes, 255);
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_config_path_ends_with_file_name() {
        assert!(AppConfig::default_config_path().ends_with("scrivener-vault/config.toml"));
    }
}
