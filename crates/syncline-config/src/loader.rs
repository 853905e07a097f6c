//! Configuration loader utilities

use crate::{Config, ConfigBuilder, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Configuration loader with common loading patterns
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default locations
    pub fn load_default() -> ConfigResult<Config> {
        let mut builder = ConfigBuilder::new().add_defaults();

        for path in Self::default_config_paths() {
            if path.exists() {
                builder = builder.add_source_file(&path);
                break; // Use the first found config file
            }
        }

        builder = builder.add_env_prefix("SYNCLINE");
        builder.build()
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Configuration file not found",
                ),
            });
        }

        ConfigBuilder::new()
            .add_defaults()
            .add_source_file(path)
            .add_env_prefix("SYNCLINE")
            .build()
    }

    /// Save configuration to a file, format chosen by extension
    pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(config).map_err(|e| {
                ConfigError::Serialization {
                    message: format!("Failed to serialize to TOML: {}", e),
                }
            })?,
            Some("json") => serde_json::to_string_pretty(config).map_err(|e| {
                ConfigError::Serialization {
                    message: format!("Failed to serialize to JSON: {}", e),
                }
            })?,
            _ => serde_yaml::to_string(config).map_err(|e| ConfigError::Serialization {
                message: format!("Failed to serialize to YAML: {}", e),
            })?,
        };

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Render the default configuration as YAML
    pub fn default_config_yaml() -> ConfigResult<String> {
        serde_yaml::to_string(&Config::default()).map_err(ConfigError::from)
    }

    /// Candidate configuration file locations, in priority order
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("syncline.yaml"),
            PathBuf::from("syncline.yml"),
            PathBuf::from("syncline.toml"),
        ];

        if let Some(home) = std::env::var_os("HOME") {
            let base = PathBuf::from(home).join(".config").join("syncline");
            paths.push(base.join("syncline.yaml"));
            paths.push(base.join("syncline.toml"));
        }

        paths
    }
}
