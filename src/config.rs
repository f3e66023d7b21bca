//! Configuration management for the metanodes CLI
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (metanodes.toml)
//! - Environment variables (METANODES__*)
//!
//! ## Example config file (metanodes.toml):
//! ```toml
//! [logging]
//! filter = "jiratree_metanodes=debug"
//!
//! [export]
//! output_format = "compact"
//! manifest_path = "metanodes.json"
//! graph_path = "metanodes.dot"
//!
//! [search]
//! limit = 5
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetanodesConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Search settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Default manifest output path
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// Default DOT graph output path
    #[serde(default = "default_graph_path")]
    pub graph_path: PathBuf,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of hits
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("metanodes.json")
}

fn default_graph_path() -> PathBuf {
    PathBuf::from("metanodes.dot")
}

fn default_limit() -> usize {
    10
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
            manifest_path: default_manifest_path(),
            graph_path: default_graph_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl MetanodesConfig {
    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["metanodes.toml", ".metanodes.toml", "config/metanodes.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(dirs) = directories::ProjectDirs::from("dev", "jiratree", "metanodes") {
            let xdg_config = dirs.config_dir().join("metanodes.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // METANODES__EXPORT__OUTPUT_FORMAT=compact
        builder = builder.add_source(
            Environment::with_prefix("METANODES")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Render a JSON value in the configured output format
    pub fn render_json<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self.export.output_format {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = MetanodesConfig::default();
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.export.output_format, OutputFormat::Pretty);
        assert_eq!(config.search.limit, 10);
    }

    #[test]
    fn test_serialize_config() {
        let config = MetanodesConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[export]"));

        let back: MetanodesConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.export.manifest_path, config.export.manifest_path);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[export]\noutput_format = \"compact\"\n\n[search]\nlimit = 3\n",
        )
        .unwrap();

        let config = MetanodesConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.export.output_format, OutputFormat::Compact);
        assert_eq!(config.search.limit, 3);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(MetanodesConfig::load_from(path.to_str()).is_err());
    }

    #[test]
    fn test_render_json() {
        let mut config = MetanodesConfig::default();
        let value = serde_json::json!({"a": 1});
        assert!(config.render_json(&value).unwrap().contains('\n'));
        config.export.output_format = OutputFormat::Compact;
        assert_eq!(config.render_json(&value).unwrap(), "{\"a\":1}");
    }
}
