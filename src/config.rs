//! Configuration management for roadmap validation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (roadmap.toml)
//! - Environment variables (ROADMAP_*)
//!
//! ## Example config file (roadmap.toml):
//! ```toml
//! [integrity]
//! required_roles = ["NLP Engineer", "MLOps Engineer", "ML Engineer"]
//! min_capstones_per_role = 3
//!
//! [report]
//! output_format = "pretty"
//! fail_on_warnings = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration for roadmap validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadmapConfig {
    /// Integrity checker settings
    #[serde(default)]
    pub integrity: IntegrityConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Integrity checker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityConfig {
    /// Roles every roadmap must cover with capstone projects
    #[serde(default = "default_required_roles")]
    pub required_roles: Vec<String>,

    /// Minimum capstone count per required role
    #[serde(default = "default_min_capstones_per_role")]
    pub min_capstones_per_role: usize,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format for JSON reports (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Treat warnings as failures in the CLI exit code
    #[serde(default)]
    pub fail_on_warnings: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

// Default value functions
fn default_required_roles() -> Vec<String> {
    vec![
        "NLP Engineer".to_string(),
        "MLOps Engineer".to_string(),
        "ML Engineer".to_string(),
    ]
}

fn default_min_capstones_per_role() -> usize {
    3
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            required_roles: default_required_roles(),
            min_capstones_per_role: default_min_capstones_per_role(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
            fail_on_warnings: false,
        }
    }
}

impl RoadmapConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["roadmap.toml", ".roadmap.toml", "config/roadmap.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "roadmap", "schemas") {
            let xdg_config = config_dir.config_dir().join("roadmap.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (ROADMAP_*)
        builder = builder.add_source(
            Environment::with_prefix("ROADMAP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoadmapConfig::default();
        assert_eq!(config.integrity.min_capstones_per_role, 3);
        assert_eq!(
            config.integrity.required_roles,
            vec!["NLP Engineer", "MLOps Engineer", "ML Engineer"]
        );
        assert!(!config.report.fail_on_warnings);
        assert_eq!(config.report.output_format, OutputFormat::Pretty);
    }

    #[test]
    fn test_serialize_config() {
        let config = RoadmapConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[integrity]"));
        assert!(toml_str.contains("[report]"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roadmap.toml");
        std::fs::write(
            &path,
            "[integrity]\nmin_capstones_per_role = 5\n",
        )
        .unwrap();

        let config = RoadmapConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.integrity.min_capstones_per_role, 5);
        // Untouched fields keep their defaults
        assert_eq!(config.integrity.required_roles.len(), 3);
    }
}
