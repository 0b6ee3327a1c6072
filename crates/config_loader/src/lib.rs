//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `CollectorBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("config.toml")).unwrap();
//! println!("Sensors: {}", blueprint.sensors.len());
//! ```

mod parser;
mod validator;

pub use contracts::CollectorBlueprint;
pub use parser::ConfigFormat;
pub use validator::validate;

use contracts::CollectorError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<CollectorBlueprint, CollectorError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CollectorBlueprint, CollectorError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Serialize CollectorBlueprint to TOML string
    pub fn to_toml(blueprint: &CollectorBlueprint) -> Result<String, CollectorError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| CollectorError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize CollectorBlueprint to JSON string
    pub fn to_json(blueprint: &CollectorBlueprint) -> Result<String, CollectorError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| CollectorError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, CollectorError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            CollectorError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            CollectorError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, CollectorError> {
        std::fs::read_to_string(path).map_err(|e| CollectorError::ConfigParse {
            message: format!("failed to read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }
}
