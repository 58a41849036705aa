//! Effective configuration with provenance
//!
//! The effective config captures the merged configuration plus information
//! about where each layer came from.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use crate::descriptor::{toml_to_json, DescriptorFormat};
use crate::pattern::DependencyPattern;

/// Schema version for the effective config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "uber-pom/effective_config@1";

/// Config file looked up in the descriptor's directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "uber-pom.toml";

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// What a flatten run does, after all layers are applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Ancestor levels merged into the project; negative means all
    pub depth: i32,

    /// Paths whose values in the project itself survive the merge
    pub keep: Vec<String>,

    /// Paths cleared from the merged result
    pub remove: Vec<String>,

    /// Path to string value assignments applied last
    pub set: BTreeMap<String, String>,

    pub exclude_dependencies: Vec<DependencyPattern>,

    pub remove_duplicates: bool,

    pub format: DescriptorFormat,

    /// Output file; stdout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            depth: -1,
            keep: Vec::new(),
            remove: Vec::new(),
            set: BTreeMap::new(),
            exclude_dependencies: Vec::new(),
            remove_duplicates: false,
            format: DescriptorFormat::default(),
            output: None,
        }
    }
}

/// Effective configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub schema_version: u32,

    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build effective config from layers.
    ///
    /// A config file that does not exist is skipped.
    pub fn build(
        config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Config file
        if let Some(path) = config_path {
            if path.exists() {
                let (value, digest) = Self::load_toml_file(path)?;
                layers.push(value);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        // Layer 3: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        Self::validate_config(&merged)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
        })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((toml_to_json(toml_value), digest))
    }

    /// Validate configuration values
    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        if let Some(depth) = config.get("depth").and_then(|v| v.as_i64()) {
            if depth < -1 {
                return Err(ConfigError::ValidationError(
                    "depth must be -1 (whole hierarchy) or >= 0".to_string(),
                ));
            }
        }

        if let Some(set) = config.get("set").and_then(|v| v.as_object()) {
            if set.keys().any(|key| key.trim().is_empty()) {
                return Err(ConfigError::ValidationError(
                    "set contains an empty path".to_string(),
                ));
            }
        }

        if let Some(patterns) = config.get("exclude_dependencies").and_then(|v| v.as_array()) {
            for (i, pattern) in patterns.iter().enumerate() {
                let empty = pattern
                    .as_object()
                    .map_or(true, |fields| fields.values().all(Value::is_null));
                if empty {
                    return Err(ConfigError::ValidationError(format!(
                        "exclude_dependencies[{}] has no fields",
                        i
                    )));
                }
            }
        }

        Ok(())
    }

    /// Deserialize the merged object into a [`FlattenConfig`]
    pub fn flatten_config(&self) -> Result<FlattenConfig, ConfigError> {
        serde_json::from_value(self.config.clone())
            .map_err(|e| ConfigError::ParseError(format!("Invalid configuration: {}", e)))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
