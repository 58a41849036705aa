//! Descriptor text formats

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DescriptorError;
use crate::dedup;

/// Serialized form of a descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorFormat {
    #[default]
    Toml,
    Json,
}

impl DescriptorFormat {
    /// Pick the format from a file extension; no extension means TOML
    pub fn from_path(path: &Path) -> Result<Self, DescriptorError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            None => Ok(DescriptorFormat::Toml),
            Some(ext) => ext.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorFormat::Toml => "toml",
            DescriptorFormat::Json => "json",
        }
    }

    /// Parse text into the generic tree
    pub fn parse_tree(self, text: &str) -> Result<Value, DescriptorError> {
        match self {
            DescriptorFormat::Toml => {
                let value: toml::Value = toml::from_str(text)?;
                Ok(toml_to_json(value))
            }
            DescriptorFormat::Json => Ok(serde_json::from_str(text)?),
        }
    }

    /// Render a generic tree as text
    pub fn render_tree(self, tree: &Value) -> Result<String, DescriptorError> {
        match self {
            DescriptorFormat::Toml => Ok(toml::to_string_pretty(tree)?),
            DescriptorFormat::Json => {
                let mut text = serde_json::to_string_pretty(tree)?;
                text.push('\n');
                Ok(text)
            }
        }
    }
}

impl FromStr for DescriptorFormat {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(DescriptorFormat::Toml),
            "json" => Ok(DescriptorFormat::Json),
            _ => Err(DescriptorError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for DescriptorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert TOML Value to JSON Value
pub fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Parse, remove duplicate siblings and re-render in the same format.
///
/// Returns the new text and the removed element paths.
pub fn dedup_text(
    text: &str,
    format: DescriptorFormat,
) -> Result<(String, Vec<String>), DescriptorError> {
    let mut tree = format.parse_tree(text)?;
    let removed = dedup::remove_duplicate_siblings(&mut tree);
    Ok((format.render_tree(&tree)?, removed))
}
