//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Ancestor levels to merge; -1 merges the whole hierarchy
    pub depth: i32,

    /// Remove duplicated sibling elements from the output (default: false)
    pub remove_duplicates: bool,

    /// Output format (default: "toml")
    pub format: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            depth: -1,
            remove_duplicates: false,
            format: "toml".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "depth": self.depth,
            "keep": [],
            "remove": [],
            "set": {},
            "exclude_dependencies": [],
            "remove_duplicates": self.remove_duplicates,
            "format": self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.depth, -1);
        assert!(!defaults.remove_duplicates);
        assert_eq!(defaults.format, "toml");
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["depth"], -1);
        assert_eq!(value["format"], "toml");
        assert!(value["keep"].as_array().unwrap().is_empty());
        assert!(value["set"].as_object().unwrap().is_empty());
    }
}
