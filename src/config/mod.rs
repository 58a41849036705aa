//! Flatten configuration
//!
//! Implements the 3-layer configuration merge:
//! 1. Built-in defaults
//! 2. Config file (uber-pom.toml)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, FlattenConfig, DEFAULT_CONFIG_FILE,
};
pub use merge::{deep_merge, merge_layers};
