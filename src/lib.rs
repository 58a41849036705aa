//! uber-pom - project descriptor flattening
//!
//! Reads a project descriptor together with its parent descriptors and
//! merges them into one self-contained descriptor. Values inside a
//! descriptor are addressed by `/`-separated paths, which the flatten run
//! uses to freeze, remove and assign parts of the result.

pub mod config;
pub mod dedup;
pub mod descriptor;
pub mod flatten;
pub mod path;
pub mod pattern;
pub mod snapshot;

pub use config::{ConfigError, EffectiveConfig, FlattenConfig};
pub use descriptor::{Descriptor, DescriptorError, DescriptorFormat, Hierarchy};
pub use flatten::{flatten, FlattenError, FlattenReport, Removal};
pub use path::{DescriptorPath, PathError, PathErrorKind};
pub use pattern::{DependencyFilter, DependencyPattern, PatternError};
pub use snapshot::Snapshot;

pub use pom_model::{Project, Value};
