//! Project descriptors
//!
//! A [`Descriptor`] owns one parsed project document together with where it
//! was loaded from and the state snapshot taken from it.

mod format;
mod hierarchy;

use std::fs;
use std::path::{Path, PathBuf};

use pom_model::{Dependency, Merge, Project, Value};
use tracing::debug;

use crate::dedup;
use crate::path::{self, DescriptorPath, PathError};
use crate::pattern::DependencyFilter;
use crate::snapshot::Snapshot;

pub use format::{dedup_text, toml_to_json, DescriptorFormat};
pub use hierarchy::{render_hierarchy, Hierarchy, DEFAULT_DESCRIPTOR_NAME};

/// Placeholder for identity parts a descriptor inherits
const INHERITED: &str = "<inherited>";

/// A project descriptor document
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    project: Project,
    source: Option<PathBuf>,
    saved: Snapshot,
}

impl Descriptor {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            source: None,
            saved: Snapshot::default(),
        }
    }

    /// Load from a file, picking the format from its extension
    pub fn from_file(path: &Path) -> Result<Self, DescriptorError> {
        let format = DescriptorFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut descriptor = Self::parse(&text, format)?;
        descriptor.source = Some(path.to_path_buf());
        debug!(path = %path.display(), %format, "Loaded descriptor");
        Ok(descriptor)
    }

    pub fn parse(text: &str, format: DescriptorFormat) -> Result<Self, DescriptorError> {
        let project = match format {
            DescriptorFormat::Toml => toml::from_str(text)?,
            DescriptorFormat::Json => serde_json::from_str(text)?,
        };
        Ok(Self::new(project))
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// File this descriptor was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    // =========================================================================
    // Path access
    // =========================================================================

    /// Deep copy of the value at `path`; `None` when absent
    pub fn get(&self, path: &str) -> Result<Option<Value>, PathError> {
        path::get(&self.project, &DescriptorPath::new(path))
    }

    /// Write a value at `path`. Returns false when an intermediate is absent.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<bool, PathError> {
        let value = value.into();
        path::set(&mut self.project, &DescriptorPath::new(path), Some(&value))
    }

    /// Clear the value at `path`
    pub fn remove(&mut self, path: &str) -> Result<bool, PathError> {
        path::remove(&mut self.project, &DescriptorPath::new(path))
    }

    // =========================================================================
    // State snapshot
    // =========================================================================

    /// Capture the values at `paths`, replacing any earlier snapshot
    pub fn save_state<I, P>(&mut self, paths: I) -> Result<(), PathError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        self.saved = Snapshot::capture(&self.project, paths)?;
        Ok(())
    }

    pub fn saved_state(&self) -> &Snapshot {
        &self.saved
    }

    /// Write this descriptor's own snapshot back onto it
    pub fn restore_state(&mut self) -> Result<(), PathError> {
        self.saved.restore(&mut self.project)
    }

    /// Write the snapshot held by `other` onto this descriptor
    pub fn restore_state_from(&mut self, other: &Descriptor) -> Result<(), PathError> {
        other.saved.restore(&mut self.project)
    }

    // =========================================================================
    // Whole-document operations
    // =========================================================================

    /// Merge `other` into this descriptor, `other` dominant
    pub fn merge(&mut self, other: &Descriptor) -> &mut Self {
        self.project.merge_from(&other.project);
        self
    }

    /// Remove the dependencies any pattern of `filter` matches, returning them
    pub fn remove_dependencies(&mut self, filter: &DependencyFilter) -> Vec<Dependency> {
        let dependencies = std::mem::take(&mut self.project.dependencies);
        let (kept, removed) = filter.partition(dependencies);
        self.project.dependencies = kept;
        removed
    }

    /// `group:artifact:name:version`, inherited parts shown as `<inherited>`
    pub fn display_name(&self) -> String {
        let p = &self.project;
        [&p.group_id, &p.artifact_id, &p.name, &p.version]
            .iter()
            .map(|part| part.as_deref().unwrap_or(INHERITED))
            .collect::<Vec<_>>()
            .join(":")
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// The generic tree this descriptor serializes to
    pub fn to_tree(&self) -> Result<serde_json::Value, DescriptorError> {
        Ok(serde_json::to_value(&self.project)?)
    }

    /// Render as text, optionally removing duplicate siblings first
    pub fn to_text(
        &self,
        format: DescriptorFormat,
        remove_duplicates: bool,
    ) -> Result<String, DescriptorError> {
        let mut tree = self.to_tree()?;
        if remove_duplicates {
            dedup::remove_duplicate_siblings(&mut tree);
        }
        format.render_tree(&tree)
    }
}

impl From<Project> for Descriptor {
    fn from(project: Project) -> Self {
        Self::new(project)
    }
}

/// Descriptor loading and rendering errors
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported descriptor format '{0}' (expected toml or json)")]
    UnsupportedFormat(String),

    #[error("Parent cycle detected at {}", .0.display())]
    ParentCycle(PathBuf),
}
