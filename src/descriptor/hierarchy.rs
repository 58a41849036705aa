//! Parent chain discovery and display

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Descriptor, DescriptorError};

/// File looked up when a parent location names a directory
pub const DEFAULT_DESCRIPTOR_NAME: &str = "project.toml";

/// Parent location when `parent` has no `relativePath`
pub const DEFAULT_PARENT_PATH: &str = "..";

const TAB: usize = 4;

/// A descriptor and its ancestors, root ancestor first
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    levels: Vec<Descriptor>,
}

impl Hierarchy {
    /// Load `path` and follow `parent/relativePath` upwards.
    ///
    /// A parent without `relativePath` is looked up in the directory above.
    /// Stops at the first level without a parent or whose parent file does
    /// not exist.
    pub fn discover(path: &Path) -> Result<Self, DescriptorError> {
        let mut levels = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(path.to_path_buf());

        while let Some(file) = next.take() {
            let canonical = fs::canonicalize(&file).map_err(|source| DescriptorError::Io {
                path: file.clone(),
                source,
            })?;
            if !visited.insert(canonical) {
                return Err(DescriptorError::ParentCycle(file));
            }

            let descriptor = Descriptor::from_file(&file)?;
            next = parent_location(&descriptor);
            levels.push(descriptor);
        }

        levels.reverse();
        Ok(Self { levels })
    }

    /// Use already loaded levels, root ancestor first
    pub fn from_levels(levels: Vec<Descriptor>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[Descriptor] {
        &self.levels
    }

    pub fn into_levels(self) -> Vec<Descriptor> {
        self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

fn parent_location(descriptor: &Descriptor) -> Option<PathBuf> {
    let relative = descriptor
        .project()
        .parent
        .as_ref()?
        .relative_path
        .as_deref()
        .unwrap_or(DEFAULT_PARENT_PATH);
    let base = descriptor.source()?.parent()?;

    let mut candidate = base.join(relative);
    if candidate.is_dir() {
        candidate = candidate.join(DEFAULT_DESCRIPTOR_NAME);
    }
    if candidate.is_file() {
        Some(candidate)
    } else {
        debug!(path = %candidate.display(), "Parent descriptor not found");
        None
    }
}

/// Draw the hierarchy as an indented tree, one entry per line.
///
/// The last `merged` levels are the ones being merged: levels after the
/// first of them get solid connectors, everything before dotted ones.
pub fn render_hierarchy(levels: &[Descriptor], merged: usize) -> Vec<String> {
    let first_merged = levels.len().saturating_sub(merged);
    let mut lines = Vec::with_capacity(levels.len() * 2);

    for (i, level) in levels.iter().enumerate() {
        if i == 0 {
            lines.push(level.display_name());
            continue;
        }
        let inset = " ".repeat(i * TAB);
        let (bar, elbow) = if i > first_merged {
            ('\u{2503}', "\u{2517}\u{2501}")
        } else {
            ('\u{2506}', "\u{2570}\u{2504}")
        };
        lines.push(format!("{}{}", inset, bar));
        lines.push(format!("{}{}{}", inset, elbow, level.display_name()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pom_model::Project;
    use std::fs;
    use tempfile::TempDir;

    fn named(artifact: &str) -> Descriptor {
        Descriptor::new(Project {
            group_id: Some("g".to_string()),
            artifact_id: Some(artifact.to_string()),
            version: Some("1".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_discover_follows_relative_path() {
        let dir = TempDir::new().unwrap();
        let module = dir.path().join("module");
        fs::create_dir(&module).unwrap();
        fs::write(dir.path().join("project.toml"), "artifactId = \"root\"\n").unwrap();
        fs::write(
            module.join("project.toml"),
            "artifactId = \"module\"\n[parent]\nrelativePath = \"..\"\n",
        )
        .unwrap();

        let hierarchy = Hierarchy::discover(&module.join("project.toml")).unwrap();
        let artifacts: Vec<&str> = hierarchy
            .levels()
            .iter()
            .filter_map(|d| d.project().artifact_id.as_deref())
            .collect();
        assert_eq!(artifacts, vec!["root", "module"]);
    }

    #[test]
    fn test_discover_defaults_parent_to_directory_above() {
        let dir = TempDir::new().unwrap();
        let module = dir.path().join("module");
        fs::create_dir(&module).unwrap();
        fs::write(dir.path().join("project.toml"), "artifactId = \"root\"\n").unwrap();
        fs::write(
            module.join("project.toml"),
            "artifactId = \"module\"\n[parent]\nartifactId = \"root\"\n",
        )
        .unwrap();

        let hierarchy = Hierarchy::discover(&module.join("project.toml")).unwrap();
        assert_eq!(hierarchy.len(), 2);
        assert_eq!(
            hierarchy.levels()[0].project().artifact_id.as_deref(),
            Some("root")
        );
    }

    #[test]
    fn test_discover_without_parent_is_single_level() {
        let dir = TempDir::new().unwrap();
        let module = dir.path().join("module");
        fs::create_dir(&module).unwrap();
        fs::write(dir.path().join("project.toml"), "artifactId = \"root\"\n").unwrap();
        fs::write(module.join("project.toml"), "artifactId = \"module\"\n").unwrap();

        let hierarchy = Hierarchy::discover(&module.join("project.toml")).unwrap();
        assert_eq!(hierarchy.len(), 1);
    }

    #[test]
    fn test_discover_stops_at_missing_parent() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("project.toml");
        fs::write(&file, "[parent]\nartifactId = \"corp\"\nrelativePath = \"../nowhere\"\n").unwrap();

        let hierarchy = Hierarchy::discover(&file).unwrap();
        assert_eq!(hierarchy.len(), 1);
    }

    #[test]
    fn test_discover_detects_cycle() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("project.toml");
        fs::write(&file, "[parent]\nrelativePath = \"project.toml\"\n").unwrap();

        let err = Hierarchy::discover(&file).unwrap_err();
        assert!(matches!(err, DescriptorError::ParentCycle(_)));
    }

    #[test]
    fn test_render_hierarchy_connectors() {
        let levels = vec![named("a"), named("b"), named("c")];
        let lines = render_hierarchy(&levels, 2);

        assert_eq!(
            lines,
            vec![
                "g:a:<inherited>:1".to_string(),
                "    \u{2506}".to_string(),
                "    \u{2570}\u{2504}g:b:<inherited>:1".to_string(),
                "        \u{2503}".to_string(),
                "        \u{2517}\u{2501}g:c:<inherited>:1".to_string(),
            ]
        );
    }
}
