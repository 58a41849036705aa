//! Hierarchy flattening
//!
//! Merges a descriptor hierarchy into one effective descriptor:
//! 1. Restrict the hierarchy to the configured depth
//! 2. Merge every level into the root-most one, freezing `keep` paths at the
//!    last merge
//! 3. Remove paths, then excluded dependencies, then apply assignments
//! 4. Render, optionally removing duplicate siblings

use pom_model::Dependency;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::FlattenConfig;
use crate::dedup;
use crate::descriptor::{render_hierarchy, Descriptor, DescriptorError, Hierarchy};
use crate::path::PathError;
use crate::pattern::{DependencyFilter, PatternError};

const REMOVE_PREFIX: &str = "Remove ";

/// Errors that can occur while flattening
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("can't set string value to '{key}': {source}")]
    Assignment {
        key: String,
        #[source]
        source: PathError,
    },

    #[error("no descriptors to flatten")]
    EmptyHierarchy,
}

impl FlattenError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            FlattenError::Path(_) | FlattenError::Assignment { .. } => 2,
            _ => 1,
        }
    }
}

/// Outcome of one configured removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub path: String,
    pub found: bool,
}

/// Result of a flatten run
#[derive(Debug, Clone)]
pub struct FlattenReport {
    /// The merged descriptor before duplicate removal
    pub descriptor: Descriptor,

    /// Rendered output in the configured format
    pub text: String,

    /// Number of levels merged, including the project itself
    pub merged_levels: usize,

    pub removals: Vec<Removal>,

    pub excluded_dependencies: Vec<Dependency>,

    /// Paths of removed duplicate elements
    pub duplicates: Vec<String>,
}

/// Flatten `hierarchy` according to `config`
pub fn flatten(hierarchy: Hierarchy, config: &FlattenConfig) -> Result<FlattenReport, FlattenError> {
    let mut levels = hierarchy.into_levels();
    if levels.is_empty() {
        return Err(FlattenError::EmptyHierarchy);
    }

    let selected = if config.depth < 0 {
        levels.len()
    } else {
        (config.depth as usize).saturating_add(1).min(levels.len())
    };

    info!(".........................................................");
    for line in render_hierarchy(&levels, selected) {
        info!("{}", line);
    }
    info!(".........................................................");

    let mut levels = levels.split_off(levels.len() - selected).into_iter();
    let Some(mut main) = levels.next() else {
        return Err(FlattenError::EmptyHierarchy);
    };
    let rest: Vec<Descriptor> = levels.collect();

    for (i, mut level) in rest.into_iter().enumerate() {
        let last = i + 2 == selected;
        if last && !config.keep.is_empty() {
            debug!(keep = ?config.keep, "Freezing state of paths for the result descriptor");
            level.save_state(&config.keep)?;
            for path in &config.keep {
                info!("Freezing path '{}' in the result descriptor", path);
            }

            debug!(level = %level.display_name(), "Merging last level");
            main.merge(&level);
            main.restore_state_from(&level)?;
        } else {
            debug!(level = %level.display_name(), "Merging level");
            main.merge(&level);
        }
    }

    let removals = apply_removals(&mut main, &config.remove)?;

    let filter = DependencyFilter::new(&config.exclude_dependencies)?;
    let excluded_dependencies = if filter.is_empty() {
        Vec::new()
    } else {
        let removed = main.remove_dependencies(&filter);
        for dependency in &removed {
            info!("Excluded dependency '{}'", dependency.coordinates());
        }
        removed
    };

    for (key, value) in &config.set {
        info!("Set value to path : '{}'='{}'", key, value);
        main.set(key, value.as_str())
            .map_err(|source| FlattenError::Assignment {
                key: key.clone(),
                source,
            })?;
    }

    let mut tree = main.to_tree()?;
    let duplicates = if config.remove_duplicates {
        warn!("Activated search and removing of duplicated sibling elements!");
        dedup::remove_duplicate_siblings(&mut tree)
    } else {
        debug!("Search and removing of duplicated sibling elements is OFF");
        Vec::new()
    };
    let text = config.format.render_tree(&tree)?;

    Ok(FlattenReport {
        descriptor: main,
        text,
        merged_levels: selected,
        removals,
        excluded_dependencies,
        duplicates,
    })
}

fn apply_removals(main: &mut Descriptor, paths: &[String]) -> Result<Vec<Removal>, PathError> {
    let width = REMOVE_PREFIX.len() + paths.iter().map(String::len).max().unwrap_or(0) + 12;
    let mut removals = Vec::with_capacity(paths.len());

    for path in paths {
        let prefix = format!("{}'{}'", REMOVE_PREFIX, path);
        let dots = ".".repeat(width.saturating_sub(prefix.len()));
        let found = match main.remove(path) {
            Ok(found) => found,
            Err(e) => {
                info!("{}{}ERROR", prefix, dots);
                return Err(e);
            }
        };
        info!("{}{}{}", prefix, dots, if found { "OK" } else { "NOT FOUND" });
        removals.push(Removal {
            path: path.clone(),
            found,
        });
    }
    Ok(removals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DescriptorFormat;
    use crate::pattern::DependencyPattern;

    fn level(text: &str) -> Descriptor {
        Descriptor::parse(text, DescriptorFormat::Toml).unwrap()
    }

    fn hierarchy() -> Hierarchy {
        Hierarchy::from_levels(vec![
            level("groupId = \"g\"\nversion = \"1\"\nmodules = [\"a\"]\n[[developers]]\nid = \"root\"\nemail = \"root@g\""),
            level("artifactId = \"mid\"\nmodules = [\"a\", \"b\"]"),
            level("artifactId = \"leaf\"\nmodules = [\"c\"]\n[[dependencies]]\ngroupId = \"com.acme.x\"\nartifactId = \"t\"\nscope = \"test\""),
        ])
    }

    #[test]
    fn test_flatten_whole_hierarchy() {
        let report = flatten(hierarchy(), &FlattenConfig::default()).unwrap();
        let project = report.descriptor.project();

        assert_eq!(report.merged_levels, 3);
        assert_eq!(project.group_id.as_deref(), Some("g"));
        assert_eq!(project.artifact_id.as_deref(), Some("leaf"));
        assert_eq!(project.modules, vec!["a", "a", "b", "c"]);
        assert!(report.duplicates.is_empty());
    }

    #[test]
    fn test_depth_limits_levels() {
        let config = FlattenConfig {
            depth: 1,
            ..Default::default()
        };
        let report = flatten(hierarchy(), &config).unwrap();

        assert_eq!(report.merged_levels, 2);
        assert!(report.descriptor.project().group_id.is_none());
        assert_eq!(report.descriptor.project().modules, vec!["a", "b", "c"]);

        let config = FlattenConfig {
            depth: 10,
            ..Default::default()
        };
        assert_eq!(flatten(hierarchy(), &config).unwrap().merged_levels, 3);
    }

    #[test]
    fn test_keep_freezes_project_values() {
        let config = FlattenConfig {
            keep: vec!["modules".to_string()],
            ..Default::default()
        };
        let report = flatten(hierarchy(), &config).unwrap();
        assert_eq!(report.descriptor.project().modules, vec!["c"]);
    }

    #[test]
    fn test_remove_exclude_and_set() {
        let config = FlattenConfig {
            remove: vec!["developers/developer/email".to_string(), "scm/url".to_string()],
            exclude_dependencies: vec![DependencyPattern {
                group_id: Some("com.acme.*".to_string()),
                scope: Some("test".to_string()),
                ..Default::default()
            }],
            set: [("properties/flattened".to_string(), "true".to_string())].into(),
            ..Default::default()
        };
        let report = flatten(hierarchy(), &config).unwrap();
        let project = report.descriptor.project();

        assert_eq!(
            report.removals,
            vec![
                Removal { path: "developers/developer/email".to_string(), found: true },
                Removal { path: "scm/url".to_string(), found: false },
            ]
        );
        assert!(project.developers[0].email.is_none());
        assert_eq!(report.excluded_dependencies.len(), 1);
        assert!(project.dependencies.is_empty());
        assert_eq!(project.properties["flattened"], "true");
    }

    #[test]
    fn test_dedup_output() {
        let config = FlattenConfig {
            remove_duplicates: true,
            ..Default::default()
        };
        let report = flatten(hierarchy(), &config).unwrap();

        assert_eq!(report.duplicates, vec!["modules[1]"]);
        let output = Descriptor::parse(&report.text, DescriptorFormat::Toml).unwrap();
        assert_eq!(output.project().modules, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bad_paths_fail() {
        let config = FlattenConfig {
            remove: vec!["nonexistent".to_string()],
            ..Default::default()
        };
        let err = flatten(hierarchy(), &config).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let config = FlattenConfig {
            set: [("pardent/version".to_string(), "1".to_string())].into(),
            ..Default::default()
        };
        let err = flatten(hierarchy(), &config).unwrap_err();
        assert!(matches!(err, FlattenError::Assignment { .. }));
        assert!(err.to_string().contains("pardent/version"));
    }

    #[test]
    fn test_empty_hierarchy() {
        let err = flatten(Hierarchy::default(), &FlattenConfig::default()).unwrap_err();
        assert!(matches!(err, FlattenError::EmptyHierarchy));
        assert_eq!(err.exit_code(), 1);
    }
}
