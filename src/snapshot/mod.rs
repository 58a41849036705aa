//! Path-addressed state snapshots
//!
//! A snapshot records the values at a set of paths so they can be written
//! back after the descriptor has been changed, or onto another descriptor.

use pom_model::{Record, Value};
use tracing::debug;

use crate::path::{self, DescriptorPath, PathError};

/// Captured path values in capture order.
///
/// Absent values are captured too and restore as a clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(DescriptorPath, Option<Value>)>,
}

impl Snapshot {
    /// Read every path from `root`.
    ///
    /// A path listed twice keeps its first position and the later read.
    pub fn capture<I, P>(root: &dyn Record, paths: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut snapshot = Snapshot::default();
        for path in paths {
            let path = DescriptorPath::new(path.as_ref());
            let value = path::get(root, &path)?;
            debug!(path = %path, captured = value.is_some(), "Saving path state");
            snapshot.insert(path, value);
        }
        Ok(snapshot)
    }

    fn insert(&mut self, path: DescriptorPath, value: Option<Value>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == path) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((path, value)),
        }
    }

    /// Write every captured value onto `target`, in capture order.
    ///
    /// Paths whose intermediates are absent in `target` are skipped.
    pub fn restore(&self, target: &mut dyn Record) -> Result<(), PathError> {
        for (path, value) in &self.entries {
            if !path::set(target, path, value.as_ref())? {
                debug!(path = %path, "Restore skipped, path not present in target");
            }
        }
        Ok(())
    }

    /// Captured value for a path; `None` if not captured or captured absent
    pub fn get(&self, path: &str) -> Option<&Value> {
        let path = DescriptorPath::new(path);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == path)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn contains(&self, path: &str) -> bool {
        let path = DescriptorPath::new(path);
        self.entries.iter().any(|(existing, _)| *existing == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &DescriptorPath> {
        self.entries.iter().map(|(path, _)| path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pom_model::{Developer, Parent, Project};

    fn project() -> Project {
        Project {
            version: Some("1.0".to_string()),
            parent: Some(Parent {
                version: Some("7".to_string()),
                ..Default::default()
            }),
            modules: vec!["core".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_capture_and_restore() {
        let mut project = project();
        let snapshot = Snapshot::capture(&project, ["version", "modules"]).unwrap();
        assert_eq!(snapshot.get("version"), Some(&Value::from("1.0")));

        project.version = Some("2.0".to_string());
        project.modules.push("cli".to_string());
        snapshot.restore(&mut project).unwrap();

        assert_eq!(project.version.as_deref(), Some("1.0"));
        assert_eq!(project.modules, vec!["core"]);
    }

    #[test]
    fn test_absence_restores_as_clear() {
        let mut project = project();
        let snapshot = Snapshot::capture(&project, ["url"]).unwrap();
        assert!(snapshot.contains("url"));
        assert_eq!(snapshot.get("url"), None);

        project.url = Some("https://example.org".to_string());
        snapshot.restore(&mut project).unwrap();
        assert!(project.url.is_none());
    }

    #[test]
    fn test_repeated_path_keeps_first_position() {
        let project = project();
        let snapshot = Snapshot::capture(&project, ["version", "modules", "version"]).unwrap();
        let paths: Vec<&str> = snapshot.paths().map(DescriptorPath::as_str).collect();
        assert_eq!(paths, vec!["version", "modules"]);
    }

    #[test]
    fn test_overlapping_paths_replay_in_order() {
        let mut project = project();
        let snapshot = Snapshot::capture(&project, ["parent", "parent/version"]).unwrap();

        project.parent = Some(Parent {
            version: Some("8".to_string()),
            artifact_id: Some("other".to_string()),
            ..Default::default()
        });
        snapshot.restore(&mut project).unwrap();

        let parent = project.parent.unwrap();
        assert_eq!(parent.version.as_deref(), Some("7"));
        assert!(parent.artifact_id.is_none());
    }

    #[test]
    fn test_restore_onto_other_record() {
        let source = Project {
            developers: vec![Developer {
                email: Some("lead@acme.org".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let snapshot = Snapshot::capture(&source, ["developers/developer/email"]).unwrap();

        let mut target = Project {
            developers: vec![Developer::default(), Developer::default()],
            ..Default::default()
        };
        snapshot.restore(&mut target).unwrap();
        assert!(target
            .developers
            .iter()
            .all(|d| d.email.as_deref() == Some("lead@acme.org")));
    }

    #[test]
    fn test_capture_propagates_path_errors() {
        let project = project();
        let err = Snapshot::capture(&project, ["nonexistent"]).unwrap_err();
        assert_eq!(err.path(), "nonexistent");
    }
}
