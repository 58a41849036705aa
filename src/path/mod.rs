//! Descriptor paths
//!
//! A path is a `/`-separated list of field names such as
//! `build/plugins/plugin/version`. Field names match case-insensitively; a
//! segment that follows a map field is a literal key
//! (`properties/java.version`).

mod error;
mod resolve;

use std::fmt;

pub use error::{PathError, PathErrorKind};
pub use resolve::{get, remove, set};

/// One segment of a [`DescriptorPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    raw: String,
    folded: String,
}

impl Segment {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            folded: raw.to_ascii_lowercase(),
        }
    }

    /// Segment text as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// ASCII-lowercased text used for field lookup
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Whether this segment names elements of `element_type`.
    ///
    /// The segment only has to match the end of the type name, ignoring
    /// case: `plugin` and `Plugin` both address `Plugin` entries.
    pub(crate) fn names_element(&self, element_type: &str) -> bool {
        element_type.to_ascii_lowercase().ends_with(&self.folded)
    }
}

/// A parsed path into a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorPath {
    text: String,
    segments: Vec<Segment>,
}

impl DescriptorPath {
    /// Parse a path; surrounding whitespace is ignored
    pub fn new(path: &str) -> Self {
        let text = path.trim();
        Self {
            text: text.to_string(),
            segments: text.split('/').map(Segment::new).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Never empty: an empty path has one empty segment
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path text up to and including segment `index`
    pub fn prefix(&self, index: usize) -> String {
        let end = (index + 1).min(self.segments.len());
        self.segments[..end]
            .iter()
            .map(Segment::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl From<&str> for DescriptorPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for DescriptorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_splits() {
        let path = DescriptorPath::new("  build/Plugins/plugin ");
        assert_eq!(path.as_str(), "build/Plugins/plugin");

        let folded: Vec<&str> = path.segments().iter().map(Segment::folded).collect();
        assert_eq!(folded, vec!["build", "plugins", "plugin"]);
        assert_eq!(path.segments()[1].as_str(), "Plugins");
    }

    #[test]
    fn test_prefix() {
        let path = DescriptorPath::new("parent/version");
        assert_eq!(path.prefix(0), "parent");
        assert_eq!(path.prefix(1), "parent/version");
        assert_eq!(path.prefix(5), "parent/version");
    }

    #[test]
    fn test_empty_path_has_one_segment() {
        let path = DescriptorPath::new("   ");
        assert_eq!(path.segments().len(), 1);
        assert_eq!(path.segments()[0].as_str(), "");
    }

    #[test]
    fn test_names_element_is_suffix_match() {
        let segment = Segment::new("Dependency");
        assert!(segment.names_element("Dependency"));

        let short = Segment::new("plugin");
        assert!(short.names_element("Plugin"));
        assert!(!short.names_element("Profile"));

        assert!(!Segment::new("module").names_element("String"));
    }
}
