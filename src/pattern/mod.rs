//! Dependency exclusion patterns
//!
//! Each pattern field is a glob: `*` matches any run of characters, `?`
//! matches one character, everything else is literal. A field must match
//! the whole dependency value.

use pom_model::Dependency;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Pattern over the identifying fields of a dependency.
///
/// Unset fields are not consulted. A dependency matches when every set
/// field matches; a pattern with no set fields matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyPattern {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_path: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl DependencyPattern {
    fn fields(&self) -> [(DependencyField, Option<&str>); 8] {
        [
            (DependencyField::GroupId, self.group_id.as_deref()),
            (DependencyField::ArtifactId, self.artifact_id.as_deref()),
            (DependencyField::Version, self.version.as_deref()),
            (DependencyField::Scope, self.scope.as_deref()),
            (DependencyField::Optional, self.optional.as_deref()),
            (DependencyField::SystemPath, self.system_path.as_deref()),
            (DependencyField::Type, self.type_.as_deref()),
            (DependencyField::Classifier, self.classifier.as_deref()),
        ]
    }

    /// Number of set fields
    pub fn specified(&self) -> usize {
        self.fields().iter().filter(|(_, glob)| glob.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.specified() == 0
    }

    /// Compile the set fields into anchored regular expressions
    pub fn compile(&self) -> Result<DependencyMatcher, PatternError> {
        let mut fields = Vec::new();
        for (field, glob) in self.fields() {
            if let Some(glob) = glob {
                let regex = glob_to_regex(glob)
                    .map_err(|source| PatternError::InvalidGlob { field: field.as_str(), source })?;
                fields.push((field, regex));
            }
        }
        Ok(DependencyMatcher { fields })
    }

    /// One-off match; compiles on every call
    pub fn matches(&self, dependency: &Dependency) -> Result<bool, PatternError> {
        Ok(self.compile()?.matches(dependency))
    }
}

/// Dependency field a pattern can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyField {
    GroupId,
    ArtifactId,
    Version,
    Scope,
    Optional,
    SystemPath,
    Type,
    Classifier,
}

impl DependencyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyField::GroupId => "groupId",
            DependencyField::ArtifactId => "artifactId",
            DependencyField::Version => "version",
            DependencyField::Scope => "scope",
            DependencyField::Optional => "optional",
            DependencyField::SystemPath => "systemPath",
            DependencyField::Type => "type",
            DependencyField::Classifier => "classifier",
        }
    }

    fn value_of<'a>(&self, dependency: &'a Dependency) -> Option<&'a str> {
        let value = match self {
            DependencyField::GroupId => &dependency.group_id,
            DependencyField::ArtifactId => &dependency.artifact_id,
            DependencyField::Version => &dependency.version,
            DependencyField::Scope => &dependency.scope,
            DependencyField::Optional => &dependency.optional,
            DependencyField::SystemPath => &dependency.system_path,
            DependencyField::Type => &dependency.type_,
            DependencyField::Classifier => &dependency.classifier,
        };
        value.as_deref()
    }
}

/// A compiled [`DependencyPattern`]
#[derive(Debug, Clone)]
pub struct DependencyMatcher {
    fields: Vec<(DependencyField, Regex)>,
}

impl DependencyMatcher {
    pub fn matches(&self, dependency: &Dependency) -> bool {
        let matched = self
            .fields
            .iter()
            .filter(|(field, regex)| {
                field
                    .value_of(dependency)
                    .is_some_and(|value| regex.is_match(value))
            })
            .count();
        !self.fields.is_empty() && matched == self.fields.len()
    }
}

/// A set of patterns compiled once and matched many times
#[derive(Debug, Clone, Default)]
pub struct DependencyFilter {
    matchers: Vec<DependencyMatcher>,
}

impl DependencyFilter {
    pub fn new(patterns: &[DependencyPattern]) -> Result<Self, PatternError> {
        let matchers = patterns
            .iter()
            .map(DependencyPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// True when any pattern matches
    pub fn matches_any(&self, dependency: &Dependency) -> bool {
        self.matchers.iter().any(|m| m.matches(dependency))
    }

    /// Split into (kept, removed), each in original order
    pub fn partition(&self, dependencies: Vec<Dependency>) -> (Vec<Dependency>, Vec<Dependency>) {
        dependencies
            .into_iter()
            .partition(|dependency| !self.matches_any(dependency))
    }
}

/// Translate a glob into a regex that must match the whole input
pub fn glob_to_regex(glob: &str) -> Result<Regex, regex_lite::Error> {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push_str("^(?:");
    let mut buf = [0u8; 4];
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c => pattern.push_str(&regex_lite::escape(c.encode_utf8(&mut buf))),
        }
    }
    pattern.push_str(")$");
    Regex::new(&pattern)
}

/// Pattern compilation errors
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid {field} pattern: {source}")]
    InvalidGlob {
        field: &'static str,
        source: regex_lite::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(group: &str, artifact: &str, scope: Option<&str>) -> Dependency {
        Dependency {
            group_id: Some(group.to_string()),
            artifact_id: Some(artifact.to_string()),
            version: Some("1.0".to_string()),
            scope: scope.map(str::to_string),
            ..Default::default()
        }
    }

    fn acme_tests() -> DependencyPattern {
        DependencyPattern {
            group_id: Some("com.acme.*".to_string()),
            scope: Some("test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_glob_translation() {
        let regex = glob_to_regex("com.acme.*").unwrap();
        assert!(regex.is_match("com.acme.util"));
        assert!(!regex.is_match("comXacme.util"), "dots are literal");
        assert!(!regex.is_match("org.com.acme.util"), "anchored at start");

        let regex = glob_to_regex("lib-?").unwrap();
        assert!(regex.is_match("lib-a"));
        assert!(!regex.is_match("lib-ab"), "anchored at end");

        let regex = glob_to_regex("a+b(c)[d]").unwrap();
        assert!(regex.is_match("a+b(c)[d]"));
    }

    #[test]
    fn test_every_set_field_must_match() {
        let pattern = acme_tests().compile().unwrap();

        assert!(pattern.matches(&dep("com.acme.util", "x", Some("test"))));
        assert!(!pattern.matches(&dep("com.acme.util", "x", Some("compile"))));
        assert!(!pattern.matches(&dep("com.acme.util", "x", None)), "absent value fails");
        assert!(!pattern.matches(&dep("org.other", "x", Some("test"))));
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let pattern = DependencyPattern::default();
        assert!(pattern.is_empty());
        assert!(!pattern.matches(&dep("g", "a", None)).unwrap());
        assert!(!pattern.matches(&Dependency::default()).unwrap());
    }

    #[test]
    fn test_filter_partition_preserves_order() {
        let filter = DependencyFilter::new(&[acme_tests()]).unwrap();
        let deps = vec![
            dep("com.acme.a", "a", Some("test")),
            dep("org.keep", "k1", None),
            dep("com.acme.b", "b", Some("test")),
            dep("org.keep", "k2", Some("test")),
        ];

        let (kept, removed) = filter.partition(deps);
        let kept: Vec<&str> = kept.iter().filter_map(|d| d.artifact_id.as_deref()).collect();
        let removed: Vec<&str> = removed.iter().filter_map(|d| d.artifact_id.as_deref()).collect();
        assert_eq!(kept, vec!["k1", "k2"]);
        assert_eq!(removed, vec!["a", "b"]);
    }

    #[test]
    fn test_pattern_deserializes_camel_case() {
        let pattern: DependencyPattern =
            toml::from_str("groupId = \"org.*\"\ntype = \"war\"\nsystemPath = \"/opt/*\"").unwrap();
        assert_eq!(pattern.group_id.as_deref(), Some("org.*"));
        assert_eq!(pattern.type_.as_deref(), Some("war"));
        assert_eq!(pattern.system_path.as_deref(), Some("/opt/*"));
        assert_eq!(pattern.specified(), 3);
    }
}
