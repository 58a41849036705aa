//! Owned values exchanged with a descriptor by path

use std::collections::BTreeMap;

use serde::Serialize;

use crate::field::Record;
use crate::model::{
    Build, Dependency, Developer, Exclusion, License, Organization, Parent, Plugin,
    Prerequisites, Profile, Project, Repository, Scm,
};

/// A deep copy of whatever a path designates.
///
/// Values never alias the document they were read from, so the same value
/// can be written to several places without further copying.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    Record(Node),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the value's shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Record(node) => node.type_name(),
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Record(node) => Some(node),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Record(node)
    }
}

/// An owned record of any descriptor type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Project(Box<Project>),
    Parent(Box<Parent>),
    Prerequisites(Box<Prerequisites>),
    Organization(Box<Organization>),
    License(Box<License>),
    Developer(Box<Developer>),
    Scm(Box<Scm>),
    Dependency(Box<Dependency>),
    Exclusion(Box<Exclusion>),
    Repository(Box<Repository>),
    Build(Box<Build>),
    Plugin(Box<Plugin>),
    Profile(Box<Profile>),
}

impl Node {
    /// Borrow the record behind this node
    pub fn as_record(&self) -> &dyn Record {
        match self {
            Node::Project(r) => r.as_ref(),
            Node::Parent(r) => r.as_ref(),
            Node::Prerequisites(r) => r.as_ref(),
            Node::Organization(r) => r.as_ref(),
            Node::License(r) => r.as_ref(),
            Node::Developer(r) => r.as_ref(),
            Node::Scm(r) => r.as_ref(),
            Node::Dependency(r) => r.as_ref(),
            Node::Exclusion(r) => r.as_ref(),
            Node::Repository(r) => r.as_ref(),
            Node::Build(r) => r.as_ref(),
            Node::Plugin(r) => r.as_ref(),
            Node::Profile(r) => r.as_ref(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.as_record().type_name()
    }
}

/// A value did not have the shape the target field requires
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct ValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ValueError {
    pub fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::from("x").kind(), "scalar");
        assert_eq!(Value::from(vec!["a", "b"]).kind(), "list");
        assert_eq!(Value::Map(BTreeMap::new()).kind(), "map");

        let node = Node::Parent(Box::new(Parent::default()));
        assert_eq!(Value::from(node).kind(), "Parent");
    }

    #[test]
    fn test_untagged_serialization() {
        let parent = Parent {
            artifact_id: Some("base".to_string()),
            ..Default::default()
        };
        let value = Value::List(vec![
            Value::from("text"),
            Value::Record(Node::Parent(Box::new(parent))),
        ]);

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!(["text", {"artifactId": "base"}]));
    }

    #[test]
    fn test_value_error_message() {
        let err = ValueError::new("Parent", &Value::from("oops"));
        assert_eq!(err.to_string(), "expected Parent, found scalar");
    }
}
