//! Descriptor record types
//!
//! Serialized names are camelCase and double as path segment names, so
//! `dependencies/dependency/groupId` reads the same as the file it came from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::{is_unset, AsField, Element, Field, FieldMut, Record};
use crate::merge::{join_key, Merge};
use crate::value::{Node, Value, ValueError};

/// Declare a record type together with its field table, element conversions
/// and merge.
///
/// Each field is listed with the folded name it answers to. An optional
/// `key = [...]` names the scalar fields that identify an entry when lists of
/// this record are merged.
macro_rules! record {
    (
        $(#[$meta:meta])*
        $ty:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $fty:ty => $key:literal
            ),* $(,)?
        }
        $(key = [$($kf:ident),+])?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $ty {
            $(
                $(#[$fmeta])*
                #[serde(skip_serializing_if = "is_unset")]
                pub $field: $fty,
            )*
        }

        impl Record for $ty {
            fn type_name(&self) -> &'static str {
                <Self as Element>::TYPE_NAME
            }

            fn field(&self, name: &str) -> Option<Field<'_>> {
                match name {
                    $($key => Some(self.$field.as_field()),)*
                    _ => None,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
                match name {
                    $($key => Some(self.$field.as_field_mut()),)*
                    _ => None,
                }
            }
        }

        impl Element for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn to_value(&self) -> Value {
                Value::Record(Node::from(self.clone()))
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Record(Node::$ty(inner)) => Ok(*inner),
                    other => Err(ValueError::new(Self::TYPE_NAME, &other)),
                }
            }

            fn as_record(&self) -> Option<&dyn Record> {
                Some(self)
            }

            fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
                Some(self)
            }
        }

        impl From<$ty> for Node {
            fn from(record: $ty) -> Self {
                Node::$ty(Box::new(record))
            }
        }

        impl Merge for $ty {
            fn merge_from(&mut self, source: &Self) {
                $(self.$field.merge_from(&source.$field);)*
            }

            fn merge_key(&self) -> Option<String> {
                join_key(&[$($(&self.$kf),+)?])
            }
        }
    };
}

record! {
    /// Root of a project descriptor
    Project {
        model_version: Option<String> => "modelversion",
        group_id: Option<String> => "groupid",
        artifact_id: Option<String> => "artifactid",
        version: Option<String> => "version",
        packaging: Option<String> => "packaging",
        name: Option<String> => "name",
        description: Option<String> => "description",
        url: Option<String> => "url",
        inception_year: Option<String> => "inceptionyear",
        /// Descriptor this one inherits from
        parent: Option<Parent> => "parent",
        prerequisites: Option<Prerequisites> => "prerequisites",
        organization: Option<Organization> => "organization",
        licenses: Vec<License> => "licenses",
        developers: Vec<Developer> => "developers",
        /// Sub-project directories
        modules: Vec<String> => "modules",
        properties: BTreeMap<String, String> => "properties",
        dependencies: Vec<Dependency> => "dependencies",
        scm: Option<Scm> => "scm",
        /// Artifact repositories keyed by repository id
        repositories: BTreeMap<String, Repository> => "repositories",
        build: Option<Build> => "build",
        profiles: Vec<Profile> => "profiles",
    }
}

record! {
    Parent {
        group_id: Option<String> => "groupid",
        artifact_id: Option<String> => "artifactid",
        version: Option<String> => "version",
        /// Location of the parent descriptor, relative to this one
        relative_path: Option<String> => "relativepath",
    }
}

record! {
    Prerequisites {
        maven: Option<String> => "maven",
    }
}

record! {
    Organization {
        name: Option<String> => "name",
        url: Option<String> => "url",
    }
}

record! {
    License {
        name: Option<String> => "name",
        url: Option<String> => "url",
        distribution: Option<String> => "distribution",
        comments: Option<String> => "comments",
    }
    key = [name]
}

record! {
    Developer {
        id: Option<String> => "id",
        name: Option<String> => "name",
        email: Option<String> => "email",
        url: Option<String> => "url",
        organization: Option<String> => "organization",
        timezone: Option<String> => "timezone",
        roles: Vec<String> => "roles",
    }
    key = [id]
}

record! {
    Scm {
        connection: Option<String> => "connection",
        developer_connection: Option<String> => "developerconnection",
        url: Option<String> => "url",
        tag: Option<String> => "tag",
    }
}

record! {
    /// A dependency on another artifact
    Dependency {
        group_id: Option<String> => "groupid",
        artifact_id: Option<String> => "artifactid",
        version: Option<String> => "version",
        #[serde(rename = "type")]
        type_: Option<String> => "type",
        classifier: Option<String> => "classifier",
        scope: Option<String> => "scope",
        system_path: Option<String> => "systempath",
        optional: Option<String> => "optional",
        exclusions: Vec<Exclusion> => "exclusions",
    }
    key = [group_id, artifact_id, type_, classifier]
}

record! {
    Exclusion {
        group_id: Option<String> => "groupid",
        artifact_id: Option<String> => "artifactid",
    }
    key = [group_id, artifact_id]
}

record! {
    Repository {
        id: Option<String> => "id",
        name: Option<String> => "name",
        url: Option<String> => "url",
        layout: Option<String> => "layout",
    }
}

record! {
    Build {
        default_goal: Option<String> => "defaultgoal",
        directory: Option<String> => "directory",
        final_name: Option<String> => "finalname",
        source_directory: Option<String> => "sourcedirectory",
        plugins: Vec<Plugin> => "plugins",
    }
}

record! {
    Plugin {
        group_id: Option<String> => "groupid",
        artifact_id: Option<String> => "artifactid",
        version: Option<String> => "version",
        extensions: Option<String> => "extensions",
        inherited: Option<String> => "inherited",
        configuration: BTreeMap<String, String> => "configuration",
        dependencies: Vec<Dependency> => "dependencies",
    }
    key = [group_id, artifact_id]
}

record! {
    Profile {
        id: Option<String> => "id",
        modules: Vec<String> => "modules",
        properties: BTreeMap<String, String> => "properties",
        dependencies: Vec<Dependency> => "dependencies",
    }
    key = [id]
}

impl Dependency {
    /// `groupId:artifactId:version` with empty parts for unset fields
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}",
            self.group_id.as_deref().unwrap_or(""),
            self.artifact_id.as_deref().unwrap_or(""),
            self.version.as_deref().unwrap_or(""),
        )
    }
}
