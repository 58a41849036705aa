//! Path resolution errors

use std::fmt;

use pom_model::ValueError;

/// Category of a [`PathError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathErrorKind {
    FieldNotFound,
    TypeMismatch,
    UnsupportedField,
}

impl PathErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathErrorKind::FieldNotFound => "field_not_found",
            PathErrorKind::TypeMismatch => "type_mismatch",
            PathErrorKind::UnsupportedField => "unsupported_field",
        }
    }
}

impl fmt::Display for PathErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path could not be resolved against a descriptor.
///
/// Each variant carries the path prefix up to the offending segment.
/// Absence of a value is not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("can't find descriptor field '{0}'")]
    FieldNotFound(String),

    #[error("list elements are not of the type named by '{0}'")]
    TypeMismatch(String),

    #[error("unsupported value for '{path}': {reason}")]
    UnsupportedField {
        path: String,
        #[source]
        reason: ValueError,
    },
}

impl PathError {
    pub fn kind(&self) -> PathErrorKind {
        match self {
            PathError::FieldNotFound(_) => PathErrorKind::FieldNotFound,
            PathError::TypeMismatch(_) => PathErrorKind::TypeMismatch,
            PathError::UnsupportedField { .. } => PathErrorKind::UnsupportedField,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            PathError::FieldNotFound(path) | PathError::TypeMismatch(path) => path,
            PathError::UnsupportedField { path, .. } => path,
        }
    }
}
