//! Project descriptor model
//!
//! Record types for project descriptors, the field-handle capability used to
//! address any field by name, and the source-dominant hierarchical merge.
//!
//! Fields are never discovered at runtime: every record type maps its
//! (case-folded) field names to typed handles with a `match`, and every
//! element type knows how to copy itself into and out of a [`Value`].

mod field;
mod merge;
mod model;
mod value;

pub use field::{Element, Field, FieldMut, Record, Sequence, Slot, Table};
pub use merge::Merge;
pub use model::{
    Build, Dependency, Developer, Exclusion, License, Organization, Parent, Plugin,
    Prerequisites, Profile, Project, Repository, Scm,
};
pub use value::{Node, Value, ValueError};
