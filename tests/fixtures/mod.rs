//! Fixture descriptors for integration tests
//!
//! `three_levels/` holds a root descriptor, a module inheriting from it and
//! an application inheriting from the module, linked by `relativePath`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use uber_pom::{Descriptor, Hierarchy};

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

/// Root ancestor of the three-level hierarchy
pub fn root_path() -> PathBuf {
    fixture("three_levels/project.toml")
}

pub fn module_path() -> PathBuf {
    fixture("three_levels/module/project.toml")
}

/// Leaf project of the three-level hierarchy
pub fn app_path() -> PathBuf {
    fixture("three_levels/module/app/project.toml")
}

/// The three levels loaded individually, root first
pub fn load_levels() -> (Descriptor, Descriptor, Descriptor) {
    (
        Descriptor::from_file(&root_path()).expect("root fixture"),
        Descriptor::from_file(&module_path()).expect("module fixture"),
        Descriptor::from_file(&app_path()).expect("app fixture"),
    )
}

pub fn discover() -> Hierarchy {
    Hierarchy::discover(&app_path()).expect("fixture hierarchy")
}
