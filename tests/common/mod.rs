//! Shared test utilities for ghstools integration tests.
//!
//! Synthetic buffers for every format live in [`builders`]; this module
//! holds scratch-directory helpers used by the tests that touch the
//! filesystem.

#![allow(dead_code)]

pub mod builders;

use std::fs;
use std::path::PathBuf;

/// Fresh, empty directory under the system temp dir, unique per test name
/// and process.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ghstools_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Names of the children of a directory node, in order.
pub fn child_names(node: &ghstools::UnpackNode) -> Vec<&str> {
    node.children().iter().map(|c| c.name.as_str()).collect()
}
