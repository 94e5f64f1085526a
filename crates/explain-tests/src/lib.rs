#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod integration;
pub mod utils;

/// Directory holding the captured explain documents.
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Copy a named fixture into `dir`, returning the copy's path.
fn stage_fixture(dir: &Path, name: &str) -> PathBuf {
    let target = dir.join(name);
    fs::copy(fixtures_dir().join(name), &target).expect("copy fixture");
    target
}
