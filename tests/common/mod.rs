//! Shared helpers for catalog integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use walkdir::WalkDir;

pub const FIXTURE_PROJECT: &str = "tests/fixtures/RockProject";

/// Copy the fixture project into a fresh temporary directory. The project
/// root keeps the name `RockProject`.
pub fn copy_project() -> anyhow::Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let root = dir.path().join("RockProject");
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_PROJECT);

    for entry in WalkDir::new(&fixture) {
        let entry = entry?;
        let target = root.join(entry.path().strip_prefix(&fixture)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok((dir, root))
}

/// Write a file below `root`, creating parent directories
pub fn write(root: &Path, relative: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write a minimal `.meta` sidecar carrying `guid`
pub fn write_sidecar(root: &Path, relative: &str, guid: &str) -> anyhow::Result<PathBuf> {
    write(
        root,
        &format!("{}.meta", relative),
        &format!("fileFormatVersion: 2\nguid: {}\nDefaultImporter:\n  userData:\n", guid),
    )
}

pub fn modified(path: &Path) -> anyhow::Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

pub fn set_modified(path: &Path, time: SystemTime) -> anyhow::Result<()> {
    fs::File::options().write(true).open(path)?.set_modified(time)?;
    Ok(())
}

/// Move the modification time of `path` forward
pub fn touch_later(path: &Path, seconds: u64) -> anyhow::Result<()> {
    let later = modified(path)? + Duration::from_secs(seconds);
    set_modified(path, later)
}
