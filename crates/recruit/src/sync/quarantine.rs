//! Relocation of disqualified candidates
//!
//! Runs against local state only. A record flagged `"disqualified": true`
//! in its baseline is copied into the destination directory (overwriting
//! same-named files, keeping others) and then removed from the collection.

use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::storage::{RecordDir, files};

/// Move every disqualified candidate out of `<base_dir>/candidates/`
///
/// Returns the number of records moved. A record that cannot be read or
/// moved is logged and left in place.
pub fn move_disqualified_candidates(base_dir: &Path, move_to: &Path) -> Result<usize> {
    info!(
        "Moving disqualified candidates from {} to {}",
        base_dir.display(),
        move_to.display()
    );

    let candidates_dir = base_dir.join(files::CANDIDATES_DIR);
    if !candidates_dir.is_dir() {
        info!("No candidates directory found");
        return Ok(0);
    }

    fs::create_dir_all(move_to)
        .with_context(|| format!("Failed to create directory {}", move_to.display()))?;

    let mut names: Vec<_> = fs::read_dir(&candidates_dir)
        .with_context(|| format!("Failed to read {}", candidates_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.file_name())
        .collect();
    names.sort();

    let mut moved = 0;
    for name in names {
        let display = name.to_string_lossy();
        match relocate_if_disqualified(&candidates_dir.join(&name), &move_to.join(&name)) {
            Ok(true) => {
                info!("Moved disqualified candidate: {}", display);
                moved += 1;
            }
            Ok(false) => {}
            Err(e) => warn!("Failed to process candidate {}: {:#}", display, e),
        }
    }

    info!("Moved {} disqualified candidates", moved);
    Ok(moved)
}

fn relocate_if_disqualified(source: &Path, destination: &Path) -> Result<bool> {
    let metadata: Value = RecordDir::open(source)?.read_json(files::CANDIDATE_INDEX)?;
    if metadata.get("disqualified") != Some(&Value::Bool(true)) {
        return Ok(false);
    }

    RecordDir::open(destination)?;
    copy_contents(source, destination)?;
    fs::remove_dir_all(source)
        .with_context(|| format!("Failed to remove {}", source.display()))?;

    Ok(true)
}

/// Copy everything under `source` into `destination`, replacing same-named files
fn copy_contents(source: &Path, destination: &Path) -> Result<()> {
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = destination.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&to)?;
            copy_contents(&from, &to)?;
        } else {
            fs::copy(&from, &to).with_context(|| {
                format!("Failed to copy {} to {}", from.display(), to.display())
            })?;
        }
    }
    Ok(())
}
