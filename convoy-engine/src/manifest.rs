//! Manifest scanning: which images do the changed directories reference?
//!
//! This is a line-oriented heuristic, not a structured document parse: any
//! line whose trimmed content starts with the literal key `image:` yields an
//! image reference. Multiple keys per file are all captured.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use convoy_core::{ChangeSet, ImageRef};

use crate::error::{io_err, CycleError};

/// File suffixes treated as declarative manifests.
pub const MANIFEST_SUFFIXES: &[&str] = &[".yml", ".yaml"];

/// Aggregate image references across a change set.
///
/// Only directories that saw an addition or modification are scanned — a
/// deleted manifest must not trigger an image pull. Order is directory
/// iteration order, then file order, then line order. Duplicates are kept;
/// the puller is idempotent, so pulling the same reference twice is
/// harmless.
pub fn collect_images(work_dir: &Path, changes: &ChangeSet) -> Result<Vec<ImageRef>, CycleError> {
    let mut images = Vec::new();
    for dir in changes.updated_dirs() {
        for manifest in files_with_suffix(&work_dir.join(dir), MANIFEST_SUFFIXES)? {
            images.extend(scan_manifest(&manifest)?);
        }
    }
    Ok(images)
}

fn scan_manifest(path: &Path) -> Result<Vec<ImageRef>, CycleError> {
    let file = fs::File::open(path).map_err(|e| io_err(path, e))?;
    let mut images = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| io_err(path, e))?;
        if let Some(image) = line.trim().strip_prefix("image:") {
            images.push(ImageRef::from(image.trim()));
        }
    }
    Ok(images)
}

/// Files in `dir` (non-recursive) whose name ends in one of `suffixes`,
/// sorted by name so extraction order is deterministic.
pub(crate) fn files_with_suffix(
    dir: &Path,
    suffixes: &[&str],
) -> Result<Vec<PathBuf>, CycleError> {
    let entries = fs::read_dir(dir).map_err(|e| io_err(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !suffixes.iter().any(|suffix| name.ends_with(suffix)) {
            continue;
        }
        let ty = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        if ty.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
