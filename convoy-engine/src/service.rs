//! Service action planning: which lifecycle action does a change event
//! imply for the unit declared in its directory?

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use convoy_core::{ChangeStatus, DirChange, UnitName};

use crate::error::{io_err, CycleError};
use crate::manifest::files_with_suffix;

/// Suffix of a unit-declaration file inside a deployment directory.
pub const UNIT_DECLARATION_SUFFIX: &str = ".kube";

/// Suffix of the managed unit the controller addresses.
pub const UNIT_SUFFIX: &str = ".service";

// ---------------------------------------------------------------------------
// Plan types
// ---------------------------------------------------------------------------

/// Lifecycle action derived for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceAction {
    Restart,
    Stop,
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceAction::Restart => f.write_str("restart"),
            ServiceAction::Stop => f.write_str("stop"),
        }
    }
}

/// One action to apply to one resolved unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePlan {
    pub unit: UnitName,
    pub action: ServiceAction,
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Derive the action for one change event, or `None` when the directory
/// declares no unit or the status does not map to an action.
///
/// Additions and modifications restart the unit (idempotent: a stopped unit
/// is simply started); deletions stop it. Any other status on a directory
/// that does declare a unit is unsupported — logged and skipped, never an
/// error.
pub fn plan_for_change(
    work_dir: &Path,
    change: &DirChange,
) -> Result<Option<ServicePlan>, CycleError> {
    let Some(unit) = unit_declared_in(&work_dir.join(&change.dir))? else {
        return Ok(None);
    };

    let action = match change.status {
        ChangeStatus::Added | ChangeStatus::Modified => Some(ServiceAction::Restart),
        ChangeStatus::Deleted => Some(ServiceAction::Stop),
        ChangeStatus::Renamed | ChangeStatus::Copied | ChangeStatus::Unchanged => {
            log::warn!(
                "unsupported change status `{}` for {}, leaving unit {unit} alone",
                change.status,
                change.dir.display(),
            );
            None
        }
    };

    Ok(action.map(|action| ServicePlan { unit, action }))
}

/// The unit declared in `dir`, resolved from its `.kube` file.
///
/// The unit name is the declaration's base name with the suffix swapped
/// (`app.kube` → `app.service`); the path is discarded because the
/// controller addresses units by name. A directory that no longer exists
/// (deleted wholesale) declares nothing.
pub fn unit_declared_in(dir: &Path) -> Result<Option<UnitName>, CycleError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let declarations = files_with_suffix(dir, &[UNIT_DECLARATION_SUFFIX])?;
    let Some(first) = declarations.first() else {
        return Ok(None);
    };
    if declarations.len() > 1 {
        log::warn!(
            "{} declares {} units, using {}",
            dir.display(),
            declarations.len(),
            first.display(),
        );
    }

    Ok(unit_name_for(first))
}

/// Every unit declared under `work_dir`'s first-level subdirectories,
/// paired with its directory (relative to `work_dir`), in directory order.
pub fn unit_declarations(work_dir: &Path) -> Result<Vec<(PathBuf, UnitName)>, CycleError> {
    let entries = fs::read_dir(work_dir).map_err(|e| io_err(work_dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(work_dir, e))?;
        let ty = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if ty.is_dir() && !hidden {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    let mut found = Vec::new();
    for dir in dirs {
        if let Some(unit) = unit_declared_in(&dir)? {
            let relative = dir.strip_prefix(work_dir).unwrap_or(&dir).to_path_buf();
            found.push((relative, unit));
        }
    }
    Ok(found)
}

fn unit_name_for(declaration: &Path) -> Option<UnitName> {
    let name = declaration.file_name()?.to_str()?;
    let stem = name.strip_suffix(UNIT_DECLARATION_SUFFIX)?;
    Some(UnitName(format!("{stem}{UNIT_SUFFIX}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
