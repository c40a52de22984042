//! Collaborator contracts the reconciliation engine depends on.
//!
//! Implementations live in `convoy-host` (subprocess-backed) and in test
//! doubles. Handles are constructed explicitly and passed into the engine;
//! nothing here is a process-wide singleton.
//!
//! All calls block until the underlying operation completes or fails; the
//! engine imposes no timeouts of its own and propagates failures unmodified.

use crate::error::{CommandError, ForgeError};
use crate::types::{ImageRef, Revision, UnitName};

/// Version-control provider for the monitored working tree.
pub trait Forge {
    /// The revision the working tree currently points at.
    fn latest_revision(&self) -> Result<Revision, ForgeError>;

    /// Advance the working tree to the newest upstream revision.
    fn pull(&self) -> Result<(), ForgeError>;

    /// Raw name-status diff between two revisions, one `<code>\t<path>`
    /// record per line.
    fn diff_name_status(&self, from: &Revision, to: &Revision) -> Result<String, ForgeError>;
}

/// Container-image puller. Pulls are idempotent and fail loudly.
pub trait ImagePuller {
    fn pull(&self, image: &ImageRef) -> Result<(), CommandError>;
}

/// Service-unit controller.
pub trait ServiceController {
    /// Reload the controller's unit-definition cache so newly added or
    /// changed declarations become visible to subsequent verbs.
    fn daemon_reload(&self) -> Result<(), CommandError>;

    /// Restart a unit. Idempotent: starts the unit if it is not running,
    /// otherwise stops and starts it fresh to pick up new configuration.
    fn restart(&self, unit: &UnitName) -> Result<(), CommandError>;

    fn stop(&self, unit: &UnitName) -> Result<(), CommandError>;

    fn is_active(&self, unit: &UnitName) -> Result<bool, CommandError>;

    fn is_enabled(&self, unit: &UnitName) -> Result<bool, CommandError>;
}
