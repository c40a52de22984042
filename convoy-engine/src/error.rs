//! Error types for convoy-engine.

use std::path::PathBuf;

use thiserror::Error;

use convoy_core::{CommandError, DiffError, ForgeError, ImageRef};

/// All errors that abort a reconciliation cycle.
///
/// Per-unit service failures are deliberately absent: they are recorded in
/// the cycle report and never abort the remaining units.
#[derive(Debug, Error)]
pub enum CycleError {
    /// An error from the version-control provider.
    #[error("forge error: {0}")]
    Forge(#[from] ForgeError),

    /// A structural error in the revision diff.
    #[error("diff error: {0}")]
    Diff(#[from] DiffError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image pull failed; fatal to the cycle.
    #[error("failed to pull image `{image}`: {source}")]
    ImagePull {
        image: ImageRef,
        #[source]
        source: CommandError,
    },

    /// The controller's unit-definition reload failed before any per-unit
    /// action ran.
    #[error("failed to reload unit definitions: {0}")]
    ReloadUnits(#[source] CommandError),
}

/// Convenience constructor for [`CycleError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CycleError {
    CycleError::Io {
        path: path.into(),
        source,
    }
}
