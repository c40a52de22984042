//! Error types for convoy-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of an external command invoked by a collaborator.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be spawned at all (missing binary, permissions).
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited non-zero; `stderr` holds its diagnostics.
    #[error("command `{command}` exited with status {status}: {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },
}

/// All errors that can arise from the version-control provider.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The monitored working directory does not exist.
    #[error("directory does not exist: {path}")]
    MissingWorkDir { path: PathBuf },

    /// The working directory exists but is not a repository checkout.
    #[error("not a git repository: {path}")]
    NotARepository { path: PathBuf },

    /// An underlying command failure (network, merge conflict, bad revision).
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Structural errors in a name-status diff.
///
/// These indicate a contract violation by the diff producer and abort the
/// whole resolution; they are never downgraded to warnings.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("unknown change status `{code}` for path `{path}`")]
    UnknownStatus { code: String, path: String },
}
