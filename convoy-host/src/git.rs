//! Git-backed [`Forge`] implementation.
//!
//! All commands run with the monitored checkout as working directory, so
//! the ambient process cwd never matters.

use std::path::{Path, PathBuf};

use convoy_core::{CommandError, Forge, ForgeError, Revision};

use crate::command::run_command;

/// A git working tree under reconciliation.
#[derive(Debug, Clone)]
pub struct GitForge {
    work_dir: PathBuf,
}

impl GitForge {
    /// Open an existing checkout.
    ///
    /// Fails early with a typed error when `work_dir` is missing or is not
    /// a git repository, so a misconfigured agent never gets as far as
    /// running commands against the wrong tree.
    pub fn open(work_dir: impl Into<PathBuf>) -> Result<Self, ForgeError> {
        let work_dir = work_dir.into();
        if !work_dir.is_dir() {
            return Err(ForgeError::MissingWorkDir { path: work_dir });
        }
        if !work_dir.join(".git").exists() {
            return Err(ForgeError::NotARepository { path: work_dir });
        }
        Ok(Self { work_dir })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn run_git(&self, args: &[&str]) -> Result<String, CommandError> {
        run_command("git", args, Some(&self.work_dir))
    }
}

impl Forge for GitForge {
    fn latest_revision(&self) -> Result<Revision, ForgeError> {
        Ok(Revision::from(self.run_git(&["rev-parse", "HEAD"])?))
    }

    fn pull(&self) -> Result<(), ForgeError> {
        self.run_git(&["pull"])?;
        Ok(())
    }

    fn diff_name_status(&self, from: &Revision, to: &Revision) -> Result<String, ForgeError> {
        Ok(self.run_git(&["diff", "--name-status", from.as_str(), to.as_str()])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_rejects_missing_directory() {
        let tmp = TempDir::new().expect("tmp");
        let missing = tmp.path().join("nope");
        let err = GitForge::open(&missing).expect_err("must fail");
        assert!(matches!(err, ForgeError::MissingWorkDir { .. }));
    }

    #[test]
    fn open_rejects_directory_without_git_metadata() {
        let tmp = TempDir::new().expect("tmp");
        let err = GitForge::open(tmp.path()).expect_err("must fail");
        assert!(matches!(err, ForgeError::NotARepository { .. }));
    }

    #[test]
    fn open_accepts_a_checkout() {
        let tmp = TempDir::new().expect("tmp");
        std::fs::create_dir(tmp.path().join(".git")).expect("mkdir .git");
        let forge = GitForge::open(tmp.path()).expect("open");
        assert_eq!(forge.work_dir(), tmp.path());
    }
}
