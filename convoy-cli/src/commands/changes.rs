//! `convoy changes <from> [<to>]` — resolve a change set, print it, touch nothing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use convoy_core::{ChangeSet, Forge, Revision};
use convoy_host::GitForge;

/// Arguments for `convoy changes`.
#[derive(Args, Debug)]
pub struct ChangesArgs {
    /// Baseline revision of the diff.
    pub from: String,

    /// Head revision of the diff.
    #[arg(default_value = "HEAD")]
    pub to: String,

    /// Path to the monitored repository checkout.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
}

impl ChangesArgs {
    pub fn run(self) -> Result<()> {
        let forge = GitForge::open(&self.repo)
            .with_context(|| format!("cannot open repository at '{}'", self.repo.display()))?;

        let from = Revision::from(self.from);
        let to = Revision::from(self.to);
        let raw = forge
            .diff_name_status(&from, &to)
            .with_context(|| format!("diff failed for {from}..{to}"))?;
        let changes = ChangeSet::from_name_status(&raw)
            .with_context(|| format!("unresolvable diff for {from}..{to}"))?;

        if changes.is_empty() {
            println!("No directory changes between {from} and {to}.");
            return Ok(());
        }

        for change in changes.iter() {
            println!("{:>9}  {}", change.status.to_string(), change.dir.display());
        }
        Ok(())
    }
}
