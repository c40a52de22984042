//! `convoy run` — one reconciliation cycle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use convoy_engine::{CycleReport, Reconciler};
use convoy_host::{GitForge, Podman, Systemctl};

/// Arguments for `convoy run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the monitored repository checkout.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Control services through `systemctl --user`.
    #[arg(long)]
    pub user: bool,

    /// Emit the cycle report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let forge = GitForge::open(&self.repo)
            .with_context(|| format!("cannot open repository at '{}'", self.repo.display()))?;

        let reconciler = Reconciler::new(
            self.repo.clone(),
            forge,
            Podman::new(),
            Systemctl::new(self.user),
        );

        let report = reconciler
            .run_cycle()
            .context("reconciliation cycle failed")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &CycleReport) {
    if report.is_noop() {
        println!("✓ up to date at {} — nothing to do", report.head);
        return;
    }

    println!(
        "✓ reconciled {} → {} ({} changed {}, {} images pulled)",
        report.baseline,
        report.head,
        report.changed_dirs,
        if report.changed_dirs == 1 {
            "directory"
        } else {
            "directories"
        },
        report.images_pulled.len(),
    );

    for plan in &report.applied {
        println!("  {} {}", plan.action, plan.unit);
    }
    for failure in &report.failed {
        println!("  ✗ {} {}: {}", failure.action, failure.unit, failure.error);
    }
}
