//! `convoy status` — declared units and their controller state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use convoy_core::ServiceController;
use convoy_engine::service;
use convoy_host::Systemctl;

/// Arguments for `convoy status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to the monitored repository checkout.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Query `systemctl --user` instead of the system manager.
    #[arg(long)]
    pub user: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
struct UnitStatus {
    directory: String,
    unit: String,
    active: bool,
    enabled: bool,
}

#[derive(Tabled)]
struct UnitTableRow {
    #[tabled(rename = "directory")]
    directory: String,
    #[tabled(rename = "unit")]
    unit: String,
    #[tabled(rename = "active")]
    active: String,
    #[tabled(rename = "enabled")]
    enabled: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let declarations = service::unit_declarations(&self.repo).with_context(|| {
            format!("cannot list unit declarations under '{}'", self.repo.display())
        })?;

        let controller = Systemctl::new(self.user);
        let mut rows = Vec::new();
        for (directory, unit) in declarations {
            let active = controller
                .is_active(&unit)
                .with_context(|| format!("active-state query failed for {unit}"))?;
            let enabled = controller
                .is_enabled(&unit)
                .with_context(|| format!("enabled-state query failed for {unit}"))?;
            rows.push(UnitStatus {
                directory: directory.display().to_string(),
                unit: unit.to_string(),
                active,
                enabled,
            });
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(&self.repo, rows);
        Ok(())
    }
}

fn print_table(repo: &std::path::Path, rows: Vec<UnitStatus>) {
    if rows.is_empty() {
        println!("No unit declarations under '{}'.", repo.display());
        return;
    }

    let table_rows: Vec<UnitTableRow> = rows
        .into_iter()
        .map(|row| UnitTableRow {
            directory: row.directory,
            unit: row.unit,
            active: state_label(row.active),
            enabled: state_label(row.enabled),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn state_label(state: bool) -> String {
    if state {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}
