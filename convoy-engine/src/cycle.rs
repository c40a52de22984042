//! One reconciliation cycle: pull, classify, prefetch, apply.
//!
//! ## Ordering
//!
//! 1. Capture the pre-update revision as the diff baseline.
//! 2. Pull the working tree forward; capture the new head.
//! 3. Resolve the change set between baseline and head.
//! 4. Empty change set → done (the cheap steady-state path).
//! 5. Pull every referenced image. Any pull failure aborts the cycle here —
//!    a service must never be restarted onto an image that failed to arrive.
//! 6. Reload the controller's unit definitions once, then apply the derived
//!    action per directory. Per-unit failures are recorded and do not stop
//!    the remaining units.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use convoy_core::{
    ChangeSet, Forge, ImagePuller, ImageRef, Revision, ServiceController, UnitName,
};

use crate::error::CycleError;
use crate::manifest;
use crate::service::{self, ServiceAction, ServicePlan};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A per-unit service failure. Recorded, logged, never fatal to the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub unit: UnitName,
    pub action: ServiceAction,
    pub error: String,
}

/// Outcome of one reconciliation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Revision the working tree pointed at before the pull.
    pub baseline: Revision,
    /// Revision after the pull.
    pub head: Revision,
    /// Number of changed directories in the resolved change set.
    pub changed_dirs: usize,
    /// Images pulled, in pull order.
    pub images_pulled: Vec<ImageRef>,
    /// Service actions applied successfully.
    pub applied: Vec<ServicePlan>,
    /// Service actions that failed.
    pub failed: Vec<UnitFailure>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u128,
}

impl CycleReport {
    /// True when the cycle found nothing to do.
    pub fn is_noop(&self) -> bool {
        self.changed_dirs == 0
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Drives reconciliation cycles over one working tree.
///
/// Collaborators are injected at construction; the reconciler owns them for
/// its lifetime. Cycles are synchronous and must not be run concurrently
/// against the same tree — serialization is the caller's responsibility.
pub struct Reconciler<F, P, C> {
    work_dir: PathBuf,
    forge: F,
    puller: P,
    services: C,
}

impl<F, P, C> Reconciler<F, P, C>
where
    F: Forge,
    P: ImagePuller,
    C: ServiceController,
{
    pub fn new(work_dir: impl Into<PathBuf>, forge: F, puller: P, services: C) -> Self {
        Self {
            work_dir: work_dir.into(),
            forge,
            puller,
            services,
        }
    }

    /// Run one full reconciliation cycle.
    pub fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let started = Instant::now();
        log::info!("checking for updates in {}", self.work_dir.display());

        let baseline = self.forge.latest_revision()?;
        self.forge.pull()?;
        let head = self.forge.latest_revision()?;

        let raw = self.forge.diff_name_status(&baseline, &head)?;
        let changes = ChangeSet::from_name_status(&raw)?;

        if changes.is_empty() {
            log::info!("no changes detected");
            return Ok(CycleReport {
                baseline,
                head,
                changed_dirs: 0,
                images_pulled: Vec::new(),
                applied: Vec::new(),
                failed: Vec::new(),
                finished_at: Utc::now(),
                duration_ms: started.elapsed().as_millis(),
            });
        }
        log::info!("{} directories changed between {baseline} and {head}", changes.len());

        let images_pulled = self.prefetch_images(&changes)?;
        let (applied, failed) = self.reconcile_services(&changes)?;

        Ok(CycleReport {
            baseline,
            head,
            changed_dirs: changes.len(),
            images_pulled,
            applied,
            failed,
            finished_at: Utc::now(),
            duration_ms: started.elapsed().as_millis(),
        })
    }

    /// Pull every image referenced by the change set, in order.
    fn prefetch_images(&self, changes: &ChangeSet) -> Result<Vec<ImageRef>, CycleError> {
        let images = manifest::collect_images(&self.work_dir, changes)?;
        for image in &images {
            log::info!("pulling image: {image}");
            self.puller.pull(image).map_err(|source| {
                log::error!("failed to pull image {image}: {source}");
                CycleError::ImagePull {
                    image: image.clone(),
                    source,
                }
            })?;
            log::info!("done pulling: {image}");
        }
        Ok(images)
    }

    /// Reload unit definitions once, then apply the action derived for each
    /// changed directory.
    fn reconcile_services(
        &self,
        changes: &ChangeSet,
    ) -> Result<(Vec<ServicePlan>, Vec<UnitFailure>), CycleError> {
        self.services
            .daemon_reload()
            .map_err(CycleError::ReloadUnits)?;

        let mut applied = Vec::new();
        let mut failed = Vec::new();

        for change in changes.iter() {
            let Some(plan) = service::plan_for_change(&self.work_dir, &change)? else {
                continue;
            };

            log::info!("{} unit {}", plan.action, plan.unit);
            let result = match plan.action {
                ServiceAction::Restart => self.services.restart(&plan.unit),
                ServiceAction::Stop => self.services.stop(&plan.unit),
            };

            match result {
                Ok(()) => applied.push(plan),
                Err(err) => {
                    log::error!("failed to {} unit {}: {err}", plan.action, plan.unit);
                    failed.push(UnitFailure {
                        unit: plan.unit,
                        action: plan.action,
                        error: err.to_string(),
                    });
                }
            }
        }

        Ok((applied, failed))
    }
}
