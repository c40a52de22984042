//! # convoy-engine
//!
//! The change-classification and reconciliation engine.
//!
//! Construct a [`Reconciler`] with the three collaborators and call
//! [`Reconciler::run_cycle`] for one detect-diff → prefetch-images →
//! apply-service-actions pass.

pub mod cycle;
pub mod error;
pub mod manifest;
pub mod service;

pub use cycle::{CycleReport, Reconciler, UnitFailure};
pub use error::CycleError;
pub use service::{ServiceAction, ServicePlan};
