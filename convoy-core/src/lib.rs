//! Convoy core library — domain types, change classification, collaborator
//! contracts, errors.
//!
//! Public API surface:
//! - [`changes`] — [`ChangeStatus`], [`DirChange`], [`ChangeSet`]
//! - [`types`] — [`Revision`], [`ImageRef`], [`UnitName`]
//! - [`host`] — [`Forge`], [`ImagePuller`], [`ServiceController`]
//! - [`error`] — [`CommandError`], [`ForgeError`], [`DiffError`]

pub mod changes;
pub mod error;
pub mod host;
pub mod types;

pub use changes::{ChangeSet, ChangeStatus, DirChange};
pub use error::{CommandError, DiffError, ForgeError};
pub use host::{Forge, ImagePuller, ServiceController};
pub use types::{ImageRef, Revision, UnitName};
