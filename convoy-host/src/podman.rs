//! Podman-backed [`ImagePuller`] implementation.

use convoy_core::{CommandError, ImagePuller, ImageRef};

use crate::command::run_command;

/// Pulls images through the podman CLI. `podman pull` is idempotent: pulling
/// an image that is already present is a cheap no-op.
#[derive(Debug, Clone, Default)]
pub struct Podman;

impl Podman {
    pub fn new() -> Self {
        Self
    }
}

impl ImagePuller for Podman {
    fn pull(&self, image: &ImageRef) -> Result<(), CommandError> {
        run_command("podman", &["pull", image.as_str()], None)?;
        Ok(())
    }
}
