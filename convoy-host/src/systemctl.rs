//! Systemctl-backed [`ServiceController`] implementation.

use convoy_core::{CommandError, ServiceController, UnitName};

use crate::command::run_command;

/// Controls units through the systemctl CLI.
///
/// In user mode every invocation carries `--user`, addressing the caller's
/// user manager instead of the system manager.
#[derive(Debug, Clone, Default)]
pub struct Systemctl {
    user_mode: bool,
}

impl Systemctl {
    pub fn new(user_mode: bool) -> Self {
        Self { user_mode }
    }

    fn run(&self, args: &[&str]) -> Result<String, CommandError> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 1);
        if self.user_mode {
            full.push("--user");
        }
        full.extend_from_slice(args);
        run_command("systemctl", &full, None)
    }

    /// Query verbs signal "no" through a non-zero exit; only a failure to
    /// spawn systemctl at all is an error.
    fn query(&self, verb: &str, unit: &UnitName) -> Result<bool, CommandError> {
        match self.run(&[verb, unit.as_str()]) {
            Ok(_) => Ok(true),
            Err(CommandError::Failed { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

impl ServiceController for Systemctl {
    fn daemon_reload(&self) -> Result<(), CommandError> {
        self.run(&["daemon-reload"])?;
        Ok(())
    }

    fn restart(&self, unit: &UnitName) -> Result<(), CommandError> {
        self.run(&["restart", unit.as_str()])?;
        Ok(())
    }

    fn stop(&self, unit: &UnitName) -> Result<(), CommandError> {
        self.run(&["stop", unit.as_str()])?;
        Ok(())
    }

    fn is_active(&self, unit: &UnitName) -> Result<bool, CommandError> {
        self.query("is-active", unit)
    }

    fn is_enabled(&self, unit: &UnitName) -> Result<bool, CommandError> {
        self.query("is-enabled", unit)
    }
}
