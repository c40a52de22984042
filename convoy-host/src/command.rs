//! Shared blocking command runner for the host collaborators.

use std::path::Path;
use std::process::Command;

use convoy_core::CommandError;

/// Run `program` with `args`, optionally in `cwd`, capturing output.
///
/// Returns trimmed stdout on success. A non-zero exit becomes
/// [`CommandError::Failed`] carrying the full command line and stderr.
pub(crate) fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<String, CommandError> {
    let rendered = render_command_line(program, args);
    log::debug!("running command: {rendered}");

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|source| CommandError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            command: rendered,
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn render_command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = run_command("convoy-test-no-such-binary", &[], None).expect_err("spawn");
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn failed_command_carries_status_and_command_line() {
        // `false` is POSIX and exits 1 with no output.
        let err = run_command("false", &[], None).expect_err("must fail");
        match err {
            CommandError::Failed {
                command, status, ..
            } => {
                assert_eq!(command, "false");
                assert_eq!(status, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stdout_is_trimmed() {
        let out = run_command("echo", &["hello"], None).expect("echo");
        assert_eq!(out, "hello");
    }
}
