//! Command execution.
//!
//! This module handles:
//! - Running external commands with stdout/stderr passed through
//! - Optional stdin passthrough for the final command
//! - Turning non-zero exit codes into errors for setup commands

use crate::error::{EntrypointError, Result};
use std::process::{Command, Stdio};

/// Where a spawned command reads its stdin from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
	/// Stdin is connected to the null device.
	Null,
	/// Stdin is shared with this process.
	Inherit,
}

impl StdinMode {
	fn stdio(self) -> Stdio {
		match self {
			StdinMode::Null => Stdio::null(),
			StdinMode::Inherit => Stdio::inherit(),
		}
	}
}

/// Runs an external command to completion and reports its exit code.
pub trait CommandRunner {
	/// Run `argv` (program followed by arguments) and return its exit code.
	///
	/// Fails only when the command cannot be started.
	fn run(&self, argv: &[String], stdin: StdinMode) -> Result<i32>;
}

/// Runs commands as real child processes with stdout and stderr inherited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
	fn run(&self, argv: &[String], stdin: StdinMode) -> Result<i32> {
		let (program, args) = argv.split_first().ok_or(EntrypointError::EmptyCommand)?;

		let mut cmd = Command::new(program);
		cmd.args(args)
			.stdin(stdin.stdio())
			.stdout(Stdio::inherit())
			.stderr(Stdio::inherit());

		let status = cmd.status().map_err(|source| {
			if source.kind() == std::io::ErrorKind::NotFound {
				EntrypointError::CommandNotFound {
					command: program.clone(),
				}
			} else {
				EntrypointError::CommandFailed {
					command: program.clone(),
					source,
				}
			}
		})?;

		// Killed by a signal
		Ok(status.code().unwrap_or(-1))
	}
}

/// Run a command and fail unless it exits with code 0.
pub fn run_checked<R>(runner: &R, argv: &[String], stdin: StdinMode) -> Result<()>
where
	R: CommandRunner + ?Sized,
{
	tracing::info!("> {}", display_command(argv));
	let exit_code = runner.run(argv, stdin)?;

	if exit_code != 0 {
		return Err(EntrypointError::CommandNonZeroExit {
			command: display_command(argv),
			exit_code,
		});
	}

	Ok(())
}

/// Join argv with spaces for logs and error messages.
pub fn display_command(argv: &[String]) -> String {
	argv.join(" ")
}
