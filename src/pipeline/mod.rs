//! The entrypoint pipeline.
//!
//! Stages run strictly in order, and the first failure stops everything:
//!
//! 1. Render every configured file
//! 2. Remap the UID, then the GID, when enabled
//! 3. Run each `RunBefore` command
//! 4. Run the final command with stdin passed through
//!
//! Nothing is retried and nothing written by an earlier stage is undone.

use crate::config::Config;
use crate::env::Environment;
use crate::error::{EntrypointError, Result};
use crate::exec::{CommandRunner, StdinMode, display_command, run_checked};
use crate::identity::{RemapOutcome, update_group, update_user};
use crate::template::filter_files;
use std::fmt;

/// Pipeline progress, in the order the stages are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
	ConfigLoaded,
	FilesProcessed,
	IdentityUpdated,
	PreCommandsRun,
	FinalCommandExecuted,
}

impl Stage {
	pub fn as_str(&self) -> &'static str {
		match self {
			Stage::ConfigLoaded => "config loaded",
			Stage::FilesProcessed => "files processed",
			Stage::IdentityUpdated => "identity updated",
			Stage::PreCommandsRun => "pre-commands run",
			Stage::FinalCommandExecuted => "final command executed",
		}
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Runs the entrypoint stages against an environment and a command runner.
pub struct Pipeline<'a, E: ?Sized, R: ?Sized> {
	env: &'a E,
	runner: &'a R,
}

impl<'a, E, R> Pipeline<'a, E, R>
where
	E: Environment + ?Sized,
	R: CommandRunner + ?Sized,
{
	pub fn new(env: &'a E, runner: &'a R) -> Self {
		Pipeline { env, runner }
	}

	/// Run every setup stage, then the final command.
	///
	/// Returns the final command's exit code.
	pub fn run(&self, config: &Config, command: &[String]) -> Result<i32> {
		self.prepare(config)?;
		self.run_final(command)
	}

	/// Run every stage before the final command.
	pub fn prepare(&self, config: &Config) -> Result<()> {
		enter(Stage::ConfigLoaded);

		let report = filter_files(config, self.env)?;
		tracing::info!(
			"Files: {} written, {} skipped",
			report.written.len(),
			report.skipped.len()
		);
		enter(Stage::FilesProcessed);

		self.update_identity(config)?;
		self.run_before(&config.run_before)?;
		enter(Stage::PreCommandsRun);

		Ok(())
	}

	fn update_identity(&self, config: &Config) -> Result<()> {
		let identity = &config.identity;
		if !identity.update_uid && !identity.update_gid {
			return Ok(());
		}

		if identity.update_uid
			&& let RemapOutcome::Remapped { id } = update_user(identity, self.env, self.runner)?
		{
			tracing::info!("User {} now has UID {}", identity.user, id);
		}
		if identity.update_gid
			&& let RemapOutcome::Remapped { id } = update_group(identity, self.env, self.runner)?
		{
			tracing::info!("Group {} now has GID {}", identity.group, id);
		}

		enter(Stage::IdentityUpdated);
		Ok(())
	}

	/// Run setup commands in order, stopping at the first that fails.
	pub fn run_before(&self, commands: &[Vec<String>]) -> Result<()> {
		for argv in commands {
			run_checked(self.runner, argv, StdinMode::Null).map_err(|source| {
				EntrypointError::PreCommand {
					command: display_command(argv),
					source: Box::new(source),
				}
			})?;
		}
		Ok(())
	}

	/// Run the final command with stdin passed through and return its exit code.
	pub fn run_final(&self, command: &[String]) -> Result<i32> {
		tracing::info!("> {}", display_command(command));
		let exit_code = self.runner.run(command, StdinMode::Inherit)?;
		enter(Stage::FinalCommandExecuted);
		Ok(exit_code)
	}
}

fn enter(stage: Stage) {
	tracing::debug!("Stage: {}", stage);
}
