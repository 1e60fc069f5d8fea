//! User and group ID remapping.
//!
//! Changes the UID of a user or the GID of a group to the value of an
//! environment variable by running `usermod -u` / `groupmod -g`. Nothing is
//! run when the variable is unset or empty.

use crate::config::IdentityConfig;
use crate::env::Environment;
use crate::error::{EntrypointError, Result};
use crate::exec::{CommandRunner, StdinMode, run_checked};

/// Result of a remapping attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemapOutcome {
	/// The ID variable was unset or empty.
	Unchanged,
	/// The account was remapped to this ID.
	Remapped { id: String },
}

/// Set the UID of `identity.user` from the UID variable.
pub fn update_user<E, R>(identity: &IdentityConfig, env: &E, runner: &R) -> Result<RemapOutcome>
where
	E: Environment + ?Sized,
	R: CommandRunner + ?Sized,
{
	let Some(uid) = non_empty_var(env, identity.uid_variable()) else {
		tracing::info!("UID variable is not set. Not updating UID");
		return Ok(RemapOutcome::Unchanged);
	};

	tracing::info!("Updating UID of user {}", identity.user);
	let argv = vec![
		"usermod".to_string(),
		"-u".to_string(),
		uid.clone(),
		identity.user.clone(),
	];
	run_checked(runner, &argv, StdinMode::Null).map_err(|source| {
		EntrypointError::IdentityUpdate {
			account: format!("UID of user {}", identity.user),
			source: Box::new(source),
		}
	})?;

	Ok(RemapOutcome::Remapped { id: uid })
}

/// Set the GID of `identity.group` from the GID variable.
pub fn update_group<E, R>(identity: &IdentityConfig, env: &E, runner: &R) -> Result<RemapOutcome>
where
	E: Environment + ?Sized,
	R: CommandRunner + ?Sized,
{
	let Some(gid) = non_empty_var(env, identity.gid_variable()) else {
		tracing::info!("GID variable is not set. Not updating GID");
		return Ok(RemapOutcome::Unchanged);
	};

	tracing::info!("Updating GID of group {}", identity.group);
	let argv = vec![
		"groupmod".to_string(),
		"-g".to_string(),
		gid.clone(),
		identity.group.clone(),
	];
	run_checked(runner, &argv, StdinMode::Null).map_err(|source| {
		EntrypointError::IdentityUpdate {
			account: format!("GID of group {}", identity.group),
			source: Box::new(source),
		}
	})?;

	Ok(RemapOutcome::Remapped { id: gid })
}

/// A set variable that is not valid UTF-8 is passed on lossily so the tool rejects it.
fn non_empty_var<E>(env: &E, name: &str) -> Option<String>
where
	E: Environment + ?Sized,
{
	env.var(name)
		.filter(|value| !value.is_empty())
		.map(|value| value.to_string_lossy().into_owned())
}
