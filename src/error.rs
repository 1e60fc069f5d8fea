use std::path::PathBuf;

/// Library-level structured errors for the entrypoint.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum EntrypointError {
	#[error("Failed to read config file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Invalid variable regex: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error(
		"Capture group {group} is out of range for regex {pattern} ({available} groups available)"
	)]
	CaptureGroupOutOfRange {
		pattern: String,
		group: usize,
		available: usize,
	},

	#[error("Failed to read source file: {path}")]
	SourceRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to query permissions of source file: {path}")]
	SourceStat {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to check whether target exists: {path}")]
	TargetStat {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write target file: {path}")]
	TargetWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Command is empty")]
	EmptyCommand,

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Command returned non-zero exit code: {command} (exit code: {exit_code})")]
	CommandNonZeroExit { command: String, exit_code: i32 },

	#[error("Failed to update {account}")]
	IdentityUpdate {
		account: String,
		#[source]
		source: Box<EntrypointError>,
	},

	#[error("Pre-command failed: {command}")]
	PreCommand {
		command: String,
		#[source]
		source: Box<EntrypointError>,
	},
}

/// Result type alias using EntrypointError.
pub type Result<T> = std::result::Result<T, EntrypointError>;
