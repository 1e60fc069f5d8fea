use serde::Deserialize;
use std::path::PathBuf;

/// Pattern used when the config leaves `VariableRegex` empty. Matches `${NAME}`.
pub const DEFAULT_VARIABLE_REGEX: &str = r"\$\{([a-zA-Z0-9_-]+)\}";

/// Capture group used when the config leaves `RegexGroup` at zero.
pub const DEFAULT_REGEX_GROUP: usize = 1;

pub const DEFAULT_UID_VARIABLE: &str = "UID";
pub const DEFAULT_GID_VARIABLE: &str = "GID";

/// Top-level configuration loaded from the JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
	/// Files to render, in order.
	#[serde(default)]
	pub files: Vec<FileMapping>,

	/// Regex matching a placeholder. Empty means the default `${NAME}` form.
	#[serde(default)]
	pub variable_regex: String,

	/// Capture group holding the variable name. Zero means group 1.
	#[serde(default)]
	pub regex_group: usize,

	/// Rewrite targets even when they already exist.
	#[serde(default)]
	pub force_overwrite: bool,

	/// Resolve every placeholder from its own capture instead of reusing the
	/// first placeholder found in the file.
	#[serde(default)]
	pub resolve_each_match: bool,

	#[serde(flatten)]
	pub identity: IdentityConfig,

	/// Commands to run, in order, before the final command.
	#[serde(default)]
	pub run_before: Vec<Vec<String>>,
}

impl Config {
	/// The placeholder regex with the default applied.
	pub fn variable_regex(&self) -> &str {
		if self.variable_regex.is_empty() {
			DEFAULT_VARIABLE_REGEX
		} else {
			&self.variable_regex
		}
	}

	/// The capture group index with the default applied.
	pub fn regex_group(&self) -> usize {
		if self.regex_group == 0 {
			DEFAULT_REGEX_GROUP
		} else {
			self.regex_group
		}
	}
}

/// User and group remapping settings. Stored flat in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
	#[serde(rename = "UpdateUID", default)]
	pub update_uid: bool,

	#[serde(rename = "User", default)]
	pub user: String,

	/// Environment variable holding the new UID. Empty means `UID`.
	#[serde(rename = "UIDVariable", default)]
	pub uid_variable: String,

	#[serde(rename = "UpdateGID", default)]
	pub update_gid: bool,

	#[serde(rename = "Group", default)]
	pub group: String,

	/// Environment variable holding the new GID. Empty means `GID`.
	#[serde(rename = "GIDVariable", default)]
	pub gid_variable: String,
}

impl IdentityConfig {
	pub fn uid_variable(&self) -> &str {
		if self.uid_variable.is_empty() {
			DEFAULT_UID_VARIABLE
		} else {
			&self.uid_variable
		}
	}

	pub fn gid_variable(&self) -> &str {
		if self.gid_variable.is_empty() {
			DEFAULT_GID_VARIABLE
		} else {
			&self.gid_variable
		}
	}
}

/// A single templating job: render `path` into `target_path`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFileMapping")]
pub struct FileMapping {
	pub path: PathBuf,
	pub target_path: PathBuf,
}

impl FileMapping {
	pub fn new(path: impl Into<PathBuf>, target_path: impl Into<PathBuf>) -> Self {
		FileMapping {
			path: path.into(),
			target_path: target_path.into(),
		}
	}

	/// Whether the file is rewritten in place.
	pub fn is_in_place(&self) -> bool {
		self.path == self.target_path
	}
}

/// Either a `{"Path", "TargetPath"}` object or a bare path rewritten in place.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFileMapping {
	Pair {
		#[serde(rename = "Path")]
		path: PathBuf,
		#[serde(rename = "TargetPath", default)]
		target_path: Option<PathBuf>,
	},
	InPlace(PathBuf),
}

impl From<RawFileMapping> for FileMapping {
	fn from(raw: RawFileMapping) -> Self {
		match raw {
			RawFileMapping::Pair { path, target_path } => {
				let target_path = target_path
					.filter(|p| !p.as_os_str().is_empty())
					.unwrap_or_else(|| path.clone());
				FileMapping { path, target_path }
			}
			RawFileMapping::InPlace(path) => FileMapping {
				target_path: path.clone(),
				path,
			},
		}
	}
}
