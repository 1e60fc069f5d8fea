use crate::config::Config;
use crate::env::Environment;
use crate::error::{EntrypointError, Result};
use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::ffi::OsString;

/// How the variable name is chosen for each placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubstitutionMode {
	/// Every placeholder is replaced with the value of the variable named by
	/// the first placeholder in the whole text. The text is rescanned from
	/// the start for every match.
	#[default]
	FirstMatch,

	/// Every placeholder is replaced with the value of its own variable.
	EachMatch,
}

/// A compiled placeholder regex together with the capture group naming the variable.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	regex: Regex,
	group: usize,
	mode: SubstitutionMode,
}

impl CompiledPattern {
	/// Compile `pattern`, checking that `group` exists in it.
	pub fn new(pattern: &str, group: usize, mode: SubstitutionMode) -> Result<Self> {
		let regex = Regex::new(pattern).map_err(|source| EntrypointError::InvalidRegex {
			pattern: pattern.to_string(),
			source,
		})?;

		// captures_len counts the implicit whole-match group 0
		let available = regex.captures_len() - 1;
		if group > available {
			return Err(EntrypointError::CaptureGroupOutOfRange {
				pattern: pattern.to_string(),
				group,
				available,
			});
		}

		Ok(CompiledPattern { regex, group, mode })
	}

	/// Compile the pattern described by a config, defaults applied.
	pub fn from_config(config: &Config) -> Result<Self> {
		let mode = if config.resolve_each_match {
			SubstitutionMode::EachMatch
		} else {
			SubstitutionMode::FirstMatch
		};
		Self::new(config.variable_regex(), config.regex_group(), mode)
	}

	pub fn as_str(&self) -> &str {
		self.regex.as_str()
	}

	pub fn group(&self) -> usize {
		self.group
	}

	pub fn mode(&self) -> SubstitutionMode {
		self.mode
	}

	/// Replace every placeholder in `text` with its environment value.
	///
	/// Unset variables resolve to the empty string. Text without any
	/// placeholder is returned borrowed and unchanged.
	pub fn substitute<'t, E>(&self, text: &'t [u8], env: &E) -> Cow<'t, [u8]>
	where
		E: Environment + ?Sized,
	{
		match self.mode {
			SubstitutionMode::FirstMatch => self.regex.replace_all(text, |_: &Captures| {
				let first = self.regex.captures(text);
				self.lookup(first.as_ref(), env)
			}),
			SubstitutionMode::EachMatch => self
				.regex
				.replace_all(text, |caps: &Captures| self.lookup(Some(caps), env)),
		}
	}

	fn lookup<E>(&self, caps: Option<&Captures>, env: &E) -> Vec<u8>
	where
		E: Environment + ?Sized,
	{
		caps.and_then(|caps| caps.get(self.group))
			.and_then(|name| std::str::from_utf8(name.as_bytes()).ok())
			.and_then(|name| env.var(name))
			.map(OsString::into_encoded_bytes)
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::DEFAULT_VARIABLE_REGEX;
	use std::collections::HashMap;

	fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
		vars.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	fn default_pattern(mode: SubstitutionMode) -> CompiledPattern {
		CompiledPattern::new(DEFAULT_VARIABLE_REGEX, 1, mode).unwrap()
	}

	#[test]
	fn test_compile_invalid_regex() {
		let result = CompiledPattern::new(r"[invalid", 1, SubstitutionMode::default());
		match result.unwrap_err() {
			EntrypointError::InvalidRegex { pattern, .. } => {
				assert_eq!(pattern, "[invalid");
			}
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_compile_group_out_of_range() {
		let result = CompiledPattern::new(r"\$\{(\w+)\}", 2, SubstitutionMode::default());
		match result.unwrap_err() {
			EntrypointError::CaptureGroupOutOfRange {
				group, available, ..
			} => {
				assert_eq!(group, 2);
				assert_eq!(available, 1);
			}
			other => panic!("Expected CaptureGroupOutOfRange error, got {other:?}"),
		}
	}

	#[test]
	fn test_from_config_applies_defaults() {
		let pattern = CompiledPattern::from_config(&Config::default()).unwrap();
		assert_eq!(pattern.as_str(), DEFAULT_VARIABLE_REGEX);
		assert_eq!(pattern.group(), 1);
		assert_eq!(pattern.mode(), SubstitutionMode::FirstMatch);

		let config = Config {
			resolve_each_match: true,
			..Default::default()
		};
		let pattern = CompiledPattern::from_config(&config).unwrap();
		assert_eq!(pattern.mode(), SubstitutionMode::EachMatch);
	}

	#[test]
	fn test_no_placeholders_is_unchanged() {
		let pattern = default_pattern(SubstitutionMode::FirstMatch);
		let text = b"listen 80;\nserver_name $host {};\n";
		let out = pattern.substitute(text, &env(&[("host", "x")]));
		assert!(matches!(out, Cow::Borrowed(_)));
		assert_eq!(&out[..], text);
	}

	#[test]
	fn test_single_placeholder() {
		let pattern = default_pattern(SubstitutionMode::FirstMatch);
		let out = pattern.substitute(b"host=${DB_HOST}\n", &env(&[("DB_HOST", "db.local")]));
		assert_eq!(&out[..], b"host=db.local\n");
	}

	#[test]
	fn test_unset_variable_is_deleted() {
		let pattern = default_pattern(SubstitutionMode::EachMatch);
		let out = pattern.substitute(b"a${MISSING}b", &env(&[]));
		assert_eq!(&out[..], b"ab");
	}

	#[test]
	fn test_empty_variable_is_deleted() {
		let pattern = default_pattern(SubstitutionMode::FirstMatch);
		let out = pattern.substitute(b"a${EMPTY}b", &env(&[("EMPTY", "")]));
		assert_eq!(&out[..], b"ab");
	}

	#[test]
	fn test_repeated_placeholder() {
		let pattern = default_pattern(SubstitutionMode::FirstMatch);
		let out = pattern.substitute(b"${A}-${A}", &env(&[("A", "x")]));
		assert_eq!(&out[..], b"x-x");
	}

	#[test]
	fn test_first_match_mode_reuses_first_variable() {
		// Every placeholder takes the value of the first one in the text.
		let pattern = default_pattern(SubstitutionMode::FirstMatch);
		let vars = env(&[("HOST", "db"), ("PORT", "5432")]);
		let out = pattern.substitute(b"${HOST}:${PORT}", &vars);
		assert_eq!(&out[..], b"db:db");
	}

	#[test]
	fn test_each_match_mode_resolves_independently() {
		let pattern = default_pattern(SubstitutionMode::EachMatch);
		let vars = env(&[("HOST", "db"), ("PORT", "5432")]);
		let out = pattern.substitute(b"${HOST}:${PORT}", &vars);
		assert_eq!(&out[..], b"db:5432");
	}

	#[test]
	fn test_custom_pattern_and_group() {
		let pattern =
			CompiledPattern::new(r"(@@)([A-Z_]+)@@", 2, SubstitutionMode::EachMatch).unwrap();
		let out = pattern.substitute(b"user=@@DB_USER@@", &env(&[("DB_USER", "admin")]));
		assert_eq!(&out[..], b"user=admin");
	}

	#[test]
	fn test_non_utf8_text_is_preserved() {
		let pattern = default_pattern(SubstitutionMode::EachMatch);
		let out = pattern.substitute(b"\xff${A}\xfe", &env(&[("A", "ok")]));
		assert_eq!(&out[..], b"\xffok\xfe");
	}

	#[cfg(unix)]
	#[test]
	fn test_non_utf8_value_is_substituted() {
		use crate::env::ProcessEnv;
		use std::ffi::OsStr;
		use std::os::unix::ffi::OsStrExt;

		// SAFETY: the variable name is unique to this test
		unsafe {
			std::env::set_var("ENTRYPOINT_TEST_MATCHER_BIN", OsStr::from_bytes(b"caf\xe9"));
		}
		let pattern = default_pattern(SubstitutionMode::EachMatch);
		let out = pattern.substitute(b"v=${ENTRYPOINT_TEST_MATCHER_BIN};", &ProcessEnv);
		assert_eq!(&out[..], b"v=caf\xe9;");
		unsafe {
			std::env::remove_var("ENTRYPOINT_TEST_MATCHER_BIN");
		}
	}

	#[test]
	fn test_closure_environment() {
		let pattern = default_pattern(SubstitutionMode::EachMatch);
		let env = |name: &str| Some(name.to_lowercase());
		let out = pattern.substitute(b"${HOST}:${PORT}", &env);
		assert_eq!(&out[..], b"host:port");
	}

	#[test]
	fn test_hyphenated_variable_name() {
		let pattern = default_pattern(SubstitutionMode::EachMatch);
		let out = pattern.substitute(b"${my-var}", &env(&[("my-var", "v")]));
		assert_eq!(&out[..], b"v");
	}
}
