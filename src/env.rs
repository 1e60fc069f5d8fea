//! Environment variable lookup.
//!
//! Placeholder substitution and identity remapping read variables through the
//! [`Environment`] trait so they can run against a fixed map in tests.

use std::collections::HashMap;
use std::ffi::OsString;

/// Read-only lookup of environment variables by name.
pub trait Environment {
	/// Value of `name`, or `None` when unset. Values need not be UTF-8.
	fn var(&self, name: &str) -> Option<OsString>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
	fn var(&self, name: &str) -> Option<OsString> {
		// var_os panics on names containing '=' or NUL
		if name.is_empty() || name.contains(['=', '\0']) {
			return None;
		}
		std::env::var_os(name)
	}
}

impl Environment for HashMap<String, String> {
	fn var(&self, name: &str) -> Option<OsString> {
		self.get(name).map(OsString::from)
	}
}

/// Implement Environment for closures
impl<F> Environment for F
where
	F: Fn(&str) -> Option<String>,
{
	fn var(&self, name: &str) -> Option<OsString> {
		self(name).map(OsString::from)
	}
}
