//! Configuration loading and parsing.
//!
//! This module handles:
//! - JSON config file parsing
//! - Default values for the placeholder regex, capture group and UID/GID variables

pub mod parser;
pub mod types;

pub use parser::{parse_config_file, parse_config_str};
pub use types::{
	Config, DEFAULT_GID_VARIABLE, DEFAULT_REGEX_GROUP, DEFAULT_UID_VARIABLE,
	DEFAULT_VARIABLE_REGEX, FileMapping, IdentityConfig,
};
