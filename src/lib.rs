//! entrypoint-filter - container entrypoint that renders config files from
//! environment variables, optionally remaps a user's UID and a group's GID,
//! runs setup commands and then runs the real workload.
//!
//! This library provides the core functionality, including:
//! - JSON configuration parsing with defaults
//! - Placeholder substitution in files (`${NAME}` by default)
//! - UID/GID remapping through `usermod`/`groupmod`
//! - Ordered command execution with stdio passed through
//!
//! # Example
//!
//! ```no_run
//! use entrypoint_filter::config::parse_config_file;
//! use entrypoint_filter::env::ProcessEnv;
//! use entrypoint_filter::exec::SystemRunner;
//! use entrypoint_filter::pipeline::Pipeline;
//! use std::path::Path;
//!
//! let config = parse_config_file(Path::new("config.json")).unwrap();
//! let command = vec!["nginx".to_string(), "-g".to_string(), "daemon off;".to_string()];
//!
//! let exit_code = Pipeline::new(&ProcessEnv, &SystemRunner)
//!     .run(&config, &command)
//!     .unwrap();
//! std::process::exit(exit_code);
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod exec;
pub mod identity;
pub mod logging;
pub mod pipeline;
pub mod template;

pub use error::{EntrypointError, Result};
