//! Placeholder substitution for config files.
//!
//! This module handles:
//! - Compiling the placeholder regex and resolving variables from the environment
//! - Rendering source files into their targets with the overwrite policy applied

pub mod filter;
pub mod matcher;

pub use filter::{FilterReport, filter_file, filter_files, filter_files_with};
pub use matcher::{CompiledPattern, SubstitutionMode};
