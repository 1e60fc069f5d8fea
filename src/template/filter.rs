use crate::config::{Config, FileMapping};
use crate::env::Environment;
use crate::error::{EntrypointError, Result};
use crate::template::matcher::CompiledPattern;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What happened to each file during a filtering pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
	/// Targets that were written.
	pub written: Vec<PathBuf>,

	/// Targets left alone because they already existed.
	pub skipped: Vec<PathBuf>,
}

/// Render one source file into its target, copying the source permissions.
pub fn filter_file<E>(mapping: &FileMapping, pattern: &CompiledPattern, env: &E) -> Result<()>
where
	E: Environment + ?Sized,
{
	let source = &mapping.path;
	let data = fs::read(source).map_err(|source_err| EntrypointError::SourceRead {
		path: source.clone(),
		source: source_err,
	})?;

	let permissions = fs::metadata(source)
		.map_err(|source_err| EntrypointError::SourceStat {
			path: source.clone(),
			source: source_err,
		})?
		.permissions();

	let rendered = pattern.substitute(&data, env);

	let target = &mapping.target_path;
	let write_err = |source: std::io::Error| EntrypointError::TargetWrite {
		path: target.clone(),
		source,
	};
	fs::write(target, &rendered).map_err(write_err)?;
	// fs::write keeps the mode of an existing target
	fs::set_permissions(target, permissions).map_err(write_err)?;

	Ok(())
}

/// Render every file in the config, in order, stopping at the first error.
///
/// Targets that already exist are skipped unless `force_overwrite` is set.
/// Files written before a failure stay on disk.
pub fn filter_files<E>(config: &Config, env: &E) -> Result<FilterReport>
where
	E: Environment + ?Sized,
{
	tracing::info!("Regex is: {}", config.variable_regex());
	let pattern = CompiledPattern::from_config(config)?;

	filter_files_with(&config.files, &pattern, config.force_overwrite, env)
}

/// Like [`filter_files`] with an already compiled pattern.
pub fn filter_files_with<E>(
	files: &[FileMapping],
	pattern: &CompiledPattern,
	force_overwrite: bool,
	env: &E,
) -> Result<FilterReport>
where
	E: Environment + ?Sized,
{
	let mut report = FilterReport::default();

	for mapping in files {
		if !force_overwrite && target_exists(&mapping.target_path)? {
			if mapping.is_in_place() {
				tracing::info!(
					"Skipping file: {} (in place, needs ForceOverwrite or --force)",
					mapping.path.display()
				);
			} else {
				tracing::info!(
					"Skipping file: {} -> {} (already exists)",
					mapping.path.display(),
					mapping.target_path.display()
				);
			}
			report.skipped.push(mapping.target_path.clone());
			continue;
		}

		tracing::info!(
			"Filtering file: {} -> {}",
			mapping.path.display(),
			mapping.target_path.display()
		);
		filter_file(mapping, pattern, env)?;
		report.written.push(mapping.target_path.clone());
	}

	Ok(report)
}

fn target_exists(path: &Path) -> Result<bool> {
	match fs::metadata(path) {
		Ok(_) => Ok(true),
		Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
		Err(source) => Err(EntrypointError::TargetStat {
			path: path.to_path_buf(),
			source,
		}),
	}
}
