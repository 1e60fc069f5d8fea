use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use entrypoint_filter::config::parse_config_file;
use entrypoint_filter::env::ProcessEnv;
use entrypoint_filter::exec::{SystemRunner, display_command};
use entrypoint_filter::logging;
use entrypoint_filter::pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(name = "entrypoint-filter")]
#[command(
	author,
	version,
	about = "Container entrypoint that renders config files from environment variables before running a command"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Path to config file
	#[arg(long, value_name = "PATH", default_value = "config.json")]
	config: PathBuf,

	/// Forcibly overwrite existing files (equivalent to setting ForceOverwrite in the config)
	#[arg(long)]
	force: bool,

	/// Enable debug logging
	#[arg(short, long)]
	verbose: bool,

	/// Command to run once setup has finished
	#[arg(
		required = true,
		value_name = "COMMAND",
		trailing_var_arg = true,
		allow_hyphen_values = true
	)]
	command: Vec<String>,
}

/// Long options that may also be written with a single dash (`-config`).
const LONG_FLAGS: &[&str] = &["config", "force", "verbose", "help", "version"];

/// Long options that take their value from the next argument.
const VALUE_FLAGS: &[&str] = &["config"];

/// Rewrite single-dash long options into their double-dash form.
///
/// Only options before the command are touched; everything from the first
/// positional argument (or `--`) on is passed through as is.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
	I: IntoIterator<Item = OsString>,
{
	let mut args = args.into_iter();
	let mut normalized: Vec<OsString> = args.next().into_iter().collect();

	while let Some(arg) = args.next() {
		let Some(text) = arg.to_str() else {
			normalized.push(arg);
			break;
		};

		if text == "--" || !text.starts_with('-') || text == "-" {
			normalized.push(arg);
			break;
		}

		let flag = text.trim_start_matches('-');
		let (name, has_inline_value) = match flag.split_once('=') {
			Some((name, _)) => (name, true),
			None => (flag, false),
		};
		let is_long = text.starts_with("--") || LONG_FLAGS.contains(&name);
		let takes_value = is_long && !has_inline_value && VALUE_FLAGS.contains(&name);

		if is_long && !text.starts_with("--") {
			normalized.push(format!("-{text}").into());
		} else {
			normalized.push(arg);
		}

		if takes_value && let Some(value) = args.next() {
			normalized.push(value);
		}
	}

	normalized.extend(args);
	normalized
}

fn main() -> ExitCode {
	let cli = Cli::parse_from(normalize_args(std::env::args_os()));
	logging::init(cli.verbose);

	match run(&cli) {
		Ok(code) => code,
		Err(e) => {
			tracing::error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(cli: &Cli) -> Result<ExitCode> {
	let mut config = parse_config_file(&cli.config).context("Failed to load config")?;
	config.force_overwrite = config.force_overwrite || cli.force;

	let pipeline = Pipeline::new(&ProcessEnv, &SystemRunner);
	pipeline.prepare(&config)?;

	let exit_code = pipeline
		.run_final(&cli.command)
		.with_context(|| format!("Failed to execute: {}", display_command(&cli.command)))?;

	if exit_code == 0 {
		return Ok(ExitCode::SUCCESS);
	}

	tracing::error!(
		"Command exited with code {}: {}",
		exit_code,
		display_command(&cli.command)
	);
	// Signals are reported as -1; anything outside 1..=255 becomes 1
	let code = u8::try_from(exit_code)
		.ok()
		.filter(|code| *code != 0)
		.unwrap_or(1);
	Ok(ExitCode::from(code))
}
