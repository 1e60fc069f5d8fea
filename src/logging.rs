//! Logging setup.
//!
//! Logs go to stderr so the wrapped command keeps stdout to itself.

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default level, which is `debug` when `verbose`
/// is set and `info` otherwise.
pub fn init(verbose: bool) {
	let level = if verbose { "debug" } else { "info" };

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	let stderr_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.compact();

	// A subscriber may already be installed, e.g. when called from tests
	let _ = tracing_subscriber::registry()
		.with(env_filter)
		.with(stderr_layer)
		.try_init();
}
