//! Structured logging setup shared by the binary and embedders.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a compact stderr subscriber.
///
/// `verbose` lowers the default filter to `debug`; `RUST_LOG` overrides it
/// when set. Calling this more than once keeps the first subscriber.
pub fn initialize(verbose: bool) {
	let default_filter = if verbose { "lookout=debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(false)
				.compact(),
		)
		.try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn repeated_initialization_is_harmless() {
		initialize(false);
		initialize(true);
		tracing::debug!("still logging");
	}
}
