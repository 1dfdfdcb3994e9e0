use tracing_subscriber::{
	fmt, prelude::*, EnvFilter,
};

/// Directive used when `RUST_LOG` isn't set.
const DEFAULT_FILTER: &str = "warn";

/// Initialize a tracing subscriber that prints compact logs to standard error.
///
/// The `RUST_LOG` environment variable selects what is logged, defaulting to warnings and errors.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let fmt_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_level(true)
		.compact();

	let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

	tracing_subscriber::registry()
		.with(filter_layer)
		.with(fmt_layer)
		.try_init()?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing::{
		info, warn,
	};

	#[test]
	fn second_init_fails() {
		let _ = init();
		assert!(init().is_err());

		info!("This is an info message");
		warn!("This is a warning message");
	}
}
