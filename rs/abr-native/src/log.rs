use clap::Args;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration.
#[derive(Args, Clone, Debug)]
pub struct Log {
	/// The level of log output; `RUST_LOG` directives still apply on top.
	#[arg(id = "log-level", long = "log-level", env = "ABR_LOG_LEVEL", default_value = "info")]
	pub level: tracing::Level,
}

impl Default for Log {
	fn default() -> Self {
		Self {
			level: tracing::Level::INFO,
		}
	}
}

impl Log {
	pub fn level(&self) -> LevelFilter {
		LevelFilter::from_level(self.level)
	}

	/// Install the global subscriber, writing to stderr.
	///
	/// Panics if a global subscriber is already installed.
	pub fn init(&self) {
		let filter = EnvFilter::builder()
			.with_default_directive(self.level().into())
			.from_env_lossy();

		let fmt_layer = tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.with_filter(filter);

		tracing_subscriber::registry().with(fmt_layer).init();
	}
}
