use std::time::Duration;

use abr_lite::{Session, SessionConfig};
use anyhow::Context;
use clap::Args;
use tokio::net::TcpStream;

/// Configuration for the streaming client.
#[derive(Args, Clone, Debug)]
pub struct ClientConfig {
	/// The server to connect to, as `host:port`.
	#[arg(long = "server", env = "ABR_SERVER", default_value = "127.0.0.1:60000")]
	pub server: String,

	/// The weight of each new throughput sample in the moving average, between 0 and 1.
	///
	/// Higher values react faster, lower values smooth out noise.
	#[arg(long, env = "ABR_ALPHA", default_value_t = 0.5)]
	pub alpha: f64,

	/// Give up on a request that takes longer than this, e.g. `10s`.
	///
	/// By default a stalled server stalls the client forever.
	#[arg(long = "read-timeout", env = "ABR_READ_TIMEOUT", value_parser = humantime::parse_duration)]
	pub read_timeout: Option<Duration>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			server: "127.0.0.1:60000".to_string(),
			alpha: 0.5,
			read_timeout: None,
		}
	}
}

impl ClientConfig {
	pub fn init(self) -> anyhow::Result<Client> {
		if !(0.0..=1.0).contains(&self.alpha) {
			anyhow::bail!("alpha must be between 0 and 1, got {}", self.alpha);
		}

		Ok(Client {
			server: self.server,
			session: SessionConfig {
				alpha: self.alpha,
				read_timeout: self.read_timeout,
			},
		})
	}
}

/// Connects to a server over TCP.
#[derive(Clone, Debug)]
pub struct Client {
	server: String,
	session: SessionConfig,
}

impl Client {
	/// Open a new connection and a session for the given video.
	pub async fn connect(&self, video: &str) -> anyhow::Result<Session<TcpStream>> {
		let stream = TcpStream::connect(&self.server)
			.await
			.with_context(|| format!("failed to connect to {}", self.server))?;
		stream.set_nodelay(true)?;

		tracing::info!(server = %self.server, %video, "connected");

		Ok(Session::new(stream, video, &self.session)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_alpha_out_of_range() {
		let config = ClientConfig {
			alpha: 1.5,
			..Default::default()
		};
		assert!(config.init().is_err());
	}

	#[test]
	fn parses_humantime_timeout() {
		use clap::Parser;

		#[derive(Parser)]
		struct Cli {
			#[command(flatten)]
			client: ClientConfig,
		}

		let cli = Cli::parse_from(["test", "--alpha", "0.25", "--read-timeout", "1m 30s"]);
		assert_eq!(cli.client.alpha, 0.25);
		assert_eq!(cli.client.read_timeout, Some(Duration::from_secs(90)));
		assert_eq!(cli.client.server, "127.0.0.1:60000");
	}

	#[tokio::test]
	async fn connect_failure_has_context() {
		// Bind then drop to find a port nobody is listening on.
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let client = ClientConfig {
			server: addr.to_string(),
			..Default::default()
		}
		.init()
		.unwrap();

		let err = client.connect("bbb").await.err().expect("connect should fail");
		assert!(err.to_string().contains("failed to connect"));
	}
}
