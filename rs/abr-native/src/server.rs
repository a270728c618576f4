use std::{
	net::{Ipv6Addr, SocketAddr},
	path::PathBuf,
};

use abr_lite::{Dispatcher, Malformed};
use anyhow::Context;
use clap::{Args, ValueEnum};
use tokio::net::{TcpListener, TcpStream};

use crate::DirStorage;

/// What the server does with a request it cannot parse.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
	/// Drop it silently; the client keeps waiting for a reply.
	Ignore,
	/// Reply "not found".
	#[default]
	Reject,
}

impl From<MalformedPolicy> for Malformed {
	fn from(policy: MalformedPolicy) -> Self {
		match policy {
			MalformedPolicy::Ignore => Malformed::Ignore,
			MalformedPolicy::Reject => Malformed::Reject,
		}
	}
}

/// Configuration for the streaming server.
#[derive(Args, Clone, Debug)]
pub struct ServerConfig {
	/// Listen for TCP connections on the given address.
	#[arg(long, env = "ABR_BIND", default_value = "[::]:60000")]
	pub bind: SocketAddr,

	/// The directory containing one sub-directory per video.
	#[arg(long, env = "ABR_DIR", default_value = "data")]
	pub dir: PathBuf,

	/// How to answer requests that cannot be parsed.
	#[arg(long, env = "ABR_MALFORMED", value_enum, default_value_t)]
	pub malformed: MalformedPolicy,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind: SocketAddr::from((Ipv6Addr::UNSPECIFIED, 60000)),
			dir: PathBuf::from("data"),
			malformed: MalformedPolicy::default(),
		}
	}
}

impl ServerConfig {
	pub async fn init(self) -> anyhow::Result<Server> {
		let listener = TcpListener::bind(self.bind)
			.await
			.with_context(|| format!("failed to bind {}", self.bind))?;

		if !self.dir.is_dir() {
			tracing::warn!(dir = %self.dir.display(), "data directory does not exist");
		}

		let storage = DirStorage::new(self.dir);
		let dispatcher = Dispatcher::new(storage, self.malformed.into());

		Ok(Server { listener, dispatcher })
	}
}

/// Accepts TCP connections, serving each one on its own task.
pub struct Server {
	listener: TcpListener,
	dispatcher: Dispatcher,
}

impl Server {
	pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
		self.listener.local_addr().context("failed to get local address")
	}

	/// Accept the next connection.
	pub async fn accept(&mut self) -> anyhow::Result<(TcpStream, SocketAddr)> {
		let (stream, addr) = self.listener.accept().await.context("failed to accept")?;
		stream.set_nodelay(true)?;
		Ok((stream, addr))
	}

	/// Serve connections forever.
	///
	/// A failure on one connection never affects the others or the accept loop.
	pub async fn run(mut self) -> anyhow::Result<()> {
		let mut conn_id = 0;

		tracing::info!(addr = ?self.local_addr()?, "listening");

		loop {
			let (stream, addr) = match self.accept().await {
				Ok(conn) => conn,
				Err(err) => {
					tracing::warn!(%err, "failed to accept connection");
					continue;
				}
			};

			let id = conn_id;
			conn_id += 1;

			let dispatcher = self.dispatcher.clone();
			tokio::spawn(async move {
				if let Err(err) = run_connection(id, addr, stream, dispatcher).await {
					tracing::warn!(%err, "connection failed");
				}
			});
		}
	}
}

#[tracing::instrument("connection", skip_all, fields(id = id, addr = %addr))]
async fn run_connection(id: u64, addr: SocketAddr, stream: TcpStream, dispatcher: Dispatcher) -> anyhow::Result<()> {
	tracing::info!("connected");
	let served = dispatcher.serve(stream).await?;
	tracing::info!(served, "disconnected");
	Ok(())
}
