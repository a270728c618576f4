mod client;
mod log_file;
mod playback;
mod server;

use std::path::PathBuf;

use client::*;
use server::*;

use clap::{Parser, Subcommand};

#[derive(Parser, Clone)]
pub struct Cli {
	#[command(flatten)]
	log: abr_native::Log,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Clone)]
pub enum Command {
	/// Serve videos from a directory.
	Serve {
		#[command(flatten)]
		config: abr_native::ServerConfig,
	},
	/// Stream a video, saving each chunk and handing it to the player.
	Stream {
		#[command(flatten)]
		config: abr_native::ClientConfig,

		/// The name of the video to stream.
		#[arg(long)]
		video: String,

		/// Directory where received chunks are stored.
		#[arg(long, default_value = "tmp")]
		out: PathBuf,

		/// Write one line per chunk to this file.
		#[arg(long)]
		log_file: Option<PathBuf>,
	},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	cli.log.init();

	match cli.command {
		Command::Serve { config } => server(config).await,
		Command::Stream {
			config,
			video,
			out,
			log_file,
		} => client(config, video, out, log_file).await,
	}
}
