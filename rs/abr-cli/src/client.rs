use std::path::PathBuf;

use abr_native::abr_lite::{ChunkLog, NoopLog};
use tokio::sync::mpsc;

use crate::{log_file::FileLog, playback::Playback};

pub async fn client(
	config: abr_native::ClientConfig,
	video: String,
	out: PathBuf,
	log_file: Option<PathBuf>,
) -> anyhow::Result<()> {
	let client = config.init()?;

	let log: Box<dyn ChunkLog> = match log_file {
		Some(path) => Box::new(FileLog::create(&path)?),
		None => Box::new(NoopLog),
	};

	let playback = Playback::new(out).await?;
	let (tx, rx) = mpsc::unbounded_channel();
	let player = tokio::spawn(playback.run(rx));

	let mut session = client.connect(&video).await?;

	let res = tokio::select! {
		res = session.run(&tx, log.as_ref()) => res.map(|_| ()).map_err(anyhow::Error::from),
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("cancelled");
			Ok(())
		},
	};

	// Let the player drain whatever was already delivered.
	drop(tx);
	let played = player.await??;
	tracing::info!(played, "playback finished");

	res
}
