use std::path::PathBuf;

use abr_native::abr_lite::Chunk;
use anyhow::Context;
use tokio::sync::mpsc;

/// Stores received chunks on disk and hands them to the player in index order.
pub struct Playback {
	out: PathBuf,
}

impl Playback {
	pub async fn new(out: PathBuf) -> anyhow::Result<Self> {
		tokio::fs::create_dir_all(&out)
			.await
			.with_context(|| format!("failed to create {}", out.display()))?;

		Ok(Self { out })
	}

	/// Consume chunks until the session drops its sender, returning how many were played.
	pub async fn run(self, mut chunks: mpsc::UnboundedReceiver<Chunk>) -> anyhow::Result<u64> {
		let mut played = 0;

		while let Some(chunk) = chunks.recv().await {
			let path = self.out.join(chunk.id.file_name());
			tokio::fs::write(&path, &chunk.payload)
				.await
				.with_context(|| format!("failed to write {}", path.display()))?;

			self.play(path);
			played += 1;
		}

		Ok(played)
	}

	// The decoder and renderer live outside this crate; they pick chunks up from disk.
	fn play(&self, path: PathBuf) {
		tracing::info!(path = %path.display(), "playing chunk");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use abr_native::abr_lite::ChunkId;
	use bytes::Bytes;

	#[tokio::test]
	async fn stores_chunks_in_order() {
		let dir = tempfile::tempdir().unwrap();
		let out = dir.path().join("tmp");
		let playback = Playback::new(out.clone()).await.unwrap();

		let (tx, rx) = mpsc::unbounded_channel();
		for index in 0..3 {
			tx.send(Chunk {
				id: ChunkId::new("bbb", 100, index),
				payload: Bytes::from(vec![index as u8; 10]),
			})
			.unwrap();
		}
		drop(tx);

		assert_eq!(playback.run(rx).await.unwrap(), 3);
		assert_eq!(std::fs::read(out.join("bbb_100_00002.m4s")).unwrap(), vec![2u8; 10]);
	}
}
