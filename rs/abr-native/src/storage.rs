use std::{
	io,
	path::{Path, PathBuf},
};

use abr_lite::{ChunkId, MANIFEST_NAME, Storage, StorageFuture};
use bytes::Bytes;

/// Serves videos from a directory tree:
///
/// ```text
/// <root>/<video>/manifest.mpd
/// <root>/<video>/chunks/<video>_<bitrate>_<index:05>.m4s
/// ```
///
/// Files are only ever read, so any number of connections can share one.
#[derive(Clone, Debug)]
pub struct DirStorage {
	root: PathBuf,
}

impl DirStorage {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// The manifest path, or None if the video name could escape the root.
	pub fn manifest_path(&self, video: &str) -> Option<PathBuf> {
		valid_name(video).then(|| self.root.join(video).join(MANIFEST_NAME))
	}

	/// The chunk path, or None if the video name could escape the root.
	pub fn chunk_path(&self, id: &ChunkId) -> Option<PathBuf> {
		valid_name(&id.video).then(|| self.root.join(&id.video).join("chunks").join(id.file_name()))
	}
}

impl Storage for DirStorage {
	fn manifest<'a>(&'a self, video: &'a str) -> StorageFuture<'a> {
		let path = self.manifest_path(video);
		Box::pin(read(path))
	}

	fn chunk<'a>(&'a self, id: &'a ChunkId) -> StorageFuture<'a> {
		let path = self.chunk_path(id);
		Box::pin(read(path))
	}
}

fn valid_name(video: &str) -> bool {
	!video.is_empty() && video != "." && video != ".." && !video.contains(['/', '\\', '\0'])
}

async fn read(path: Option<PathBuf>) -> io::Result<Option<Bytes>> {
	let Some(path) = path else {
		return Ok(None);
	};

	match tokio::fs::read(&path).await {
		Ok(data) => Ok(Some(data.into())),
		Err(err) if err.kind() == io::ErrorKind::NotFound => {
			tracing::trace!(path = %path.display(), "missing");
			Ok(None)
		}
		Err(err) => Err(err),
	}
}
