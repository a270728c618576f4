use std::fmt;

use bytes::Bytes;

/// Identifies one chunk of one video at one bitrate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId {
	pub video: String,
	/// Bits per second of the representation.
	pub bitrate: u64,
	/// Zero-based sequence number.
	pub index: u64,
}

impl ChunkId {
	pub fn new(video: impl Into<String>, bitrate: u64, index: u64) -> Self {
		Self {
			video: video.into(),
			bitrate,
			index,
		}
	}

	/// The file name used to store this chunk, e.g. `bbb_500000_00003.m4s`.
	pub fn file_name(&self) -> String {
		format!("{}_{}_{:05}.m4s", self.video, self.bitrate, self.index)
	}
}

impl fmt::Display for ChunkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.video, self.bitrate, self.index)
	}
}

/// A fully received chunk, handed to the playback consumer.
#[derive(Debug, Clone)]
pub struct Chunk {
	pub id: ChunkId,
	pub payload: Bytes,
}
