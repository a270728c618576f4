use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{ChunkId, coding::Encode};

/// The literal first token of a manifest request.
pub const MANIFEST_NAME: &str = "manifest.mpd";

/// The server reads at most this many bytes per request.
pub const MAX_REQUEST_SIZE: usize = 1024;

/// A request line sent from the client to the server.
///
/// Requests carry no delimiter; each one must arrive as a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
	/// `manifest.mpd <video>`
	Manifest { video: String },
	/// `<video> <bitrate> <index>`
	Chunk(ChunkId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
	#[error("empty request")]
	Empty,

	#[error("invalid utf-8")]
	InvalidUtf8,

	#[error("unexpected token count: {0}")]
	TokenCount(usize),

	#[error("invalid bitrate: {0}")]
	InvalidBitrate(String),

	#[error("invalid index: {0}")]
	InvalidIndex(String),
}

impl Request {
	pub fn manifest(video: impl Into<String>) -> Self {
		Self::Manifest { video: video.into() }
	}

	pub fn chunk(id: ChunkId) -> Self {
		Self::Chunk(id)
	}

	/// Parse a request from the raw bytes of a single read.
	pub fn parse(raw: &[u8]) -> Result<Self, RequestError> {
		std::str::from_utf8(raw)
			.map_err(|_| RequestError::InvalidUtf8)?
			.parse()
	}
}

impl FromStr for Request {
	type Err = RequestError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let tokens: Vec<&str> = s.split_whitespace().collect();

		match tokens.as_slice() {
			[] => Err(RequestError::Empty),
			[MANIFEST_NAME] => Err(RequestError::TokenCount(1)),
			// A bare video name is also accepted as a manifest request.
			[video] => Ok(Self::manifest(*video)),
			[MANIFEST_NAME, video] => Ok(Self::manifest(*video)),
			[video, bitrate, index] => {
				let bitrate = canonical(bitrate).ok_or_else(|| RequestError::InvalidBitrate(bitrate.to_string()))?;
				let index = canonical(index).ok_or_else(|| RequestError::InvalidIndex(index.to_string()))?;
				Ok(Self::Chunk(ChunkId::new(*video, bitrate, index)))
			}
			other => Err(RequestError::TokenCount(other.len())),
		}
	}
}

// Chunks are keyed by exactly the text sent, so `0500` or `+500` must not alias `500`.
fn canonical(token: &str) -> Option<u64> {
	let value: u64 = token.parse().ok()?;
	(value.to_string() == token).then_some(value)
}

impl fmt::Display for Request {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Manifest { video } => write!(f, "{MANIFEST_NAME} {video}"),
			Self::Chunk(id) => write!(f, "{} {} {}", id.video, id.bitrate, id.index),
		}
	}
}

impl Encode for Request {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_slice(self.to_string().as_bytes());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn manifest_line() {
		let req = Request::manifest("bbb");
		assert_eq!(req.to_string(), "manifest.mpd bbb");
		assert_eq!(&req.encode_bytes()[..], b"manifest.mpd bbb");
	}

	#[test]
	fn chunk_line() {
		let req = Request::chunk(ChunkId::new("bbb", 500000, 0));
		assert_eq!(req.to_string(), "bbb 500000 0");
	}

	#[test]
	fn parse_trims_whitespace() {
		let req = Request::parse(b"  bbb 1000000 12\n").unwrap();
		assert_eq!(req, Request::chunk(ChunkId::new("bbb", 1000000, 12)));
	}

	#[test]
	fn parse_manifest_forms() {
		assert_eq!(Request::parse(b"manifest.mpd bbb").unwrap(), Request::manifest("bbb"));
		assert_eq!(Request::parse(b"bbb").unwrap(), Request::manifest("bbb"));
	}

	#[test]
	fn parse_errors() {
		assert_eq!(Request::parse(b"   "), Err(RequestError::Empty));
		assert_eq!(Request::parse(b"a b c d"), Err(RequestError::TokenCount(4)));
		assert_eq!(Request::parse(b"a b"), Err(RequestError::TokenCount(2)));
		assert_eq!(Request::parse(b"manifest.mpd"), Err(RequestError::TokenCount(1)));
		assert_eq!(
			Request::parse(b"bbb fast 1"),
			Err(RequestError::InvalidBitrate("fast".to_string()))
		);
		assert_eq!(
			Request::parse(b"bbb 100 -1"),
			Err(RequestError::InvalidIndex("-1".to_string()))
		);
		assert_eq!(Request::parse(&[0xff, 0xfe]), Err(RequestError::InvalidUtf8));
	}

	#[test]
	fn parse_rejects_non_canonical_numbers() {
		assert_eq!(
			Request::parse(b"bbb 0500000 0"),
			Err(RequestError::InvalidBitrate("0500000".to_string()))
		);
		assert_eq!(
			Request::parse(b"bbb +500000 0"),
			Err(RequestError::InvalidBitrate("+500000".to_string()))
		);
		assert_eq!(
			Request::parse(b"bbb 500000 007"),
			Err(RequestError::InvalidIndex("007".to_string()))
		);
		assert_eq!(
			Request::parse(b"bbb 500000 0").unwrap(),
			Request::chunk(ChunkId::new("bbb", 500000, 0))
		);
	}
}
