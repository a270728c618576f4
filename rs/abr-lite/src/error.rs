use crate::{ManifestError, coding};

/// An error that ends a streaming session.
///
/// None of these are retried; the caller sees the stream end early.
#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("transport error: {0}")]
	Transport(#[from] std::io::Error),

	#[error("decode error: {0}")]
	Decode(#[from] coding::DecodeError),

	#[error("not found")]
	NotFound,

	#[error("truncated payload: expected {expected} bytes, received {received}")]
	Truncated { expected: usize, received: usize },

	#[error("manifest error: {0}")]
	Manifest(#[from] ManifestError),

	#[error("degenerate manifest: {0}")]
	DegenerateManifest(&'static str),

	#[error("request too long: {0} bytes")]
	RequestTooLong(usize),

	#[error("invalid video name: {0:?}")]
	InvalidVideoName(String),

	#[error("invalid alpha: {0}")]
	InvalidAlpha(f64),

	#[error("timeout")]
	Timeout,

	#[error("playback closed")]
	PlaybackClosed,

	#[error("session closed")]
	Closed,
}

impl Error {
	/// Returns true if the peer reset or dropped the connection.
	pub fn is_disconnect(&self) -> bool {
		match self {
			Self::Transport(err) => matches!(
				err.kind(),
				std::io::ErrorKind::ConnectionReset
					| std::io::ErrorKind::ConnectionAborted
					| std::io::ErrorKind::BrokenPipe
					| std::io::ErrorKind::UnexpectedEof
			),
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io;

	use super::*;

	#[test]
	fn disconnect_kinds() {
		for kind in [
			io::ErrorKind::ConnectionReset,
			io::ErrorKind::ConnectionAborted,
			io::ErrorKind::BrokenPipe,
			io::ErrorKind::UnexpectedEof,
		] {
			assert!(Error::Transport(io::Error::from(kind)).is_disconnect(), "{kind:?}");
		}
	}

	#[test]
	fn other_errors_are_not_disconnects() {
		assert!(!Error::Transport(io::Error::from(io::ErrorKind::PermissionDenied)).is_disconnect());
		assert!(!Error::Transport(io::Error::from(io::ErrorKind::TimedOut)).is_disconnect());
		assert!(!Error::NotFound.is_disconnect());
		assert!(!Error::Timeout.is_disconnect());
	}
}
