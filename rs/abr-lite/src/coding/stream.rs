use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};

use crate::coding::{Reader, Writer};

/// A [Writer] and [Reader] pair for a single connection.
pub struct Stream<S: AsyncRead + AsyncWrite> {
	pub writer: Writer<WriteHalf<S>>,
	pub reader: Reader<ReadHalf<S>>,
}

impl<S: AsyncRead + AsyncWrite> Stream<S> {
	/// Split a bidirectional byte stream into a reader and writer.
	pub fn new(io: S) -> Self {
		let (recv, send) = tokio::io::split(io);

		Stream {
			writer: Writer::new(send),
			reader: Reader::new(recv),
		}
	}

	/// Close the write half, ignoring errors from an already dead connection.
	pub async fn close(&mut self) {
		if let Err(err) = self.writer.finish().await {
			tracing::trace!(%err, "failed to close stream");
		}
	}
}
