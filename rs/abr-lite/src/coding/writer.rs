use std::fmt::Debug;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{Error, coding::*};

/// A writer for encoding messages to a byte stream.
pub struct Writer<S: AsyncWrite + Unpin> {
	stream: S,
	buffer: bytes::BytesMut,
}

impl<S: AsyncWrite + Unpin> Writer<S> {
	pub fn new(stream: S) -> Self {
		Self {
			stream,
			buffer: Default::default(),
		}
	}

	/// Encode the given message to the stream.
	pub async fn encode<T: Encode + Debug>(&mut self, msg: &T) -> Result<(), Error> {
		self.buffer.clear();
		msg.encode(&mut self.buffer);

		self.stream.write_all_buf(&mut self.buffer).await?;
		self.stream.flush().await?;

		Ok(())
	}

	/// Flush and shut down the write half.
	pub async fn finish(&mut self) -> Result<(), Error> {
		self.stream.flush().await?;
		self.stream.shutdown().await?;
		Ok(())
	}
}
