use std::{cmp, fmt::Debug};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Error, coding::*};

/// A reader for decoding messages from a byte stream.
pub struct Reader<S: AsyncRead + Unpin> {
	stream: S,
	buffer: BytesMut,
}

impl<S: AsyncRead + Unpin> Reader<S> {
	pub fn new(stream: S) -> Self {
		Self {
			stream,
			buffer: Default::default(),
		}
	}

	/// Read more data into the buffer, returning false if the stream is closed.
	async fn fill(&mut self) -> Result<bool, Error> {
		Ok(self.stream.read_buf(&mut self.buffer).await? > 0)
	}

	/// Decode the next message from the stream.
	pub async fn decode<T: Decode + Debug>(&mut self) -> Result<T, Error> {
		loop {
			let mut cursor = std::io::Cursor::new(&self.buffer);
			match T::decode(&mut cursor) {
				Ok(msg) => {
					self.buffer.advance(cursor.position() as usize);
					return Ok(msg);
				}
				Err(DecodeError::Short) => {
					if !self.fill().await? {
						// Stream closed while we still need more data
						return Err(Error::Decode(DecodeError::Short));
					}
				}
				Err(e) => return Err(Error::Decode(e)),
			}
		}
	}

	/// Decode the next message unless the stream is closed.
	pub async fn decode_maybe<T: Decode + Debug>(&mut self) -> Result<Option<T>, Error> {
		if self.buffer.is_empty() && !self.fill().await? {
			return Ok(None);
		}

		Ok(Some(self.decode().await?))
	}

	/// Returns a non-zero chunk of data, or None if the stream is closed.
	pub async fn read(&mut self, max: usize) -> Result<Option<Bytes>, Error> {
		if self.buffer.is_empty() {
			let mut limited = (&mut self.buffer).limit(max);
			if self.stream.read_buf(&mut limited).await? == 0 {
				return Ok(None);
			}
		}

		let size = cmp::min(max, self.buffer.len());
		Ok(Some(self.buffer.split_to(size).freeze()))
	}

	/// Read exactly the given number of bytes from the stream.
	///
	/// Returns [Error::Truncated] if the stream closes first; the partial data is discarded.
	pub async fn read_exact(&mut self, size: usize) -> Result<Bytes, Error> {
		// An optimization to avoid a copy if we have enough data in the buffer
		if self.buffer.len() >= size {
			return Ok(self.buffer.split_to(size).freeze());
		}

		let data = BytesMut::with_capacity(size.min(u16::MAX as usize));
		let mut buf = data.limit(size);

		let buffered = self.buffer.split();
		buf.put(buffered);

		while buf.has_remaining_mut() {
			if self.stream.read_buf(&mut buf).await? == 0 {
				return Err(Error::Truncated {
					expected: size,
					received: buf.get_ref().len(),
				});
			}
		}

		Ok(buf.into_inner().freeze())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::io::AsyncWriteExt;

	#[tokio::test]
	async fn decode_across_reads() {
		let (mut tx, rx) = tokio::io::duplex(64);
		let mut reader = Reader::new(rx);

		tokio::spawn(async move {
			tx.write_all(&[0x00, 0x00]).await.unwrap();
			tokio::task::yield_now().await;
			tx.write_all(&[0x01, 0x00]).await.unwrap();
		});

		let value: u32 = reader.decode().await.unwrap();
		assert_eq!(value, 256);
	}

	#[tokio::test]
	async fn decode_maybe_closed() {
		let (tx, rx) = tokio::io::duplex(64);
		drop(tx);

		let mut reader = Reader::new(rx);
		assert!(reader.decode_maybe::<u8>().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn decode_short_on_close() {
		let (mut tx, rx) = tokio::io::duplex(64);
		tx.write_all(&[0x00, 0x01]).await.unwrap();
		drop(tx);

		let mut reader = Reader::new(rx);
		let err = reader.decode::<u32>().await.unwrap_err();
		assert!(matches!(err, Error::Decode(DecodeError::Short)));
	}

	#[tokio::test]
	async fn read_exact_truncated() {
		let (mut tx, rx) = tokio::io::duplex(4096);
		tx.write_all(&[7u8; 50]).await.unwrap();
		drop(tx);

		let mut reader = Reader::new(rx);
		let err = reader.read_exact(1000).await.unwrap_err();
		assert!(matches!(
			err,
			Error::Truncated {
				expected: 1000,
				received: 50
			}
		));
	}

	#[tokio::test]
	async fn read_is_bounded() {
		let (mut tx, rx) = tokio::io::duplex(4096);
		tx.write_all(&[b'x'; 2000]).await.unwrap();
		drop(tx);

		let mut reader = Reader::new(rx);
		let first = reader.read(1024).await.unwrap().unwrap();
		assert!(first.len() <= 1024);
	}
}
