use bytes::{Bytes, BytesMut};

/// Write the value to the buffer.
pub trait Encode: Sized {
	/// Encode the value to the given writer.
	///
	/// This will panic if the [bytes::BufMut] does not have enough capacity.
	fn encode<W: bytes::BufMut>(&self, w: &mut W);

	/// Encode the value into a [Bytes] buffer.
	///
	/// NOTE: This will allocate.
	fn encode_bytes(&self) -> Bytes {
		let mut buf = BytesMut::new();
		self.encode(&mut buf);
		buf.freeze()
	}
}

impl Encode for u8 {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_u8(*self);
	}
}

impl Encode for u32 {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_u32(*self);
	}
}

impl Encode for bytes::Bytes {
	/// Encode a payload with a 4-byte big-endian length prefix.
	///
	/// Panics if the payload does not fit in a u32 length.
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		let len = u32::try_from(self.len()).expect("payload too large");
		len.encode(w);
		w.put_slice(self);
	}
}
