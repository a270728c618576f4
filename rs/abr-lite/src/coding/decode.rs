use thiserror::Error;

/// Read a value from the buffer.
///
/// If [DecodeError::Short] is returned, the caller should try again with more data.
pub trait Decode: Sized {
	/// Decode the value from the given buffer.
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError>;
}

/// A decode error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
	#[error("short buffer")]
	Short,

	#[error("invalid flag: {0:#04x}")]
	InvalidFlag(u8),
}

impl Decode for u8 {
	fn decode<R: bytes::Buf>(r: &mut R) -> Result<Self, DecodeError> {
		match r.has_remaining() {
			true => Ok(r.get_u8()),
			false => Err(DecodeError::Short),
		}
	}
}

impl Decode for u32 {
	/// Decode a big-endian u32.
	fn decode<R: bytes::Buf>(r: &mut R) -> Result<Self, DecodeError> {
		match r.remaining() >= 4 {
			true => Ok(r.get_u32()),
			false => Err(DecodeError::Short),
		}
	}
}

impl Decode for bytes::Bytes {
	/// Decode a payload with a 4-byte big-endian length prefix.
	fn decode<R: bytes::Buf>(r: &mut R) -> Result<Self, DecodeError> {
		let len = u32::decode(r)? as usize;
		if r.remaining() < len {
			return Err(DecodeError::Short);
		}
		Ok(r.copy_to_bytes(len))
	}
}
