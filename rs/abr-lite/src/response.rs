use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::{
	Error,
	coding::{Decode, DecodeError, Encode, Reader},
};

const FOUND: u8 = b'1';
const NOT_FOUND: u8 = b'0';

/// A framed response: an existence flag, then a length-prefixed payload if found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
	NotFound,
	Found(Bytes),
}

impl Response {
	/// Read a response from the stream.
	///
	/// A closed stream before the flag byte counts as [Response::NotFound].
	/// A payload shorter than its declared length is [Error::Truncated].
	pub async fn read<S: AsyncRead + Unpin>(reader: &mut Reader<S>) -> Result<Self, Error> {
		match reader.decode_maybe::<u8>().await? {
			None | Some(NOT_FOUND) => Ok(Self::NotFound),
			Some(FOUND) => {
				let mut header = reader.read_exact(4).await?;
				let size = u32::decode(&mut header)? as usize;
				let payload = reader.read_exact(size).await?;
				Ok(Self::Found(payload))
			}
			Some(other) => Err(DecodeError::InvalidFlag(other).into()),
		}
	}
}

impl Encode for Response {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		match self {
			Self::NotFound => NOT_FOUND.encode(w),
			Self::Found(payload) => {
				FOUND.encode(w);
				payload.encode(w);
			}
		}
	}
}

impl Decode for Response {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		match u8::decode(buf)? {
			NOT_FOUND => Ok(Self::NotFound),
			FOUND => Ok(Self::Found(Bytes::decode(buf)?)),
			other => Err(DecodeError::InvalidFlag(other)),
		}
	}
}
