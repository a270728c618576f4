use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
	Error, MAX_REQUEST_SIZE, Request, RequestError, Response, Storage,
	coding::Stream,
};

/// What to do with a request that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Malformed {
	/// Drop it without replying; the client will stall waiting for a response.
	Ignore,
	/// Reply with the "not found" flag so the client fails fast.
	#[default]
	Reject,
}

/// Serves manifest and chunk requests from a [Storage].
///
/// Cheap to clone; each connection gets its own copy and nothing mutable is shared.
#[derive(Clone)]
pub struct Dispatcher {
	storage: Arc<dyn Storage>,
	malformed: Malformed,
}

impl Dispatcher {
	pub fn new(storage: impl Storage + 'static, malformed: Malformed) -> Self {
		Self {
			storage: Arc::new(storage),
			malformed,
		}
	}

	/// Serve requests on one connection until the peer disconnects.
	///
	/// Requests and responses strictly alternate. Returns the number of responses written.
	/// A connection reset by the peer is a normal disconnect.
	pub async fn serve<S: AsyncRead + AsyncWrite>(&self, io: S) -> Result<u64, Error> {
		let mut stream = Stream::new(io);
		let mut served = 0;

		loop {
			let raw = match stream.reader.read(MAX_REQUEST_SIZE).await {
				Ok(Some(raw)) => raw,
				Ok(None) => break,
				Err(err) if err.is_disconnect() => {
					tracing::debug!(%err, "peer disconnected");
					break;
				}
				Err(err) => return Err(err),
			};

			let response = match Request::parse(&raw) {
				Ok(request) => {
					tracing::debug!(%request, "request");
					self.respond(&request).await?
				}
				// A blank read ends the conversation.
				Err(RequestError::Empty) => break,
				Err(err) => match self.malformed {
					Malformed::Ignore => {
						tracing::warn!(%err, "ignoring malformed request");
						continue;
					}
					Malformed::Reject => {
						tracing::warn!(%err, "rejecting malformed request");
						Response::NotFound
					}
				},
			};

			match stream.writer.encode(&response).await {
				Ok(()) => served += 1,
				Err(err) if err.is_disconnect() => {
					tracing::debug!(%err, "peer disconnected");
					break;
				}
				Err(err) => return Err(err),
			}
		}

		stream.close().await;
		Ok(served)
	}

	async fn respond(&self, request: &Request) -> Result<Response, Error> {
		let payload = match request {
			Request::Manifest { video } => self.storage.manifest(video).await?,
			Request::Chunk(id) => self.storage.chunk(id).await?,
		};

		let payload = match payload {
			Some(payload) => payload,
			None => {
				tracing::debug!(%request, "not found");
				return Ok(Response::NotFound);
			}
		};

		if u32::try_from(payload.len()).is_err() {
			tracing::warn!(%request, size = payload.len(), "payload too large to frame");
			return Ok(Response::NotFound);
		}

		Ok(Response::Found(payload))
	}
}
