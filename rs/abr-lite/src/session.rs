use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::{
	io::{AsyncRead, AsyncWrite},
	sync::mpsc,
};

use crate::{
	Chunk, ChunkId, ChunkLog, ChunkRecord, Error, MAX_REQUEST_SIZE, Manifest, Request, Response, ThroughputEstimator,
	coding::Stream, throughput,
};

/// Where a [Session] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Connecting,
	AwaitManifest,
	AwaitFirstChunk,
	/// Waiting for the chunk with this index.
	Streaming(u64),
	Done,
	Errored,
}

impl State {
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Done | Self::Errored)
	}
}

/// Per-session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
	/// The EWMA weight given to each new throughput sample.
	pub alpha: f64,
	/// Give up if a single request/response exchange takes longer than this.
	///
	/// None blocks forever on a stalled peer.
	pub read_timeout: Option<Duration>,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			alpha: 0.5,
			read_timeout: None,
		}
	}
}

/// A client streaming session for one video over one connection.
///
/// Requests the manifest, then every chunk in order, one in flight at a time.
/// The first chunk is always fetched at the lowest bitrate; every later chunk at
/// whatever the ladder allows given the smoothed throughput so far.
/// Any failure ends the session: there is no retry.
pub struct Session<S: AsyncRead + AsyncWrite> {
	stream: Stream<S>,
	video: String,
	estimator: ThroughputEstimator,
	read_timeout: Option<Duration>,
	started: Instant,
	state: State,
	manifest: Option<Manifest>,
}

impl<S: AsyncRead + AsyncWrite> Session<S> {
	/// Create a session over an already connected byte stream.
	pub fn new(io: S, video: impl Into<String>, config: &SessionConfig) -> Result<Self, Error> {
		let video = video.into();
		if video.is_empty() || video.chars().any(char::is_whitespace) {
			return Err(Error::InvalidVideoName(video));
		}

		Ok(Self {
			stream: Stream::new(io),
			video,
			estimator: ThroughputEstimator::new(config.alpha)?,
			read_timeout: config.read_timeout,
			started: Instant::now(),
			state: State::Connecting,
			manifest: None,
		})
	}

	pub fn state(&self) -> State {
		self.state
	}

	/// The manifest, once received.
	pub fn manifest(&self) -> Option<&Manifest> {
		self.manifest.as_ref()
	}

	/// When the session was created; log timestamps are relative to this.
	pub fn started(&self) -> Instant {
		self.started
	}

	/// Stream the whole video, handing every fully received chunk to `playback` in order.
	///
	/// Returns the number of chunks delivered. On error, chunks already delivered stay
	/// valid and the connection is closed without sending anything further.
	#[tracing::instrument("session", skip_all, fields(video = %self.video))]
	pub async fn run(&mut self, playback: &mpsc::UnboundedSender<Chunk>, log: &dyn ChunkLog) -> Result<u64, Error> {
		if self.state.is_terminal() {
			return Err(Error::Closed);
		}

		let result = self.drive(playback, log).await;
		match &result {
			Ok(count) => {
				tracing::info!(chunks = count, "stream complete");
				self.transition(State::Done);
			}
			Err(err) => {
				tracing::warn!(%err, "stream ended early");
				self.transition(State::Errored);
			}
		}

		self.stream.close().await;
		result
	}

	async fn drive(&mut self, playback: &mpsc::UnboundedSender<Chunk>, log: &dyn ChunkLog) -> Result<u64, Error> {
		self.transition(State::AwaitManifest);

		let raw = self.exchange(&Request::manifest(self.video.clone())).await?;
		let manifest = Manifest::parse(&raw)?;

		let chunk_count = manifest.chunk_count();
		if chunk_count == 0 {
			return Err(Error::DegenerateManifest("zero chunk count"));
		}

		tracing::info!(chunk_count, bitrates = ?manifest.ladder.as_slice(), "received manifest");

		let ladder = manifest.ladder.clone();
		self.manifest = Some(manifest);
		self.transition(State::AwaitFirstChunk);

		// No throughput signal exists yet, so the first chunk seeds the estimate.
		let mut bitrate = ladder.lowest();

		for index in 0..chunk_count {
			let id = ChunkId::new(self.video.clone(), bitrate, index);

			let begin = Instant::now();
			let payload = self.exchange(&Request::chunk(id.clone())).await?;
			let duration = begin.elapsed();

			let sample = throughput(payload.len(), duration);
			let average = self.estimator.record(sample);

			let record = ChunkRecord {
				session_elapsed: self.started.elapsed(),
				duration,
				throughput: sample,
				avg_throughput: average,
				bitrate,
				chunk: id.clone(),
			};
			tracing::debug!(chunk = %id, size = payload.len(), ?duration, throughput = sample, average, "received chunk");
			log.record(&record);

			playback
				.send(Chunk { id, payload })
				.map_err(|_| Error::PlaybackClosed)?;

			self.transition(State::Streaming(index + 1));
			bitrate = ladder.select(average);
		}

		Ok(chunk_count)
	}

	/// Send one request and wait for its payload.
	async fn exchange(&mut self, request: &Request) -> Result<Bytes, Error> {
		let size = request.to_string().len();
		if size > MAX_REQUEST_SIZE {
			return Err(Error::RequestTooLong(size));
		}

		let stream = &mut self.stream;
		let exchange = async move {
			stream.writer.encode(request).await?;
			match Response::read(&mut stream.reader).await? {
				Response::Found(payload) => Ok::<_, Error>(payload),
				Response::NotFound => Err(Error::NotFound),
			}
		};

		match self.read_timeout {
			Some(timeout) => tokio::time::timeout(timeout, exchange)
				.await
				.map_err(|_| Error::Timeout)?,
			None => exchange.await,
		}
	}

	fn transition(&mut self, state: State) {
		tracing::trace!(from = ?self.state, to = ?state, "transition");
		self.state = state;
	}
}
