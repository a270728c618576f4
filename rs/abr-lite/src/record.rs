//! Per-chunk reporting hooks.
//!
//! Purely informational: nothing in the session depends on what a sink does with a record.

use std::time::Duration;

use crate::ChunkId;

/// One line of the per-chunk log.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
	/// Time since the session started, when the chunk finished downloading.
	pub session_elapsed: Duration,
	/// Time from sending the request to receiving the last payload byte.
	pub duration: Duration,
	/// Throughput of this chunk alone, bits per second.
	pub throughput: f64,
	/// Smoothed throughput after this chunk, bits per second.
	pub avg_throughput: f64,
	pub bitrate: u64,
	pub chunk: ChunkId,
}

/// A sink for per-chunk records.
///
/// Implementations should be fast; they are called inline between requests.
pub trait ChunkLog: Send + Sync {
	fn record(&self, record: &ChunkRecord);
}

/// Default sink that does nothing.
#[derive(Default)]
pub struct NoopLog;

impl ChunkLog for NoopLog {
	fn record(&self, _record: &ChunkRecord) {}
}
