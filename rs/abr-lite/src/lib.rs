//! # abr-lite: adaptive bitrate streaming over a byte stream
//!
//! A client requests a manifest and then every chunk of a video, one at a time,
//! choosing the bitrate of each chunk from the throughput it has observed so far.
//! A server answers those requests from a [Storage].
//!
//! ## Wire format
//!
//! Requests are UTF-8 text lines without a delimiter, each sent as one write:
//! - `manifest.mpd <video>` requests the manifest.
//! - `<video> <bitrate> <index>` requests one chunk.
//!
//! Responses are an existence flag (`'1'` or `'0'`), then if found a 4-byte
//! big-endian length and exactly that many payload bytes. See [Response].
//!
//! ## API
//!
//! - [Session]: the client side, driving the manifest and chunk requests for one video.
//! - [Dispatcher]: the server side, serving one connection at a time from a [Storage].
//! - [Manifest]: the parsed manifest document with its [Ladder] of bitrates.
//! - [ThroughputEstimator]: the smoothed throughput estimate used to pick from the ladder.
//! - [ChunkLog]: receives one [ChunkRecord] per downloaded chunk.
//!
//! Both sides are generic over any tokio [AsyncRead](tokio::io::AsyncRead) +
//! [AsyncWrite](tokio::io::AsyncWrite); see `abr-native` for TCP.

mod abr;
mod chunk;
mod error;
mod manifest;
mod record;
mod request;
mod response;
mod server;
mod session;
mod storage;

pub mod coding;

pub use abr::*;
pub use chunk::*;
pub use error::*;
pub use manifest::*;
pub use record::*;
pub use request::*;
pub use response::*;
pub use server::*;
pub use session::*;
pub use storage::*;
