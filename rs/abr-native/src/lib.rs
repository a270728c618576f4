//! Helper library for native adaptive bitrate streaming applications.
//!
//! Runs the [abr_lite] protocol over TCP:
//! - [Client] connects to a server and creates a streaming session.
//! - [Server] accepts connections and serves them from a [DirStorage].
//! - [Log] configures `tracing` output.
//!
//! Every config is a [clap::Args] so binaries can flatten them into their CLI.

mod client;
mod log;
mod server;
mod storage;

pub use client::*;
pub use log::*;
pub use server::*;
pub use storage::*;

// Re-export these crates.
pub use abr_lite;
