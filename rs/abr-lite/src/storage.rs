use std::{collections::HashMap, future::Future, io, pin::Pin};

use bytes::Bytes;

use crate::ChunkId;

/// A pending storage lookup.
pub type StorageFuture<'a> = Pin<Box<dyn Future<Output = io::Result<Option<Bytes>>> + Send + 'a>>;

/// Resolves manifests and chunks to their bytes, or None if absent.
///
/// This keeps the dispatcher independent of where assets live. Callers (such as
/// `abr-native`) provide a concrete implementation backed by the filesystem.
pub trait Storage: Send + Sync {
	fn manifest<'a>(&'a self, video: &'a str) -> StorageFuture<'a>;
	fn chunk<'a>(&'a self, id: &'a ChunkId) -> StorageFuture<'a>;
}

/// An in-memory [Storage], mostly useful for tests and demos.
#[derive(Default, Clone)]
pub struct MemoryStorage {
	manifests: HashMap<String, Bytes>,
	chunks: HashMap<ChunkId, Bytes>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert_manifest(&mut self, video: impl Into<String>, manifest: impl Into<Bytes>) {
		self.manifests.insert(video.into(), manifest.into());
	}

	pub fn insert_chunk(&mut self, id: ChunkId, payload: impl Into<Bytes>) {
		self.chunks.insert(id, payload.into());
	}
}

impl Storage for MemoryStorage {
	fn manifest<'a>(&'a self, video: &'a str) -> StorageFuture<'a> {
		Box::pin(async move { Ok(self.manifests.get(video).cloned()) })
	}

	fn chunk<'a>(&'a self, id: &'a ChunkId) -> StorageFuture<'a> {
		Box::pin(async move { Ok(self.chunks.get(id).cloned()) })
	}
}
