use std::{
	fs::File,
	io::Write,
	path::Path,
	sync::Mutex,
};

use abr_native::abr_lite::{ChunkLog, ChunkRecord};
use anyhow::Context;

/// Writes one whitespace-separated line per chunk:
///
/// `<session elapsed s> <duration s> <throughput bps> <avg throughput bps> <bitrate> <chunk name>`
pub struct FileLog {
	file: Mutex<File>,
}

impl FileLog {
	pub fn create(path: &Path) -> anyhow::Result<Self> {
		let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
		Ok(Self { file: Mutex::new(file) })
	}
}

pub fn format_record(record: &ChunkRecord) -> String {
	format!(
		"{:.3} {:.3} {:.0} {:.0} {} {}",
		record.session_elapsed.as_secs_f64(),
		record.duration.as_secs_f64(),
		record.throughput,
		record.avg_throughput,
		record.bitrate,
		record.chunk.file_name(),
	)
}

impl ChunkLog for FileLog {
	fn record(&self, record: &ChunkRecord) {
		let line = format_record(record);

		let Ok(mut file) = self.file.lock() else {
			tracing::warn!(chunk = %record.chunk, "chunk log lock poisoned, dropping record");
			return;
		};

		if let Err(err) = writeln!(file, "{line}") {
			tracing::warn!(%err, "failed to write chunk log");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;
	use abr_native::abr_lite::ChunkId;

	fn record() -> ChunkRecord {
		ChunkRecord {
			session_elapsed: Duration::from_millis(1500),
			duration: Duration::from_millis(250),
			throughput: 4_000_000.4,
			avg_throughput: 3_500_000.0,
			bitrate: 1000000,
			chunk: ChunkId::new("bbb", 1000000, 3),
		}
	}

	#[test]
	fn line_format() {
		assert_eq!(
			format_record(&record()),
			"1.500 0.250 4000000 3500000 1000000 bbb_1000000_00003.m4s"
		);
	}

	#[test]
	fn appends_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("log.txt");

		let log = FileLog::create(&path).unwrap();
		log.record(&record());
		log.record(&record());

		let text = std::fs::read_to_string(&path).unwrap();
		assert_eq!(text.lines().count(), 2);
	}

	#[test]
	fn poisoned_lock_drops_record() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("log.txt");
		let log = FileLog::create(&path).unwrap();

		std::thread::scope(|scope| {
			let result = scope
				.spawn(|| {
					let _guard = log.file.lock().unwrap();
					panic!("poison the lock");
				})
				.join();
			assert!(result.is_err());
		});
		assert!(log.file.is_poisoned());

		// Must not panic.
		log.record(&record());
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
	}
}
