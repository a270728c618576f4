/// Required headroom: a bitrate is only chosen if the estimate is at least this multiple of it.
pub const SAFETY_MARGIN: f64 = 1.5;

/// The available bitrates of a video, sorted ascending and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ladder {
	bitrates: Vec<u64>,
}

impl Ladder {
	/// Build a ladder from any set of bitrates, or None if it would be empty.
	pub fn new(bitrates: impl IntoIterator<Item = u64>) -> Option<Self> {
		let mut bitrates: Vec<u64> = bitrates.into_iter().collect();
		bitrates.sort_unstable();
		bitrates.dedup();

		match bitrates.is_empty() {
			true => None,
			false => Some(Self { bitrates }),
		}
	}

	pub fn lowest(&self) -> u64 {
		self.bitrates[0]
	}

	pub fn highest(&self) -> u64 {
		self.bitrates[self.bitrates.len() - 1]
	}

	pub fn as_slice(&self) -> &[u64] {
		&self.bitrates
	}

	/// Pick the highest bitrate `b` with `throughput >= SAFETY_MARGIN * b`,
	/// falling back to the lowest bitrate.
	pub fn select(&self, throughput: f64) -> u64 {
		self.bitrates
			.iter()
			.rev()
			.find(|&&bitrate| throughput >= SAFETY_MARGIN * bitrate as f64)
			.copied()
			.unwrap_or_else(|| self.lowest())
	}
}
