//! The manifest document: presentation length, segment length and the bitrate ladder.

use quick_xml::events::{BytesStart, Event, attributes::AttrError};
use thiserror::Error;

use crate::Ladder;

/// Root attribute holding the presentation length.
pub const TOTAL_DURATION_ATTR: &str = "mediaPresentationDuration";
/// Root attribute holding the segment length.
pub const SEGMENT_DURATION_ATTR: &str = "maxSegmentDuration";

const REPRESENTATION: &[u8] = b"Representation";
const BANDWIDTH: &[u8] = b"bandwidth";

#[derive(Error, Debug)]
pub enum ManifestError {
	#[error("invalid utf-8: {0}")]
	Utf8(#[from] std::str::Utf8Error),

	#[error("malformed document: {0}")]
	Parse(#[from] quick_xml::Error),

	#[error("malformed document: {0}")]
	NotWellFormed(&'static str),

	#[error("malformed attribute: {0}")]
	Attr(#[from] AttrError),

	#[error("invalid {name}: {value:?}")]
	InvalidAttribute { name: &'static str, value: String },

	#[error("segment duration must be positive: {0}")]
	InvalidSegmentDuration(f64),

	#[error("no representations")]
	NoRepresentations,

	#[error("no usable bitrates")]
	NoBitrates,
}

/// A parsed manifest, immutable for the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
	/// Presentation length in seconds.
	pub total_duration: f64,
	/// Nominal length of one chunk in seconds, always positive.
	pub segment_duration: f64,
	/// Available bitrates, sorted ascending.
	pub ladder: Ladder,
}

impl Manifest {
	/// Parse the raw manifest bytes.
	///
	/// Missing duration attributes default to `0` (total) and `1` (segment).
	/// Every `Representation` element in the document contributes its `bandwidth`;
	/// representations without a usable bandwidth are skipped.
	/// The document must have exactly one root element, closed before the end.
	pub fn parse(raw: &[u8]) -> Result<Self, ManifestError> {
		let text = std::str::from_utf8(raw)?;
		let mut reader = quick_xml::Reader::from_str(text);

		let mut root = false;
		let mut depth = 0usize;
		let mut total_duration = 0.0;
		let mut segment_duration = 1.0;
		let mut representations = 0usize;
		let mut bitrates = Vec::new();

		loop {
			let event = reader.read_event()?;
			let e = match &event {
				Event::Start(e) | Event::Empty(e) => e,
				Event::End(_) => {
					depth = depth.saturating_sub(1);
					continue;
				}
				Event::Text(text) if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) => {
					return Err(ManifestError::NotWellFormed("text outside the root element"));
				}
				Event::Eof => break,
				_ => continue,
			};

			let is_root = depth == 0;
			if matches!(event, Event::Start(_)) {
				depth += 1;
			}

			if is_root {
				if root {
					return Err(ManifestError::NotWellFormed("multiple root elements"));
				}
				root = true;

				if let Some(value) = attribute(e, TOTAL_DURATION_ATTR.as_bytes())? {
					total_duration = parse_seconds(TOTAL_DURATION_ATTR, &value)?;
				}
				if let Some(value) = attribute(e, SEGMENT_DURATION_ATTR.as_bytes())? {
					segment_duration = parse_seconds(SEGMENT_DURATION_ATTR, &value)?;
				}
				continue;
			}

			if e.local_name().as_ref() != REPRESENTATION {
				continue;
			}

			representations += 1;
			match attribute(e, BANDWIDTH)? {
				Some(value) => match value.trim().parse::<u64>() {
					Ok(bitrate) if bitrate > 0 => bitrates.push(bitrate),
					_ => tracing::warn!(%value, "skipping representation with invalid bandwidth"),
				},
				None => tracing::debug!("skipping representation without bandwidth"),
			}
		}

		if !root {
			return Err(ManifestError::NotWellFormed("no root element"));
		}
		if depth != 0 {
			return Err(ManifestError::NotWellFormed("unclosed element"));
		}

		if segment_duration <= 0.0 {
			return Err(ManifestError::InvalidSegmentDuration(segment_duration));
		}

		if representations == 0 {
			return Err(ManifestError::NoRepresentations);
		}

		let ladder = Ladder::new(bitrates).ok_or(ManifestError::NoBitrates)?;

		Ok(Self {
			total_duration,
			segment_duration,
			ladder,
		})
	}

	/// The number of chunks to request, truncated toward zero.
	///
	/// A trailing partial segment is never requested.
	pub fn chunk_count(&self) -> u64 {
		// Saturates to zero for negative or NaN ratios.
		(self.total_duration / self.segment_duration).floor() as u64
	}

	pub fn lowest_bitrate(&self) -> u64 {
		self.ladder.lowest()
	}
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ManifestError> {
	for attr in e.attributes() {
		let attr = attr?;
		if attr.key.local_name().as_ref() == name {
			let value = std::str::from_utf8(&attr.value)?;
			return Ok(Some(value.to_string()));
		}
	}

	Ok(None)
}

/// Parse plain seconds (`"10"`, `"2.5"`) or an ISO-8601 duration (`"PT1M4.5S"`).
fn parse_seconds(name: &'static str, value: &str) -> Result<f64, ManifestError> {
	let value = value.trim();
	let invalid = || ManifestError::InvalidAttribute {
		name,
		value: value.to_string(),
	};

	if let Ok(seconds) = value.parse::<f64>() {
		return match seconds.is_finite() {
			true => Ok(seconds),
			false => Err(invalid()),
		};
	}

	iso8601_duration::Duration::parse(value)
		.ok()
		.and_then(|duration| duration.to_std())
		.map(|duration| duration.as_secs_f64())
		.ok_or_else(invalid)
}
