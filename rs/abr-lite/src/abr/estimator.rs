use std::time::Duration;

use crate::Error;

/// Instantaneous throughput in bits per second.
///
/// A non-positive elapsed time counts as zero throughput rather than dividing by zero.
pub fn throughput(bytes: usize, elapsed: Duration) -> f64 {
	let seconds = elapsed.as_secs_f64();
	match seconds > 0.0 {
		true => (bytes as f64 * 8.0) / seconds,
		false => 0.0,
	}
}

/// An exponentially-weighted moving average of download throughput.
///
/// The first sample seeds the average as-is; it is never blended with a prior.
#[derive(Debug, Clone)]
pub struct ThroughputEstimator {
	alpha: f64,
	average: Option<f64>,
}

impl ThroughputEstimator {
	/// `alpha` is the weight of each new sample, in `[0, 1]`.
	pub fn new(alpha: f64) -> Result<Self, Error> {
		if !(0.0..=1.0).contains(&alpha) {
			return Err(Error::InvalidAlpha(alpha));
		}

		Ok(Self { alpha, average: None })
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Record one throughput sample and return the updated average.
	pub fn record(&mut self, sample: f64) -> f64 {
		let average = match self.average {
			Some(average) => self.alpha * sample + (1.0 - self.alpha) * average,
			None => sample,
		};
		self.average = Some(average);
		average
	}

	/// The current average, or None before the first sample.
	pub fn estimate(&self) -> Option<f64> {
		self.average
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn throughput_bits_per_second() {
		assert_eq!(throughput(1000, Duration::from_secs(2)), 4000.0);
		assert_eq!(throughput(1000, Duration::ZERO), 0.0);
	}

	#[test]
	fn first_sample_seeds() {
		let mut estimator = ThroughputEstimator::new(0.2).unwrap();
		assert_eq!(estimator.estimate(), None);
		assert_eq!(estimator.record(1_000_000.0), 1_000_000.0);
		assert_eq!(estimator.estimate(), Some(1_000_000.0));
	}

	#[test]
	fn weighted_update() {
		let mut estimator = ThroughputEstimator::new(0.25).unwrap();
		estimator.record(1000.0);
		assert_eq!(estimator.record(2000.0), 1250.0);
	}

	#[test]
	fn alpha_zero_never_changes() {
		let mut estimator = ThroughputEstimator::new(0.0).unwrap();
		estimator.record(500.0);
		for sample in [0.0, 1e9, 42.0] {
			assert_eq!(estimator.record(sample), 500.0);
		}
	}

	#[test]
	fn alpha_one_tracks_sample() {
		let mut estimator = ThroughputEstimator::new(1.0).unwrap();
		estimator.record(500.0);
		for sample in [0.0, 1e9, 42.0] {
			assert_eq!(estimator.record(sample), sample);
		}
	}

	#[test]
	fn invalid_alpha() {
		assert!(matches!(ThroughputEstimator::new(1.5), Err(Error::InvalidAlpha(_))));
		assert!(matches!(ThroughputEstimator::new(-0.1), Err(Error::InvalidAlpha(_))));
		assert!(ThroughputEstimator::new(f64::NAN).is_err());
	}
}
