//! Rate adaptation: a smoothed throughput estimate and a bitrate ladder to pick from.

mod estimator;
mod ladder;

pub use estimator::*;
pub use ladder::*;
