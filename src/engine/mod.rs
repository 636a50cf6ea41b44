//! Pure computation engines: the lane capacity simulator and the toxic-flow classifier.

pub mod classifier;
pub mod lanes;

pub use classifier::{classify, ThresholdConfig, ToxicReason, TradeProfile, Verdict};
pub use lanes::{LaneSimulator, SimulatorError};
