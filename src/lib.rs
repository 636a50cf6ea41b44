pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{MockTradeSource, SourceError, SyntheticTradeSource, TradeSource};
pub use domain::{FillQuote, Lane, Signature, Slot, TimeMs, TradeAttempt, Transaction, TxStatus, TxType};
pub use engine::{classify, LaneSimulator, SimulatorError, ThresholdConfig, ToxicReason, TradeProfile, Verdict};
pub use error::AppError;
pub use orchestration::{Desk, FeedControl};
