//! Trade sources feeding the desk with attempts to execute and classify.

use crate::domain::TradeAttempt;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod synthetic;

pub use mock::MockTradeSource;
pub use synthetic::SyntheticTradeSource;

/// Source of trade attempts, polled once per batch interval.
#[async_trait]
pub trait TradeSource: Send + Sync + fmt::Debug {
    /// Fetch the next batch of attempts, newest first.
    async fn fetch_batch(&self) -> Result<Vec<TradeAttempt>, SourceError>;
}

/// Error type for trade source operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}
