//! Mock trade source for testing without the synthetic generator.

use super::{SourceError, TradeSource};
use crate::domain::TradeAttempt;
use async_trait::async_trait;

/// Mock source that returns the same predefined batch on every fetch.
#[derive(Debug, Clone, Default)]
pub struct MockTradeSource {
    attempts: Vec<TradeAttempt>,
    error: Option<SourceError>,
}

impl MockTradeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attempt(mut self, attempt: TradeAttempt) -> Self {
        self.attempts.push(attempt);
        self
    }

    pub fn with_attempts(mut self, attempts: Vec<TradeAttempt>) -> Self {
        self.attempts.extend(attempts);
        self
    }

    /// Make every fetch fail with `error`.
    pub fn with_error(mut self, error: SourceError) -> Self {
        self.error = Some(error);
        self
    }
}

#[async_trait]
impl TradeSource for MockTradeSource {
    async fn fetch_batch(&self) -> Result<Vec<TradeAttempt>, SourceError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.attempts.clone()),
        }
    }
}
