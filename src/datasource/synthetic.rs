//! Synthetic trade generator standing in for a live transaction feed.

use super::{SourceError, TradeSource};
use crate::domain::{Signature, TimeMs, TradeAttempt, TxStatus, TxType};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const MIN_BATCH: usize = 5;
const MAX_BATCH: usize = 12;
const BOT_RATE: f64 = 0.25;
const SYSTEM_RATE: f64 = 0.05;
/// Spacing between generated timestamps, newest first.
const SPACING_MS: i64 = 2_000;

/// Generates batches of organic swaps, bot arbitrage and a little system
/// refresh traffic.
#[derive(Debug)]
pub struct SyntheticTradeSource {
    rng: Mutex<StdRng>,
    failure_rate: f64,
}

impl SyntheticTradeSource {
    pub fn new(failure_rate: f64) -> Self {
        Self::from_rng(StdRng::from_entropy(), failure_rate)
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64, failure_rate: f64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), failure_rate)
    }

    fn from_rng(rng: StdRng, failure_rate: f64) -> Self {
        Self {
            rng: Mutex::new(rng),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    fn generate(&self, rng: &mut StdRng, now: TimeMs) -> Vec<TradeAttempt> {
        let size = rng.gen_range(MIN_BATCH..=MAX_BATCH);
        (0..size)
            .map(|i| {
                let timestamp = TimeMs::new(now.as_i64() - i as i64 * SPACING_MS);
                self.attempt(rng)
                    .with_timestamp(timestamp)
                    .with_signature(Signature::from_rng(rng))
            })
            .collect()
    }

    fn attempt(&self, rng: &mut StdRng) -> TradeAttempt {
        if rng.gen_bool(SYSTEM_RATE) {
            let cu = rng.gen_range(5_000..20_000);
            return TradeAttempt::new(cu, TxType::System, TxStatus::Success, 0.0);
        }

        let is_bot = rng.gen_bool(BOT_RATE);
        let (cu, tx_type) = if is_bot {
            (rng.gen_range(120_000..400_000), TxType::Arbitrage)
        } else {
            (rng.gen_range(30_000..90_000), TxType::Swap)
        };
        let amount = rng.gen_range(10u32..1_510) as f64;
        let status = if rng.gen_bool(self.failure_rate) {
            TxStatus::Failed
        } else {
            TxStatus::Success
        };
        TradeAttempt::new(cu, tx_type, status, amount)
    }
}

#[async_trait]
impl TradeSource for SyntheticTradeSource {
    async fn fetch_batch(&self) -> Result<Vec<TradeAttempt>, SourceError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SourceError::Unavailable("generator lock poisoned".to_string()))?;
        Ok(self.generate(&mut rng, TimeMs::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_size_within_bounds() {
        let source = SyntheticTradeSource::seeded(1, 0.1);
        for _ in 0..20 {
            let batch = source.fetch_batch().await.unwrap();
            assert!((MIN_BATCH..=MAX_BATCH).contains(&batch.len()));
        }
    }

    #[tokio::test]
    async fn test_attempt_ranges() {
        let source = SyntheticTradeSource::seeded(9, 0.5);
        for _ in 0..20 {
            for attempt in source.fetch_batch().await.unwrap() {
                match attempt.tx_type {
                    TxType::Arbitrage => {
                        assert!((120_000..400_000).contains(&attempt.compute_units))
                    }
                    TxType::Swap => assert!((30_000..90_000).contains(&attempt.compute_units)),
                    TxType::System => assert_eq!(attempt.input_amount, 0.0),
                    other => panic!("unexpected type {:?}", other),
                }
                if attempt.tx_type != TxType::System {
                    assert!(attempt.input_amount >= 10.0 && attempt.input_amount < 1510.0);
                }
                assert!(attempt.signature.is_some());
            }
        }
    }

    #[test]
    fn test_seeded_batches_are_reproducible() {
        let a = SyntheticTradeSource::seeded(42, 0.1);
        let b = SyntheticTradeSource::seeded(42, 0.1);
        let now = TimeMs::new(1_700_000_000_000);
        let batch_a = a.generate(&mut a.rng.lock().unwrap(), now);
        let batch_b = b.generate(&mut b.rng.lock().unwrap(), now);
        assert_eq!(batch_a, batch_b);
    }

    #[test]
    fn test_timestamps_descend() {
        let source = SyntheticTradeSource::seeded(3, 0.0);
        let now = TimeMs::new(1_000_000);
        let batch = source.generate(&mut source.rng.lock().unwrap(), now);
        assert_eq!(batch[0].timestamp, Some(now));
        for pair in batch.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
    }

    #[test]
    fn test_zero_failure_rate_never_fails() {
        let source = SyntheticTradeSource::seeded(5, 0.0);
        let now = TimeMs::new(0);
        for _ in 0..10 {
            let batch = source.generate(&mut source.rng.lock().unwrap(), now);
            assert!(batch.iter().all(|a| a.status == TxStatus::Success));
        }
    }
}
