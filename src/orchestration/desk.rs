//! The desk drives one simulator: it executes trade attempts against the
//! lanes, classifies them and keeps a bounded, newest-first history.

use crate::config::Config;
use crate::datasource::{SourceError, TradeSource};
use crate::domain::{FillQuote, Lane, Signature, Slot, TimeMs, TradeAttempt, Transaction, TxStatus};
use crate::engine::{
    classify, LaneSimulator, SimulatorError, ThresholdConfig, ToxicReason, TradeProfile,
};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub processed: usize,
    pub toxic: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskStats {
    /// Transactions processed since startup, including ones evicted from history.
    pub processed: u64,
    pub toxic: u64,
    pub toxic_by_reason: BTreeMap<String, u64>,
    pub batches_ingested: u64,
    pub history_len: usize,
    pub slot: Slot,
    pub total_capacity: f64,
    pub total_max_capacity: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    pub limit: Option<usize>,
    pub toxic_only: bool,
}

#[derive(Debug)]
struct Ledger {
    history: VecDeque<Transaction>,
    limit: usize,
    processed: u64,
    toxic: u64,
    toxic_by_reason: BTreeMap<String, u64>,
    batches_ingested: u64,
}

impl Ledger {
    fn new(limit: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(limit),
            limit,
            processed: 0,
            toxic: 0,
            // Every reason is reported, even before it first fires.
            toxic_by_reason: ToxicReason::ALL
                .iter()
                .map(|reason| (reason.as_str().to_string(), 0))
                .collect(),
            batches_ingested: 0,
        }
    }

    /// Record transactions given newest first; they land ahead of older history.
    fn record(&mut self, txs: &[Transaction]) {
        for tx in txs.iter().rev() {
            self.processed += 1;
            if tx.is_toxic {
                self.toxic += 1;
                if let Some(reason) = &tx.reason {
                    *self.toxic_by_reason.entry(reason.clone()).or_default() += 1;
                }
            }
            self.history.push_front(tx.clone());
        }
        self.history.truncate(self.limit);
    }
}

#[derive(Debug)]
pub struct Desk {
    simulator: RwLock<LaneSimulator>,
    thresholds: ThresholdConfig,
    oracle_price: f64,
    ledger: Mutex<Ledger>,
}

impl Desk {
    pub fn new(
        simulator: LaneSimulator,
        thresholds: ThresholdConfig,
        oracle_price: f64,
        history_limit: usize,
    ) -> Self {
        Self {
            simulator: RwLock::new(simulator),
            thresholds,
            oracle_price,
            ledger: Mutex::new(Ledger::new(history_limit)),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SimulatorError> {
        let simulator = LaneSimulator::new(config.num_lanes, config.base_capacity)?;
        Ok(Self::new(
            simulator,
            config.thresholds,
            config.oracle_price,
            config.history_limit,
        ))
    }

    pub async fn advance_slot(&self) {
        self.simulator.write().await.advance_slot();
    }

    /// Current lanes and the slot they belong to.
    pub async fn lanes(&self) -> (Slot, Vec<Lane>) {
        let sim = self.simulator.read().await;
        (sim.slot(), sim.snapshot())
    }

    pub async fn quote(&self, amount: f64, oracle_price: Option<f64>) -> FillQuote {
        let price = oracle_price.unwrap_or(self.oracle_price);
        self.simulator.read().await.quote_fill(amount, price)
    }

    /// Execute one attempt and classify it against the post-fill lanes.
    ///
    /// Only successful liquidity-moving attempts commit a fill. The quote,
    /// commit and snapshot happen under a single write lock so no slot
    /// advance can land between them.
    pub async fn execute(&self, attempt: TradeAttempt) -> Transaction {
        let moves_liquidity = attempt.tx_type.consumes_liquidity();
        let amount = if moves_liquidity {
            attempt.input_amount
        } else {
            0.0
        };

        let (quote, lanes) = {
            let mut sim = self.simulator.write().await;
            let quote = sim.quote_fill(amount, self.oracle_price);
            if attempt.status == TxStatus::Success && moves_liquidity {
                sim.commit_fill(amount);
            }
            (quote, sim.snapshot())
        };

        let verdict = classify(&TradeProfile::from(&attempt), &lanes, &self.thresholds);

        let (output_amount, realized_price) = match attempt.status {
            TxStatus::Success => (quote.realized_output, quote.realized_price(amount)),
            TxStatus::Failed => (0.0, 0.0),
        };
        let timestamp = attempt.timestamp.unwrap_or_else(TimeMs::now);

        let tx = Transaction {
            signature: attempt.signature.unwrap_or_else(Signature::random),
            slot: Slot::at(timestamp),
            timestamp,
            compute_units: attempt.compute_units,
            tx_type: attempt.tx_type,
            input_amount: attempt.input_amount,
            output_amount,
            realized_price,
            status: attempt.status,
            program_id: attempt.program_id,
            is_toxic: verdict.is_toxic,
            reason: verdict.reason_string(),
        };

        if tx.is_toxic {
            info!(
                signature = %tx.signature,
                cu = tx.compute_units,
                reason = tx.reason.as_deref().unwrap_or_default(),
                lanes = ?quote.lanes_touched,
                "toxic flow flagged"
            );
        }
        tx
    }

    /// Execute, classify and record a single attempt.
    pub async fn process_attempt(&self, attempt: TradeAttempt) -> Transaction {
        let tx = self.execute(attempt).await;
        self.ledger.lock().await.record(std::slice::from_ref(&tx));
        tx
    }

    /// Pull one batch from `source`, process it in order and record it.
    pub async fn ingest_batch(&self, source: &dyn TradeSource) -> Result<BatchSummary, SourceError> {
        let attempts = source.fetch_batch().await.map_err(|e| {
            warn!(error = %e, "trade source fetch failed");
            e
        })?;

        let mut txs = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            txs.push(self.execute(attempt).await);
        }

        let summary = BatchSummary {
            processed: txs.len(),
            toxic: txs.iter().filter(|t| t.is_toxic).count(),
        };

        let mut ledger = self.ledger.lock().await;
        ledger.record(&txs);
        ledger.batches_ingested += 1;

        info!(
            processed = summary.processed,
            toxic = summary.toxic,
            batch = ledger.batches_ingested,
            "ingested trade batch"
        );
        Ok(summary)
    }

    /// Newest-first history, optionally filtered.
    pub async fn transactions(&self, filter: TransactionFilter) -> Vec<Transaction> {
        let ledger = self.ledger.lock().await;
        ledger
            .history
            .iter()
            .filter(|t| !filter.toxic_only || t.is_toxic)
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Drop the visible history; running totals are kept.
    pub async fn clear_transactions(&self) -> usize {
        let mut ledger = self.ledger.lock().await;
        let cleared = ledger.history.len();
        ledger.history.clear();
        cleared
    }

    pub async fn stats(&self) -> DeskStats {
        let (slot, total_capacity, total_max_capacity) = {
            let sim = self.simulator.read().await;
            (sim.slot(), sim.total_capacity(), sim.total_max_capacity())
        };
        let ledger = self.ledger.lock().await;
        DeskStats {
            processed: ledger.processed,
            toxic: ledger.toxic,
            toxic_by_reason: ledger.toxic_by_reason.clone(),
            batches_ingested: ledger.batches_ingested,
            history_len: ledger.history.len(),
            slot,
            total_capacity,
            total_max_capacity,
        }
    }
}
