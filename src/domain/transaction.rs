//! Trade attempts and executed transaction records.

use super::{Signature, Slot, TimeMs};
use serde::{Deserialize, Serialize};

/// Transaction type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxType {
    Swap,
    Arbitrage,
    Liquidation,
    Cancellation,
    /// Background system refresh traffic, never toxic.
    System,
}

impl TxType {
    /// Whether this type moves liquidity through the lanes.
    pub fn consumes_liquidity(&self) -> bool {
        matches!(self, TxType::Swap | TxType::Arbitrage | TxType::Liquidation)
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TxType::Swap => "SWAP",
            TxType::Arbitrage => "ARBITRAGE",
            TxType::Liquidation => "LIQUIDATION",
            TxType::Cancellation => "CANCELLATION",
            TxType::System => "SYSTEM",
        };
        write!(f, "{}", s)
    }
}

/// Execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxStatus {
    Success,
    Failed,
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Success => write!(f, "SUCCESS"),
            TxStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// A trade as produced by a source, before it touches the lanes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeAttempt {
    pub compute_units: u64,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub status: TxStatus,
    pub input_amount: f64,
    #[serde(default = "default_program_id")]
    pub program_id: String,
    #[serde(default)]
    pub timestamp: Option<TimeMs>,
    #[serde(default)]
    pub signature: Option<Signature>,
}

/// Program id used when an attempt does not name one.
pub const DEFAULT_PROGRAM_ID: &str = "PropAMM1aneGuard11111111111111111111111111";

fn default_program_id() -> String {
    DEFAULT_PROGRAM_ID.to_string()
}

impl TradeAttempt {
    pub fn new(compute_units: u64, tx_type: TxType, status: TxStatus, input_amount: f64) -> Self {
        Self {
            compute_units,
            tx_type,
            status,
            input_amount,
            program_id: default_program_id(),
            timestamp: None,
            signature: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: TimeMs) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn with_program_id(mut self, program_id: impl Into<String>) -> Self {
        self.program_id = program_id.into();
        self
    }
}

/// An executed, classified transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub signature: Signature,
    pub slot: Slot,
    pub timestamp: TimeMs,
    pub compute_units: u64,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub input_amount: f64,
    pub output_amount: f64,
    pub realized_price: f64,
    pub status: TxStatus,
    pub program_id: String,
    pub is_toxic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
