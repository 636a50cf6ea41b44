//! Toxic-flow heuristics.
//!
//! A pure function of a trade's compute-unit cost, status, type and a lane
//! snapshot. Rules are evaluated in precedence order and the first match wins:
//!
//! 1. cost above the budget-attack threshold
//! 2. failed with cost above the failed-toxic threshold
//! 3. successful with cost above the success-toxic threshold, split on
//!    whether the priority lane is currently depleted
//!
//! System refresh traffic is exempt from every rule.

use crate::domain::{Lane, TradeAttempt, TxStatus, TxType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Deployment-tunable thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    pub budget_attack_cu: u64,
    pub failed_toxic_cu: u64,
    pub success_toxic_cu: u64,
    /// Priority lane counts as depleted below this fraction of max capacity.
    pub depletion_fraction: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            budget_attack_cu: 350_000,
            failed_toxic_cu: 140_000,
            success_toxic_cu: 150_000,
            depletion_fraction: 0.9,
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.budget_attack_cu == 0 || self.failed_toxic_cu == 0 || self.success_toxic_cu == 0 {
            return Err("compute-unit thresholds must be positive".to_string());
        }
        if !(self.depletion_fraction > 0.0 && self.depletion_fraction <= 1.0) {
            return Err(format!(
                "depletion fraction must be in (0, 1], got {}",
                self.depletion_fraction
            ));
        }
        Ok(())
    }
}

/// The attributes of a trade the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeProfile {
    pub compute_units: u64,
    pub status: TxStatus,
    pub tx_type: TxType,
}

impl From<&TradeAttempt> for TradeProfile {
    fn from(attempt: &TradeAttempt) -> Self {
        Self {
            compute_units: attempt.compute_units,
            status: attempt.status,
            tx_type: attempt.tx_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToxicReason {
    BudgetAttack,
    ToxicIntentFailed,
    PriorityLaneExploit,
    ElevatedCostSignature,
}

impl ToxicReason {
    pub const ALL: [ToxicReason; 4] = [
        ToxicReason::BudgetAttack,
        ToxicReason::ToxicIntentFailed,
        ToxicReason::PriorityLaneExploit,
        ToxicReason::ElevatedCostSignature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToxicReason::BudgetAttack => "Budget Attack",
            ToxicReason::ToxicIntentFailed => "Toxic Intent (Failed)",
            ToxicReason::PriorityLaneExploit => "Priority-Lane Adverse-Selection Exploit",
            ToxicReason::ElevatedCostSignature => "Elevated-Cost Signature",
        }
    }
}

impl std::fmt::Display for ToxicReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub is_toxic: bool,
    pub reason: Option<ToxicReason>,
}

impl Verdict {
    pub fn benign() -> Self {
        Self {
            is_toxic: false,
            reason: None,
        }
    }

    pub fn toxic(reason: ToxicReason) -> Self {
        Self {
            is_toxic: true,
            reason: Some(reason),
        }
    }

    pub fn reason_string(&self) -> Option<String> {
        self.reason.map(|r| r.as_str().to_string())
    }
}

/// Label a trade as toxic or benign against the given lane snapshot.
///
/// `lanes` is expected to reflect state after the trade's own fill was
/// committed. An empty snapshot treats the priority lane as healthy.
pub fn classify(trade: &TradeProfile, lanes: &[Lane], config: &ThresholdConfig) -> Verdict {
    if trade.tx_type == TxType::System {
        return Verdict::benign();
    }

    let cu = trade.compute_units;
    let verdict = if cu > config.budget_attack_cu {
        Verdict::toxic(ToxicReason::BudgetAttack)
    } else if trade.status == TxStatus::Failed && cu > config.failed_toxic_cu {
        Verdict::toxic(ToxicReason::ToxicIntentFailed)
    } else if trade.status == TxStatus::Success && cu > config.success_toxic_cu {
        let priority_depleted = lanes
            .first()
            .map(|lane| lane.is_below(config.depletion_fraction))
            .unwrap_or(false);
        if priority_depleted {
            Verdict::toxic(ToxicReason::PriorityLaneExploit)
        } else {
            Verdict::toxic(ToxicReason::ElevatedCostSignature)
        }
    } else {
        Verdict::benign()
    };

    debug!(
        cu,
        status = %trade.status,
        tx_type = %trade.tx_type,
        toxic = verdict.is_toxic,
        reason = ?verdict.reason,
        "classified trade"
    );
    verdict
}
