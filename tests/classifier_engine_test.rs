use toxicguard::{
    classify, LaneSimulator, ThresholdConfig, ToxicReason, TradeProfile, TxStatus, TxType,
};

fn scenario_config() -> ThresholdConfig {
    ThresholdConfig {
        budget_attack_cu: 350_000,
        failed_toxic_cu: 140_000,
        success_toxic_cu: 150_000,
        depletion_fraction: 0.9,
    }
}

fn profile(cu: u64, status: TxStatus, tx_type: TxType) -> TradeProfile {
    TradeProfile {
        compute_units: cu,
        status,
        tx_type,
    }
}

/// Ten lanes at 1000 with lane 0 drained down to `l0_capacity`.
fn lanes_with_l0(l0_capacity: f64) -> Vec<toxicguard::Lane> {
    let mut sim = LaneSimulator::new(10, 1000.0).unwrap();
    sim.commit_fill(1000.0 - l0_capacity);
    sim.snapshot()
}

#[test]
fn test_scenario_adverse_selection_vs_elevated_cost() {
    let cfg = scenario_config();
    let trade = profile(200_000, TxStatus::Success, TxType::Swap);

    let depleted = classify(&trade, &lanes_with_l0(100.0), &cfg);
    assert!(depleted.is_toxic);
    assert_eq!(depleted.reason, Some(ToxicReason::PriorityLaneExploit));
    assert_eq!(
        depleted.reason_string().as_deref(),
        Some("Priority-Lane Adverse-Selection Exploit")
    );

    let healthy = classify(&trade, &lanes_with_l0(950.0), &cfg);
    assert!(healthy.is_toxic);
    assert_eq!(healthy.reason, Some(ToxicReason::ElevatedCostSignature));
}

#[test]
fn test_budget_attack_precedence_across_states() {
    let cfg = scenario_config();
    for status in [TxStatus::Success, TxStatus::Failed] {
        for tx_type in [
            TxType::Swap,
            TxType::Arbitrage,
            TxType::Liquidation,
            TxType::Cancellation,
        ] {
            for l0 in [0.0, 500.0, 1000.0] {
                let v = classify(&profile(350_001, status, tx_type), &lanes_with_l0(l0), &cfg);
                assert_eq!(v.reason, Some(ToxicReason::BudgetAttack));
            }
        }
    }
}

#[test]
fn test_failed_rule_precedes_success_rule() {
    let cfg = scenario_config();
    let v = classify(
        &profile(200_000, TxStatus::Failed, TxType::Arbitrage),
        &lanes_with_l0(0.0),
        &cfg,
    );
    assert_eq!(v.reason, Some(ToxicReason::ToxicIntentFailed));
}

#[test]
fn test_ordinary_trades_are_benign() {
    let cfg = scenario_config();
    let v = classify(
        &profile(60_000, TxStatus::Success, TxType::Swap),
        &lanes_with_l0(0.0),
        &cfg,
    );
    assert!(!v.is_toxic);
    assert!(v.reason.is_none());
}

#[test]
fn test_system_refresh_is_exempt() {
    let cfg = scenario_config();
    let v = classify(
        &profile(900_000, TxStatus::Failed, TxType::System),
        &lanes_with_l0(0.0),
        &cfg,
    );
    assert!(!v.is_toxic);
}

#[test]
fn test_custom_depletion_fraction() {
    let cfg = ThresholdConfig {
        depletion_fraction: 0.4,
        ..scenario_config()
    };
    let trade = profile(200_000, TxStatus::Success, TxType::Arbitrage);
    assert_eq!(
        classify(&trade, &lanes_with_l0(500.0), &cfg).reason,
        Some(ToxicReason::ElevatedCostSignature)
    );
    assert_eq!(
        classify(&trade, &lanes_with_l0(300.0), &cfg).reason,
        Some(ToxicReason::PriorityLaneExploit)
    );
}

#[test]
fn test_classify_is_deterministic_and_does_not_touch_lanes() {
    let cfg = scenario_config();
    let lanes = lanes_with_l0(100.0);
    let before = lanes.clone();
    let trade = profile(200_000, TxStatus::Success, TxType::Swap);
    let first = classify(&trade, &lanes, &cfg);
    let second = classify(&trade, &lanes, &cfg);
    assert_eq!(first, second);
    assert_eq!(lanes, before);
}
