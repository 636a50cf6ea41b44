//! Lane capacity simulator.
//!
//! Owns N lanes that deplete when filled against and regenerate on every
//! slot advance. Regeneration is tracked per lane: a lane that supplied any
//! fill since the previous advance only recovers half of its deficit, an idle
//! lane snaps back to full. A drained lane left alone is therefore full again
//! after two advances.

use crate::domain::{FillQuote, Lane, Slot};
use thiserror::Error;
use tracing::trace;

/// Base spread of lane 0, in ppm.
pub const BASE_SPREAD_PPM: u32 = 50;
/// Spread added per lane of depth, in ppm.
pub const SPREAD_STEP_PPM: u32 = 150;
/// Fraction of max capacity under which a lane reports itself depleted.
pub const DEPLETION_FRACTION: f64 = 0.9;
/// Share of the deficit restored for a lane consumed in the previous slot.
pub const HALF_BACKFILL_RATIO: f64 = 0.5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Debug, Clone)]
pub struct LaneSimulator {
    lanes: Vec<Lane>,
    slot: Slot,
}

impl LaneSimulator {
    /// Create `num_lanes` full lanes of `base_capacity` with a strictly
    /// increasing spread schedule.
    pub fn new(num_lanes: usize, base_capacity: f64) -> Result<Self, SimulatorError> {
        if num_lanes == 0 {
            return Err(SimulatorError::InvalidConfiguration(
                "num_lanes must be positive".to_string(),
            ));
        }
        if !base_capacity.is_finite() || base_capacity <= 0.0 {
            return Err(SimulatorError::InvalidConfiguration(format!(
                "base_capacity must be a positive finite number, got {}",
                base_capacity
            )));
        }

        let lanes = (0..num_lanes)
            .map(|i| Lane::new(i, base_capacity, spread_for_lane(i)))
            .collect();

        Ok(Self {
            lanes,
            slot: Slot::default(),
        })
    }

    /// Independent copy of all lanes, ordered by id.
    pub fn snapshot(&self) -> Vec<Lane> {
        self.lanes.clone()
    }

    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Number of slot advances applied so far.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn total_capacity(&self) -> f64 {
        self.lanes.iter().map(|l| l.capacity).sum()
    }

    pub fn total_max_capacity(&self) -> f64 {
        self.lanes.iter().map(|l| l.max_capacity).sum()
    }

    /// Regenerate every lane for the next slot.
    pub fn advance_slot(&mut self) {
        for lane in &mut self.lanes {
            if lane.was_consumed_last_slot {
                lane.capacity += lane.deficit() * HALF_BACKFILL_RATIO;
            } else {
                lane.capacity = lane.max_capacity;
            }
            lane.capacity = lane.capacity.clamp(0.0, lane.max_capacity);
            lane.is_depleted = lane.is_below(DEPLETION_FRACTION);
            lane.was_consumed_last_slot = false;
        }
        self.slot = self.slot.next();
        trace!(slot = %self.slot, "advanced slot");
    }

    /// Dry-run a fill of `amount` at `oracle_price` without touching state.
    pub fn quote_fill(&self, amount: f64, oracle_price: f64) -> FillQuote {
        let mut scratch = self.lanes.clone();
        let (realized_output, filled_amount, lanes_touched) =
            walk_fill(&mut scratch, amount, |lane, fillable| {
                fillable * oracle_price * lane.spread_factor()
            });

        let expected_output = amount * oracle_price;
        let slippage = if expected_output > 0.0 {
            (expected_output - realized_output) / expected_output
        } else {
            0.0
        };

        FillQuote {
            expected_output,
            realized_output,
            slippage,
            lanes_touched,
            filled_amount,
        }
    }

    /// Consume up to `amount` of liquidity in priority order. Any excess over
    /// the total available capacity is silently left unfilled.
    pub fn commit_fill(&mut self, amount: f64) {
        let (_, filled, touched) = walk_fill(&mut self.lanes, amount, |_, _| 0.0);
        for id in &touched {
            let lane = &mut self.lanes[*id];
            lane.was_consumed_last_slot = true;
            lane.is_depleted = lane.is_below(DEPLETION_FRACTION);
        }
        trace!(amount, filled, lanes = ?touched, "committed fill");
    }
}

/// Lane `i` is charged a strictly higher spread than lane `i - 1`.
pub fn spread_for_lane(index: usize) -> u32 {
    BASE_SPREAD_PPM + SPREAD_STEP_PPM * index as u32
}

/// Drain `lanes` in ascending id order. Returns the accumulated output from
/// `price`, the total amount filled and the touched lane ids.
fn walk_fill<F>(lanes: &mut [Lane], amount: f64, price: F) -> (f64, f64, Vec<usize>)
where
    F: Fn(&Lane, f64) -> f64,
{
    let mut remaining = if amount.is_finite() { amount } else { 0.0 };
    let mut output = 0.0;
    let mut filled = 0.0;
    let mut touched = Vec::new();

    for lane in lanes.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let fillable = remaining.min(lane.capacity);
        if fillable > 0.0 {
            output += price(lane, fillable);
            lane.capacity = (lane.capacity - fillable).max(0.0);
            remaining -= fillable;
            filled += fillable;
            touched.push(lane.id);
        }
    }

    (output, filled, touched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(n: usize) -> LaneSimulator {
        LaneSimulator::new(n, 1000.0).unwrap()
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let err = LaneSimulator::new(0, 1000.0).unwrap_err();
        assert!(matches!(err, SimulatorError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_non_positive_capacity() {
        assert!(LaneSimulator::new(3, 0.0).is_err());
        assert!(LaneSimulator::new(3, -5.0).is_err());
        assert!(LaneSimulator::new(3, f64::NAN).is_err());
    }

    #[test]
    fn test_spread_schedule_strictly_increasing() {
        let lanes = sim(8).snapshot();
        assert_eq!(lanes[0].spread_ppm, 50);
        assert_eq!(lanes[1].spread_ppm, 200);
        for pair in lanes.windows(2) {
            assert!(pair[1].spread_ppm > pair[0].spread_ppm);
        }
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let sim = sim(2);
        let mut snap = sim.snapshot();
        snap[0].capacity = 0.0;
        assert_eq!(sim.snapshot()[0].capacity, 1000.0);
    }

    #[test]
    fn test_quote_does_not_mutate() {
        let sim = sim(3);
        let before = sim.snapshot();
        let _ = sim.quote_fill(2500.0, 100.0);
        assert_eq!(sim.snapshot(), before);
    }

    #[test]
    fn test_commit_marks_touched_lanes_only() {
        let mut sim = sim(3);
        sim.commit_fill(1500.0);
        let lanes = sim.snapshot();
        assert_eq!(lanes[0].capacity, 0.0);
        assert_eq!(lanes[1].capacity, 500.0);
        assert_eq!(lanes[2].capacity, 1000.0);
        assert!(lanes[0].was_consumed_last_slot && lanes[0].is_depleted);
        assert!(lanes[1].was_consumed_last_slot && lanes[1].is_depleted);
        assert!(!lanes[2].was_consumed_last_slot && !lanes[2].is_depleted);
    }

    #[test]
    fn test_half_backfill_then_full() {
        let mut sim = sim(1);
        sim.commit_fill(1000.0);

        sim.advance_slot();
        let lane = &sim.snapshot()[0];
        assert_eq!(lane.capacity, 500.0);
        assert!(lane.is_depleted);
        assert!(!lane.was_consumed_last_slot);

        sim.advance_slot();
        let lane = &sim.snapshot()[0];
        assert_eq!(lane.capacity, 1000.0);
        assert!(!lane.is_depleted);
    }

    #[test]
    fn test_repeated_consumption_keeps_halving_gap() {
        let mut sim = sim(1);
        sim.commit_fill(800.0);
        sim.advance_slot(); // 200 + 400
        sim.commit_fill(100.0); // 500
        sim.advance_slot(); // 500 + 250
        assert_eq!(sim.snapshot()[0].capacity, 750.0);
    }

    #[test]
    fn test_overfill_is_partial_not_error() {
        let mut sim = sim(2);
        let quote = sim.quote_fill(5000.0, 10.0);
        assert_eq!(quote.lanes_touched, vec![0, 1]);
        assert_eq!(quote.filled_amount, 2000.0);
        assert!(quote.is_partial(5000.0));
        assert!(quote.slippage > 0.5);

        sim.commit_fill(5000.0);
        assert_eq!(sim.total_capacity(), 0.0);
    }

    #[test]
    fn test_zero_and_negative_amounts_fill_nothing() {
        let mut sim = sim(2);
        let quote = sim.quote_fill(0.0, 100.0);
        assert_eq!(quote.slippage, 0.0);
        assert!(quote.lanes_touched.is_empty());

        sim.commit_fill(-10.0);
        sim.commit_fill(f64::NAN);
        assert_eq!(sim.total_capacity(), sim.total_max_capacity());
    }

    #[test]
    fn test_slot_counter_advances() {
        let mut sim = sim(1);
        assert_eq!(sim.slot(), Slot::new(0));
        sim.advance_slot();
        sim.advance_slot();
        assert_eq!(sim.slot(), Slot::new(2));
    }
}
