//! Liquidity lane model.

use serde::{Deserialize, Serialize};

/// One priority-ordered liquidity tranche.
///
/// Lanes handed out by the simulator are copies; mutating one never
/// touches the simulator's own state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    /// Ordinal position, also the fill priority (0 drains first).
    pub id: usize,
    /// Currently available liquidity.
    pub capacity: f64,
    /// Ceiling capacity, fixed at construction.
    pub max_capacity: f64,
    /// Fixed spread charged against fills, in parts-per-million.
    pub spread_ppm: u32,
    pub is_depleted: bool,
    /// Set when the lane supplied any fill since the last slot advance.
    pub was_consumed_last_slot: bool,
}

impl Lane {
    pub fn new(id: usize, max_capacity: f64, spread_ppm: u32) -> Self {
        Self {
            id,
            capacity: max_capacity,
            max_capacity,
            spread_ppm,
            is_depleted: false,
            was_consumed_last_slot: false,
        }
    }

    /// Fraction of max capacity currently available, in `[0, 1]`.
    pub fn fill_ratio(&self) -> f64 {
        if self.max_capacity > 0.0 {
            self.capacity / self.max_capacity
        } else {
            0.0
        }
    }

    /// True when capacity sits strictly below `fraction` of max capacity.
    pub fn is_below(&self, fraction: f64) -> bool {
        self.capacity < self.max_capacity * fraction
    }

    /// Capacity missing relative to the ceiling.
    pub fn deficit(&self) -> f64 {
        (self.max_capacity - self.capacity).max(0.0)
    }

    /// Output multiplier after this lane's spread.
    pub fn spread_factor(&self) -> f64 {
        1.0 - f64::from(self.spread_ppm) / 1_000_000.0
    }
}
