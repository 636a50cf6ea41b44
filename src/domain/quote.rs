//! Result of a capacity-aware fill walk.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillQuote {
    /// `amount * oracle_price`, the spread-free output.
    pub expected_output: f64,
    pub realized_output: f64,
    /// `(expected - realized) / expected`, zero when expected is zero.
    pub slippage: f64,
    /// Touched lane ids in fill order.
    pub lanes_touched: Vec<usize>,
    /// Input amount actually matched against lane capacity.
    pub filled_amount: f64,
}

impl FillQuote {
    /// True when the lanes could not absorb the whole requested amount.
    pub fn is_partial(&self, requested: f64) -> bool {
        self.filled_amount < requested
    }

    /// Realized output per unit of requested input.
    pub fn realized_price(&self, requested: f64) -> f64 {
        if requested > 0.0 {
            self.realized_output / requested
        } else {
            0.0
        }
    }
}
