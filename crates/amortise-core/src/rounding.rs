use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DECIMALS: u32 = 2;

/// Presentation rounding applied to finished results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    DecimalPlaces(u32),
    None,
}

impl Default for Rounding {
    fn default() -> Self {
        Rounding::DecimalPlaces(DEFAULT_DECIMALS)
    }
}

impl Rounding {
    /// `Some(n)` rounds to `n` places, `None` disables rounding.
    pub fn from_decimals(decimals: Option<u32>) -> Self {
        match decimals {
            Some(dp) => Rounding::DecimalPlaces(dp),
            None => Rounding::None,
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::DecimalPlaces(dp) => round_to(value, dp),
            Rounding::None => value,
        }
    }

    pub fn describe(self) -> String {
        match self {
            Rounding::DecimalPlaces(dp) => format!("f64, rounded to {dp} dp"),
            Rounding::None => "f64, unrounded".to_string(),
        }
    }
}

/// Round half-to-even on the exact binary value of `value`.
///
/// Goes through `Decimal` so that e.g. 8.604999.. does not become 8.61 via
/// scaled float arithmetic. Values outside `Decimal` range (and NaN/inf) are
/// returned unchanged.
pub fn round_to(value: f64, dp: u32) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };
    exact
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
        .normalize()
        .to_string()
        .parse::<f64>()
        .unwrap_or(value)
}
