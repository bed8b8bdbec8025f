//! Threshold rule deciding when a price move is worth an email.
//!
//! The default rule fires on a rise above 105% or a drop below 90% of the
//! purchase price. Both comparisons are strict, so a price sitting exactly on
//! either bound does not fire.

use std::fmt;

/// Direction of a price relative to its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rise,
    Drop,
}

impl Trend {
    /// `Rise` only when strictly above the reference; equal counts as `Drop`.
    pub fn between(price: f64, reference_price: f64) -> Self {
        if price > reference_price {
            Trend::Rise
        } else {
            Trend::Drop
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rise => f.write_str("rise"),
            Trend::Drop => f.write_str("drop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerRule {
    /// Multiplier of the reference price the current price must exceed.
    pub rise_factor: f64,
    /// Multiplier of the reference price the current price must fall below.
    pub drop_factor: f64,
}

impl Default for TriggerRule {
    fn default() -> Self {
        Self {
            rise_factor: 1.05,
            drop_factor: 0.90,
        }
    }
}

impl TriggerRule {
    pub fn new(rise_factor: f64, drop_factor: f64) -> Self {
        Self {
            rise_factor,
            drop_factor,
        }
    }

    pub fn is_triggered(&self, price: f64, reference_price: f64) -> bool {
        price > reference_price * self.rise_factor || price < reference_price * self.drop_factor
    }

    /// Returns the trend when the rule fires, `None` otherwise.
    pub fn evaluate(&self, price: f64, reference_price: f64) -> Option<Trend> {
        self.is_triggered(price, reference_price)
            .then(|| Trend::between(price, reference_price))
    }
}
