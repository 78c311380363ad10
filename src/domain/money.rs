use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount tagged with its ISO currency code. Stored amounts keep two
/// decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: BigDecimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: BigDecimal, currency: impl Into<String>) -> Self {
        Money {
            amount: amount.with_scale(2),
            currency: currency.into(),
        }
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Money::new(BigDecimal::from(0), currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Gross amount for a net amount, rounded half-up to two decimal places.
pub fn gross_of(net: &BigDecimal, multiplier: &BigDecimal) -> BigDecimal {
    (net * multiplier).with_scale_round(2, RoundingMode::HalfUp)
}
