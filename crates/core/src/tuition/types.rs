//! Tuition price types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Students admitted in or before this year keep this year's price.
pub const GRANDFATHERED_PRICE_YEAR: i32 = 2023;

/// Tuition price per academic year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuitionFeeMap {
    prices: BTreeMap<i32, Decimal>,
}

impl TuitionFeeMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the price for a year; a later entry for the same year wins.
    pub fn insert(&mut self, year: i32, price: Decimal) {
        self.prices.insert(year, price);
    }

    /// Price for a year, if one was published.
    #[must_use]
    pub fn price_for(&self, year: i32) -> Option<Decimal> {
        self.prices.get(&year).copied()
    }

    /// Most recent year with a price.
    #[must_use]
    pub fn latest_year(&self) -> Option<i32> {
        self.prices.keys().next_back().copied()
    }

    /// Returns true if no prices are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Number of years with a price.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }
}

impl FromIterator<(i32, Decimal)> for TuitionFeeMap {
    fn from_iter<I: IntoIterator<Item = (i32, Decimal)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Amount to put on a new contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuitionResolution {
    /// Amount to charge; zero when no price applies.
    pub amount: Decimal,
    /// Year whose price was used; `None` when no prices are known.
    pub used_year: Option<i32>,
}

impl TuitionResolution {
    /// Resolution used when the price list is empty.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            amount: Decimal::ZERO,
            used_year: None,
        }
    }
}
