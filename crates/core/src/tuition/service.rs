//! Tuition price resolution.

use super::types::{GRANDFATHERED_PRICE_YEAR, TuitionFeeMap, TuitionResolution};

/// Tuition price rules.
pub struct TuitionService;

impl TuitionService {
    /// Picks the price to charge a student.
    ///
    /// * admitted in or before 2023: the 2023 price
    /// * otherwise (including an unknown admission year): the latest price
    /// * no prices at all: zero, with no year resolved
    ///
    /// A year of `0` counts as unknown. If the chosen year has no price the
    /// amount is zero while `used_year` still names the year.
    #[must_use]
    pub fn resolve(fees: &TuitionFeeMap, admission_year: Option<i32>) -> TuitionResolution {
        let Some(latest) = fees.latest_year() else {
            return TuitionResolution::unresolved();
        };

        let year = match admission_year {
            Some(year) if year != 0 && year <= GRANDFATHERED_PRICE_YEAR => GRANDFATHERED_PRICE_YEAR,
            _ => latest,
        };

        TuitionResolution {
            amount: fees.price_for(year).unwrap_or_default(),
            used_year: Some(year),
        }
    }
}
