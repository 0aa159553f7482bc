//! Precision and rounding rules shared by every schedule calculator.
//!
//! Two scales are in play: the *calculation* scale used for interest,
//! payments and running balances, and the *result* scale used for every
//! amount that ends up in a [`ScheduleRow`](crate::ScheduleRow). Both round
//! half-up. Rates and compound factors are never rounded to a scale.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ScheduleResult;
use crate::error::ScheduleError;

/// Fractional digits kept for intermediate arithmetic.
pub const CALCULATION_SCALE: u32 = 10;
/// Fractional digits of every emitted amount.
pub const RESULT_SCALE: u32 = 2;
/// Round-half-up, applied at both scales.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

pub const MIN_CALCULATION_SCALE: u32 = 10;
// Leaves room in the 96-bit mantissa for thirteen integer digits.
pub const MAX_CALCULATION_SCALE: u32 = 20;

const PERCENTAGE_DIVISOR: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculationPolicy {
    pub calculation_scale: u32,
    pub result_scale: u32,
}

impl Default for CalculationPolicy {
    fn default() -> Self {
        CalculationPolicy {
            calculation_scale: CALCULATION_SCALE,
            result_scale: RESULT_SCALE,
        }
    }
}

impl CalculationPolicy {
    /// Builds a policy, rejecting scales that would either lose the precision
    /// guarantee or round results more finely than the intermediates.
    pub fn new(calculation_scale: u32, result_scale: u32) -> ScheduleResult<Self> {
        if !(MIN_CALCULATION_SCALE..=MAX_CALCULATION_SCALE).contains(&calculation_scale) {
            return Err(ScheduleError::InvalidPolicy(format!(
                "calculation scale {calculation_scale} must be between \
                 {MIN_CALCULATION_SCALE} and {MAX_CALCULATION_SCALE}"
            )));
        }
        if result_scale >= calculation_scale {
            return Err(ScheduleError::InvalidPolicy(format!(
                "result scale {result_scale} must be below calculation scale {calculation_scale}"
            )));
        }
        Ok(CalculationPolicy {
            calculation_scale,
            result_scale,
        })
    }

    /// Parses a policy from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> ScheduleResult<Self> {
        let raw: CalculationPolicy = serde_json::from_str(input)?;
        CalculationPolicy::new(raw.calculation_scale, raw.result_scale)
    }

    /// Rounds an intermediate value to the calculation scale.
    pub fn internal(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.calculation_scale, ROUNDING)
    }

    /// Rounds a value to the result scale, padding so that `1000` renders as
    /// `1000.00`.
    pub fn output(&self, value: Decimal) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(self.result_scale, ROUNDING);
        rounded.rescale(self.result_scale);
        rounded
    }

    /// Converts an annual nominal percentage (e.g. `5.00` for 5%) to the
    /// monthly fraction `annual / 100 / 12`.
    ///
    /// The rate keeps the full 28 digits of `Decimal`; only amounts derived
    /// from it are rounded to the calculation scale.
    pub fn monthly_rate(&self, annual_rate_percent: Decimal) -> Decimal {
        annual_rate_percent / PERCENTAGE_DIVISOR / MONTHS_PER_YEAR
    }

    /// Interest accrued on `balance` over one month.
    pub fn monthly_interest(&self, balance: Decimal, monthly_rate: Decimal) -> ScheduleResult<Decimal> {
        balance
            .checked_mul(monthly_rate)
            .map(|interest| self.internal(interest))
            .ok_or_else(|| ScheduleError::overflow("monthly interest"))
    }
}
