//! Schedule rows and the month-by-month loop shared by every calculator.

pub mod accumulator;
pub mod step;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ScheduleResult;
use crate::error::ScheduleError;
use crate::loan::LoanTerms;
use crate::policy::CalculationPolicy;

pub use accumulator::ScheduleAccumulator;
pub use step::MonthlyPayment;

/// Represents the payment details for a single month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub payment_date: NaiveDate,
    /// Total paid this month, always `principal + interest`.
    pub payment: Decimal,
    /// The portion of the payment that reduces the balance.
    pub principal: Decimal,
    /// The portion of the payment that covers interest.
    pub interest: Decimal,
    /// Balance left after this payment.
    pub remaining_balance: Decimal,
}

/// Totals over an emitted schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub payment_count: usize,
    pub first_payment: Decimal,
    pub last_payment: Decimal,
    pub total_paid: Decimal,
    pub total_principal: Decimal,
    pub total_interest: Decimal,
}

impl ScheduleSummary {
    pub fn from_rows(rows: &[ScheduleRow]) -> Self {
        let (total_principal, total_interest) = rows
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(principal, interest), row| {
                (principal + row.principal, interest + row.interest)
            });

        ScheduleSummary {
            payment_count: rows.len(),
            first_payment: rows.first().map(|row| row.payment).unwrap_or_default(),
            last_payment: rows.last().map(|row| row.payment).unwrap_or_default(),
            total_paid: total_principal + total_interest,
            total_principal,
            total_interest,
        }
    }
}

/// Date of the payment `month` months after `start_date` (month 0 is the
/// start date). Month ends are clamped, so Jan 31 + 1 month is Feb 28/29.
pub fn payment_date(start_date: NaiveDate, month: u32) -> ScheduleResult<NaiveDate> {
    start_date
        .checked_add_months(Months::new(month))
        .ok_or_else(|| ScheduleError::DateOverflow {
            reason: format!("{start_date} plus {month} months is out of range"),
        })
}

/// Runs the month loop for `terms`.
///
/// `principal_rule` receives the month index, the state before the month and
/// the month's unrounded interest, and returns the principal to repay. On the
/// last month its answer is overridden: the principal becomes the loan amount
/// minus the rounded principal already emitted, so the rows sum to the loan
/// amount exactly.
///
/// Once the balance reaches zero before the last month, the remaining rows
/// are emitted with zero principal and zero interest.
pub(crate) fn build_schedule<F>(
    policy: &CalculationPolicy,
    terms: &LoanTerms,
    monthly_rate: Decimal,
    principal_rule: F,
) -> ScheduleResult<Vec<ScheduleRow>>
where
    F: Fn(u32, &ScheduleAccumulator, Decimal) -> Decimal,
{
    let Some(last_month) = terms.period_months.checked_sub(1) else {
        return Err(ScheduleError::invalid_input("periodMonths", "must be at least 1 month"));
    };
    let initial = ScheduleAccumulator::new(policy.internal(terms.amount), terms.period_months as usize);

    let accumulator = (0..terms.period_months).try_fold(initial, |acc, month| {
        let date = payment_date(terms.start_date, month)?;
        let mut step = MonthlyPayment::calculate(policy, acc.balance(), monthly_rate, |interest| {
            principal_rule(month, &acc, interest)
        })?;

        if month == last_month {
            step = step.with_principal(terms.amount - acc.accumulated_principal());
        } else if step.balance_after.is_zero() && !acc.balance().is_zero() {
            debug!(month, months = terms.period_months, "balance closed before the final month");
        }

        let row = step.to_row(policy, date);
        Ok::<_, ScheduleError>(acc.advance(row, step.balance_after))
    })?;

    Ok(accumulator.into_rows())
}
