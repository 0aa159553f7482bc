use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ScheduleResult;
use crate::error::ScheduleError;
use crate::policy::CalculationPolicy;
use crate::schedule::ScheduleRow;

/// One month of a schedule at calculation precision.
///
/// Nothing here is rounded to the result scale; that happens once, in
/// [`MonthlyPayment::to_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyPayment {
    pub balance_before: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance_after: Decimal,
}

impl MonthlyPayment {
    /// Accrues interest on `balance_before` and lets `principal_rule` decide
    /// how much of the balance is repaid. The principal is capped at the
    /// balance so it never goes negative.
    pub fn calculate<F>(
        policy: &CalculationPolicy,
        balance_before: Decimal,
        monthly_rate: Decimal,
        principal_rule: F,
    ) -> ScheduleResult<Self>
    where
        F: FnOnce(Decimal) -> Decimal,
    {
        let interest = policy.monthly_interest(balance_before, monthly_rate)?;
        let principal = policy
            .internal(principal_rule(interest))
            .min(balance_before)
            .max(Decimal::ZERO);
        let balance_after = balance_before
            .checked_sub(principal)
            .ok_or_else(|| ScheduleError::overflow("balance after payment"))?;

        Ok(MonthlyPayment {
            balance_before,
            interest,
            principal,
            balance_after,
        })
    }

    /// Replaces the principal, keeping the interest accrued on the actual
    /// balance. Used for the final-period correction.
    pub fn with_principal(self, principal: Decimal) -> Self {
        MonthlyPayment {
            principal,
            balance_after: self.balance_before - principal,
            ..self
        }
    }

    pub fn payment(&self) -> Decimal {
        self.principal + self.interest
    }

    /// Rounds the components and derives the payment from them, so
    /// `payment == principal + interest` holds on the emitted row.
    pub fn to_row(&self, policy: &CalculationPolicy, payment_date: NaiveDate) -> ScheduleRow {
        let principal = policy.output(self.principal);
        let interest = policy.output(self.interest);
        ScheduleRow {
            payment_date,
            payment: principal + interest,
            principal,
            interest,
            remaining_balance: policy.output(self.balance_after),
        }
    }
}
