use rust_decimal::Decimal;
use tracing::debug;

use crate::ScheduleResult;
use crate::error::ScheduleError;
use crate::loan::LoanTerms;
use crate::policy::CalculationPolicy;
use crate::schedule::{ScheduleRow, build_schedule};

/// Constant-amortization (SAC) schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualPrincipalCalculator {
    policy: CalculationPolicy,
}

impl EqualPrincipalCalculator {
    pub fn new(policy: CalculationPolicy) -> Self {
        EqualPrincipalCalculator { policy }
    }

    pub fn policy(&self) -> &CalculationPolicy {
        &self.policy
    }

    /// `P / n`, rounded once to the result scale.
    pub fn fixed_principal(&self, total_amount: Decimal, total_months: u32) -> ScheduleResult<Decimal> {
        if total_months == 0 {
            return Err(ScheduleError::invalid_input("periodMonths", "must be at least 1 month"));
        }
        Ok(self.policy.output(total_amount / Decimal::from(total_months)))
    }

    /// Repays the fixed principal each month, with interest on the declining
    /// balance. The last month takes the rounding residue.
    pub fn calculate(&self, terms: &LoanTerms) -> ScheduleResult<Vec<ScheduleRow>> {
        let policy = self.policy;
        let monthly_rate = policy.monthly_rate(terms.annual_interest_rate);
        let fixed_amortization = self.fixed_principal(terms.amount, terms.period_months)?;

        debug!(
            amount = %terms.amount,
            months = terms.period_months,
            monthly_rate = %monthly_rate,
            fixed_principal = %fixed_amortization,
            "equal principal amortization"
        );

        build_schedule(&policy, terms, monthly_rate, |_, _, _| fixed_amortization)
    }
}
