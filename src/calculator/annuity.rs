use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::ScheduleResult;
use crate::error::ScheduleError;
use crate::loan::LoanTerms;
use crate::policy::CalculationPolicy;
use crate::schedule::{ScheduleRow, build_schedule};

/// Constant-payment (French / Price) schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnuityCalculator {
    policy: CalculationPolicy,
}

impl AnnuityCalculator {
    pub fn new(policy: CalculationPolicy) -> Self {
        AnnuityCalculator { policy }
    }

    pub fn policy(&self) -> &CalculationPolicy {
        &self.policy
    }

    /// Level payment at calculation precision.
    ///
    /// `PMT = P * r * (1 + r)^n / ((1 + r)^n - 1)`; with a zero rate the
    /// formula is undefined and the payment is `P / n`.
    pub fn level_payment(
        &self,
        total_amount: Decimal,
        monthly_rate: Decimal,
        total_months: u32,
    ) -> ScheduleResult<Decimal> {
        if total_months == 0 {
            return Err(ScheduleError::invalid_input("periodMonths", "must be at least 1 month"));
        }
        if monthly_rate.is_zero() {
            return Ok(self.policy.internal(total_amount / Decimal::from(total_months)));
        }

        let compound_factor = (Decimal::ONE + monthly_rate)
            .checked_powu(total_months.into())
            .ok_or_else(|| ScheduleError::overflow("annuity compound factor"))?;
        let annuity_factor = monthly_rate
            .checked_mul(compound_factor)
            .and_then(|numerator| numerator.checked_div(compound_factor - Decimal::ONE))
            .ok_or_else(|| ScheduleError::overflow("annuity factor"))?;

        total_amount
            .checked_mul(annuity_factor)
            .map(|payment| self.policy.internal(payment))
            .ok_or_else(|| ScheduleError::overflow("annuity payment"))
    }

    /// Every month pays the rounded level payment; its principal share is
    /// what remains after the rounded interest. The last month repays
    /// whatever principal is left, so its payment may differ by a few cents.
    pub fn calculate(&self, terms: &LoanTerms) -> ScheduleResult<Vec<ScheduleRow>> {
        let policy = self.policy;
        let monthly_rate = policy.monthly_rate(terms.annual_interest_rate);
        let payment = self.level_payment(terms.amount, monthly_rate, terms.period_months)?;

        if monthly_rate.is_zero() {
            debug!(
                amount = %terms.amount,
                months = terms.period_months,
                level_payment = %payment,
                "zero rate, annuity falls back to equal installments"
            );
            return self.calculate_interest_free(terms, payment);
        }

        let constant_payment = policy.output(payment);
        debug!(
            amount = %terms.amount,
            months = terms.period_months,
            monthly_rate = %monthly_rate,
            level_payment = %constant_payment,
            "annuity level payment"
        );

        build_schedule(&policy, terms, monthly_rate, |_, _, interest| {
            constant_payment - policy.output(interest)
        })
    }

    // Spreads the loan over the months by rounding the cumulative level
    // payment, so each payment is one of the two cent values bracketing it.
    fn calculate_interest_free(&self, terms: &LoanTerms, level_payment: Decimal) -> ScheduleResult<Vec<ScheduleRow>> {
        let policy = self.policy;

        build_schedule(&policy, terms, Decimal::ZERO, |month, acc, _| {
            policy.output(level_payment * Decimal::from(month + 1)) - acc.accumulated_principal()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::ScheduleType;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn loan(amount: Decimal, months: u32, rate: Decimal) -> LoanTerms {
        LoanTerms::new(
            amount,
            months,
            rate,
            ScheduleType::Annuity,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn calculator() -> AnnuityCalculator {
        AnnuityCalculator::default()
    }

    #[rstest]
    #[case(dec!(1000), 12, dec!(5), dec!(85.61))]
    #[case(dec!(10000), 24, dec!(6), dec!(443.21))]
    #[case(dec!(100000), 360, dec!(4.5), dec!(506.69))]
    #[case(dec!(12000), 12, dec!(12), dec!(1066.19))]
    #[case(dec!(1000), 1, dec!(5), dec!(1004.17))]
    fn test_level_payment(
        #[case] amount: Decimal,
        #[case] months: u32,
        #[case] rate: Decimal,
        #[case] expected: Decimal,
    ) {
        let calc = calculator();
        let monthly_rate = calc.policy().monthly_rate(rate);
        let payment = calc.level_payment(amount, monthly_rate, months).unwrap();
        assert_eq!(calc.policy().output(payment), expected);
    }

    #[test]
    fn test_level_payment_zero_rate_falls_back_to_equal_installments() {
        let payment = calculator().level_payment(dec!(10000), Decimal::ZERO, 24).unwrap();
        assert_eq!(payment, dec!(416.6666666667));
    }

    #[test]
    fn test_level_payment_zero_months() {
        let result = calculator().level_payment(dec!(10000), dec!(0.005), 0);
        assert!(matches!(result, Err(ScheduleError::InvalidInput { .. })));
    }

    #[test]
    fn test_level_payment_overflow_is_reported() {
        let result = calculator().level_payment(dec!(1000), dec!(0.0833333333), 100_000);
        assert!(matches!(result, Err(ScheduleError::NumericOverflow { .. })));
    }

    #[test]
    fn test_annuity_schedule_with_correct_totals() {
        let schedule = calculator().calculate(&loan(dec!(1000.00), 12, dec!(5.00))).unwrap();

        assert_eq!(schedule.len(), 12);
        let total_principal: Decimal = schedule.iter().map(|row| row.principal).sum();
        let total_interest: Decimal = schedule.iter().map(|row| row.interest).sum();
        let total_paid: Decimal = schedule.iter().map(|row| row.payment).sum();

        assert_eq!(total_principal, dec!(1000.00));
        assert_eq!(total_interest, dec!(27.30));
        assert_eq!(total_paid, total_principal + total_interest);
        assert_eq!(schedule[11].remaining_balance, dec!(0.00));
    }

    #[test]
    fn test_first_and_last_rows() {
        let schedule = calculator().calculate(&loan(dec!(1000.00), 12, dec!(5.00))).unwrap();

        let first = &schedule[0];
        assert_eq!(first.payment, dec!(85.61));
        assert_eq!(first.interest, dec!(4.17));
        assert_eq!(first.principal, dec!(81.44));
        assert_eq!(first.remaining_balance, dec!(918.56));

        let last = &schedule[11];
        assert_eq!(last.principal, dec!(85.23));
        assert_eq!(last.interest, dec!(0.36));
        assert_eq!(last.payment, dec!(85.59));
    }

    #[test]
    fn test_equal_monthly_payments() {
        let schedule = calculator().calculate(&loan(dec!(10000.00), 24, dec!(6.00))).unwrap();

        let (last, rest) = schedule.split_last().unwrap();
        assert!(rest.iter().all(|row| row.payment == dec!(443.21)));
        assert_eq!(last.payment, dec!(443.11));
    }

    #[test]
    fn test_decreasing_interest_and_increasing_principal() {
        let schedule = calculator().calculate(&loan(dec!(100000.00), 360, dec!(4.50))).unwrap();

        assert!(schedule[0].interest > schedule[0].principal);
        for pair in schedule[..359].windows(2) {
            assert!(pair[0].interest > pair[1].interest);
            assert!(pair[0].principal < pair[1].principal);
        }
        assert!(schedule[359].principal > schedule[359].interest);
    }

    #[test]
    fn test_exact_totals_for_large_loan_and_long_term() {
        let schedule = calculator().calculate(&loan(dec!(100000.00), 360, dec!(4.50))).unwrap();

        assert_eq!(schedule.len(), 360);
        let total_principal: Decimal = schedule.iter().map(|row| row.principal).sum();
        let total_interest: Decimal = schedule.iter().map(|row| row.interest).sum();
        assert_eq!(total_principal, dec!(100000.00));
        assert_eq!(total_interest, dec!(82404.57));
        assert_eq!(schedule[359].remaining_balance, dec!(0.00));
    }

    #[test]
    fn test_zero_rate_splits_into_cents() {
        let schedule = calculator().calculate(&loan(dec!(10000.00), 24, dec!(0.00))).unwrap();

        assert_eq!(schedule.len(), 24);
        assert!(
            schedule
                .iter()
                .all(|row| row.payment == dec!(416.67) || row.payment == dec!(416.66))
        );
        assert!(schedule.iter().all(|row| row.interest.is_zero()));
        assert_eq!(schedule[0].payment, dec!(416.67));
        assert_eq!(schedule[1].payment, dec!(416.66));

        let total: Decimal = schedule.iter().map(|row| row.principal).sum();
        assert_eq!(total, dec!(10000.00));
        assert_eq!(schedule[23].remaining_balance, dec!(0.00));
    }

    #[test]
    fn test_first_row_of_largest_loan() {
        let schedule = calculator()
            .calculate(&loan(dec!(9999999999999.99), 360, dec!(5.00)))
            .unwrap();

        let first = &schedule[0];
        assert_eq!(first.interest, dec!(41666666666.67));
        assert_eq!(first.principal, dec!(12015495634.54));
        assert_eq!(first.payment, dec!(53682162301.21));

        let total: Decimal = schedule.iter().map(|row| row.principal).sum();
        assert_eq!(total, dec!(9999999999999.99));
        assert_eq!(schedule[359].remaining_balance, dec!(0.00));
    }

    #[test]
    fn test_single_month_loan() {
        let schedule = calculator().calculate(&loan(dec!(1000.00), 1, dec!(5.00))).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].principal, dec!(1000.00));
        assert_eq!(schedule[0].interest, dec!(4.17));
        assert_eq!(schedule[0].payment, dec!(1004.17));
        assert_eq!(schedule[0].remaining_balance, dec!(0.00));
    }
}
