use std::collections::HashMap;

use tracing::{debug, warn};

use crate::ScheduleResult;
use crate::calculator::ScheduleCalculator;
use crate::error::ScheduleError;
use crate::loan::{LoanTerms, ScheduleType};
use crate::policy::CalculationPolicy;
use crate::schedule::ScheduleRow;

/// Routes loan terms to the calculator registered for their schedule type.
///
/// The mapping is fixed at construction, so one dispatcher can be shared
/// across threads without locking.
#[derive(Debug, Clone)]
pub struct ScheduleDispatcher {
    calculators: HashMap<ScheduleType, ScheduleCalculator>,
}

impl ScheduleDispatcher {
    /// # Errors
    ///
    /// Fails if `calculators` is empty or registers a schedule type twice.
    pub fn new<I>(calculators: I) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = ScheduleCalculator>,
    {
        let mut registered = HashMap::new();
        for calculator in calculators {
            let schedule_type = calculator.schedule_type();
            if registered.insert(schedule_type, calculator).is_some() {
                return Err(ScheduleError::DuplicateScheduleType(schedule_type));
            }
        }
        if registered.is_empty() {
            return Err(ScheduleError::EmptyCalculatorSet);
        }

        debug!(types = ?registered.keys().collect::<Vec<_>>(), "schedule dispatcher ready");
        Ok(ScheduleDispatcher {
            calculators: registered,
        })
    }

    /// Both calculators under one policy.
    pub fn standard(policy: CalculationPolicy) -> Self {
        ScheduleDispatcher {
            calculators: ScheduleType::ALL
                .into_iter()
                .map(|schedule_type| (schedule_type, ScheduleCalculator::for_type(schedule_type, policy)))
                .collect(),
        }
    }

    /// Registered schedule types, in declaration order.
    pub fn supported_types(&self) -> Vec<ScheduleType> {
        ScheduleType::ALL
            .into_iter()
            .filter(|schedule_type| self.calculators.contains_key(schedule_type))
            .collect()
    }

    /// Validates `terms` and computes the schedule for their schedule type.
    pub fn calculate_schedule(&self, terms: &LoanTerms) -> ScheduleResult<Vec<ScheduleRow>> {
        self.calculate_with(terms.schedule_type, terms)
    }

    /// Computes an annuity schedule regardless of `terms.schedule_type`.
    pub fn calculate_annuity_schedule(&self, terms: &LoanTerms) -> ScheduleResult<Vec<ScheduleRow>> {
        self.calculate_with(ScheduleType::Annuity, terms)
    }

    /// Computes an equal-principal schedule regardless of `terms.schedule_type`.
    pub fn calculate_equal_principal_schedule(
        &self,
        terms: &LoanTerms,
    ) -> ScheduleResult<Vec<ScheduleRow>> {
        self.calculate_with(ScheduleType::EqualPrincipal, terms)
    }

    fn calculate_with(
        &self,
        schedule_type: ScheduleType,
        terms: &LoanTerms,
    ) -> ScheduleResult<Vec<ScheduleRow>> {
        let calculator = self.calculators.get(&schedule_type).ok_or_else(|| {
            warn!(%schedule_type, "no calculator registered");
            ScheduleError::UnsupportedScheduleType(schedule_type.to_string())
        })?;

        if let Err(e) = terms.validate() {
            warn!(error = %e, "rejected loan terms");
            return Err(e);
        }

        debug!(
            %schedule_type,
            loan_type = ?terms.loan_type,
            amount = %terms.amount,
            months = terms.period_months,
            annual_rate = %terms.annual_interest_rate,
            start_date = %terms.start_date,
            "calculating repayment schedule"
        );
        calculator.calculate(terms)
    }
}

impl Default for ScheduleDispatcher {
    fn default() -> Self {
        ScheduleDispatcher::standard(CalculationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{AnnuityCalculator, EqualPrincipalCalculator};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn loan(schedule_type: ScheduleType) -> LoanTerms {
        LoanTerms::new(
            dec!(1200.00),
            12,
            dec!(6.00),
            schedule_type,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_dispatches_by_schedule_type() {
        let dispatcher = ScheduleDispatcher::default();

        let annuity = dispatcher.calculate_schedule(&loan(ScheduleType::Annuity)).unwrap();
        let expected = AnnuityCalculator::default().calculate(&loan(ScheduleType::Annuity)).unwrap();
        assert_eq!(annuity, expected);

        let equal = dispatcher.calculate_schedule(&loan(ScheduleType::EqualPrincipal)).unwrap();
        assert!(equal.iter().all(|row| row.principal == dec!(100.00)));
    }

    #[test]
    fn test_forced_calculators_ignore_terms_schedule_type() {
        let dispatcher = ScheduleDispatcher::default();
        let terms = loan(ScheduleType::Annuity);

        let equal = dispatcher.calculate_equal_principal_schedule(&terms).unwrap();
        assert_eq!(equal, EqualPrincipalCalculator::default().calculate(&terms).unwrap());

        let annuity = dispatcher.calculate_annuity_schedule(&loan(ScheduleType::EqualPrincipal)).unwrap();
        assert_eq!(annuity[0].payment, annuity[1].payment);
    }

    #[test]
    fn test_unsupported_schedule_type() {
        let dispatcher = ScheduleDispatcher::new([ScheduleCalculator::from(AnnuityCalculator::default())]).unwrap();

        match dispatcher.calculate_schedule(&loan(ScheduleType::EqualPrincipal)) {
            Err(ScheduleError::UnsupportedScheduleType(value)) => assert_eq!(value, "EQUAL_PRINCIPAL"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(dispatcher.supported_types(), vec![ScheduleType::Annuity]);
    }

    #[test]
    fn test_empty_calculator_set_is_rejected() {
        let result = ScheduleDispatcher::new(Vec::<ScheduleCalculator>::new());
        assert!(matches!(result, Err(ScheduleError::EmptyCalculatorSet)));
    }

    #[test]
    fn test_duplicate_calculator_is_rejected() {
        let result = ScheduleDispatcher::new([
            ScheduleCalculator::from(AnnuityCalculator::default()),
            ScheduleCalculator::from(EqualPrincipalCalculator::default()),
            ScheduleCalculator::from(AnnuityCalculator::default()),
        ]);
        assert!(matches!(
            result,
            Err(ScheduleError::DuplicateScheduleType(ScheduleType::Annuity))
        ));
    }

    #[test]
    fn test_invalid_terms_are_rejected_before_calculation() {
        let dispatcher = ScheduleDispatcher::default();
        let mut terms = loan(ScheduleType::Annuity);
        terms.period_months = 0;

        assert!(matches!(
            dispatcher.calculate_schedule(&terms),
            Err(ScheduleError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_standard_supports_every_type() {
        assert_eq!(
            ScheduleDispatcher::default().supported_types(),
            ScheduleType::ALL.to_vec()
        );
    }
}
