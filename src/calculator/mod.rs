pub mod annuity;
pub mod equal_principal;

use crate::ScheduleResult;
use crate::loan::{LoanTerms, ScheduleType};
use crate::policy::CalculationPolicy;
use crate::schedule::ScheduleRow;

pub use annuity::AnnuityCalculator;
pub use equal_principal::EqualPrincipalCalculator;

/// One of the supported schedule strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleCalculator {
    Annuity(AnnuityCalculator),
    EqualPrincipal(EqualPrincipalCalculator),
}

impl ScheduleCalculator {
    /// The calculator for `schedule_type` under `policy`.
    pub fn for_type(schedule_type: ScheduleType, policy: CalculationPolicy) -> Self {
        match schedule_type {
            ScheduleType::Annuity => ScheduleCalculator::Annuity(AnnuityCalculator::new(policy)),
            ScheduleType::EqualPrincipal => {
                ScheduleCalculator::EqualPrincipal(EqualPrincipalCalculator::new(policy))
            }
        }
    }

    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            ScheduleCalculator::Annuity(_) => ScheduleType::Annuity,
            ScheduleCalculator::EqualPrincipal(_) => ScheduleType::EqualPrincipal,
        }
    }

    pub fn calculate(&self, terms: &LoanTerms) -> ScheduleResult<Vec<ScheduleRow>> {
        match self {
            ScheduleCalculator::Annuity(calculator) => calculator.calculate(terms),
            ScheduleCalculator::EqualPrincipal(calculator) => calculator.calculate(terms),
        }
    }
}

impl From<AnnuityCalculator> for ScheduleCalculator {
    fn from(calculator: AnnuityCalculator) -> Self {
        ScheduleCalculator::Annuity(calculator)
    }
}

impl From<EqualPrincipalCalculator> for ScheduleCalculator {
    fn from(calculator: EqualPrincipalCalculator) -> Self {
        ScheduleCalculator::EqualPrincipal(calculator)
    }
}
