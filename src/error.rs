use thiserror::Error;

use crate::loan::ScheduleType;

/// Everything that can go wrong while validating terms or building a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A loan term failed validation; `field` uses the camelCase input name.
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// The name is not a known schedule type, or no calculator is
    /// registered for it.
    #[error("Unsupported schedule type: {0}")]
    UnsupportedScheduleType(String),

    /// A dispatcher was built from an empty calculator set.
    #[error("At least one schedule calculator must be registered")]
    EmptyCalculatorSet,

    /// Two calculators were registered for the same schedule type.
    #[error("More than one calculator registered for schedule type {0}")]
    DuplicateScheduleType(ScheduleType),

    /// Calculation or result scale out of range.
    #[error("Invalid calculation policy: {0}")]
    InvalidPolicy(String),

    /// An intermediate value exceeded the range of `Decimal`.
    #[error("Numeric overflow while computing {context}")]
    NumericOverflow { context: String },

    /// A payment date fell outside the range of `NaiveDate`.
    #[error("Date overflow: {reason}")]
    DateOverflow { reason: String },

    /// Terms or policy JSON could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScheduleError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        ScheduleError::NumericOverflow {
            context: context.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        ScheduleError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_cause() {
        let err = ScheduleError::invalid_input("amount", "must be greater than zero");
        assert_eq!(err.to_string(), "Invalid input: amount: must be greater than zero");

        let err = ScheduleError::DuplicateScheduleType(ScheduleType::Annuity);
        assert_eq!(err.to_string(), "More than one calculator registered for schedule type ANNUITY");

        let err = ScheduleError::overflow("annuity payment");
        assert_eq!(err.to_string(), "Numeric overflow while computing annuity payment");
    }
}
