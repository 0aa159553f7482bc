use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ScheduleResult;
use crate::error::ScheduleError;

const MAX_AMOUNT_INTEGER_DIGITS: u32 = 13;
const MAX_FRACTION_DIGITS: u32 = 2;
const MAX_ANNUAL_RATE: Decimal = dec!(100);

/// Repayment plan shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    /// Constant total payment; the principal share grows over time.
    Annuity,
    /// Constant principal share; the total payment shrinks over time.
    EqualPrincipal,
}

impl ScheduleType {
    pub const ALL: [ScheduleType; 2] = [ScheduleType::Annuity, ScheduleType::EqualPrincipal];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Annuity => "ANNUITY",
            ScheduleType::EqualPrincipal => "EQUAL_PRINCIPAL",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = ScheduleError;

    /// Accepts the wire names as well as their lowercase/kebab spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ANNUITY" => Ok(ScheduleType::Annuity),
            "EQUAL_PRINCIPAL" => Ok(ScheduleType::EqualPrincipal),
            _ => Err(ScheduleError::UnsupportedScheduleType(s.to_string())),
        }
    }
}

/// What the loan finances. Carried along for callers, never used in the math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanType {
    #[default]
    Consumer,
    Car,
    Mortgage,
}

impl FromStr for LoanType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONSUMER" => Ok(LoanType::Consumer),
            "CAR" => Ok(LoanType::Car),
            "MORTGAGE" => Ok(LoanType::Mortgage),
            _ => Err(ScheduleError::invalid_input("loanType", format!("unknown loan type {s}"))),
        }
    }
}

/// Terms of a single loan, as accepted by the schedule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    #[serde(default)]
    pub loan_type: LoanType,
    /// Principal, exact to two fractional digits.
    pub amount: Decimal,
    /// Number of monthly payments.
    pub period_months: u32,
    /// Annual nominal rate as a percentage (e.g. 5.00 for 5%).
    pub annual_interest_rate: Decimal,
    pub schedule_type: ScheduleType,
    /// Date of the first payment.
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn new(
        amount: Decimal,
        period_months: u32,
        annual_interest_rate: Decimal,
        schedule_type: ScheduleType,
        start_date: NaiveDate,
    ) -> Self {
        LoanTerms {
            loan_type: LoanType::default(),
            amount,
            period_months,
            annual_interest_rate,
            schedule_type,
            start_date,
        }
    }

    pub fn with_loan_type(mut self, loan_type: LoanType) -> Self {
        self.loan_type = loan_type;
        self
    }

    pub fn from_json(input: &str) -> ScheduleResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Checks the input constraints the engine relies on. Trailing zeros do
    /// not count as fractional digits, so `1000.000` is accepted.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(ScheduleError::invalid_input("amount", "must be greater than 0"));
        }
        check_digits("amount", self.amount, MAX_AMOUNT_INTEGER_DIGITS)?;

        if self.period_months < 1 {
            return Err(ScheduleError::invalid_input("periodMonths", "must be at least 1 month"));
        }

        if self.annual_interest_rate < Decimal::ZERO || self.annual_interest_rate > MAX_ANNUAL_RATE {
            return Err(ScheduleError::invalid_input(
                "annualInterestRate",
                "must be between 0 and 100",
            ));
        }
        check_digits("annualInterestRate", self.annual_interest_rate, 3)?;

        Ok(())
    }
}

fn check_digits(field: &str, value: Decimal, max_integer_digits: u32) -> ScheduleResult<()> {
    if value.normalize().scale() > MAX_FRACTION_DIGITS {
        return Err(ScheduleError::invalid_input(
            field,
            format!("must have at most {MAX_FRACTION_DIGITS} decimal places"),
        ));
    }
    if value.abs().trunc() >= Decimal::from(10u64.pow(max_integer_digits)) {
        return Err(ScheduleError::invalid_input(
            field,
            format!("must have at most {max_integer_digits} integer digits"),
        ));
    }
    Ok(())
}
