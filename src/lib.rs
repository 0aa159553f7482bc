//! `loan_schedule` is a Rust library for computing month-by-month loan repayment schedules.
//!
//! It supports the two classic amortization systems:
//! - **Annuity**: a constant total payment every month; the principal share grows as
//!   the interest on the declining balance shrinks.
//! - **Equal principal**: a constant principal share every month, leading to decreasing
//!   total payments over time.
//!
//! All arithmetic is done with [`rust_decimal::Decimal`]. Intermediate values keep ten
//! fractional digits, emitted amounts are rounded half-up to cents, and the last month
//! absorbs the rounding residue so that the principal of all rows adds up to the loan
//! amount exactly and the final balance is zero.
//!
//! ## Usage
//!
//! Add `loan_schedule` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! loan_schedule = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! chrono = "0.4"
//! ```
//!
//! Then, use the `calculate_schedule` function to get the payment rows:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use loan_schedule::{calculate_schedule, LoanTerms, ScheduleSummary, ScheduleType};
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let terms = LoanTerms::new(
//!         dec!(1000.00),
//!         12,
//!         dec!(5.00),
//!         ScheduleType::Annuity,
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     );
//!
//!     match calculate_schedule(&terms) {
//!         Ok(rows) => {
//!             for row in &rows {
//!                 println!("{} {:>8} {:>8} {:>8}", row.payment_date, row.payment, row.principal, row.interest);
//!             }
//!             let summary = ScheduleSummary::from_rows(&rows);
//!             assert_eq!(summary.total_principal, dec!(1000.00));
//!             assert_eq!(rows[11].remaining_balance, dec!(0.00));
//!         }
//!         Err(e) => {
//!             eprintln!("Error calculating repayment schedule: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod calculator;
pub mod dispatcher;
pub mod error;
pub mod loan;
pub mod policy;
pub mod schedule;

pub use calculator::{AnnuityCalculator, EqualPrincipalCalculator, ScheduleCalculator};
pub use dispatcher::ScheduleDispatcher;
pub use error::ScheduleError;
pub use loan::{LoanTerms, LoanType, ScheduleType};
pub use policy::CalculationPolicy;
pub use schedule::{ScheduleRow, ScheduleSummary};

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Calculates the repayment schedule for `terms` with the default precision policy.
///
/// This is the main entry point of the library. Long-lived callers that compute many
/// schedules can build a [`ScheduleDispatcher`] once and share it instead.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidInput`] if the terms violate the input constraints
/// (non-positive amount, zero months, rate outside 0..=100, more than two decimals).
pub fn calculate_schedule(terms: &LoanTerms) -> ScheduleResult<Vec<ScheduleRow>> {
    ScheduleDispatcher::default().calculate_schedule(terms)
}
