use rust_decimal::Decimal;

use crate::schedule::ScheduleRow;

/// Running state of one schedule computation.
///
/// The balance is kept at calculation precision while `accumulated_principal`
/// sums the *rounded* principal of every emitted row; the final-period
/// correction is taken against the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleAccumulator {
    balance: Decimal,
    accumulated_principal: Decimal,
    rows: Vec<ScheduleRow>,
}

impl ScheduleAccumulator {
    pub fn new(initial_balance: Decimal, capacity: usize) -> Self {
        ScheduleAccumulator {
            balance: initial_balance,
            accumulated_principal: Decimal::ZERO,
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn accumulated_principal(&self) -> Decimal {
        self.accumulated_principal
    }

    /// Number of rows emitted so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the state and returns it advanced by one emitted row.
    pub fn advance(mut self, row: ScheduleRow, balance_after: Decimal) -> Self {
        self.accumulated_principal += row.principal;
        self.balance = balance_after;
        self.rows.push(row);
        self
    }

    pub fn into_rows(self) -> Vec<ScheduleRow> {
        self.rows
    }
}
