use chrono::{Local, Months, NaiveDate};

use crate::error::{Argument, LoanError, LoanResult};

/// Advances `date` by whole months, rolling the day back to the last valid
/// day of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> LoanResult<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        LoanError::invalid(
            Argument::StartDate,
            "schedule runs past the supported calendar",
        )
    })
}

/// Start date used when the caller does not supply one.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
