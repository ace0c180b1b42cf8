//! Argument guards shared by every public calculation.

use chrono::NaiveDate;

use crate::error::{Argument, LoanError, LoanResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejects negative, NaN and infinite values.
pub fn ensure_non_negative(argument: Argument, value: f64) -> LoanResult<f64> {
    if !value.is_finite() {
        return Err(LoanError::invalid(argument, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(LoanError::invalid(argument, "must not be negative"));
    }
    Ok(value)
}

/// Rejects zero as well as everything `ensure_non_negative` rejects.
pub fn ensure_positive(argument: Argument, value: f64) -> LoanResult<f64> {
    ensure_non_negative(argument, value)?;
    if value == 0.0 {
        return Err(LoanError::invalid(argument, "must be greater than zero"));
    }
    Ok(value)
}

/// Parses an ISO `YYYY-MM-DD` start date.
pub fn parse_start_date(input: &str) -> LoanResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| LoanError::invalid(Argument::StartDate, "expected a YYYY-MM-DD date"))
}
