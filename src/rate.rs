use crate::error::{Argument, LoanResult};
use crate::validation::ensure_positive;

/// Converts an annual rate into the rate applied each compounding period.
///
/// A rate of 7.5% compounded monthly (`0.075`, `12`) yields `0.00625`.
pub fn period_rate(annual_rate: f64, compounding_periods: u32) -> LoanResult<f64> {
    let periods = ensure_positive(Argument::CompoundingPeriods, f64::from(compounding_periods))?;
    Ok(annual_rate / periods)
}
