use crate::error::{Argument, LoanError, LoanResult};
use crate::formulas::{loan_length, simple_interest};
use crate::rate::period_rate;
use crate::validation::ensure_non_negative;

/// Slack over the closed-form length for balances left by rounding noise.
const EXTRA_PERIODS: u32 = 2;

/// Total interest paid while a fixed `monthly_payment` retires `balance`,
/// simulated period by period.
///
/// # Errors
///
/// Returns `Unamortizable` when the payment does not cover the first
/// period's interest, or when the balance is still open once the closed-form
/// length (plus a small slack) has been simulated.
pub fn total_amortizing_interest(
    balance: f64,
    annual_rate: f64,
    monthly_payment: f64,
    compounding_periods: u32,
) -> LoanResult<f64> {
    ensure_non_negative(Argument::Balance, balance)?;
    ensure_non_negative(Argument::InterestRate, annual_rate)?;
    ensure_non_negative(Argument::MonthlyPayment, monthly_payment)?;
    let rate = period_rate(annual_rate, compounding_periods)?;

    let max_periods = loan_length(balance, annual_rate, monthly_payment, compounding_periods)?
        .saturating_add(EXTRA_PERIODS);

    let mut current_balance = balance;
    let mut total_interest = 0.0;

    for _ in 0..max_periods {
        if current_balance <= 0.0 {
            return Ok(total_interest);
        }
        let interest = rate * current_balance;
        total_interest += interest;
        current_balance -= monthly_payment - interest;
    }

    if current_balance <= 0.0 {
        return Ok(total_interest);
    }

    tracing::debug!(
        balance,
        monthly_payment,
        remaining = current_balance,
        "accumulation did not close the loan"
    );
    Err(LoanError::Unamortizable {
        payment: monthly_payment,
        interest: simple_interest(current_balance, annual_rate, compounding_periods)?,
    })
}
