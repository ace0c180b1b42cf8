//! Closed-form fixed-rate loan formulas.
//!
//! Every function validates its arguments first and then evaluates a single
//! expression. Rates are annual and converted with [`period_rate`]; lengths
//! are counted in compounding periods (months with the default of 12).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Argument, LoanError, LoanResult};
use crate::rate::period_rate;
use crate::validation::ensure_non_negative;

/// Decimal places kept before rounding a fractional loan length up.
const PERIOD_PRECISION: u32 = 6;

/// Fixed payment that amortizes `loan` over `term_months` periods.
///
/// The Price formula is: PMT = L * [r(1 + r)^n] / [(1 + r)^n – 1], evaluated
/// as L * r / [1 – (1 + r)^–n] so very long terms tend to L * r instead of
/// overflowing.
///
/// # Errors
///
/// Returns `InvalidArgument` for negative inputs, zero compounding periods or
/// a zero-length term.
pub fn monthly_payment(
    loan: f64,
    annual_rate: f64,
    term_months: i32,
    compounding_periods: u32,
) -> LoanResult<f64> {
    ensure_non_negative(Argument::Loan, loan)?;
    ensure_non_negative(Argument::InterestRate, annual_rate)?;
    ensure_non_negative(Argument::TermMonths, f64::from(term_months))?;
    let rate = period_rate(annual_rate, compounding_periods)?;

    if term_months == 0 {
        return Err(LoanError::invalid(
            Argument::TermMonths,
            "a zero-length term has no payment",
        ));
    }

    let n = f64::from(term_months);
    let discount = (1.0 + rate).powf(-n);
    if discount == 1.0 {
        return Ok(loan / n);
    }
    Ok(loan * rate / (1.0 - discount))
}

/// Outstanding balance after `periods_elapsed` scheduled payments.
///
/// B = L * [(1 + r)^n – (1 + r)^p] / [(1 + r)^n – 1], evaluated as
/// L * [1 – (1 + r)^(p–n)] / [1 – (1 + r)^–n].
///
/// `periods_elapsed` is not clamped to the term; past the term the formula
/// goes negative like the underlying algebra does.
///
/// # Errors
///
/// Returns `InvalidArgument(PeriodsElapsed)` when the elapsed periods run so
/// far past the term that the balance is no longer a finite number.
pub fn loan_balance(
    loan: f64,
    annual_rate: f64,
    term_months: i32,
    periods_elapsed: i32,
    compounding_periods: u32,
) -> LoanResult<f64> {
    ensure_non_negative(Argument::Loan, loan)?;
    ensure_non_negative(Argument::InterestRate, annual_rate)?;
    ensure_non_negative(Argument::TermMonths, f64::from(term_months))?;
    ensure_non_negative(Argument::PeriodsElapsed, f64::from(periods_elapsed))?;
    let rate = period_rate(annual_rate, compounding_periods)?;

    if term_months == 0 {
        if periods_elapsed == 0 {
            return Ok(loan);
        }
        return Err(LoanError::invalid(
            Argument::TermMonths,
            "a zero-length term has no balance after payments",
        ));
    }

    let n = f64::from(term_months);
    let p = f64::from(periods_elapsed);
    let discount = (1.0 + rate).powf(-n);
    let balance = if discount == 1.0 {
        loan * (1.0 - p / n)
    } else {
        loan * (1.0 - (1.0 + rate).powf(p - n)) / (1.0 - discount)
    };

    if !balance.is_finite() {
        return Err(LoanError::invalid(
            Argument::PeriodsElapsed,
            "too far past the term for a finite balance",
        ));
    }
    Ok(balance)
}

/// Interest accrued on `balance` over a single period.
pub fn simple_interest(
    balance: f64,
    annual_rate: f64,
    compounding_periods: u32,
) -> LoanResult<f64> {
    ensure_non_negative(Argument::Balance, balance)?;
    ensure_non_negative(Argument::InterestRate, annual_rate)?;
    Ok(balance * period_rate(annual_rate, compounding_periods)?)
}

/// Interest paid over the whole term when only the scheduled payment is made.
pub fn total_interest(
    loan: f64,
    annual_rate: f64,
    term_months: i32,
    compounding_periods: u32,
) -> LoanResult<f64> {
    let payment = monthly_payment(loan, annual_rate, term_months, compounding_periods)?;
    Ok(payment * f64::from(term_months) - loan)
}

/// Number of periods a fixed `monthly_payment` needs to retire `loan`.
///
/// n = –ln(1 – rL/PMT) / ln(1 + r), truncated to six decimal places and
/// rounded up to a whole period.
///
/// # Errors
///
/// Returns `Unamortizable` when the payment does not exceed the first
/// period's interest, since the balance would never shrink.
pub fn loan_length(
    loan: f64,
    annual_rate: f64,
    monthly_payment: f64,
    compounding_periods: u32,
) -> LoanResult<u32> {
    ensure_non_negative(Argument::Balance, loan)?;
    ensure_non_negative(Argument::InterestRate, annual_rate)?;
    ensure_non_negative(Argument::MonthlyPayment, monthly_payment)?;
    let rate = period_rate(annual_rate, compounding_periods)?;

    if loan == 0.0 {
        return Ok(0);
    }

    let interest = rate * loan;
    let unamortizable = || {
        tracing::debug!(loan, monthly_payment, interest, "payment does not amortize the loan");
        LoanError::Unamortizable {
            payment: monthly_payment,
            interest,
        }
    };

    if monthly_payment == 0.0 {
        return Err(unamortizable());
    }

    let periods = if rate == 0.0 {
        loan / monthly_payment
    } else {
        let ratio = interest / monthly_payment;
        if ratio >= 1.0 {
            return Err(unamortizable());
        }
        -(1.0 - ratio).ln() / (1.0 + rate).ln()
    };

    truncate_periods(periods)
        .map(|d| d.ceil())
        .and_then(|d| d.to_u32())
        .ok_or_else(unamortizable)
}

/// Cuts a fractional period count to `PERIOD_PRECISION` places, discarding
/// floating-point noise such as `360.0000000000002`.
fn truncate_periods(periods: f64) -> Option<Decimal> {
    if !periods.is_finite() {
        return None;
    }
    Decimal::from_f64(periods)
        .map(|d| d.round_dp_with_strategy(PERIOD_PRECISION, RoundingStrategy::ToZero))
}
