//! `mortgage_payoff` is a Rust library for fixed-rate amortizing loans.
//!
//! It provides the closed-form loan formulas (monthly payment, remaining
//! balance, simple and total interest, loan length for a given payment), a
//! period-by-period interest accumulator, and a payoff schedule generator that
//! shows how extra principal shortens the loan.
//!
//! All calculations use `f64`, validate their arguments before doing any
//! arithmetic, and report failures through [`LoanError`].
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mortgage_payoff::{LoanTerms, monthly_payment};
//!
//! let payment = monthly_payment(200_000.0, 0.075, 360, 12).unwrap();
//! assert!((payment - 1398.43).abs() < 0.005);
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let summary = LoanTerms::new(200_000.0, 0.075, 360)
//!     .payoff(1_000.0, Some(start))
//!     .unwrap();
//!
//! assert!(summary.loan_length < summary.default_loan_length);
//! assert_eq!(summary.schedule.len(), summary.loan_length as usize);
//! println!("Paid off on {} instead of {}", summary.end_date, summary.default_end_date);
//! println!("Interest saved: {:.2}", summary.interest_saved());
//! ```

pub mod amortization;
pub mod calendar;
pub mod error;
pub mod formulas;
pub mod payoff;
pub mod rate;
pub mod terms;
pub mod validation;

pub use amortization::total_amortizing_interest;
pub use error::{Argument, LoanError, LoanResult};
pub use formulas::{loan_balance, loan_length, monthly_payment, simple_interest, total_interest};
pub use payoff::{PayoffInput, PayoffSummary, PeriodRow, RowKind, calculate_payoff, mortgage_payoff};
pub use rate::period_rate;
pub use terms::LoanTerms;

/// Compounding periods per year when none is given: monthly.
pub const DEFAULT_COMPOUNDING_PERIODS: u32 = 12;
