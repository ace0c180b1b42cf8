use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Argument, LoanResult};
use crate::formulas::{loan_balance, monthly_payment, total_interest};
use crate::payoff::{PayoffSummary, mortgage_payoff};
use crate::rate::period_rate;
use crate::validation::{ensure_non_negative, ensure_positive};
use crate::DEFAULT_COMPOUNDING_PERIODS;

fn default_compounding_periods() -> u32 {
    DEFAULT_COMPOUNDING_PERIODS
}

/// Parameters of a fixed-rate loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// The amount borrowed.
    pub principal: f64,
    /// The annual interest rate as a fraction (e.g., 0.075 for 7.5%).
    pub annual_rate: f64,
    /// The scheduled number of payments.
    pub term_months: i32,
    /// How many times per year interest compounds. Defaults to 12.
    #[serde(default = "default_compounding_periods")]
    pub compounding_periods: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, term_months: i32) -> Self {
        LoanTerms {
            principal,
            annual_rate,
            term_months,
            compounding_periods: DEFAULT_COMPOUNDING_PERIODS,
        }
    }

    pub fn with_compounding_periods(self, compounding_periods: u32) -> Self {
        LoanTerms {
            compounding_periods,
            ..self
        }
    }

    pub fn validate(&self) -> LoanResult<()> {
        ensure_non_negative(Argument::Loan, self.principal)?;
        ensure_non_negative(Argument::InterestRate, self.annual_rate)?;
        ensure_non_negative(Argument::TermMonths, f64::from(self.term_months))?;
        ensure_positive(Argument::CompoundingPeriods, f64::from(self.compounding_periods))?;
        Ok(())
    }

    pub fn period_rate(&self) -> LoanResult<f64> {
        self.validate()?;
        period_rate(self.annual_rate, self.compounding_periods)
    }

    pub fn monthly_payment(&self) -> LoanResult<f64> {
        monthly_payment(
            self.principal,
            self.annual_rate,
            self.term_months,
            self.compounding_periods,
        )
    }

    /// Scheduled balance once `periods_elapsed` payments have been made.
    pub fn balance_after(&self, periods_elapsed: i32) -> LoanResult<f64> {
        loan_balance(
            self.principal,
            self.annual_rate,
            self.term_months,
            periods_elapsed,
            self.compounding_periods,
        )
    }

    pub fn total_interest(&self) -> LoanResult<f64> {
        total_interest(
            self.principal,
            self.annual_rate,
            self.term_months,
            self.compounding_periods,
        )
    }

    /// Builds the payoff schedule, starting today when `start_date` is `None`.
    pub fn payoff(
        &self,
        extra_principal: f64,
        start_date: Option<NaiveDate>,
    ) -> LoanResult<PayoffSummary> {
        mortgage_payoff(
            self.principal,
            self.annual_rate,
            self.term_months,
            extra_principal,
            start_date,
            self.compounding_periods,
        )
    }
}
