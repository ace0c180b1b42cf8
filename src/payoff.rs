//! Month-by-month payoff schedules with optional extra principal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::total_amortizing_interest;
use crate::calendar::{add_months, today};
use crate::error::{Argument, LoanResult};
use crate::formulas::{loan_length, monthly_payment, simple_interest, total_interest};
use crate::terms::LoanTerms;
use crate::validation::{ensure_non_negative, ensure_positive, parse_start_date};

/// Whether a row is a regular payment or the one that closes the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Normal,
    Final,
}

/// Represents the payment details for a single period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    /// 1-based position in the schedule.
    pub period: u32,
    pub period_date: NaiveDate,
    /// The portion of the payment that covers interest.
    pub interest: f64,
    /// The scheduled portion of the payment that reduces the balance.
    pub principal: f64,
    /// Principal actually applied, extra payment included. On the final row
    /// this is exactly what was still owed.
    pub principal_plus_extra: f64,
    /// The remaining balance of the loan after the payment.
    pub remaining_balance: f64,
    pub kind: RowKind,
}

/// Result of a payoff calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffSummary {
    /// The scheduled payment, without extra principal.
    pub monthly_payment: f64,
    pub extra_principal: f64,
    /// The annual interest rate.
    pub interest_rate: f64,
    /// Closed-form interest over the full term with no extra principal.
    pub default_total_interest: f64,
    /// Simulated interest for the scheduled payment alone. This is the
    /// no-extra baseline and does not depend on `extra_principal`; see
    /// [`PayoffSummary::interest_paid`] for the accelerated figure.
    pub total_interest_with_savings: f64,
    pub loan: f64,
    pub default_loan_length: u32,
    /// Periods until payoff with extra principal applied.
    pub loan_length: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub default_end_date: NaiveDate,
    pub schedule: Vec<PeriodRow>,
}

impl PayoffSummary {
    /// Interest actually paid along the schedule.
    pub fn interest_paid(&self) -> f64 {
        self.schedule.iter().map(|row| row.interest).sum()
    }

    /// Interest avoided by paying extra principal.
    pub fn interest_saved(&self) -> f64 {
        self.default_total_interest - self.interest_paid()
    }

    pub fn final_row(&self) -> Option<&PeriodRow> {
        self.schedule.last()
    }
}

/// Input parameters for a payoff calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// Paid on top of every scheduled payment. Defaults to 0.
    #[serde(default)]
    pub extra_principal: f64,
    /// ISO `YYYY-MM-DD` date of the first payment. Defaults to today.
    #[serde(default)]
    pub start_date: Option<String>,
}

impl PayoffInput {
    pub fn from_json(input: &str) -> LoanResult<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// Calculates the payoff schedule described by a `PayoffInput`.
///
/// # Errors
///
/// Returns `InvalidArgument` when `start_date` is not a `YYYY-MM-DD` date, and
/// everything [`mortgage_payoff`] returns.
pub fn calculate_payoff(input: PayoffInput) -> LoanResult<PayoffSummary> {
    let start_date = input.start_date.as_deref().map(parse_start_date).transpose()?;
    let LoanTerms {
        principal,
        annual_rate,
        term_months,
        compounding_periods,
    } = input.terms;

    mortgage_payoff(
        principal,
        annual_rate,
        term_months,
        input.extra_principal,
        start_date,
        compounding_periods,
    )
}

/// Builds the month-by-month payoff schedule for a fixed-rate loan.
///
/// The scheduled payment is derived from the term; `extra_principal` is paid
/// on top of it every period and shortens the schedule. The row that would
/// overpay the balance becomes the final row and pays exactly what is owed.
///
/// # Arguments
///
/// * `loan` - The principal loan amount.
/// * `annual_rate` - The annual interest rate as a fraction.
/// * `term_months` - The scheduled number of payments.
/// * `extra_principal` - Additional principal paid each period.
/// * `start_date` - Date of the first payment; today when `None`.
/// * `compounding_periods` - Compounding periods per year.
///
/// # Errors
///
/// Returns `InvalidArgument` for negative amounts, a zero or negative term,
/// zero compounding periods, or a schedule running past the calendar, and
/// `Unamortizable` when the scheduled payment cannot retire the loan in
/// floating point (terms so long the payment equals the period interest).
pub fn mortgage_payoff(
    loan: f64,
    annual_rate: f64,
    term_months: i32,
    extra_principal: f64,
    start_date: Option<NaiveDate>,
    compounding_periods: u32,
) -> LoanResult<PayoffSummary> {
    ensure_non_negative(Argument::Loan, loan)?;
    ensure_non_negative(Argument::InterestRate, annual_rate)?;
    ensure_non_negative(Argument::TermMonths, f64::from(term_months))?;
    ensure_non_negative(Argument::ExtraPrincipal, extra_principal)?;
    ensure_positive(Argument::CompoundingPeriods, f64::from(compounding_periods))?;
    let start_date = start_date.unwrap_or_else(today);

    let payment = monthly_payment(loan, annual_rate, term_months, compounding_periods)?;
    let default_total_interest =
        total_interest(loan, annual_rate, term_months, compounding_periods)?;
    let default_loan_length = loan_length(loan, annual_rate, payment, compounding_periods)?;
    let accelerated_length =
        loan_length(loan, annual_rate, payment + extra_principal, compounding_periods)?;

    let mut schedule = Vec::with_capacity(accelerated_length as usize);
    let mut remaining_balance = loan;
    let mut current_date = start_date;

    for index in 0..default_loan_length {
        let period = index + 1;
        let interest = simple_interest(remaining_balance, annual_rate, compounding_periods)?;
        let principal = payment - interest;
        let principal_plus_extra = principal + extra_principal;
        let next_balance = remaining_balance - principal_plus_extra;

        // The closed-form payoff period also closes the ledger, absorbing any
        // residue the running balance picked up from rounding.
        let overpays = remaining_balance + interest < payment + extra_principal;
        if overpays || period >= accelerated_length {
            tracing::trace!(period, residue = next_balance, "final payoff period");
            schedule.push(PeriodRow {
                period,
                period_date: current_date,
                interest,
                principal,
                principal_plus_extra: principal_plus_extra + next_balance,
                remaining_balance: 0.0,
                kind: RowKind::Final,
            });
            break;
        }

        schedule.push(PeriodRow {
            period,
            period_date: current_date,
            interest,
            principal,
            principal_plus_extra,
            remaining_balance: next_balance,
            kind: RowKind::Normal,
        });
        remaining_balance = next_balance;
        current_date = add_months(current_date, 1)?;
    }

    let total_interest_with_savings =
        total_amortizing_interest(loan, annual_rate, payment, compounding_periods)?;
    let end_date = add_months(start_date, accelerated_length.saturating_sub(1))?;
    let default_end_date = add_months(start_date, default_loan_length.saturating_sub(1))?;

    tracing::debug!(
        loan,
        monthly_payment = payment,
        extra_principal,
        default_loan_length,
        loan_length = accelerated_length,
        "built payoff schedule"
    );

    Ok(PayoffSummary {
        monthly_payment: payment,
        extra_principal,
        interest_rate: annual_rate,
        default_total_interest,
        total_interest_with_savings,
        loan,
        default_loan_length,
        loan_length: accelerated_length,
        start_date,
        end_date,
        default_end_date,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;

    const LOAN: f64 = 200_000.0;
    const RATE: f64 = 0.075;
    const TERM: i32 = 360;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payoff(extra_principal: f64) -> PayoffSummary {
        mortgage_payoff(LOAN, RATE, TERM, extra_principal, Some(ymd(2024, 1, 1)), 12).unwrap()
    }

    #[test]
    fn test_payoff_without_extra_principal_runs_full_term() {
        let summary = payoff(0.0);

        assert_relative_eq!(summary.monthly_payment, 1398.429017105553, max_relative = 1e-12);
        let interest = summary.default_total_interest;
        assert_relative_eq!(interest, 303434.44615799905, max_relative = 1e-10);
        assert_eq!(summary.default_loan_length, 360);
        assert_eq!(summary.loan_length, 360);
        assert_eq!(summary.schedule.len(), 360);
        assert_eq!(summary.end_date, ymd(2053, 12, 1));
        assert_eq!(summary.default_end_date, ymd(2053, 12, 1));
        assert_relative_eq!(summary.interest_paid(), interest, max_relative = 1e-9);
    }

    #[rstest]
    #[case(0.0)]
    #[case(100.0)]
    #[case(1000.0)]
    #[case(10_000.0)]
    #[case(250_000.0)]
    fn test_schedule_invariants(#[case] extra_principal: f64) {
        let summary = payoff(extra_principal);
        let schedule = &summary.schedule;

        assert_eq!(schedule.len(), summary.loan_length as usize);
        assert!(summary.loan_length <= summary.default_loan_length);

        let last = summary.final_row().unwrap();
        assert_eq!(last.kind, RowKind::Final);
        assert_eq!(last.remaining_balance, 0.0);
        assert_eq!(last.period_date, summary.end_date);
        assert!(schedule[..schedule.len() - 1].iter().all(|row| row.kind == RowKind::Normal));

        let mut previous = LOAN;
        for (index, row) in schedule.iter().enumerate() {
            assert_eq!(row.period as usize, index + 1);
            assert!(row.remaining_balance <= previous);
            assert!(row.interest >= 0.0);
            assert_relative_eq!(row.interest, previous * 0.075 / 12.0, max_relative = 1e-12);
            previous = row.remaining_balance;
        }
    }

    #[test]
    fn test_final_row_pays_exactly_what_is_owed() {
        let summary = payoff(1000.0);
        let rows = &summary.schedule;
        let owed = rows[rows.len() - 2].remaining_balance;
        let last = &rows[rows.len() - 1];

        assert_abs_diff_eq!(last.principal_plus_extra, owed, epsilon = 1e-9);
        assert!(last.principal_plus_extra < last.principal + 1000.0);
    }

    #[test]
    fn test_extra_principal_shortens_the_loan() {
        let summary = payoff(1000.0);

        assert_eq!(summary.default_loan_length, 360);
        assert!(summary.loan_length < summary.default_loan_length);
        assert_eq!(
            summary.loan_length,
            loan_length(LOAN, RATE, summary.monthly_payment + 1000.0, 12).unwrap()
        );
        assert!(summary.end_date < summary.default_end_date);
        assert!(summary.interest_saved() > 0.0);
    }

    #[test]
    fn test_large_extra_principal_pays_off_in_first_period() {
        let summary = payoff(250_000.0);

        assert_eq!(summary.loan_length, 1);
        assert_eq!(summary.end_date, summary.start_date);
        assert_abs_diff_eq!(summary.schedule[0].principal_plus_extra, LOAN, epsilon = 1e-9);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1000.0)]
    #[case(10_000.0)]
    fn test_total_interest_with_savings_is_the_no_extra_baseline(#[case] extra_principal: f64) {
        let summary = payoff(extra_principal);
        let baseline = total_amortizing_interest(LOAN, RATE, summary.monthly_payment, 12).unwrap();

        assert_eq!(summary.total_interest_with_savings, baseline);
        let baseline_interest = summary.total_interest_with_savings;
        assert_relative_eq!(baseline_interest, 303434.4461580063, max_relative = 1e-10);
    }

    #[test]
    fn test_rows_step_one_month_from_the_previous_row() {
        let start = Some(ymd(2024, 1, 31));
        let summary = mortgage_payoff(LOAN, RATE, TERM, 0.0, start, 12).unwrap();
        let dates: Vec<_> = summary.schedule.iter().map(|row| row.period_date).collect();

        // A clamped day of month carries into the following rows.
        assert_eq!(dates[..3], [ymd(2024, 1, 31), ymd(2024, 2, 29), ymd(2024, 3, 29)]);
        assert_eq!(dates[12..14], [ymd(2025, 1, 29), ymd(2025, 2, 28)]);
        assert_eq!(dates[359], ymd(2053, 12, 28));
        assert_eq!(summary.end_date, ymd(2053, 12, 31));
        assert_eq!(summary.default_end_date, ymd(2053, 12, 31));
    }

    #[test]
    fn test_very_long_term_is_unamortizable_not_an_invalid_payment() {
        let start = Some(ymd(2024, 1, 1));
        let err = mortgage_payoff(LOAN, RATE, 120_000, 0.0, start, 12).unwrap_err();

        assert!(matches!(err, LoanError::Unamortizable { .. }));
        assert_eq!(err.argument(), None);
    }

    #[test]
    fn test_zero_loan_has_empty_schedule() {
        let summary = mortgage_payoff(0.0, RATE, TERM, 0.0, Some(ymd(2024, 1, 1)), 12).unwrap();

        assert!(summary.schedule.is_empty());
        assert_eq!(summary.loan_length, 0);
        assert_eq!(summary.end_date, summary.start_date);
        assert_eq!(summary.total_interest_with_savings, 0.0);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let summary = mortgage_payoff(12_000.0, 0.0, 12, 500.0, Some(ymd(2024, 1, 1)), 12).unwrap();

        assert_eq!(summary.default_loan_length, 12);
        assert_eq!(summary.loan_length, 8);
        assert_eq!(summary.schedule.len(), 8);
        assert_eq!(summary.interest_paid(), 0.0);
    }

    #[test]
    fn test_default_start_date_is_today() {
        let before = today();
        let summary = mortgage_payoff(LOAN, RATE, TERM, 0.0, None, 12).unwrap();

        assert!(summary.start_date >= before);
        assert!(summary.start_date <= today());
    }

    #[rstest]
    #[case(-LOAN, RATE, TERM, 10_000.0, 12, Argument::Loan)]
    #[case(LOAN, -RATE, TERM, 0.0, 12, Argument::InterestRate)]
    #[case(LOAN, RATE, -TERM, 0.0, 12, Argument::TermMonths)]
    #[case(LOAN, RATE, TERM, -1.0, 12, Argument::ExtraPrincipal)]
    #[case(LOAN, RATE, TERM, 0.0, 0, Argument::CompoundingPeriods)]
    fn test_payoff_invalid(
        #[case] loan: f64,
        #[case] rate: f64,
        #[case] term: i32,
        #[case] extra_principal: f64,
        #[case] periods: u32,
        #[case] expected: Argument,
    ) {
        let err = mortgage_payoff(loan, rate, term, extra_principal, None, periods).unwrap_err();
        assert_eq!(err.argument(), Some(expected));
    }

    #[test]
    fn test_calculate_payoff_from_json() {
        let input = PayoffInput::from_json(
            r#"{
                "principal": 200000,
                "annual_rate": 0.075,
                "term_months": 360,
                "extra_principal": 1000,
                "start_date": "2024-01-01"
            }"#,
        )
        .unwrap();

        assert_eq!(input.terms.compounding_periods, 12);
        assert_eq!(calculate_payoff(input).unwrap(), payoff(1000.0));
    }

    #[test]
    fn test_calculate_payoff_rejects_bad_date() {
        let input = PayoffInput {
            terms: LoanTerms::new(LOAN, RATE, TERM),
            extra_principal: 0.0,
            start_date: Some("01/01/2024".to_string()),
        };
        let err = calculate_payoff(input).unwrap_err();
        assert_eq!(err.argument(), Some(Argument::StartDate));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let err = PayoffInput::from_json(r#"{"principal": "lots"}"#).unwrap_err();
        assert!(matches!(err, LoanError::Serialization(_)));
    }

    #[test]
    fn test_summary_serializes_row_kinds() {
        let summary = mortgage_payoff(12_000.0, 0.12, 12, 0.0, Some(ymd(2024, 1, 1)), 12).unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["schedule"][0]["kind"], "normal");
        assert_eq!(json["schedule"][11]["kind"], "final");
        assert_eq!(json["end_date"], "2024-12-01");
    }
}
