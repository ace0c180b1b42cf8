use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names the public argument a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    Loan,
    Balance,
    InterestRate,
    TermMonths,
    PeriodsElapsed,
    MonthlyPayment,
    ExtraPrincipal,
    CompoundingPeriods,
    StartDate,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Argument::Loan => "loan",
            Argument::Balance => "loan/balance",
            Argument::InterestRate => "interest rate",
            Argument::TermMonths => "loan length",
            Argument::PeriodsElapsed => "number of Period of elapsed months",
            Argument::MonthlyPayment => "monthly payment",
            Argument::ExtraPrincipal => "extra payment",
            Argument::CompoundingPeriods => "number of times interest compounds",
            Argument::StartDate => "start date",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LoanError {
    #[error("Please provide a valid {argument}: {reason}")]
    InvalidArgument {
        argument: Argument,
        reason: &'static str,
    },

    #[error("Payment of {payment} never amortizes the loan (period interest {interest})")]
    Unamortizable { payment: f64, interest: f64 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LoanError {
    pub(crate) fn invalid(argument: Argument, reason: &'static str) -> Self {
        LoanError::InvalidArgument { argument, reason }
    }

    /// The offending argument, when this is a validation failure.
    pub fn argument(&self) -> Option<Argument> {
        match self {
            LoanError::InvalidArgument { argument, .. } => Some(*argument),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::Serialization(e.to_string())
    }
}

pub type LoanResult<T> = Result<T, LoanError>;
