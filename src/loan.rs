//! Loan repayment calculator
//!
//! Simple interest spreads `principal * rate * years` evenly over the term.
//! Compound interest uses the standard monthly amortization formula.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

pub const INVALID_PRINCIPAL: &str = "Please enter a valid positive loan amount.";
pub const INVALID_RATE: &str = "Please enter a valid non-negative interest rate.";
pub const INVALID_TERM: &str = "Please enter a valid positive loan term.";
pub const NO_PAYMENTS: &str = "Loan term must result in at least one payment.";
pub const ZERO_DENOMINATOR: &str = "Calculation error (denominator is zero). Check inputs.";
pub const NOT_CALCULABLE: &str = "Could not calculate payment. Please check inputs.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    Simple,
    #[default]
    Compound,
}

impl InterestType {
    fn summary_prefix(self) -> &'static str {
        match self {
            InterestType::Simple => "Simple Int.",
            InterestType::Compound => "Compound Int.",
        }
    }
}

impl fmt::Display for InterestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterestType::Simple => f.write_str("simple"),
            InterestType::Compound => f.write_str("compound"),
        }
    }
}

impl FromStr for InterestType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(InterestType::Simple),
            "compound" => Ok(InterestType::Compound),
            _ => Err(CalcError::parse(format!("Unknown interest type: '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_years: f64,
    #[serde(default)]
    pub interest_type: InterestType,
}

impl LoanRequest {
    pub fn term_months(&self) -> f64 {
        self.term_years * 12.0
    }

    fn validate(&self) -> CalcResult<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(CalcError::domain(INVALID_PRINCIPAL));
        }
        if !self.annual_rate_percent.is_finite() || self.annual_rate_percent < 0.0 {
            return Err(CalcError::domain(INVALID_RATE));
        }
        if !self.term_years.is_finite() || self.term_years <= 0.0 {
            return Err(CalcError::domain(INVALID_TERM));
        }
        if self.term_months() <= 0.0 {
            return Err(CalcError::domain(NO_PAYMENTS));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: f64,
    pub total_repayment: f64,
    pub total_interest: f64,
}

impl LoanResult {
    /// Monthly payment as currency, e.g. `$188.71`
    pub fn monthly_display(&self) -> String {
        format!("${:.2}", self.monthly_payment)
    }

    /// One-line breakdown shown under the monthly payment
    pub fn summary(&self, interest_type: InterestType) -> String {
        format!(
            "{} | Total Repay: ${:.2} | Total Interest: ${:.2}",
            interest_type.summary_prefix(),
            self.total_repayment,
            self.total_interest
        )
    }
}

pub fn calculate_loan(request: &LoanRequest) -> CalcResult<LoanResult> {
    request.validate()?;

    let principal = request.principal;
    let months = request.term_months();

    let (monthly_payment, total_repayment, total_interest) = match request.interest_type {
        InterestType::Simple => {
            let total_interest = principal * (request.annual_rate_percent / 100.0) * request.term_years;
            let total_repayment = principal + total_interest;
            (total_repayment / months, total_repayment, total_interest)
        }
        InterestType::Compound => {
            let r = request.annual_rate_percent / 100.0 / 12.0;
            let monthly = if r == 0.0 {
                principal / months
            } else {
                let growth = (1.0 + r).powf(months);
                let denominator = growth - 1.0;
                if denominator == 0.0 {
                    return Err(CalcError::domain(ZERO_DENOMINATOR));
                }
                principal * r * growth / denominator
            };
            let total_repayment = monthly * months;
            (monthly, total_repayment, total_repayment - principal)
        }
    };

    if [monthly_payment, total_repayment, total_interest]
        .iter()
        .any(|v| !v.is_finite())
    {
        return Err(CalcError::non_finite(NOT_CALCULABLE));
    }

    Ok(LoanResult {
        monthly_payment,
        total_repayment,
        total_interest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(principal: f64, rate: f64, years: f64, interest_type: InterestType) -> LoanRequest {
        LoanRequest {
            principal,
            annual_rate_percent: rate,
            term_years: years,
            interest_type,
        }
    }

    #[test]
    fn test_compound_amortization() {
        let result = calculate_loan(&request(10000.0, 5.0, 5.0, InterestType::Compound)).unwrap();
        assert!((result.monthly_payment - 188.71).abs() < 0.005);
        assert_eq!(result.monthly_display(), "$188.71");
    }

    #[test]
    fn test_compound_zero_rate() {
        let result = calculate_loan(&request(1200.0, 0.0, 1.0, InterestType::Compound)).unwrap();
        assert_eq!(result.monthly_payment, 100.0);
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn test_simple_interest() {
        let result = calculate_loan(&request(1000.0, 10.0, 2.0, InterestType::Simple)).unwrap();
        assert_eq!(result.total_interest, 200.0);
        assert_eq!(result.total_repayment, 1200.0);
        assert_eq!(result.monthly_payment, 50.0);
        assert_eq!(
            result.summary(InterestType::Simple),
            "Simple Int. | Total Repay: $1200.00 | Total Interest: $200.00"
        );
    }

    #[test]
    fn test_validation_messages() {
        let cases = [
            (request(0.0, 5.0, 5.0, InterestType::Simple), INVALID_PRINCIPAL),
            (request(f64::NAN, 5.0, 5.0, InterestType::Simple), INVALID_PRINCIPAL),
            (request(100.0, -1.0, 5.0, InterestType::Simple), INVALID_RATE),
            (request(100.0, 5.0, 0.0, InterestType::Simple), INVALID_TERM),
        ];
        for (req, message) in cases {
            assert_eq!(calculate_loan(&req), Err(CalcError::Domain(message.to_string())));
        }
    }

    #[test]
    fn test_vanishing_rate_hits_zero_denominator() {
        let result = calculate_loan(&request(1000.0, 1e-15, 1.0, InterestType::Compound));
        assert_eq!(result, Err(CalcError::Domain(ZERO_DENOMINATOR.to_string())));
    }

    #[test]
    fn test_overflow_is_non_finite() {
        let result = calculate_loan(&request(f64::MAX, 100.0, 1.0, InterestType::Simple));
        assert_eq!(result, Err(CalcError::NonFinite(NOT_CALCULABLE.to_string())));
    }

    #[test]
    fn test_interest_type_from_str() {
        assert_eq!("Simple".parse::<InterestType>().unwrap(), InterestType::Simple);
        assert!("daily".parse::<InterestType>().is_err());
    }
}
