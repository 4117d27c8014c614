//! Calcdeck - multi-mode calculator engines
//!
//! Pure, UI-independent engines for a calculator app:
//!
//! - Basic keypad calculator (strict left-to-right operator chain)
//! - Scientific calculator (expression accumulation, function buttons,
//!   inverse mode, degrees/radians)
//! - Unit, temperature and currency conversion
//! - Loan repayment (simple and compound interest)
//! - Function sampling for plots
//!
//! Every engine state is a plain value: operations consume the current state
//! and return the next one. Display strings go through [`format::format_number`].
//!
//! # Example
//!
//! ```
//! use calcdeck::calculator::{parse_keys, BasicCalculator};
//! use calcdeck::loan::{calculate_loan, InterestType, LoanRequest};
//!
//! let calc = BasicCalculator::new().press_all(parse_keys("2+3*4=")?);
//! assert_eq!(calc.display_value, "20");
//!
//! let loan = calculate_loan(&LoanRequest {
//!     principal: 10000.0,
//!     annual_rate_percent: 5.0,
//!     term_years: 5.0,
//!     interest_type: InterestType::Compound,
//! })?;
//! assert_eq!(loan.monthly_display(), "$188.71");
//! # Ok::<(), calcdeck::error::CalcError>(())
//! ```

pub mod api;
pub mod calculator;
pub mod cli;
pub mod convert;
pub mod error;
pub mod expr;
pub mod format;
pub mod graph;
pub mod loan;
pub mod rates;

// Re-export commonly used types
pub use calculator::{BasicCalculator, ScientificCalculator};
pub use error::{CalcError, CalcResult};
pub use expr::{ExpressionEvaluator, StandardEvaluator};
