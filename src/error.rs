use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

/// Every failure the engines can report.
///
/// Presentation layers collapse all of these into either the `"Error"`
/// display sentinel or a message string, but the kinds stay distinct here
/// so callers and tests can tell them apart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Malformed number or expression input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Division by zero, factorial out of range, unsupported unit pair, ...
    #[error("Domain error: {0}")]
    Domain(String),

    /// NaN or infinity produced by an arithmetic step
    #[error("Non-finite result: {0}")]
    NonFinite(String),

    /// Currency rate fetch failure
    #[error("Network error: {0}")]
    Network(String),
}

impl CalcError {
    pub fn parse(message: impl Into<String>) -> Self {
        CalcError::Parse(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        CalcError::Domain(message.into())
    }

    pub fn non_finite(message: impl Into<String>) -> Self {
        CalcError::NonFinite(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        CalcError::Network(message.into())
    }

    /// The bare message without the kind prefix, for end-user display
    pub fn message(&self) -> &str {
        match self {
            CalcError::Parse(m)
            | CalcError::Domain(m)
            | CalcError::NonFinite(m)
            | CalcError::Network(m) => m,
        }
    }
}
