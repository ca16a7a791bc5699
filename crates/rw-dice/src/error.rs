//! Error types for the dice engine.

/// Errors that can occur while parsing or reconciling dice expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// The expression is malformed or contains no dice terms.
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// A die size outside the supported set appeared in the expression.
    #[error("unsupported die type: d{0}")]
    UnsupportedDieType(u32),

    /// The requested terms could not be matched against the raw values
    /// returned by the roll provider.
    #[error("reconciliation failed: {0}")]
    Reconciliation(String),
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;
