//! The failure values produced when simplification meets a mathematically undefined input, a
//! configured work ceiling, or an interruption request.
//!
//! An [`Error`] pairs the [`ErrorKind`] with the offending sub-expression, so callers several
//! layers up can still report which part of their input was undefined. Strategy or rule
//! inapplicability is never an error; rules signal it with `Option` in their return type.

use crate::expr::Expr;
use thiserror::Error as ThisError;

/// The kinds of failure the simplifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ErrorKind {
    /// A denominator was exactly zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Zero raised to a negative power.
    #[error("zero cannot be raised to a negative power")]
    NegativePowerOfZero,

    /// An even-order root of a provably negative radicand.
    #[error("cannot take an even root of a negative value")]
    EvenRootOfNegative,

    /// A function evaluated at a pole or outside its domain.
    #[error("the function is not defined at this value")]
    FunctionValueNotDefined,

    /// A polynomial operation met a degree beyond the configured ceiling.
    #[error("polynomial degree {degree} exceeds the configured limit of {limit}")]
    DegreeTooHigh { degree: usize, limit: usize },

    /// The computation was interrupted through its interruption token.
    #[error("the computation was interrupted")]
    Interrupted,
}

/// A failure value carrying the offending sub-expression.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{kind} (in `{expr}`)")]
pub struct Error {
    /// The sub-expression the failure occurred in.
    pub expr: Expr,

    /// The kind of failure.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error for the given sub-expression.
    pub fn new(expr: Expr, kind: ErrorKind) -> Self {
        Self { expr, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_expression() {
        let err = Error::new(
            Expr::quotient(Expr::symbol("x"), Expr::int(0)),
            ErrorKind::DivisionByZero,
        );
        assert_eq!(err.to_string(), "division by zero (in `x / 0`)");
    }

    #[test]
    fn degree_limit_reports_both_sides() {
        let err = Error::new(Expr::symbol("x"), ErrorKind::DegreeTooHigh { degree: 80, limit: 64 });
        assert_eq!(
            err.to_string(),
            "polynomial degree 80 exceeds the configured limit of 64 (in `x`)",
        );
    }
}
