//! Helpers for working with exact rational values embedded in expression trees.
//!
//! A rational constant has no single node type: it may be an [`Expr::Integer`], a quotient
//! of two integers, or either of those behind a leading minus. The helpers here read and
//! build those shapes so the rewrite rules can do exact fraction arithmetic without caring
//! which shape they were handed.

use casimir_expr::{BinOp, Expr};
use rug::Rational;

/// Splits an expression into a rational coefficient and the remaining symbolic part.
///
/// Rational factors of a product are folded into the coefficient, and a rational
/// denominator of a quotient is divided into it. Expressions with no rational part are
/// returned unchanged under a coefficient of one, and fully rational expressions leave a
/// remainder of one.
pub fn split_coefficient(expr: &Expr) -> (Rational, Expr) {
    if let Some(rational) = expr.as_rational() {
        return (rational, Expr::int(1));
    }

    match expr {
        Expr::Binary(BinOp::Product, _, _) => {
            let mut coefficient = Rational::from(1);
            let mut rest = Vec::new();
            for factor in expr.factors().into_values() {
                match factor.as_rational() {
                    Some(rational) => coefficient *= rational,
                    None => rest.push(factor),
                }
            }
            (coefficient, Expr::product_of(rest.into_iter().collect()))
        },
        Expr::Binary(BinOp::Quotient, num, den) => match den.as_rational() {
            Some(rational) if rational != 0 => {
                let (mut coefficient, rest) = split_coefficient(num);
                coefficient /= rational;
                (coefficient, rest)
            },
            _ => (Rational::from(1), expr.clone()),
        },
        _ => (Rational::from(1), expr.clone()),
    }
}

/// Rebuilds an expression from a rational coefficient and a symbolic part.
///
/// This is the inverse of [`split_coefficient`]: unit coefficients disappear, a coefficient
/// of negative one becomes a negation, and everything else becomes a product with the
/// coefficient in front.
pub fn with_coefficient(coefficient: Rational, rest: Expr) -> Expr {
    if rest.is_one() {
        return Expr::rational(coefficient);
    }
    if coefficient == 1 {
        rest
    } else if coefficient == -1 {
        -rest
    } else if coefficient == 0 {
        Expr::int(0)
    } else {
        Expr::product(Expr::rational(coefficient), rest)
    }
}

/// Builds a quotient, collapsing the trivial cases.
///
/// A denominator of one returns the numerator unchanged, and two rational operands are
/// folded into a single canonical rational. The denominator must not be zero.
pub fn make_fraction(num: Expr, den: Expr) -> Expr {
    if den.is_one() {
        return num;
    }
    if let (Some(n), Some(d)) = (num.as_rational(), den.as_rational()) {
        if d != 0 {
            return Expr::rational(n / d);
        }
    }
    Expr::quotient(num, den)
}

/// Adds two expressions exactly if both are rational constants.
pub fn add_rational(lhs: &Expr, rhs: &Expr) -> Option<Expr> {
    let (a, b) = (lhs.as_rational()?, rhs.as_rational()?);
    Some(Expr::rational(a + b))
}

/// Subtracts two expressions exactly if both are rational constants.
pub fn sub_rational(lhs: &Expr, rhs: &Expr) -> Option<Expr> {
    let (a, b) = (lhs.as_rational()?, rhs.as_rational()?);
    Some(Expr::rational(a - b))
}

/// Multiplies two expressions exactly if both are rational constants.
pub fn mul_rational(lhs: &Expr, rhs: &Expr) -> Option<Expr> {
    let (a, b) = (lhs.as_rational()?, rhs.as_rational()?);
    Some(Expr::rational(a * b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use casimir_expr::Expr;
    use pretty_assertions::assert_eq;

    #[test]
    fn coefficient_of_product() {
        let expr = Expr::product(
            Expr::int(3),
            Expr::product(Expr::symbol("x"), Expr::ratio(1, 2)),
        );
        let (coefficient, rest) = split_coefficient(&expr);
        assert_eq!(coefficient, Rational::from((3, 2)));
        assert_eq!(rest, Expr::symbol("x"));
    }

    #[test]
    fn coefficient_of_quotient_with_rational_denominator() {
        let expr = Expr::quotient(Expr::product(Expr::int(2), Expr::symbol("x")), Expr::int(4));
        let (coefficient, rest) = split_coefficient(&expr);
        assert_eq!(coefficient, Rational::from((1, 2)));
        assert_eq!(rest, Expr::symbol("x"));
    }

    #[test]
    fn with_coefficient_collapses_units() {
        assert_eq!(
            with_coefficient(Rational::from(1), Expr::symbol("x")),
            Expr::symbol("x"),
        );
        assert_eq!(
            with_coefficient(Rational::from(-1), Expr::symbol("x")),
            -Expr::symbol("x"),
        );
        assert_eq!(with_coefficient(Rational::from(0), Expr::symbol("x")), Expr::int(0));
    }

    #[test]
    fn make_fraction_folds_rationals() {
        assert_eq!(make_fraction(Expr::int(5), Expr::int(10)), Expr::ratio(1, 2));
        assert_eq!(make_fraction(Expr::symbol("x"), Expr::int(1)), Expr::symbol("x"));
    }

    #[test]
    fn exact_arithmetic_reads_quotient_shapes() {
        let half = Expr::ratio(1, 2);
        let third = Expr::ratio(1, 3);
        assert_eq!(add_rational(&half, &third), Some(Expr::ratio(5, 6)));
        assert_eq!(mul_rational(&half, &third), Some(Expr::ratio(1, 6)));
        assert_eq!(sub_rational(&half, &third), Some(Expr::ratio(1, 6)));
        assert_eq!(add_rational(&half, &Expr::symbol("x")), None);
    }
}
