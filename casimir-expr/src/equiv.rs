//! Semantic equivalence predicates for expressions.
//!
//! [`equivalent`] extends [strict equality](crate::expr#strict-equality) with sign and rational
//! coefficient normalization, so that `a - b` is recognized as the negation of `b - a` and
//! `x / 2` as equivalent to `(1/2) * x`. Like strict equality it never reports false positives
//! and never fails; expressions that only an expansion or deeper rewrite would reveal as equal
//! are conservatively reported as not equivalent.
//!
//! The predicates do not call into the simplifier, so the simplifier is free to call them while
//! rewriting.

use crate::expr::{BinOp, Expr};
use crate::terms::TermCollection;
use rug::Rational;

/// Returns true if the two expressions are recognizably equal, modulo the order of terms and
/// factors, sign placement, and the written form of rational constants.
pub fn equivalent(a: &Expr, b: &Expr) -> bool {
    equiv_signed(a, b, false)
}

/// Returns true if `a` is recognizably the negation of `b`.
pub fn anti_equivalent(a: &Expr, b: &Expr) -> bool {
    equiv_signed(a, b, true)
}

/// Compares `a` against `b` (or `-b`, when `negated` is set).
fn equiv_signed(a: &Expr, b: &Expr, negated: bool) -> bool {
    if let (Some(ra), Some(rb)) = (a.as_rational(), b.as_rational()) {
        return ra == if negated { -rb } else { rb };
    }
    if let (Expr::Float(fa), Expr::Float(fb)) = (a, b) {
        return if negated {
            *fa == -fb.clone()
        } else {
            fa == fb
        };
    }

    let (ca, pa) = peel(a);
    let (cb, pb) = peel(b);
    let cb = if negated { -cb } else { cb };

    let sum_class = |e: &Expr| matches!(e, Expr::Binary(BinOp::Sum | BinOp::Difference, ..));
    if sum_class(&pa) && sum_class(&pb) {
        // c * (x + y) against d * (u + v): the coefficients must agree up to sign, with the
        // sign folded into the pairing of the terms
        let ta = pa.summands();
        let tb = pb.summands();
        if ca == cb {
            return ta.equivalent_in_terms(&tb, |x, y| equiv_signed(x, y, false));
        }
        let neg_cb = -cb;
        if ca == neg_cb {
            return ta.equivalent_in_terms(&tb, |x, y| equiv_signed(x, y, true));
        }
        return false;
    }

    if ca != cb {
        return false;
    }

    match (&pa, &pb) {
        (Expr::Integer(m), Expr::Integer(n)) => m == n,
        (Expr::Float(u), Expr::Float(v)) => u == v,
        (Expr::Symbol(x), Expr::Symbol(y)) => x == y,
        (Expr::Binary(BinOp::Product, ..), Expr::Binary(BinOp::Product, ..)) => pa
            .factors()
            .equivalent_in_terms(&pb.factors(), |x, y| equiv_signed(x, y, false)),
        (Expr::Binary(BinOp::Quotient, na, da), Expr::Binary(BinOp::Quotient, nb, db)) => {
            equiv_signed(na, nb, false) && equiv_signed(da, db, false)
        },
        (Expr::Binary(BinOp::Power, ba, ea), Expr::Binary(BinOp::Power, bb, eb)) => {
            equiv_signed(ba, bb, false) && equiv_signed(ea, eb, false)
        },
        (Expr::Call(f, x), Expr::Call(g, y)) => f == g && equiv_signed(x, y, false),
        (Expr::Operator(j, p), Expr::Operator(k, q)) => {
            j == k && p.len() == q.len() && p.iter().zip(q).all(|(x, y)| equiv_signed(x, y, false))
        },
        _ => false,
    }
}

/// Splits an expression into a rational coefficient and a structural remainder, such that the
/// expression equals `coefficient * remainder`.
///
/// Rational factors of a product are folded into the coefficient, and a rational denominator of
/// a quotient divides it. Everything else keeps a coefficient of 1.
fn peel(expr: &Expr) -> (Rational, Expr) {
    match expr {
        Expr::Binary(BinOp::Product, ..) => {
            let mut coeff = Rational::from(1);
            let mut rest = TermCollection::new();
            for factor in expr.factors().into_values() {
                match factor.as_rational() {
                    Some(r) => coeff *= r,
                    None => rest.add(factor),
                }
            }
            (coeff, Expr::product_of(rest))
        },
        Expr::Binary(BinOp::Quotient, num, den) => {
            match den.as_rational() {
                Some(d) if d != 0 => {
                    let (cn, rest) = peel(num);
                    (cn / d, rest)
                },
                _ => (Rational::from(1), expr.clone()),
            }
        },
        _ => (Rational::from(1), expr.clone()),
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::Func;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn commutativity() {
        assert!(equivalent(&(x() + y()), &(y() + x())));
        assert!(equivalent(&(x() * y() * Expr::int(2)), &(Expr::int(2) * y() * x())));
    }

    #[test]
    fn rational_forms() {
        assert!(equivalent(&Expr::ratio(3, 6), &Expr::ratio(1, 2)));
        assert!(equivalent(&Expr::quotient(Expr::int(4), Expr::int(2)), &Expr::int(2)));
        assert!(!equivalent(&Expr::ratio(1, 2), &Expr::float(0.5)));
    }

    #[test]
    fn coefficient_normalization() {
        assert!(equivalent(
            &Expr::quotient(x(), Expr::int(2)),
            &(Expr::ratio(1, 2) * x()),
        ));
        assert!(!equivalent(&(Expr::int(2) * x()), &(Expr::int(3) * x())));
    }

    #[test]
    fn sign_normalization() {
        assert!(equivalent(&(x() - y()), &-(y() - x())));
        assert!(anti_equivalent(&(x() - y()), &(y() - x())));
        assert!(anti_equivalent(&x(), &-x()));
        assert!(anti_equivalent(&Expr::int(5), &Expr::int(-5)));
        assert!(!anti_equivalent(&x(), &x()));
    }

    #[test]
    fn function_arguments_compare_recursively() {
        let a = Expr::call(Func::Sin, x() + y());
        let b = Expr::call(Func::Sin, y() + x());
        assert!(equivalent(&a, &b));
        assert!(!equivalent(&a, &Expr::call(Func::Cos, x() + y())));
    }

    #[test]
    fn no_false_positives_without_expansion() {
        let expanded = Expr::power(x(), Expr::int(2))
            + Expr::int(2) * x()
            + Expr::int(1);
        let factored = Expr::power(x() + Expr::int(1), Expr::int(2));
        assert!(!equivalent(&expanded, &factored));
    }
}
