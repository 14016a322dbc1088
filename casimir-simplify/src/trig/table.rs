//! Exact values of the trigonometric functions at rational multiples of pi.
//!
//! Angles are stored as fractions of pi, restricted to the first quadrant; the reducer folds
//! every other angle onto these entries with the appropriate sign. The tables cover every
//! angle `m*pi/k` with `k` up to six, plus the constructible `cos(2*pi/17)` that Gauss
//! found, which is included for the cyclotomic factorization strategies that emit cosine
//! nodes.

use casimir_expr::Expr;
use once_cell::sync::Lazy;
use rug::Rational;

/// A table row: the angle as a fraction of pi, and the exact value there.
type Entry = (Rational, Expr);

/// `sqrt(n)/d`
fn root_over(n: i32, d: i32) -> Expr {
    Expr::quotient(Expr::int(n).sqrt(), Expr::int(d))
}

/// `sqrt(10 - 2*sqrt(5))/4` and its conjugate, the sines of `pi/5` and `2*pi/5`.
fn golden_sine(sign: i32) -> Expr {
    let inner = Expr::product(Expr::int(2), Expr::int(5).sqrt());
    let radicand = if sign < 0 {
        Expr::difference(Expr::int(10), inner)
    } else {
        Expr::sum(Expr::int(10), inner)
    };
    Expr::quotient(radicand.sqrt(), Expr::int(4))
}

/// Gauss's closed form for `cos(2*pi/17)`.
fn cos_two_pi_17() -> Expr {
    let root_17 = Expr::int(17).sqrt();
    let minus = Expr::difference(
        Expr::int(34),
        Expr::product(Expr::int(2), root_17.clone()),
    )
    .sqrt();
    let plus = Expr::sum(Expr::int(34), Expr::product(Expr::int(2), root_17.clone())).sqrt();
    let outer = Expr::difference(
        Expr::difference(
            Expr::sum(Expr::int(17), Expr::product(Expr::int(3), root_17.clone())),
            minus.clone(),
        ),
        Expr::product(Expr::int(2), plus),
    )
    .sqrt();

    Expr::quotient(
        Expr::sum(
            Expr::sum(Expr::difference(root_17, Expr::int(1)), minus),
            Expr::product(Expr::int(2), outer),
        ),
        Expr::int(16),
    )
}

/// Sines on `[0, pi/2]`.
pub(crate) static SIN: Lazy<Vec<Entry>> = Lazy::new(|| {
    vec![
        (Rational::new(), Expr::int(0)),
        (Rational::from((1, 6)), Expr::ratio(1, 2)),
        (Rational::from((1, 5)), golden_sine(-1)),
        (Rational::from((1, 4)), root_over(2, 2)),
        (Rational::from((1, 3)), root_over(3, 2)),
        (Rational::from((2, 5)), golden_sine(1)),
        (Rational::from((1, 2)), Expr::int(1)),
    ]
});

/// Cosines on `[0, pi/2]`.
pub(crate) static COS: Lazy<Vec<Entry>> = Lazy::new(|| {
    vec![
        (Rational::new(), Expr::int(1)),
        (Rational::from((1, 6)), root_over(3, 2)),
        (
            Rational::from((1, 5)),
            Expr::quotient(Expr::sum(Expr::int(1), Expr::int(5).sqrt()), Expr::int(4)),
        ),
        (Rational::from((1, 4)), root_over(2, 2)),
        (Rational::from((1, 3)), Expr::ratio(1, 2)),
        (
            Rational::from((2, 5)),
            Expr::quotient(Expr::difference(Expr::int(5).sqrt(), Expr::int(1)), Expr::int(4)),
        ),
        (Rational::from((1, 2)), Expr::int(0)),
        (Rational::from((2, 17)), cos_two_pi_17()),
    ]
});

/// Tangents on `[0, pi/2)`. The reducer falls back to `sin/cos` for angles missing here.
pub(crate) static TAN: Lazy<Vec<Entry>> = Lazy::new(|| {
    vec![
        (Rational::new(), Expr::int(0)),
        (Rational::from((1, 6)), root_over(3, 3)),
        (Rational::from((1, 4)), Expr::int(1)),
        (Rational::from((1, 3)), Expr::int(3).sqrt()),
    ]
});

/// The exact value at the given angle, if the table has it.
pub(crate) fn value_at(table: &[Entry], angle: &Rational) -> Option<Expr> {
    table
        .iter()
        .find(|(known, _)| known == angle)
        .map(|(_, value)| value.clone())
}

/// The angle producing the given value, if the table has it.
///
/// Matching is strict structural equality, so callers see the canonical radical forms the
/// tables themselves produce. Rational values compare by value, whatever their shape.
pub(crate) fn angle_of(table: &[Entry], value: &Expr) -> Option<Rational> {
    table
        .iter()
        .find(|(_, known)| match (known.as_rational(), value.as_rational()) {
            (Some(a), Some(b)) => a == b,
            _ => known == value,
        })
        .map(|(angle, _)| angle.clone())
}
