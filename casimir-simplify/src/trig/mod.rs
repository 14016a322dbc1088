//! Exact reduction of trigonometric functions.
//!
//! The reducer recognizes arguments of the form `residue + r*pi` with rational `r`, and uses
//! the periodicity and symmetry of the six functions to move `r` into the first quadrant.
//! When the residue is zero and the folded angle is in the [tables](table) (or reachable
//! from them by half-angle formulas), the call is replaced by its exact value; otherwise the
//! period-reduced call is kept, so `sin(29*pi/13)` still becomes `sin(3*pi/13)`.
//!
//! A symbolic residue limits what periodicity allows: whole periods vanish, odd multiples of
//! pi flip the sign, and a leftover `pi/2` exchanges each function with its cofunction, which
//! is how `sin(x + 3*pi)` becomes `-sin(x)` and `sin(x + pi/2)` becomes `cos(x)`.

mod table;

use crate::ctxt::Ctxt;
use crate::fraction::{make_fraction, split_coefficient, with_coefficient};
use casimir_expr::{Error, ErrorKind, Expr, Func, TermCollection};
use rug::Rational;

fn half() -> Rational {
    Rational::from((1, 2))
}

/// Reduces `r` modulo the period into `[0, period)`.
fn positive_mod(r: &Rational, period: u32) -> Rational {
    let period = Rational::from(period);
    let turns = Rational::from(r / &period).floor();
    r.clone() - turns * period
}

/// Folds a sine angle into `[0, 1/2]` (in units of pi), returning the folded angle and
/// whether the value's sign flips.
fn fold_sin(r: &Rational) -> (Rational, bool) {
    let mut r = positive_mod(r, 2);
    let mut neg = false;
    if r >= 1 {
        r -= 1;
        neg = true;
    }
    if r > half() {
        r = Rational::from(1) - r;
    }
    (r, neg)
}

/// Folds a cosine angle into `[0, 1/2]`.
fn fold_cos(r: &Rational) -> (Rational, bool) {
    let mut r = positive_mod(r, 2);
    let mut neg = false;
    if r > 1 {
        r = Rational::from(2) - r;
    }
    if r > half() {
        r = Rational::from(1) - r;
        neg = true;
    }
    (r, neg)
}

/// Folds a tangent angle into `[0, 1/2]`.
fn fold_tan(r: &Rational) -> (Rational, bool) {
    let mut r = positive_mod(r, 1);
    let mut neg = false;
    if r > half() {
        r = Rational::from(1) - r;
        neg = true;
    }
    (r, neg)
}

/// The fold matching each function's period and symmetry.
fn fold_for(func: Func, r: &Rational) -> (Rational, bool) {
    match func {
        Func::Sin | Func::Csc => fold_sin(r),
        Func::Cos | Func::Sec => fold_cos(r),
        _ => fold_tan(r),
    }
}

/// The exact sine of `r*pi` for `r` in `[0, 1/2]`, from the table or by halving the angle.
fn quadrant_sin(r: &Rational, depth: u32, ctxt: Ctxt, at: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(value) = table::value_at(&table::SIN, r) {
        return Ok(Some(value));
    }
    if depth >= ctxt.bounds.max_half_angle_depth || !r.denom().is_divisible_u(2) {
        return Ok(None);
    }
    ctxt.check_interrupted(at)?;

    // sin(x/2) = sqrt((1 - cos x)/2), nonnegative throughout the quadrant
    let (doubled, neg) = fold_cos(&Rational::from(r * &Rational::from(2)));
    let Some(inner) = quadrant_cos(&doubled, depth + 1, ctxt, at)? else {
        return Ok(None);
    };
    let radicand = if neg {
        Expr::sum(Expr::int(1), inner)
    } else {
        Expr::difference(Expr::int(1), inner)
    };
    Ok(Some(Expr::quotient(radicand, Expr::int(2)).sqrt()))
}

/// The exact cosine of `r*pi` for `r` in `[0, 1/2]`.
fn quadrant_cos(r: &Rational, depth: u32, ctxt: Ctxt, at: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(value) = table::value_at(&table::COS, r) {
        return Ok(Some(value));
    }
    if depth >= ctxt.bounds.max_half_angle_depth || !r.denom().is_divisible_u(2) {
        return Ok(None);
    }
    ctxt.check_interrupted(at)?;

    // cos(x/2) = sqrt((1 + cos x)/2)
    let (doubled, neg) = fold_cos(&Rational::from(r * &Rational::from(2)));
    let Some(inner) = quadrant_cos(&doubled, depth + 1, ctxt, at)? else {
        return Ok(None);
    };
    let radicand = if neg {
        Expr::difference(Expr::int(1), inner)
    } else {
        Expr::sum(Expr::int(1), inner)
    };
    Ok(Some(Expr::quotient(radicand, Expr::int(2)).sqrt()))
}

/// The exact tangent of `r*pi` for `r` in `[0, 1/2)`, from the table or as `sin/cos`.
fn quadrant_tan(r: &Rational, ctxt: Ctxt, at: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(value) = table::value_at(&table::TAN, r) {
        return Ok(Some(value));
    }
    let (Some(sin), Some(cos)) = (
        quadrant_sin(r, 0, ctxt, at)?,
        quadrant_cos(r, 0, ctxt, at)?,
    ) else {
        return Ok(None);
    };
    Ok(Some(make_fraction(sin, cos)))
}

fn signed(value: Expr, neg: bool) -> Expr {
    if neg {
        -value
    } else {
        value
    }
}

/// The exact value of the function at `r*pi`, with poles reported as undefined.
fn eval_exact(func: Func, r: &Rational, ctxt: Ctxt, at: &Expr) -> Result<Option<Expr>, Error> {
    let pole = || Error::new(at.clone(), ErrorKind::FunctionValueNotDefined);
    match func {
        Func::Sin => {
            let (folded, neg) = fold_sin(r);
            Ok(quadrant_sin(&folded, 0, ctxt, at)?.map(|v| signed(v, neg)))
        },
        Func::Cos => {
            let (folded, neg) = fold_cos(r);
            Ok(quadrant_cos(&folded, 0, ctxt, at)?.map(|v| signed(v, neg)))
        },
        Func::Tan => {
            if positive_mod(r, 1) == half() {
                return Err(pole());
            }
            let (folded, neg) = fold_tan(r);
            Ok(quadrant_tan(&folded, ctxt, at)?.map(|v| signed(v, neg)))
        },
        Func::Cot => {
            let in_period = positive_mod(r, 1);
            if in_period == 0 {
                return Err(pole());
            }
            if in_period == half() {
                return Ok(Some(Expr::int(0)));
            }
            let (folded, neg) = fold_tan(r);
            Ok(quadrant_tan(&folded, ctxt, at)?
                .map(|v| signed(make_fraction(Expr::int(1), v), neg)))
        },
        Func::Sec => {
            let in_period = positive_mod(r, 1);
            if in_period == half() {
                return Err(pole());
            }
            let (folded, neg) = fold_cos(r);
            Ok(quadrant_cos(&folded, 0, ctxt, at)?
                .map(|v| signed(make_fraction(Expr::int(1), v), neg)))
        },
        Func::Csc => {
            if positive_mod(r, 1) == 0 {
                return Err(pole());
            }
            let (folded, neg) = fold_sin(r);
            Ok(quadrant_sin(&folded, 0, ctxt, at)?
                .map(|v| signed(make_fraction(Expr::int(1), v), neg)))
        },
        _ => Ok(None),
    }
}

/// Reduces a direct trigonometric call, returning the exact value or a period-reduced call.
///
/// `Ok(None)` means the argument offered nothing to work with.
pub fn reduce(func: Func, arg: &Expr, ctxt: Ctxt) -> Result<Option<Expr>, Error> {
    let original = Expr::call(func, arg.clone());

    let mut pi_multiple = Rational::new();
    let mut residue = TermCollection::new();
    for term in arg.summands().into_values() {
        if term.is_zero() {
            continue;
        }
        let (coefficient, rest) = split_coefficient(&term);
        if rest.is_pi() {
            pi_multiple += coefficient;
        } else {
            residue.add(term);
        }
    }

    if residue.is_empty() {
        if let Some(value) = eval_exact(func, &pi_multiple, ctxt, &original)? {
            return Ok(Some(value));
        }
        let (folded, neg) = fold_for(func, &pi_multiple);
        if folded == pi_multiple && !neg {
            return Ok(None);
        }
        let reduced = Expr::call(func, with_coefficient(folded, Expr::pi()));
        return Ok(Some(signed(reduced, neg)));
    }

    // With a symbolic residue only periodicity applies: strip whole periods, flip the sign
    // across an odd multiple of pi, and exchange cofunctions across a leftover pi/2.
    let period = match func {
        Func::Tan | Func::Cot => 1,
        _ => 2,
    };
    let mut shift = positive_mod(&pi_multiple, period);
    let mut neg = false;
    let mut out = func;
    if shift >= 1 {
        shift -= 1;
        neg = !neg;
    }
    if shift == half() {
        shift = Rational::new();
        let (exchanged, flips) = match func {
            Func::Sin => (Func::Cos, false),
            Func::Cos => (Func::Sin, true),
            Func::Sec => (Func::Csc, true),
            Func::Csc => (Func::Sec, false),
            Func::Tan => (Func::Cot, true),
            Func::Cot => (Func::Tan, true),
            _ => return Ok(None),
        };
        out = exchanged;
        neg ^= flips;
    }

    if out == func && !neg && shift == pi_multiple {
        return Ok(None);
    }
    let mut terms = residue;
    if shift != 0 {
        terms.add(with_coefficient(shift, Expr::pi()));
    }
    let reduced = Expr::call(out, Expr::sum_of(terms));
    Ok(Some(signed(reduced, neg)))
}

/// Reduces an inverse trigonometric call by matching the argument against the tables.
pub fn reduce_inverse(func: Func, arg: &Expr, ctxt: Ctxt) -> Result<Option<Expr>, Error> {
    let original = Expr::call(func, arg.clone());
    match func {
        Func::Arcsin => arcsin(arg, &original),
        Func::Arccos => arccos(arg, &original),
        Func::Arctan => arctan(arg),
        // the reciprocal functions route through the primary three
        Func::Arcsec => match reciprocal(arg) {
            Some(flipped) => reduce_inverse(Func::Arccos, &flipped, ctxt),
            None => Ok(None),
        },
        Func::Arccsc => match reciprocal(arg) {
            Some(flipped) => reduce_inverse(Func::Arcsin, &flipped, ctxt),
            None => Ok(None),
        },
        Func::Arccot => {
            if arg.as_rational().is_some_and(|r| r == 0) {
                return Ok(Some(with_coefficient(half(), Expr::pi())));
            }
            match reciprocal(arg) {
                Some(flipped) => reduce_inverse(Func::Arctan, &flipped, ctxt),
                None => Ok(None),
            }
        },
        _ => Ok(None),
    }
}

/// The exact reciprocal of the argument, when it can be taken without guessing signs.
fn reciprocal(arg: &Expr) -> Option<Expr> {
    let value = arg.as_rational()?;
    if value == 0 {
        return None;
    }
    Some(Expr::rational(value.recip()))
}

fn arcsin(arg: &Expr, at: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(value) = arg.as_rational() {
        if value > 1 || value < -1 {
            return Err(Error::new(at.clone(), ErrorKind::FunctionValueNotDefined));
        }
    }
    if let Some(positive) = arg.as_negated() {
        // arcsin(-v) = -arcsin(v)
        return Ok(arcsin(&positive, at)?.map(|angle| -angle));
    }
    Ok(table::angle_of(&table::SIN, arg).map(|angle| with_coefficient(angle, Expr::pi())))
}

fn arccos(arg: &Expr, at: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(value) = arg.as_rational() {
        if value > 1 || value < -1 {
            return Err(Error::new(at.clone(), ErrorKind::FunctionValueNotDefined));
        }
    }
    if let Some(positive) = arg.as_negated() {
        // arccos(-v) = pi - arccos(v)
        return Ok(arccos(&positive, at)?.map(|angle| Expr::difference(Expr::pi(), angle)));
    }
    Ok(table::angle_of(&table::COS, arg).map(|angle| with_coefficient(angle, Expr::pi())))
}

fn arctan(arg: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(positive) = arg.as_negated() {
        return Ok(arctan(&positive)?.map(|angle| -angle));
    }
    Ok(table::angle_of(&table::TAN, arg).map(|angle| with_coefficient(angle, Expr::pi())))
}

#[cfg(test)]
mod tests {
    use crate::simplify;
    use casimir_expr::{ErrorKind, Expr, Func};
    use pretty_assertions::assert_eq;

    fn pi_times(n: i32, d: i32) -> Expr {
        Expr::quotient(Expr::product(Expr::int(n), Expr::pi()), Expr::int(d))
    }

    #[test]
    fn quadrant_folding_picks_the_right_sign() {
        let expr = Expr::call(Func::Sin, pi_times(5, 6));
        assert_eq!(simplify(&expr), Ok(Expr::ratio(1, 2)));

        let expr = Expr::call(Func::Cos, pi_times(2, 3));
        assert_eq!(simplify(&expr), Ok(Expr::ratio(-1, 2)));
    }

    #[test]
    fn tangent_of_quarter_pi() {
        let expr = Expr::call(Func::Tan, Expr::quotient(Expr::pi(), Expr::int(4)));
        assert_eq!(simplify(&expr), Ok(Expr::int(1)));
    }

    #[test]
    fn tangent_pole_is_undefined() {
        let expr = Expr::call(Func::Tan, Expr::quotient(Expr::pi(), Expr::int(2)));
        let err = simplify(&expr).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FunctionValueNotDefined);
    }

    #[test]
    fn cotangent_and_cosecant_poles_are_undefined() {
        let err = simplify(&Expr::call(Func::Cot, Expr::int(0))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FunctionValueNotDefined);

        let err = simplify(&Expr::call(Func::Csc, pi_times(2, 1))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FunctionValueNotDefined);
    }

    #[test]
    fn reciprocal_functions_fold_through_their_primaries() {
        let expr = Expr::call(Func::Sec, Expr::int(0));
        assert_eq!(simplify(&expr), Ok(Expr::int(1)));

        // csc(pi/6) = 2
        let expr = Expr::call(Func::Csc, Expr::quotient(Expr::pi(), Expr::int(6)));
        assert_eq!(simplify(&expr), Ok(Expr::int(2)));
    }

    #[test]
    fn whole_periods_are_stripped_from_large_angles() {
        // sin(29*pi/13) = sin(3*pi/13), which stays symbolic
        let expr = Expr::call(Func::Sin, pi_times(29, 13));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::call(
                Func::Sin,
                Expr::product(Expr::ratio(3, 13), Expr::pi()),
            )),
        );
    }

    #[test]
    fn symbolic_residue_keeps_periodicity() {
        let x = Expr::symbol("x");

        // sin(x + 3*pi) = -sin(x)
        let expr = Expr::call(Func::Sin, Expr::sum(x.clone(), pi_times(3, 1)));
        assert_eq!(simplify(&expr), Ok(-Expr::call(Func::Sin, x.clone())));

        // sin(x + pi/2) = cos(x)
        let expr = Expr::call(
            Func::Sin,
            Expr::sum(x.clone(), Expr::quotient(Expr::pi(), Expr::int(2))),
        );
        assert_eq!(simplify(&expr), Ok(Expr::call(Func::Cos, x)));
    }

    #[test]
    fn half_angles_recurse_through_the_cosine() {
        // cos(pi/8) = sqrt((1 + sqrt(2)/2)/2)
        let expr = Expr::call(Func::Cos, Expr::quotient(Expr::pi(), Expr::int(8)));
        let expected = Expr::quotient(
            Expr::sum(
                Expr::int(1),
                Expr::quotient(Expr::int(2).sqrt(), Expr::int(2)),
            ),
            Expr::int(2),
        )
        .sqrt();
        assert_eq!(simplify(&expr), Ok(expected));
    }

    #[test]
    fn half_angle_recursion_is_bounded() {
        use crate::{simplify_with, Bounds, Ctxt, Interrupt};

        let bounds = Bounds {
            max_half_angle_depth: 1,
            ..Bounds::default()
        };
        let interrupt = Interrupt::new();
        // pi/16 needs two halvings from pi/4, so the call stays put
        let expr = Expr::call(Func::Cos, Expr::quotient(Expr::pi(), Expr::int(16)));
        assert_eq!(
            simplify_with(&expr, Ctxt::new(&bounds, &interrupt)),
            Ok(expr.clone()),
        );
    }

    #[test]
    fn inverse_functions_read_the_tables_backwards() {
        let expr = Expr::call(Func::Arcsin, Expr::ratio(1, 2));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::ratio(1, 6), Expr::pi())),
        );

        let expr = Expr::call(Func::Arctan, Expr::int(1));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::ratio(1, 4), Expr::pi())),
        );

        // arcsin of a canonical radical form
        let expr = Expr::call(
            Func::Arcsin,
            Expr::quotient(Expr::int(2).sqrt(), Expr::int(2)),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::ratio(1, 4), Expr::pi())),
        );
    }

    #[test]
    fn inverse_negations_use_the_odd_and_supplement_identities() {
        // arcsin(-1/2) = -pi/6
        let expr = Expr::call(Func::Arcsin, Expr::ratio(-1, 2));
        assert_eq!(
            simplify(&expr),
            Ok(-Expr::product(Expr::ratio(1, 6), Expr::pi())),
        );

        // arccos(-1/2) = pi - pi/3 = 2*pi/3
        let expr = Expr::call(Func::Arccos, Expr::ratio(-1, 2));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::ratio(2, 3), Expr::pi())),
        );
    }

    #[test]
    fn out_of_domain_inverse_arguments_are_undefined() {
        let err = simplify(&Expr::call(Func::Arcsin, Expr::int(2))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FunctionValueNotDefined);

        let err = simplify(&Expr::call(Func::Arccos, Expr::ratio(-3, 2))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FunctionValueNotDefined);
    }

    #[test]
    fn arccotangent_of_zero_is_half_pi() {
        let expr = Expr::call(Func::Arccot, Expr::int(0));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::ratio(1, 2), Expr::pi())),
        );
    }
}
