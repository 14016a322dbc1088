//! Simplification rules for the non-trigonometric functions: absolute value and the base-ten
//! logarithm.

use crate::ctxt::Ctxt;
use crate::fraction::split_coefficient;
use crate::rules::{do_call, first_of, try_binary};
use crate::step::{Step, StepCollector};
use casimir_expr::{BinOp, Error, ErrorKind, Expr, Func, TermCollection};
use rug::{Integer, Rational};

/// The integer `k` with `10^k` equal to the given rational, if one exists.
fn exact_log10(value: &Rational) -> Option<Integer> {
    if *value <= 0 {
        return None;
    }
    if value.is_integer() {
        let mut n = value.numer().clone();
        let mut k = Integer::new();
        while n > 1 && n.is_divisible_u(10) {
            n /= 10u32;
            k += 1;
        }
        if n == 1 {
            Some(k)
        } else {
            None
        }
    } else if *value.numer() == 1 {
        let inverted = Rational::from(value.denom());
        exact_log10(&inverted).map(|k| -k)
    } else {
        None
    }
}

/// `|c| = c` for numeric constants, with the sign dropped.
pub fn abs_fold(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_call(expr, Func::Abs, |arg| {
        if let Some(rational) = arg.as_rational() {
            return Some(Expr::rational(rational.abs()));
        }
        if let Expr::Float(value) = arg {
            return Some(Expr::Float(value.clone().abs()));
        }
        None
    }) else {
        return Ok(None);
    };

    steps.push(Step::AbsoluteValue);
    Ok(Some(out))
}

/// `|-x| = |x|`
pub fn abs_negation(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_call(expr, Func::Abs, |arg| {
        arg.as_negated().map(|inner| Expr::call(Func::Abs, inner))
    }) else {
        return Ok(None);
    };

    steps.push(Step::AbsoluteValue);
    Ok(Some(out))
}

/// `||x|| = |x|`
pub fn abs_idempotent(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_call(expr, Func::Abs, |arg| {
        if matches!(arg, Expr::Call(Func::Abs, _)) {
            Some(arg.clone())
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::AbsoluteValue);
    Ok(Some(out))
}

/// `lg(10^a) = a`
pub fn lg_of_power(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_call(expr, Func::Lg, |arg| {
        if let Expr::Binary(BinOp::Power, base, exp) = arg {
            if base.as_rational().is_some_and(|r| r == 10) {
                return Some((**exp).clone());
            }
        }
        None
    }) else {
        return Ok(None);
    };

    steps.push(Step::PowerOfTen);
    Ok(Some(out))
}

/// Exact logarithms of rational arguments.
///
/// `lg(1000) = 3` and `lg(1/100) = -2` fold outright. A rational argument that is not an
/// exact power of ten stays symbolic, but a non-positive one has no logarithm at all and is
/// reported as undefined.
pub fn lg_exact(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Expr::Call(Func::Lg, arg) = expr else {
        return Ok(None);
    };
    let Some(rational) = arg.as_rational() else {
        return Ok(None);
    };

    if rational <= 0 {
        return Err(Error::new(expr.clone(), ErrorKind::FunctionValueNotDefined));
    }
    let Some(k) = exact_log10(&rational) else {
        return Ok(None);
    };

    steps.push(Step::PowerOfTen);
    Ok(Some(Expr::Integer(k)))
}

/// `lg(10^k * a) = k + lg(a)` for an exact power-of-ten coefficient.
pub fn lg_peel_tens(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_call(expr, Func::Lg, |arg| {
        if arg.as_rational().is_some() {
            return None;
        }
        let (coefficient, rest) = split_coefficient(arg);
        let k = exact_log10(&coefficient)?;
        if k == 0 {
            return None;
        }
        Some(Expr::sum(Expr::Integer(k), Expr::call(Func::Lg, rest)))
    }) else {
        return Ok(None);
    };

    steps.push(Step::PowerOfTen);
    Ok(Some(out))
}

/// `10^(x + k*lg a) = a^k * 10^x` for rational `k`
///
/// One `lg` summand, together with its rational coefficient, is peeled out of the exponent
/// per application. Negated summands peel out with a negative exponent, so the engine turns
/// them into divisors: `10^(y - lg x) = 10^y / x`.
pub fn ten_to_lg_summand(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let out = try_binary(expr, BinOp::Power, |base, exp| {
        if base.as_rational().map_or(true, |r| r != 10) {
            return Ok(None);
        }
        let summands = if matches!(exp, Expr::Binary(BinOp::Sum | BinOp::Difference, _, _)) {
            exp.summands().into_values().collect::<Vec<_>>()
        } else {
            vec![exp.clone()]
        };

        for (i, summand) in summands.iter().enumerate() {
            let (coefficient, scaled) = split_coefficient(summand);
            let Expr::Call(Func::Lg, peeled) = scaled else {
                continue;
            };
            if coefficient == 0 {
                continue;
            }
            let factor = if coefficient == 1 {
                *peeled
            } else {
                Expr::power(*peeled, Expr::rational(coefficient))
            };
            let rest = summands
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != i)
                .map(|(_, term)| term.clone())
                .collect::<TermCollection<_>>();
            return Ok(Some(Expr::product(
                factor,
                Expr::power(base.clone(), Expr::sum_of(rest)),
            )));
        }
        Ok(None)
    })?;

    if out.is_some() {
        steps.push(Step::PowerOfTen);
    }
    Ok(out)
}

/// Applies all function rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(
        &[
            abs_fold,
            abs_negation,
            abs_idempotent,
            lg_of_power,
            lg_exact,
            lg_peel_tens,
            ten_to_lg_summand,
        ],
        expr,
        ctxt,
        steps,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify;
    use pretty_assertions::assert_eq;

    #[test]
    fn absolute_values_of_constants_fold() {
        assert_eq!(
            simplify(&Expr::call(Func::Abs, Expr::int(-5))),
            Ok(Expr::int(5)),
        );
        assert_eq!(
            simplify(&Expr::call(Func::Abs, Expr::ratio(-3, 4))),
            Ok(Expr::ratio(3, 4)),
        );
    }

    #[test]
    fn absolute_value_absorbs_negation() {
        let x = Expr::symbol("x");
        let expr = Expr::call(Func::Abs, -x.clone());
        assert_eq!(simplify(&expr), Ok(Expr::call(Func::Abs, x)));
    }

    #[test]
    fn nested_absolute_values_collapse() {
        let x = Expr::symbol("x");
        let expr = Expr::call(Func::Abs, Expr::call(Func::Abs, x.clone()));
        assert_eq!(simplify(&expr), Ok(Expr::call(Func::Abs, x)));
    }

    #[test]
    fn exact_powers_of_ten_have_exact_logarithms() {
        assert_eq!(simplify(&Expr::call(Func::Lg, Expr::int(1))), Ok(Expr::int(0)));
        assert_eq!(simplify(&Expr::call(Func::Lg, Expr::int(1000))), Ok(Expr::int(3)));
        assert_eq!(
            simplify(&Expr::call(Func::Lg, Expr::ratio(1, 100))),
            Ok(Expr::int(-2)),
        );
    }

    #[test]
    fn other_rationals_stay_symbolic() {
        let expr = Expr::call(Func::Lg, Expr::int(2));
        assert_eq!(simplify(&expr), Ok(expr));
    }

    #[test]
    fn logarithm_of_a_nonpositive_value_is_undefined() {
        let err = simplify(&Expr::call(Func::Lg, Expr::int(0))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FunctionValueNotDefined);
    }

    #[test]
    fn logarithm_inverts_powers_of_ten() {
        let x = Expr::symbol("x");
        let expr = Expr::call(Func::Lg, Expr::power(Expr::int(10), x.clone()));
        assert_eq!(simplify(&expr), Ok(x));
    }

    #[test]
    fn power_of_ten_coefficients_peel_out() {
        // lg(100x) = 2 + lg(x)
        let x = Expr::symbol("x");
        let expr = Expr::call(Func::Lg, Expr::product(Expr::int(100), x.clone()));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::sum(Expr::int(2), Expr::call(Func::Lg, x))),
        );
    }

    #[test]
    fn lg_summands_peel_out_of_exponents() {
        // 10^(x + lg 5) = 5 * 10^x
        let x = Expr::symbol("x");
        let expr = Expr::power(
            Expr::int(10),
            Expr::sum(x.clone(), Expr::call(Func::Lg, Expr::int(5))),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::int(5), Expr::power(Expr::int(10), x))),
        );
    }

    #[test]
    fn scaled_lg_exponents_become_powers() {
        // 10^(2 * lg x) = x^2
        let x = Expr::symbol("x");
        let expr = Expr::power(
            Expr::int(10),
            Expr::product(Expr::int(2), Expr::call(Func::Lg, x.clone())),
        );
        assert_eq!(simplify(&expr), Ok(Expr::power(x, Expr::int(2))));
    }

    #[test]
    fn subtracted_lg_summands_become_divisors() {
        // 10^(y - lg x) = 10^y / x
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let expr = Expr::power(
            Expr::int(10),
            Expr::difference(y.clone(), Expr::call(Func::Lg, x.clone())),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::quotient(Expr::power(Expr::int(10), y), x)),
        );
    }
}
