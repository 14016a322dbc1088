//! Simplification rules for power expressions.
//!
//! Exact folding covers integer exponents of rationals and perfect rational roots; anything
//! else stays symbolic. Expansion of powers of sums is guarded by the expansion profile so
//! that a large multinomial is rejected before any term is produced.

use crate::ctxt::Ctxt;
use crate::fraction::{split_coefficient, with_coefficient};
use crate::rules::{do_binary, first_of, try_binary};
use crate::step::{Step, StepCollector};
use casimir_expr::{BinOp, Error, ErrorKind, Expr, Func, TermCollection};
use rug::ops::Pow;
use rug::{Integer, Rational};

/// `a^0 = 1`
///
/// `0^0` is defined as `1` by this rule, though it may be undefined in other mathematical
/// contexts. Keeping it ahead of [`power_zero_base`] is what pins that choice.
pub fn power_zero(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |_, rhs| {
        if rhs.is_zero() {
            Some(Expr::int(1))
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::PowerZero);
    Ok(Some(out))
}

/// `a^1 = a`
pub fn power_one(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, rhs| {
        if rhs.as_rational().map_or(false, |r| r == 1) {
            Some(lhs.clone())
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::PowerOne);
    Ok(Some(out))
}

/// `0^a = 0` for positive `a`; a negative exponent of zero is undefined.
///
/// `0^0` is handled by the [`power_zero`] rule. A symbolic exponent proves neither sign, so
/// the expression is left alone.
pub fn power_zero_base(expr: &Expr, _: Ctxt, _: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    try_binary(expr, BinOp::Power, |lhs, rhs| {
        let base_zero = match lhs.as_rational() {
            Some(r) => r == 0,
            None => lhs.is_zero(),
        };
        if !base_zero {
            return Ok(None);
        }

        let positive = if let Some(r) = rhs.as_rational() {
            r > 0
        } else if let Expr::Float(f) = rhs {
            if *f > 0 {
                true
            } else if *f < 0 {
                false
            } else {
                return Ok(None);
            }
        } else {
            return Ok(None);
        };

        if positive {
            Ok(Some(lhs.clone()))
        } else {
            Err(Error::new(expr.clone(), ErrorKind::NegativePowerOfZero))
        }
    })
}

/// `1^a = 1`
///
/// Only the exact one short-circuits; `1.0^a` keeps its approximate flavor.
pub fn power_one_base(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, _| {
        if lhs.as_rational().map_or(false, |r| r == 1) {
            Some(Expr::int(1))
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::PowerOneBase);
    Ok(Some(out))
}

/// Raises a rational base to an integer exponent exactly.
///
/// Negative exponents produce the exact reciprocal; `(2/3)^-2` becomes `9/4`. The base being
/// zero is never seen here because [`power_zero_base`] runs first.
pub fn fold_exact(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, rhs| {
        let base = lhs.as_rational()?;
        let exp = rhs.as_rational()?;
        if !exp.is_integer() {
            return None;
        }
        let exp = exp.numer().to_i32()?;
        Some(Expr::rational(base.pow(exp)))
    }) else {
        return Ok(None);
    };

    steps.push(Step::FoldConstants);
    Ok(Some(out))
}

/// Returns the exact `degree`-th root of `n` if `n` is a perfect power.
fn perfect_root(n: &Integer, degree: u32) -> Option<Integer> {
    let root = Integer::from(n.root_ref(degree));
    if root.clone().pow(degree) == *n {
        Some(root)
    } else {
        None
    }
}

/// The exact value of `base^(p/q)` for positive rational `base`, if both the numerator and
/// denominator of `base` are perfect `q`-th powers.
fn exact_rational_root(base: &Rational, p: &Integer, q: u32) -> Option<Rational> {
    let num_root = perfect_root(base.numer(), q)?;
    let den_root = perfect_root(base.denom(), q)?;
    let root = Rational::from((num_root, den_root));
    Some(root.pow(p.to_i32()?))
}

/// Evaluates rational powers with fractional exponents when the result is exact.
///
/// `4^(1/2)` becomes `2` and `(-8)^(1/3)` becomes `-2`. An even root of a negative base is
/// undefined. Inexact roots such as `2^(1/2)` are left symbolic.
pub fn fold_exact_root(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = try_binary(expr, BinOp::Power, |lhs, rhs| {
        let base = match lhs.as_rational() {
            Some(base) => base,
            None => return Ok(None),
        };
        let exp = match rhs.as_rational() {
            Some(exp) => exp,
            None => return Ok(None),
        };
        if exp.is_integer() {
            return Ok(None);
        }
        let degree = match exp.denom().to_u32() {
            Some(degree) => degree,
            None => return Ok(None),
        };

        if base < 0 {
            if degree % 2 == 0 {
                return Err(Error::new(expr.clone(), ErrorKind::EvenRootOfNegative));
            }
            let magnitude = -base;
            return Ok(exact_rational_root(&magnitude, exp.numer(), degree)
                .map(|value| Expr::rational(-value)));
        }

        Ok(exact_rational_root(&base, exp.numer(), degree).map(Expr::rational))
    })?
    else {
        return Ok(None);
    };

    steps.push(Step::FoldConstants);
    Ok(Some(out))
}

/// `x^(-n) = 1/x^n` for symbolic bases.
///
/// Rational bases never reach this rule; exact folding handles them first.
pub fn negative_exponent(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, rhs| {
        if lhs.as_rational().is_some() {
            return None;
        }
        let exp = rhs.as_rational()?;
        if exp >= 0 {
            return None;
        }

        let positive = Expr::rational(-exp);
        let power = if positive.is_one() {
            lhs.clone()
        } else {
            Expr::power(lhs.clone(), positive)
        };
        Some(Expr::quotient(Expr::int(1), power))
    }) else {
        return Ok(None);
    };

    steps.push(Step::NegativeExponent);
    Ok(Some(out))
}

/// Approximates numeric powers once either operand is a float.
///
/// A negative base with a fractional exponent is declined rather than producing a NaN; the
/// exact rules report those as errors when they can prove them.
pub fn fold_approx(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, rhs| {
        if !lhs.is_float() && !rhs.is_float() {
            return None;
        }
        let (base, exp) = (lhs.to_float()?, rhs.to_float()?);
        if base.is_sign_negative() && !exp.is_integer() {
            return None;
        }
        Some(Expr::Float(base.pow(&exp)))
    }) else {
        return Ok(None);
    };

    steps.push(Step::FoldConstants);
    Ok(Some(out))
}

/// `(a^b)^c = a^(b*c)`, with an absolute value where the inner exponent demands one.
///
/// An even numerator in `b` forces `a^b` to be non-negative, so the collapsed power reads
/// from `|a|` instead: `(x^2)^(1/2)` is `|x|`, not `x`. When the collapsed exponent has an
/// even numerator itself the absolute value is redundant and is skipped. A symbolic outer
/// exponent only collapses over an odd inner numerator, where no sign is lost.
pub fn collapse_double_power(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, rhs| {
        let Expr::Binary(BinOp::Power, base, inner) = lhs else {
            return None;
        };
        let inner_exp = inner.as_rational()?;
        let inner_even = inner_exp.numer().is_even();

        if let Some(outer_exp) = rhs.as_rational() {
            let collapsed = inner_exp * outer_exp;
            let needs_abs = inner_even && collapsed.numer().is_odd();
            let new_base = if needs_abs {
                Expr::call(Func::Abs, (**base).clone())
            } else {
                (**base).clone()
            };
            Some(if collapsed == 1 {
                new_base
            } else {
                Expr::power(new_base, Expr::rational(collapsed))
            })
        } else if !inner_even {
            Some(Expr::power(
                (**base).clone(),
                Expr::product(Expr::rational(inner_exp), rhs.clone()),
            ))
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::CollapsePower);
    Ok(Some(out))
}

/// `10^(lg a) = a`
pub fn power_of_ten(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, rhs| {
        if lhs.as_rational().map_or(true, |r| r != 10) {
            return None;
        }
        if let Expr::Call(Func::Lg, arg) = rhs {
            Some((**arg).clone())
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::PowerOfTen);
    Ok(Some(out))
}

/// Raises an expression to a small non-negative integer power, for expansion monomials.
fn monomial_power(expr: &Expr, exp: u32) -> Expr {
    match exp {
        0 => Expr::int(1),
        1 => expr.clone(),
        _ if expr.is_one() => Expr::int(1),
        _ => Expr::power(expr.clone(), Expr::int(exp)),
    }
}

/// Multiplies two monomial cores, absorbing unit factors.
fn monomial_product(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_one() {
        rhs
    } else if rhs.is_one() {
        lhs
    } else {
        Expr::product(lhs, rhs)
    }
}

/// The monomials of `(t_0 + ... + t_k)^n`, as coefficient and core pairs.
///
/// Recursion over the first term with binomial coefficients produces each multinomial term
/// exactly once.
fn expand_terms(parts: &[(Rational, Expr)], n: u32) -> Vec<(Rational, Expr)> {
    let Some(((first_coeff, first_core), rest)) = parts.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return vec![(first_coeff.clone().pow(n), monomial_power(first_core, n))];
    }

    let mut out = Vec::new();
    for i in (0..=n).rev() {
        let binomial = Integer::from(n).binomial(i);
        let first_part = (
            Rational::from(binomial) * first_coeff.clone().pow(i),
            monomial_power(first_core, i),
        );
        for (tail_coeff, tail_core) in expand_terms(rest, n - i) {
            out.push((
                first_part.0.clone() * tail_coeff,
                monomial_product(first_part.1.clone(), tail_core),
            ));
        }
    }
    out
}

/// Expands a power of a sum into a sum of monomials, within the expansion profile.
///
/// The number of terms produced is `C(n + k - 1, k - 1)` for `k` summands; if that exceeds
/// the profile's term limit the rule declines and the power stays symbolic.
pub fn expand_power(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Power, |lhs, rhs| {
        if !matches!(lhs, Expr::Binary(BinOp::Sum | BinOp::Difference, _, _)) {
            return None;
        }
        let exp = rhs.as_integer()?;
        if *exp < 2 {
            return None;
        }

        let terms = lhs.summands();
        let count = terms.size() as u32;
        let predicted = (Integer::from(exp + count) - Integer::from(1)).binomial(count - 1);
        if predicted > ctxt.bounds.expansion.term_limit() {
            return None;
        }
        // the predicted count bounds the exponent, so this cannot fail
        let exp = exp.to_u32()?;

        let parts = terms.values().map(split_coefficient).collect::<Vec<_>>();
        let monomials = expand_terms(&parts, exp)
            .into_iter()
            .map(|(coefficient, core)| with_coefficient(coefficient, core))
            .collect::<TermCollection<_>>();
        Some(Expr::sum_of(monomials))
    }) else {
        return Ok(None);
    };

    steps.push(Step::Expand);
    Ok(Some(out))
}

/// Applies all power rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(
        &[
            power_zero,
            power_one,
            power_zero_base,
            power_one_base,
            fold_exact,
            fold_exact_root,
            negative_exponent,
            fold_approx,
            collapse_double_power,
            power_of_ten,
            expand_power,
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
    fn zero_to_the_zero_is_one() {
        let expr = Expr::power(Expr::int(0), Expr::int(0));
        assert_eq!(simplify(&expr), Ok(Expr::int(1)));
    }

    #[test]
    fn negative_power_of_zero_is_undefined() {
        let expr = Expr::power(Expr::int(0), Expr::int(-1));
        let err = simplify(&expr).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NegativePowerOfZero);
    }

    #[test]
    fn integer_powers_fold_exactly() {
        assert_eq!(
            simplify(&Expr::power(Expr::int(2), Expr::int(10))),
            Ok(Expr::int(1024)),
        );
        assert_eq!(
            simplify(&Expr::power(Expr::ratio(2, 3), Expr::int(-2))),
            Ok(Expr::ratio(9, 4)),
        );
    }

    #[test]
    fn perfect_roots_fold() {
        assert_eq!(
            simplify(&Expr::power(Expr::int(4), Expr::ratio(1, 2))),
            Ok(Expr::int(2)),
        );
        assert_eq!(
            simplify(&Expr::power(Expr::int(-8), Expr::ratio(1, 3))),
            Ok(Expr::int(-2)),
        );
    }

    #[test]
    fn even_root_of_negative_is_undefined() {
        let expr = Expr::power(Expr::int(-4), Expr::ratio(1, 2));
        let err = simplify(&expr).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EvenRootOfNegative);
    }

    #[test]
    fn inexact_roots_stay_symbolic() {
        let expr = Expr::power(Expr::int(2), Expr::ratio(1, 2));
        assert_eq!(simplify(&expr), Ok(expr));
    }

    #[test]
    fn negative_exponents_become_quotients() {
        let x = Expr::symbol("x");
        let expr = Expr::power(x.clone(), Expr::int(-2));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::quotient(
                Expr::int(1),
                Expr::power(x, Expr::int(2)),
            )),
        );
    }

    #[test]
    fn double_power_with_even_inner_exponent_needs_abs() {
        // (x^2)^(1/2) = |x|
        let x = Expr::symbol("x");
        let expr = Expr::power(
            Expr::power(x.clone(), Expr::int(2)),
            Expr::ratio(1, 2),
        );
        assert_eq!(simplify(&expr), Ok(Expr::call(Func::Abs, x)));
    }

    #[test]
    fn double_power_with_odd_inner_exponent_collapses_plainly() {
        // (x^3)^2 = x^6
        let x = Expr::symbol("x");
        let expr = Expr::power(
            Expr::power(x.clone(), Expr::int(3)),
            Expr::int(2),
        );
        assert_eq!(simplify(&expr), Ok(Expr::power(x, Expr::int(6))));
    }

    #[test]
    fn binomial_squares_expand() {
        // (x - 1)^2 = x^2 - 2x + 1
        let x = Expr::symbol("x");
        let expr = Expr::power(
            Expr::difference(x.clone(), Expr::int(1)),
            Expr::int(2),
        );
        let expected = Expr::sum(
            Expr::difference(
                Expr::power(x.clone(), Expr::int(2)),
                Expr::product(Expr::int(2), x),
            ),
            Expr::int(1),
        );
        assert_eq!(simplify(&expr), Ok(expected));
    }

    #[test]
    fn oversized_expansions_decline() {
        use crate::{simplify_with, Bounds, ExpansionProfile, Interrupt};

        let base = Expr::sum(
            Expr::symbol("a"),
            Expr::sum(Expr::symbol("b"), Expr::symbol("c")),
        );
        let expr = Expr::power(base, Expr::int(40));

        let bounds = Bounds {
            expansion: ExpansionProfile::Short,
            ..Bounds::default()
        };
        let interrupt = Interrupt::new();
        let simplified = simplify_with(&expr, Ctxt::new(&bounds, &interrupt)).unwrap();
        assert_eq!(simplified, expr);
    }

    #[test]
    fn ten_to_the_lg_collapses() {
        let x = Expr::symbol("x");
        let expr = Expr::power(Expr::int(10), Expr::call(Func::Lg, x.clone()));
        assert_eq!(simplify(&expr), Ok(x));
    }
}
