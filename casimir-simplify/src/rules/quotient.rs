//! Simplification rules for quotients.
//!
//! Besides the identity rules, this module reduces fractions in stages of increasing cost:
//! numeric content first, then directly matching factors, then a polynomial GCD in a shared
//! variable, and finally a polynomial GCD through a substitution marker for quotients built
//! from a repeated non-polynomial kernel such as `sin(x)` or `2^x`.

use crate::ctxt::Ctxt;
use crate::fraction::{make_fraction, split_coefficient, with_coefficient};
use crate::polynomial::Polynomial;
use crate::rules::{do_binary, exponent_parts, first_of, try_binary};
use crate::step::{Step, StepCollector};
use casimir_expr::{equivalent, BinOp, Error, ErrorKind, Expr, TermCollection};
use rug::Rational;

/// `a / 0` is undefined.
pub fn divide_by_zero(expr: &Expr, _: Ctxt, _: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    try_binary(expr, BinOp::Quotient, |_, den| {
        if den.is_zero() {
            Err(Error::new(expr.clone(), ErrorKind::DivisionByZero))
        } else {
            Ok(None)
        }
    })
}

/// `0 / a = 0`
///
/// The zero numerator itself is returned, so an approximate zero keeps the result
/// approximate.
pub fn zero_numerator(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Quotient, |num, _| {
        if num.is_zero() {
            Some(num.clone())
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::ZeroNumerator);
    Ok(Some(out))
}

/// `a / 1 = a`
pub fn divide_by_one(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Quotient, |num, den| {
        if den.is_one() {
            Some(num.clone())
        } else {
            None
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::DivideByOne);
    Ok(Some(out))
}

/// Divides numeric operands approximately once either of them is a float.
///
/// Exact rational quotients are not handled here; the numeric reduction stage folds those
/// without losing exactness.
pub fn fold_approx(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Quotient, |num, den| {
        if !num.is_float() && !den.is_float() {
            return None;
        }
        let (a, b) = (num.to_float()?, den.to_float()?);
        Some(Expr::Float(a / b))
    }) else {
        return Ok(None);
    };

    steps.push(Step::FoldConstants);
    Ok(Some(out))
}

/// Flattens nested quotients.
///
/// `(a/b)/c = a/(b*c)` and `a/(b/c) = (a*c)/b`.
pub fn flatten_nested(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Quotient, |num, den| {
        if let Expr::Binary(BinOp::Quotient, a, b) = num {
            return Some(Expr::quotient(
                (**a).clone(),
                Expr::product((**b).clone(), den.clone()),
            ));
        }
        if let Expr::Binary(BinOp::Quotient, b, c) = den {
            return Some(Expr::quotient(
                Expr::product(num.clone(), (**c).clone()),
                (**b).clone(),
            ));
        }
        None
    }) else {
        return Ok(None);
    };

    steps.push(Step::ReduceQuotient);
    Ok(Some(out))
}

/// Reduces the numeric content of a fraction and moves signs into the numerator.
///
/// The rational coefficients of the numerator and denominator are divided out against each
/// other: `(2x)/(4y)` becomes `x/(2y)`, `5/10` becomes `1/2`, and `x/(-y)` becomes
/// `(-x)/y`. The denominator is left with a positive coefficient.
pub fn reduce_numeric(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = try_binary(expr, BinOp::Quotient, |num, den| {
        let (num_coeff, num_rest) = split_coefficient(num);
        let (den_coeff, den_rest) = split_coefficient(den);
        if den_coeff == 0 {
            return Err(Error::new(expr.clone(), ErrorKind::DivisionByZero));
        }

        let combined = num_coeff / den_coeff;
        let new_num = with_coefficient(Rational::from(combined.numer()), num_rest);
        let new_den = with_coefficient(Rational::from(combined.denom()), den_rest);
        let reduced = make_fraction(new_num, new_den);

        // only report progress when the shape actually changed
        if reduced == *expr {
            Ok(None)
        } else {
            Ok(Some(reduced))
        }
    })?
    else {
        return Ok(None);
    };

    steps.push(Step::ReduceQuotient);
    Ok(Some(out))
}

/// Cancels a factor appearing in both the numerator and the denominator.
///
/// Equal factors vanish outright; factors sharing a base have their exponents subtracted,
/// with the difference kept on the numerator. One pair is cancelled per application.
pub fn cancel_common_factors(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_binary(expr, BinOp::Quotient, |num, den| {
        let num_factors = num.factors().into_values().collect::<Vec<_>>();
        let den_factors = den.factors().into_values().collect::<Vec<_>>();

        for (i, num_factor) in num_factors.iter().enumerate() {
            let (num_base, num_exp) = exponent_parts(num_factor);
            for (j, den_factor) in den_factors.iter().enumerate() {
                let (den_base, den_exp) = exponent_parts(den_factor);
                if !equivalent(&num_base, &den_base) {
                    continue;
                }

                let mut new_num = TermCollection::new();
                let mut new_den = TermCollection::new();
                for (k, factor) in num_factors.iter().enumerate() {
                    if k == i {
                        if num_exp != den_exp {
                            new_num.add(Expr::power(
                                num_base.clone(),
                                Expr::difference(num_exp.clone(), den_exp.clone()),
                            ));
                        }
                    } else {
                        new_num.add(factor.clone());
                    }
                }
                for (k, factor) in den_factors.iter().enumerate() {
                    if k != j {
                        new_den.add(factor.clone());
                    }
                }
                return Some(Expr::quotient(
                    Expr::product_of(new_num),
                    Expr::product_of(new_den),
                ));
            }
        }
        None
    }) else {
        return Ok(None);
    };

    steps.push(Step::ReduceQuotient);
    Ok(Some(out))
}

/// Runs a polynomial extraction, treating an exceeded degree bound as a mismatch.
///
/// Rules decline quietly when a bound is hit; the error is reserved for the polynomial API
/// itself. Interruptions and undefined values still propagate.
fn extract_or_decline(expr: &Expr, variable: &str, ctxt: Ctxt) -> Result<Option<Polynomial>, Error> {
    match Polynomial::extract(expr, variable, ctxt) {
        Ok(found) => Ok(found),
        Err(error) if matches!(error.kind, ErrorKind::DegreeTooHigh { .. }) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Reduces a fraction of two polynomials by their greatest common divisor.
///
/// `(x^2 - 1)/(x - 1)` becomes `x + 1`. The variable is the first symbol shared by the
/// numerator and the denominator; if either side is not a polynomial in it, or the GCD is
/// constant, the rule declines.
pub fn reduce_polynomial(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Expr::Binary(BinOp::Quotient, num, den) = expr else {
        return Ok(None);
    };

    let Some(variable) = num
        .symbols()
        .into_iter()
        .find(|name| den.contains_symbol(name))
    else {
        return Ok(None);
    };

    let Some(num_poly) = extract_or_decline(num, &variable, ctxt)? else {
        return Ok(None);
    };
    let Some(den_poly) = extract_or_decline(den, &variable, ctxt)? else {
        return Ok(None);
    };
    if den_poly.is_zero() {
        return Err(Error::new(expr.clone(), ErrorKind::DivisionByZero));
    }

    let gcd = num_poly.gcd(&den_poly, ctxt)?;
    if gcd.degree().map_or(true, |degree| degree == 0) {
        return Ok(None);
    }

    let (num_reduced, _) = num_poly.divide(&gcd, ctxt)?;
    let (den_reduced, _) = den_poly.divide(&gcd, ctxt)?;

    steps.push(Step::ReduceQuotient);
    Ok(Some(make_fraction(
        num_reduced.synthesize(),
        den_reduced.synthesize(),
    )))
}

/// Collects the outermost non-polynomial kernels of an expression.
///
/// A kernel is a function call, a radical, or a power with a non-constant exponent that
/// contains at least one symbol. Kernels nested inside other kernels are not collected.
fn collect_kernels(expr: &Expr, out: &mut Vec<Expr>) {
    let opaque = match expr {
        Expr::Call(_, _) | Expr::Operator(_, _) => true,
        Expr::Binary(BinOp::Power, _, exp) => exp.as_rational().is_none(),
        _ => false,
    };

    if opaque && !expr.symbols().is_empty() {
        if !out.iter().any(|seen| seen == expr) {
            out.push(expr.clone());
        }
        return;
    }

    match expr {
        Expr::Integer(_) | Expr::Float(_) | Expr::Symbol(_) => {},
        Expr::Binary(_, lhs, rhs) => {
            collect_kernels(lhs, out);
            collect_kernels(rhs, out);
        },
        Expr::Call(_, arg) => collect_kernels(arg, out),
        Expr::Operator(_, params) => {
            for param in params {
                collect_kernels(param, out);
            }
        },
    }
}

/// Returns a symbol name that does not occur in either expression.
fn fresh_marker(num: &Expr, den: &Expr) -> String {
    let mut counter = 0;
    loop {
        let name = format!("__kernel{counter}");
        if !num.contains_symbol(&name) && !den.contains_symbol(&name) {
            return name;
        }
        counter += 1;
    }
}

/// Reduces a fraction built from a repeated non-polynomial kernel.
///
/// Each kernel occurring in both the numerator and the denominator is substituted by a fresh
/// marker symbol. If both sides then extract as polynomials in the marker, they are reduced
/// by their GCD and the kernel is substituted back: `(sin(x)^2 + sin(x))/sin(x)` becomes
/// `sin(x) + 1`.
pub fn reduce_composed(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Expr::Binary(BinOp::Quotient, num, den) = expr else {
        return Ok(None);
    };

    let mut kernels = Vec::new();
    collect_kernels(num, &mut kernels);

    for kernel in kernels {
        if !den.contains(&kernel) && !equivalent(den, &kernel) {
            continue;
        }

        let marker = Expr::symbol(fresh_marker(num, den));
        let masked_num = num.substitute(&kernel, &marker);
        let masked_den = den.substitute(&kernel, &marker);

        let variable = match marker.as_symbol() {
            Some(name) => name.to_owned(),
            None => continue,
        };
        let Some(num_poly) = extract_or_decline(&masked_num, &variable, ctxt)? else {
            continue;
        };
        let Some(den_poly) = extract_or_decline(&masked_den, &variable, ctxt)? else {
            continue;
        };
        if den_poly.is_zero() {
            continue;
        }

        let gcd = num_poly.gcd(&den_poly, ctxt)?;
        if gcd.degree().map_or(true, |degree| degree == 0) {
            continue;
        }

        let (num_reduced, _) = num_poly.divide(&gcd, ctxt)?;
        let (den_reduced, _) = den_poly.divide(&gcd, ctxt)?;
        let reduced = make_fraction(
            num_reduced.synthesize().substitute(&marker, &kernel),
            den_reduced.synthesize().substitute(&marker, &kernel),
        );

        steps.push(Step::ReduceQuotient);
        return Ok(Some(reduced));
    }

    Ok(None)
}

/// Applies all quotient rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(
        &[
            divide_by_zero,
            zero_numerator,
            divide_by_one,
            fold_approx,
            flatten_nested,
            reduce_numeric,
            cancel_common_factors,
            reduce_polynomial,
            reduce_composed,
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
    use casimir_expr::Func;
    use pretty_assertions::assert_eq;

    #[test]
    fn division_by_zero_is_reported() {
        let expr = Expr::quotient(Expr::symbol("a"), Expr::int(0));
        let err = simplify(&expr).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn numerical_fractions_reduce() {
        assert_eq!(
            simplify(&Expr::quotient(Expr::int(5), Expr::int(10))),
            Ok(Expr::ratio(1, 2)),
        );
        assert_eq!(
            simplify(&Expr::quotient(Expr::int(12), Expr::int(3))),
            Ok(Expr::int(4)),
        );
    }

    #[test]
    fn numeric_content_moves_out() {
        // (2x)/(4y) = x/(2y)
        let expr = Expr::quotient(
            Expr::product(Expr::int(2), Expr::symbol("x")),
            Expr::product(Expr::int(4), Expr::symbol("y")),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::quotient(
                Expr::symbol("x"),
                Expr::product(Expr::int(2), Expr::symbol("y")),
            )),
        );
    }

    #[test]
    fn sign_moves_into_the_numerator() {
        // x/(-y) = (-x)/y
        let expr = Expr::quotient(Expr::symbol("x"), -Expr::symbol("y"));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::quotient(-Expr::symbol("x"), Expr::symbol("y"))),
        );
    }

    #[test]
    fn shared_factors_cancel() {
        // (x*y)/(x*z) = y/z
        let expr = Expr::quotient(
            Expr::product(Expr::symbol("x"), Expr::symbol("y")),
            Expr::product(Expr::symbol("x"), Expr::symbol("z")),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::quotient(Expr::symbol("y"), Expr::symbol("z"))),
        );
    }

    #[test]
    fn powers_cancel_by_exponent_subtraction() {
        // x^3/x = x^2
        let x = Expr::symbol("x");
        let expr = Expr::quotient(Expr::power(x.clone(), Expr::int(3)), x.clone());
        assert_eq!(simplify(&expr), Ok(Expr::power(x, Expr::int(2))));
    }

    #[test]
    fn polynomial_fraction_reduces_by_gcd() {
        // (x^2 - 1)/(x - 1) = x + 1
        let x = Expr::symbol("x");
        let expr = Expr::quotient(
            Expr::difference(Expr::power(x.clone(), Expr::int(2)), Expr::int(1)),
            Expr::difference(x.clone(), Expr::int(1)),
        );
        assert_eq!(simplify(&expr), Ok(Expr::sum(x, Expr::int(1))));
    }

    #[test]
    fn repeated_kernel_reduces_through_a_marker() {
        // (sin(x)^2 + sin(x))/sin(x) = sin(x) + 1
        let kernel = Expr::call(Func::Sin, Expr::symbol("x"));
        let expr = Expr::quotient(
            Expr::sum(
                Expr::power(kernel.clone(), Expr::int(2)),
                kernel.clone(),
            ),
            kernel.clone(),
        );
        assert_eq!(simplify(&expr), Ok(Expr::sum(kernel, Expr::int(1))));
    }
}
