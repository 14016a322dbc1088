//! Simplification rules for products, including constant folding, merging quotient factors
//! into a single fraction, and combining like factors.

use crate::ctxt::Ctxt;
use crate::rules::{do_product, exponent_parts, first_of};
use crate::step::{Step, StepCollector};
use casimir_expr::primitive::float;
use casimir_expr::{equivalent, BinOp, Error, Expr, TermCollection};
use rug::Rational;

/// `a * 0 = 0`
///
/// The zero factor itself is returned, so an approximate zero keeps the result approximate.
pub fn multiply_zero(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_product(expr, |factors| {
        factors.values().find(|factor| factor.is_zero()).cloned()
    }) else {
        return Ok(None);
    };

    steps.push(Step::MultiplyZero);
    Ok(Some(out))
}

/// `a * 1 = a`
///
/// Only exact ones are dropped. An approximate `1.0` is kept so that it still turns the rest
/// of the product into an approximation.
pub fn multiply_one(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_product(expr, |factors| {
        let kept = factors
            .values()
            .filter(|factor| factor.as_rational().map_or(true, |r| r != 1))
            .cloned()
            .collect::<TermCollection<_>>();

        if kept.size() == factors.size() {
            None
        } else {
            Some(Expr::product_of(kept))
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::MultiplyOne);
    Ok(Some(out))
}

/// Folds numeric factors of a product into a single constant.
///
/// Rational factors are combined exactly, whatever their shape, so `2 * x * 3/2` becomes
/// `3 * x`. If any floating-point factor is present, every numeric factor is folded into a
/// single approximation instead. The folded constant leads the rebuilt product.
pub fn fold_constants(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_product(expr, |factors| {
        let mut exact = Vec::new();
        let mut approx = Vec::new();
        let mut rest = TermCollection::new();
        for factor in factors.values() {
            if let Some(rational) = factor.as_rational() {
                exact.push(rational);
            } else if let Expr::Float(value) = factor {
                approx.push(value.clone());
            } else {
                rest.add(factor.clone());
            }
        }

        if exact.len() + approx.len() < 2 {
            return None;
        }

        let folded = if approx.is_empty() {
            let total = exact.into_iter().fold(Rational::from(1), |acc, value| acc * value);
            Expr::rational(total)
        } else {
            let mut total = approx.into_iter().fold(float(1), |acc, value| acc * value);
            for value in exact {
                total *= float(value);
            }
            Expr::Float(total)
        };

        if folded.is_zero() {
            return Some(folded);
        }

        // a folded one is only kept when it is the entire product
        if folded.is_one() && matches!(folded, Expr::Integer(_)) && !rest.is_empty() {
            return Some(Expr::product_of(rest));
        }

        let mut out = TermCollection::new();
        out.add(folded);
        for factor in rest.into_values() {
            out.add(factor);
        }
        Some(Expr::product_of(out))
    }) else {
        return Ok(None);
    };

    steps.push(Step::FoldConstants);
    Ok(Some(out))
}

/// Merges quotient factors into a single quotient around the whole product.
///
/// `a * (b/c)` becomes `(a * b)/c`, and `(a/b) * (c/d)` becomes `(a * c)/(b * d)`. Purely
/// rational quotients are left alone; constant folding combines those exactly.
pub fn merge_quotients(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_product(expr, |factors| {
        if !factors.values().any(|factor| {
            matches!(factor, Expr::Binary(BinOp::Quotient, _, _)) && factor.as_rational().is_none()
        }) {
            return None;
        }

        let mut nums = TermCollection::new();
        let mut dens = TermCollection::new();
        for factor in factors.values().cloned() {
            if let Expr::Binary(BinOp::Quotient, num, den) = factor {
                nums.add(*num);
                dens.add(*den);
            } else {
                nums.add(factor);
            }
        }
        Some(Expr::quotient(Expr::product_of(nums), Expr::product_of(dens)))
    }) else {
        return Ok(None);
    };

    steps.push(Step::MergeQuotients);
    Ok(Some(out))
}

/// Combines like factors.
///
/// `a * a = a^2`, `a^b * a^c = a^(b+c)`, with bases compared up to term ordering. One pair
/// is combined per application; the engine reapplies the rule until no pair remains.
pub fn combine_like_factors(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_product(expr, |factors| {
        let list = factors.values().cloned().collect::<Vec<_>>();
        for i in 0..list.len() {
            let (base_i, exp_i) = exponent_parts(&list[i]);
            // numeric bases are the business of constant folding
            if base_i.as_rational().is_some() || base_i.is_float() {
                continue;
            }

            for j in (i + 1)..list.len() {
                let (base_j, exp_j) = exponent_parts(&list[j]);
                if equivalent(&base_i, &base_j) {
                    let mut kept = TermCollection::new();
                    for (k, factor) in list.iter().enumerate() {
                        if k == i {
                            kept.add(Expr::power(base_i.clone(), Expr::sum(exp_i.clone(), exp_j.clone())));
                        } else if k != j {
                            kept.add(factor.clone());
                        }
                    }
                    return Some(Expr::product_of(kept));
                }
            }
        }
        None
    }) else {
        return Ok(None);
    };

    steps.push(Step::CombineLikeFactors);
    Ok(Some(out))
}

/// Applies all multiplication rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(
        &[
            multiply_zero,
            multiply_one,
            fold_constants,
            merge_quotients,
            combine_like_factors,
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
    fn zero_annihilates() {
        let expr = Expr::product(
            Expr::sum(Expr::symbol("x"), Expr::int(3)),
            Expr::int(0),
        );
        assert_eq!(simplify(&expr), Ok(Expr::int(0)));
    }

    #[test]
    fn constants_fold_through_the_product() {
        // 2 * x * 3/2 = 3 * x
        let expr = Expr::product(
            Expr::int(2),
            Expr::product(Expr::symbol("x"), Expr::ratio(3, 2)),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::int(3), Expr::symbol("x"))),
        );
    }

    #[test]
    fn quotient_factors_merge() {
        // x * (y/z) = (x * y)/z
        let expr = Expr::product(
            Expr::symbol("x"),
            Expr::quotient(Expr::symbol("y"), Expr::symbol("z")),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::quotient(
                Expr::product(Expr::symbol("x"), Expr::symbol("y")),
                Expr::symbol("z"),
            )),
        );
    }

    #[test]
    fn like_factors_combine() {
        // x^2 * y * x = x^3 * y
        let x = Expr::symbol("x");
        let expr = Expr::product(
            Expr::power(x.clone(), Expr::int(2)),
            Expr::product(Expr::symbol("y"), x.clone()),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(
                Expr::power(x, Expr::int(3)),
                Expr::symbol("y"),
            )),
        );
    }

    #[test]
    fn double_negation_cancels() {
        // (-x) * (-y) = x * y
        let expr = Expr::product(-Expr::symbol("x"), -Expr::symbol("y"));
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(Expr::symbol("x"), Expr::symbol("y"))),
        );
    }
}
