//! Simplification rules for sums and differences, including exact constant folding and
//! rewriting sums of quotients over a common denominator.

use crate::ctxt::Ctxt;
use crate::rules::{do_sum, first_of};
use crate::step::{Step, StepCollector};
use casimir_expr::primitive::float;
use casimir_expr::{anti_equivalent, equivalent, BinOp, Error, ErrorKind, Expr, TermCollection};
use rug::{Integer, Rational};

/// `a + 0 = a`
/// `0 - a = -a`
pub fn add_zero(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_sum(expr, |terms| {
        let kept = terms
            .values()
            .filter(|term| !term.is_zero())
            .cloned()
            .collect::<TermCollection<_>>();

        if kept.size() == terms.size() {
            None
        } else {
            Some(Expr::sum_of(kept))
        }
    }) else {
        return Ok(None);
    };

    steps.push(Step::AddZero);
    Ok(Some(out))
}

/// `a - a = 0`
/// `a + (-a) = 0`
///
/// A single opposing pair is removed per application; the engine reapplies the rule until no
/// pair remains.
pub fn cancel_opposites(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_sum(expr, |terms| {
        let list = terms.values().collect::<Vec<_>>();
        for i in 0..list.len() {
            for j in (i + 1)..list.len() {
                if anti_equivalent(list[i], list[j]) {
                    let kept = terms
                        .values()
                        .enumerate()
                        .filter(|(k, _)| *k != i && *k != j)
                        .map(|(_, term)| term.clone())
                        .collect::<TermCollection<_>>();
                    return Some(Expr::sum_of(kept));
                }
            }
        }
        None
    }) else {
        return Ok(None);
    };

    steps.push(Step::CancelOpposites);
    Ok(Some(out))
}

/// Folds numeric terms of a sum into a single constant.
///
/// Rational terms are combined exactly, whatever their shape, so `1/2 + x + 1/3` becomes
/// `x + 5/6`. If any floating-point term is present, every numeric term is folded into a
/// single approximation instead.
pub fn fold_constants(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_sum(expr, |terms| {
        let mut exact = Vec::new();
        let mut approx = Vec::new();
        let mut rest = TermCollection::new();
        for term in terms.values() {
            if let Some(rational) = term.as_rational() {
                exact.push(rational);
            } else if let Expr::Float(value) = term {
                approx.push(value.clone());
            } else {
                rest.add(term.clone());
            }
        }

        if exact.len() + approx.len() < 2 {
            return None;
        }

        let folded = if approx.is_empty() {
            let total = exact.into_iter().fold(Rational::new(), |acc, value| acc + value);
            Expr::rational(total)
        } else {
            let mut total = approx.into_iter().fold(float(0), |acc, value| acc + value);
            for value in exact {
                total += float(value);
            }
            Expr::Float(total)
        };

        // a folded zero is only kept when it is the entire sum
        if !folded.is_zero() || rest.is_empty() {
            rest.add(folded);
        }
        Some(Expr::sum_of(rest))
    }) else {
        return Ok(None);
    };

    steps.push(Step::FoldConstants);
    Ok(Some(out))
}

/// Splits a term of a sum into its numerator and denominator.
///
/// Quotients split directly. Products containing quotient factors, such as the `-1 * (a/b)`
/// produced by negation, contribute every quotient denominator they contain.
fn split_term(term: &Expr) -> (Expr, Option<Expr>) {
    match term {
        Expr::Binary(BinOp::Quotient, num, den) => ((**num).clone(), Some((**den).clone())),
        Expr::Binary(BinOp::Product, _, _) => {
            let mut nums = TermCollection::new();
            let mut dens = TermCollection::new();
            for factor in term.factors().into_values() {
                if let Expr::Binary(BinOp::Quotient, num, den) = factor {
                    nums.add(*num);
                    dens.add(*den);
                } else {
                    nums.add(factor);
                }
            }
            if dens.is_empty() {
                (term.clone(), None)
            } else {
                (Expr::product_of(nums), Some(Expr::product_of(dens)))
            }
        },
        _ => (term.clone(), None),
    }
}

/// Reads a factor as `base^n` with a positive integer exponent, defaulting to `base^1`.
fn integer_exponent(factor: &Expr) -> (Expr, Integer) {
    if let Expr::Binary(BinOp::Power, base, exp) = factor {
        if let Some(n) = exp.as_integer() {
            if *n >= 1 {
                return ((**base).clone(), n.clone());
            }
        }
    }
    (factor.clone(), Integer::from(1))
}

/// The powers of each distinct base making up a denominator, combining repeated factors.
fn base_powers(den: &Expr) -> Vec<(Expr, Integer)> {
    let mut powers: Vec<(Expr, Integer)> = Vec::new();
    for factor in den.factors().values() {
        if factor.is_one() {
            continue;
        }
        let (base, exp) = integer_exponent(factor);
        match powers.iter_mut().find(|(seen, _)| equivalent(seen, &base)) {
            Some((_, total)) => *total += exp,
            None => powers.push((base, exp)),
        }
    }
    powers
}

/// Rewrites a sum containing quotients over a single common denominator.
///
/// The denominator is the least common multiple of the term denominators, taken per distinct
/// base: `1/x + 1/x^2` becomes `(x + 1)/x^2`, not `(x^2 + x)/x^3`. Terms without a
/// denominator are scaled by the entire result denominator.
pub fn common_denominator(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    if !matches!(expr, Expr::Binary(BinOp::Sum | BinOp::Difference, _, _)) {
        return Ok(None);
    }

    let terms = expr.summands();
    let mut split = Vec::with_capacity(terms.size());
    let mut denominators = 0;
    let mut symbolic_denominator = false;
    for term in terms.values() {
        let (num, den) = split_term(term);
        if let Some(den) = &den {
            if den.is_zero() {
                return Err(Error::new(term.clone(), ErrorKind::DivisionByZero));
            }
            if !den.is_one() {
                denominators += 1;
                symbolic_denominator |= den.as_rational().is_none();
            }
        }
        split.push((num, den));
    }

    // a lone rational term like `5/6` does not pull the rest of the sum into a quotient,
    // and fully rational sums are left to constant folding
    if denominators < 2 && !symbolic_denominator {
        return Ok(None);
    }
    if terms.values().all(|term| term.as_rational().is_some()) {
        return Ok(None);
    }

    let mut bases: Vec<(Expr, Integer)> = Vec::new();
    for (_, den) in &split {
        let Some(den) = den else { continue };
        for (base, exp) in base_powers(den) {
            match bases.iter_mut().find(|(seen, _)| equivalent(seen, &base)) {
                Some((_, max)) => {
                    if exp > *max {
                        *max = exp;
                    }
                },
                None => bases.push((base, exp)),
            }
        }
    }

    let lcd = Expr::product_of(
        bases
            .iter()
            .map(|(base, exp)| {
                if *exp == 1 {
                    base.clone()
                } else {
                    Expr::power(base.clone(), Expr::Integer(exp.clone()))
                }
            })
            .collect(),
    );

    let mut scaled = TermCollection::new();
    for (num, den) in &split {
        let have = den.as_ref().map(base_powers).unwrap_or_default();
        let mut missing = TermCollection::new();
        for (base, max) in &bases {
            let had = have
                .iter()
                .find(|(seen, _)| equivalent(seen, base))
                .map(|(_, exp)| exp.clone())
                .unwrap_or_default();
            let need = Integer::from(max - &had);
            if need == 0 {
                continue;
            }
            missing.add(if need == 1 {
                base.clone()
            } else {
                Expr::power(base.clone(), Expr::Integer(need))
            });
        }

        let scale = Expr::product_of(missing);
        scaled.add(if scale.is_one() {
            num.clone()
        } else {
            Expr::product(num.clone(), scale)
        });
    }

    steps.push(Step::CommonDenominator);
    Ok(Some(Expr::quotient(Expr::sum_of(scaled), lcd)))
}

/// Applies all addition rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(
        &[add_zero, cancel_opposites, fold_constants, common_denominator],
        expr,
        ctxt,
        steps,
    )
}
