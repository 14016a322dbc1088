//! Factoring common factors out of sums.
//!
//! This is also how like terms combine: `2x + 3x` shares the factor `x`, factoring into
//! `x * (2 + 3)`, which constant folding finishes off as `5x`.

use crate::ctxt::Ctxt;
use crate::rules::{do_sum, first_of};
use crate::step::{Step, StepCollector};
use casimir_expr::{anti_equivalent, Error, Expr, TermCollection};

/// Rebuilds a term from its factor list with one factor left out.
fn without_factor(factors: &[Expr], skip: usize) -> Expr {
    let kept = factors
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != skip)
        .map(|(_, factor)| factor.clone())
        .collect::<TermCollection<_>>();
    Expr::product_of(kept)
}

/// `x*y + x*z = x*(y + z)`
/// `y*c + z*(-c) = c*(y - z)`
///
/// Two terms sharing a factor are merged, and the engine reapplies the rule until no pair
/// shares one. Bare rational constants are never chosen as the common factor; pulling a `2`
/// out of `2x + 4y` buys nothing, and numeric terms belong to constant folding.
pub fn factor_out(expr: &Expr, _: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Some(out) = do_sum(expr, |terms| {
        let list = terms.values().collect::<Vec<_>>();
        for i in 0..list.len() {
            let fi = list[i].factors().into_values().collect::<Vec<_>>();
            for j in (i + 1)..list.len() {
                let fj = list[j].factors().into_values().collect::<Vec<_>>();
                for (a, fa) in fi.iter().enumerate() {
                    if fa.as_rational().is_some() {
                        continue;
                    }
                    for (b, fb) in fj.iter().enumerate() {
                        let opposite = anti_equivalent(fa, fb);
                        if fa != fb && !opposite {
                            continue;
                        }

                        let rest_i = without_factor(&fi, a);
                        let rest_j = without_factor(&fj, b);
                        let merged = if opposite {
                            Expr::product(fa.clone(), Expr::difference(rest_i, rest_j))
                        } else {
                            Expr::product(fa.clone(), Expr::sum(rest_i, rest_j))
                        };

                        let mut kept = terms
                            .values()
                            .enumerate()
                            .filter(|(k, _)| *k != i && *k != j)
                            .map(|(_, term)| term.clone())
                            .collect::<TermCollection<_>>();
                        kept.add(merged);
                        return Some(Expr::sum_of(kept));
                    }
                }
            }
        }
        None
    }) else {
        return Ok(None);
    };

    steps.push(Step::FactorOut);
    Ok(Some(out))
}

/// Applies all factoring rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(&[factor_out], expr, ctxt, steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify;
    use pretty_assertions::assert_eq;

    #[test]
    fn shared_factor_is_extracted() {
        let (x, y, z) = (Expr::symbol("x"), Expr::symbol("y"), Expr::symbol("z"));
        let expr = Expr::sum(
            Expr::product(x.clone(), y.clone()),
            Expr::product(x.clone(), z.clone()),
        );
        assert_eq!(simplify(&expr), Ok(Expr::product(x, Expr::sum(y, z))));
    }

    #[test]
    fn like_terms_combine() {
        let x = Expr::symbol("x");
        let expr = Expr::sum(
            Expr::product(Expr::int(2), x.clone()),
            Expr::product(Expr::int(3), x.clone()),
        );
        assert_eq!(simplify(&expr), Ok(Expr::product(Expr::int(5), x)));
    }

    #[test]
    fn opposite_factors_merge_with_a_difference() {
        // y*(x - 1) + z*(1 - x) = (x - 1)*(y - z)
        let (x, y, z) = (Expr::symbol("x"), Expr::symbol("y"), Expr::symbol("z"));
        let flipped = Expr::difference(Expr::int(1), x.clone());
        let shared = Expr::difference(x, Expr::int(1));
        let expr = Expr::sum(
            Expr::product(y.clone(), shared.clone()),
            Expr::product(z.clone(), flipped),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::product(shared, Expr::difference(y, z))),
        );
    }

    #[test]
    fn rational_constants_are_not_common_factors() {
        let expr = Expr::sum(
            Expr::product(Expr::int(2), Expr::symbol("x")),
            Expr::product(Expr::int(4), Expr::symbol("y")),
        );
        assert_eq!(simplify(&expr), Ok(expr));
    }
}
