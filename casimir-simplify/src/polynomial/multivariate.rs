//! A thin multivariate layer over the monomial representation.
//!
//! Where [`Polynomial`](super::Polynomial) buckets coefficients by a single power, a
//! [`MultiPolynomial`] keys them by an exponent tuple, one entry per tracked variable. The
//! layer exists for collaborators that want a monomial view of an expression; all the heavy
//! algebra stays univariate.

use crate::ctxt::Ctxt;
use casimir_expr::{BinOp, Error, ErrorKind, Expr, TermCollection};
use std::collections::BTreeMap;

/// A polynomial in several named variables: exponent tuple to coefficient.
///
/// Tuples have the same length as `vars`, coefficients are simplified and never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolynomial {
    vars: Vec<String>,
    terms: BTreeMap<Vec<u32>, Expr>,
}

/// Reads the expression as a polynomial in the given variables.
///
/// The same shapes as [`Polynomial::extract`](super::Polynomial::extract) are followed;
/// every exponent is validated per variable against
/// [`max_polynomial_degree`](crate::Bounds::max_polynomial_degree).
pub fn extract_multi(
    expr: &Expr,
    vars: &[&str],
    ctxt: Ctxt,
) -> Result<Option<MultiPolynomial>, Error> {
    let vars = vars.iter().map(|v| (*v).to_owned()).collect::<Vec<_>>();
    let Some(terms) = extract_terms(expr, &vars, ctxt)? else {
        return Ok(None);
    };
    Ok(Some(MultiPolynomial { vars, terms }))
}

impl MultiPolynomial {
    /// The tracked variables, in tuple order.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// The coefficient of the given exponent tuple, with missing entries read as zero.
    pub fn coefficient(&self, exponents: &[u32]) -> Expr {
        self.terms
            .get(exponents)
            .cloned()
            .unwrap_or_else(|| Expr::int(0))
    }

    /// Returns true for the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The largest exponent-tuple sum, or `None` for the zero polynomial.
    pub fn total_degree(&self) -> Option<usize> {
        self.terms
            .keys()
            .map(|exps| exps.iter().map(|&e| e as usize).sum())
            .max()
    }

    /// The largest exponent of one variable, or `None` for the zero polynomial or a
    /// variable that is not tracked.
    pub fn degree_in(&self, var: &str) -> Option<usize> {
        let index = self.vars.iter().position(|v| v == var)?;
        self.terms
            .keys()
            .map(|exps| exps[index] as usize)
            .max()
    }

    /// Rebuilds the expression, highest exponent tuple first.
    pub fn synthesize(&self) -> Expr {
        let mut out = TermCollection::new();
        for (exps, coeff) in self.terms.iter().rev() {
            let mut monomial = TermCollection::new();
            for (var, &exp) in self.vars.iter().zip(exps) {
                match exp {
                    0 => {},
                    1 => monomial.add(Expr::symbol(var.clone())),
                    _ => monomial.add(Expr::power(
                        Expr::symbol(var.clone()),
                        Expr::int(exp as i64),
                    )),
                }
            }
            out.add(if monomial.is_empty() {
                coeff.clone()
            } else if coeff.is_one() {
                Expr::product_of(monomial)
            } else {
                Expr::product(coeff.clone(), Expr::product_of(monomial))
            });
        }
        Expr::sum_of(out)
    }
}

type Terms = BTreeMap<Vec<u32>, Expr>;

fn extract_terms(expr: &Expr, vars: &[String], ctxt: Ctxt) -> Result<Option<Terms>, Error> {
    if !vars.iter().any(|v| expr.contains_symbol(v)) {
        let coeff = crate::simplify_with(expr, ctxt)?;
        let mut terms = Terms::new();
        if !coeff.is_zero() {
            terms.insert(vec![0; vars.len()], coeff);
        }
        return Ok(Some(terms));
    }

    match expr {
        Expr::Symbol(name) => {
            let Some(index) = vars.iter().position(|v| v == name) else {
                return Ok(None);
            };
            let mut exps = vec![0; vars.len()];
            exps[index] = 1;
            let mut terms = Terms::new();
            terms.insert(exps, Expr::int(1));
            Ok(Some(terms))
        },
        Expr::Binary(BinOp::Sum | BinOp::Difference, _, _) => {
            let mut total = Terms::new();
            for term in expr.summands().into_values() {
                let Some(part) = extract_terms(&term, vars, ctxt)? else {
                    return Ok(None);
                };
                total = merge_add(total, part, ctxt)?;
            }
            Ok(Some(total))
        },
        Expr::Binary(BinOp::Product, _, _) => {
            let mut total = Terms::new();
            total.insert(vec![0; vars.len()], Expr::int(1));
            for factor in expr.factors().into_values() {
                let Some(part) = extract_terms(&factor, vars, ctxt)? else {
                    return Ok(None);
                };
                total = convolve(&total, &part, ctxt, expr)?;
            }
            Ok(Some(total))
        },
        Expr::Binary(BinOp::Quotient, num, den) => {
            if vars.iter().any(|v| den.contains_symbol(v)) {
                return Ok(None);
            }
            let Some(part) = extract_terms(num, vars, ctxt)? else {
                return Ok(None);
            };
            let mut terms = Terms::new();
            for (exps, coeff) in part {
                let scaled =
                    crate::simplify_with(&Expr::quotient(coeff, (**den).clone()), ctxt)?;
                if !scaled.is_zero() {
                    terms.insert(exps, scaled);
                }
            }
            Ok(Some(terms))
        },
        Expr::Binary(BinOp::Power, base, exp) => {
            let Some(n) = exp.as_integer() else {
                return Ok(None);
            };
            if *n < 0 {
                return Ok(None);
            }
            let n = n.to_usize().unwrap_or(usize::MAX);

            let Some(part) = extract_terms(base, vars, ctxt)? else {
                return Ok(None);
            };
            let limit = ctxt.bounds.max_polynomial_degree;
            for index in 0..vars.len() {
                let base_degree = part
                    .keys()
                    .map(|exps| exps[index] as usize)
                    .max()
                    .unwrap_or(0);
                let predicted = base_degree.saturating_mul(n);
                if predicted > limit {
                    return Err(Error::new(
                        expr.clone(),
                        ErrorKind::DegreeTooHigh { degree: predicted, limit },
                    ));
                }
            }

            let mut total = Terms::new();
            total.insert(vec![0; vars.len()], Expr::int(1));
            for _ in 0..n {
                total = convolve(&total, &part, ctxt, expr)?;
            }
            Ok(Some(total))
        },
        _ => Ok(None),
    }
}

fn merge_add(mut into: Terms, from: Terms, ctxt: Ctxt) -> Result<Terms, Error> {
    for (exps, coeff) in from {
        match into.remove(&exps) {
            None => {
                into.insert(exps, coeff);
            },
            Some(existing) => {
                let combined =
                    crate::simplify_with(&Expr::sum(existing, coeff), ctxt)?;
                if !combined.is_zero() {
                    into.insert(exps, combined);
                }
            },
        }
    }
    Ok(into)
}

fn convolve(a: &Terms, b: &Terms, ctxt: Ctxt, at: &Expr) -> Result<Terms, Error> {
    let limit = ctxt.bounds.max_polynomial_degree;
    let mut buckets: BTreeMap<Vec<u32>, TermCollection<Expr>> = BTreeMap::new();
    for (exps_a, coeff_a) in a {
        for (exps_b, coeff_b) in b {
            let mut exps = Vec::with_capacity(exps_a.len());
            for (&x, &y) in exps_a.iter().zip(exps_b) {
                let combined = x + y;
                if combined as usize > limit {
                    return Err(Error::new(
                        at.clone(),
                        ErrorKind::DegreeTooHigh { degree: combined as usize, limit },
                    ));
                }
                exps.push(combined);
            }
            buckets
                .entry(exps)
                .or_default()
                .add(Expr::product(coeff_a.clone(), coeff_b.clone()));
        }
    }

    let mut terms = Terms::new();
    for (exps, bucket) in buckets {
        let combined = crate::simplify_with(&Expr::sum_of(bucket), ctxt)?;
        if !combined.is_zero() {
            terms.insert(exps, combined);
        }
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, Interrupt};
    use pretty_assertions::assert_eq;

    fn with_ctxt<T>(f: impl FnOnce(Ctxt) -> T) -> T {
        let bounds = Bounds::default();
        let interrupt = Interrupt::new();
        f(Ctxt::new(&bounds, &interrupt))
    }

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn buckets_by_exponent_tuple() {
        with_ctxt(|ctxt| {
            // x*y + 2x + 3
            let expr = Expr::sum(
                Expr::product(x(), y()),
                Expr::sum(Expr::product(Expr::int(2), x()), Expr::int(3)),
            );
            let poly = extract_multi(&expr, &["x", "y"], ctxt).unwrap().unwrap();

            assert_eq!(poly.coefficient(&[1, 1]), Expr::int(1));
            assert_eq!(poly.coefficient(&[1, 0]), Expr::int(2));
            assert_eq!(poly.coefficient(&[0, 0]), Expr::int(3));
            assert_eq!(poly.coefficient(&[0, 1]), Expr::int(0));
            assert_eq!(poly.total_degree(), Some(2));
            assert_eq!(poly.degree_in("x"), Some(1));
            assert_eq!(poly.degree_in("y"), Some(1));
            assert_eq!(poly.degree_in("z"), None);
        });
    }

    #[test]
    fn powers_of_sums_expand() {
        with_ctxt(|ctxt| {
            // (x + y)^2 = x^2 + 2xy + y^2
            let expr = Expr::power(Expr::sum(x(), y()), Expr::int(2));
            let poly = extract_multi(&expr, &["x", "y"], ctxt).unwrap().unwrap();

            assert_eq!(poly.coefficient(&[2, 0]), Expr::int(1));
            assert_eq!(poly.coefficient(&[1, 1]), Expr::int(2));
            assert_eq!(poly.coefficient(&[0, 2]), Expr::int(1));
            assert_eq!(poly.total_degree(), Some(2));
        });
    }

    #[test]
    fn symbolic_coefficients_survive() {
        with_ctxt(|ctxt| {
            // a*x + x*y over [x, y]: the free symbol stays in the coefficient
            let expr = Expr::sum(
                Expr::product(Expr::symbol("a"), x()),
                Expr::product(x(), y()),
            );
            let poly = extract_multi(&expr, &["x", "y"], ctxt).unwrap().unwrap();
            assert_eq!(poly.coefficient(&[1, 0]), Expr::symbol("a"));
            assert_eq!(poly.coefficient(&[1, 1]), Expr::int(1));
        });
    }

    #[test]
    fn non_polynomial_shapes_decline() {
        with_ctxt(|ctxt| {
            let expr = Expr::call(casimir_expr::Func::Sin, x());
            assert_eq!(extract_multi(&expr, &["x"], ctxt).unwrap(), None);

            // division by a tracked variable
            let expr = Expr::quotient(x(), y());
            assert_eq!(extract_multi(&expr, &["x", "y"], ctxt).unwrap(), None);

            // but a variable-free divisor is a scalar
            let expr = Expr::quotient(x(), Expr::symbol("z"));
            let poly = extract_multi(&expr, &["x", "y"], ctxt).unwrap().unwrap();
            assert_eq!(poly.degree_in("x"), Some(1));
        });
    }

    #[test]
    fn per_variable_degrees_are_validated() {
        with_ctxt(|ctxt| {
            let expr = Expr::product(Expr::power(x(), Expr::int(100)), y());
            let err = extract_multi(&expr, &["x", "y"], ctxt).unwrap_err();
            assert_eq!(
                err.kind,
                casimir_expr::ErrorKind::DegreeTooHigh { degree: 100, limit: 64 },
            );
        });
    }

    #[test]
    fn synthesis_round_trips() {
        with_ctxt(|ctxt| {
            let expr = Expr::sum(
                Expr::product(x(), y()),
                Expr::sum(Expr::product(Expr::int(2), x()), Expr::int(3)),
            );
            let poly = extract_multi(&expr, &["x", "y"], ctxt).unwrap().unwrap();
            let rebuilt = extract_multi(&poly.synthesize(), &["x", "y"], ctxt)
                .unwrap()
                .unwrap();
            assert_eq!(rebuilt, poly);
        });
    }

    #[test]
    fn the_zero_polynomial_is_empty() {
        with_ctxt(|ctxt| {
            let poly = extract_multi(&Expr::int(0), &["x"], ctxt).unwrap().unwrap();
            assert!(poly.is_zero());
            assert_eq!(poly.total_degree(), None);
            assert_eq!(poly.synthesize(), Expr::int(0));
        });
    }
}
