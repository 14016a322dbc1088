//! Symbolic simplification of [`Expr`] trees.
//!
//! The engine repeatedly applies a library of rewrite rules until no rule makes progress
//! anywhere in the expression. Each pass applies the rules at the current node first, then
//! recurses into the children, so a rule that rewrites a whole sum sees its operands before
//! they are individually simplified, and sees them again afterwards.
//!
//! The three entry points differ only in how much the caller wants to configure and observe:
//!
//! - [`simplify`] runs with default [`Bounds`] and no cancellation.
//! - [`simplify_with`] accepts a [`Ctxt`] carrying custom bounds and an [`Interrupt`].
//! - [`simplify_with_steps`] additionally reports the [`Step`]s that were applied.
//!
//! Simplification is fallible: rewriting can uncover a value that is mathematically
//! undefined, such as `1 / (x - x)`, and the engine reports it as an
//! [`Error`](casimir_expr::Error) rather than leaving it in the output.

pub mod bounds;
pub mod ctxt;
mod fraction;
pub mod interrupt;
pub mod polynomial;
pub mod rules;
pub mod step;
pub mod trig;

pub use bounds::{Bounds, ExpansionProfile};
pub use ctxt::Ctxt;
pub use interrupt::Interrupt;
pub use step::{Step, StepCollector};

use casimir_expr::{Error, Expr};
use tracing::trace;

/// Simplifies the expression with default [`Bounds`] and no way to cancel.
pub fn simplify(expr: &Expr) -> Result<Expr, Error> {
    let bounds = Bounds::default();
    let interrupt = Interrupt::new();
    simplify_with(expr, Ctxt::new(&bounds, &interrupt))
}

/// Simplifies the expression under the given context.
pub fn simplify_with(expr: &Expr, ctxt: Ctxt) -> Result<Expr, Error> {
    inner_simplify(expr, ctxt, &mut ())
}

/// Simplifies the expression under the given context, also returning the steps applied.
///
/// The steps are reported in application order. A step names the family of rules that fired,
/// not the subexpression it fired on, so the list is a trace rather than a proof.
pub fn simplify_with_steps(expr: &Expr, ctxt: Ctxt) -> Result<(Expr, Vec<Step>), Error> {
    let mut steps = Vec::new();
    let simplified = inner_simplify(expr, ctxt, &mut steps)?;
    Ok((simplified, steps))
}

/// Simplifies the expression to a fixed point.
fn inner_simplify(
    expr: &Expr,
    ctxt: Ctxt,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Expr, Error> {
    let mut current = expr.clone();
    loop {
        ctxt.check_interrupted(&current)?;

        let mut changed = false;
        if let Some(next) = rules::all(&current, ctxt, steps)? {
            current = next;
            changed = true;
        }

        if let Some(next) = simplify_children(&current, ctxt, steps)? {
            current = next;
            changed = true;
        }

        if !changed {
            return Ok(current);
        }
        trace!(expr = %current, "pass changed the expression, running another");
    }
}

/// Simplifies the children of the expression, returning the rebuilt node if any child
/// changed.
fn simplify_children(
    expr: &Expr,
    ctxt: Ctxt,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Option<Expr>, Error> {
    match expr {
        Expr::Binary(op, lhs, rhs) => {
            let new_lhs = inner_simplify(lhs, ctxt, steps)?;
            let new_rhs = inner_simplify(rhs, ctxt, steps)?;
            if new_lhs != **lhs || new_rhs != **rhs {
                Ok(Some(Expr::binary(*op, new_lhs, new_rhs)))
            } else {
                Ok(None)
            }
        }
        Expr::Call(func, arg) => {
            let new_arg = inner_simplify(arg, ctxt, steps)?;
            if new_arg != **arg {
                Ok(Some(Expr::call(*func, new_arg)))
            } else {
                Ok(None)
            }
        }
        Expr::Operator(kind, args) => {
            let mut new_args = Vec::with_capacity(args.len());
            let mut changed = false;
            for arg in args {
                let new_arg = inner_simplify(arg, ctxt, steps)?;
                changed |= new_arg != *arg;
                new_args.push(new_arg);
            }
            if changed {
                Ok(Some(Expr::Operator(*kind, new_args)))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casimir_expr::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn simplification_is_idempotent() {
        let exprs = [
            Expr::sum(
                Expr::product(Expr::int(2), Expr::symbol("x")),
                Expr::quotient(Expr::symbol("y"), Expr::int(3)),
            ),
            Expr::power(Expr::sum(Expr::symbol("x"), Expr::int(1)), Expr::int(2)),
            Expr::call(casimir_expr::Func::Sin, Expr::quotient(Expr::pi(), Expr::int(7))),
        ];
        for expr in exprs {
            let once = simplify(&expr).unwrap();
            let twice = simplify(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn atoms_pass_through() {
        assert_eq!(simplify(&Expr::int(42)), Ok(Expr::int(42)));
        assert_eq!(simplify(&Expr::symbol("x")), Ok(Expr::symbol("x")));
        assert_eq!(simplify(&Expr::pi()), Ok(Expr::pi()));
    }

    #[test]
    fn children_are_simplified_inside_unhandled_nodes() {
        // No rule rewrites `abs` of a bare symbol, but its argument still simplifies.
        let expr = Expr::call(
            casimir_expr::Func::Abs,
            Expr::sum(Expr::symbol("x"), Expr::int(0)),
        );
        assert_eq!(
            simplify(&expr),
            Ok(Expr::call(casimir_expr::Func::Abs, Expr::symbol("x")))
        );
    }

    #[test]
    fn interruption_stops_the_run() {
        let bounds = Bounds::default();
        let interrupt = Interrupt::new();
        interrupt.interrupt();
        let expr = Expr::sum(Expr::symbol("x"), Expr::int(0));
        let err = simplify_with(&expr, Ctxt::new(&bounds, &interrupt)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Interrupted);

        interrupt.clear();
        assert_eq!(
            simplify_with(&expr, Ctxt::new(&bounds, &interrupt)),
            Ok(Expr::symbol("x"))
        );
    }

    /// Evaluates a polynomial-shaped expression exactly at a rational assignment.
    fn eval_at(expr: &Expr, x: &rug::Rational, y: &rug::Rational) -> rug::Rational {
        use casimir_expr::BinOp;
        use rug::ops::Pow;

        if let Some(value) = expr.as_rational() {
            return value;
        }
        match expr {
            Expr::Symbol(name) if name == "x" => x.clone(),
            Expr::Symbol(name) if name == "y" => y.clone(),
            Expr::Binary(BinOp::Sum, lhs, rhs) => eval_at(lhs, x, y) + eval_at(rhs, x, y),
            Expr::Binary(BinOp::Difference, lhs, rhs) => {
                eval_at(lhs, x, y) - eval_at(rhs, x, y)
            },
            Expr::Binary(BinOp::Product, lhs, rhs) => {
                eval_at(lhs, x, y) * eval_at(rhs, x, y)
            },
            Expr::Binary(BinOp::Quotient, lhs, rhs) => {
                eval_at(lhs, x, y) / eval_at(rhs, x, y)
            },
            Expr::Binary(BinOp::Power, base, exp) => {
                let exponent = exp
                    .as_integer()
                    .and_then(|n| n.to_u32())
                    .expect("generated exponents are small non-negative integers");
                rug::Rational::from(eval_at(base, x, y).pow(exponent))
            },
            _ => panic!("unexpected node in a generated expression: {expr}"),
        }
    }

    /// Random sums, products, powers and constant quotients over `x` and `y`.
    fn random_expr(rng: &mut rand::rngs::StdRng, depth: u32) -> Expr {
        use rand::Rng;

        if depth == 0 || rng.gen_range(0..6) == 0 {
            return match rng.gen_range(0..4) {
                0 => Expr::int(rng.gen_range(-5i64..=5)),
                1 => Expr::ratio(rng.gen_range(-5i64..=5), rng.gen_range(1i64..=4)),
                2 => Expr::symbol("x"),
                _ => Expr::symbol("y"),
            };
        }
        match rng.gen_range(0..5) {
            0 => Expr::sum(random_expr(rng, depth - 1), random_expr(rng, depth - 1)),
            1 => Expr::difference(random_expr(rng, depth - 1), random_expr(rng, depth - 1)),
            2 => Expr::product(random_expr(rng, depth - 1), random_expr(rng, depth - 1)),
            3 => Expr::power(random_expr(rng, depth - 1), Expr::int(rng.gen_range(0i64..=3))),
            _ => Expr::quotient(
                random_expr(rng, depth - 1),
                Expr::int([2i64, 3, 5, 7][rng.gen_range(0..4)]),
            ),
        }
    }

    /// Simplification must preserve the value of the expression at every assignment.
    #[test]
    fn simplification_is_sound_at_random_rational_points() {
        use rand::{Rng, SeedableRng};

        let mut rng = rand::rngs::StdRng::seed_from_u64(0xCA51);
        for _ in 0..200 {
            let expr = random_expr(&mut rng, 3);
            let simplified = simplify(&expr).unwrap();

            for _ in 0..4 {
                let x = rug::Rational::from((rng.gen_range(-9i64..=9), rng.gen_range(1i64..=5)));
                let y = rug::Rational::from((rng.gen_range(-9i64..=9), rng.gen_range(1i64..=5)));
                assert_eq!(
                    eval_at(&expr, &x, &y),
                    eval_at(&simplified, &x, &y),
                    "value changed for {expr} -> {simplified} at x = {x}, y = {y}",
                );
            }
        }
    }

    #[test]
    fn steps_are_reported_in_order() {
        let bounds = Bounds::default();
        let interrupt = Interrupt::new();
        let expr = Expr::product(
            Expr::sum(Expr::symbol("x"), Expr::int(0)),
            Expr::int(1),
        );
        let (simplified, steps) =
            simplify_with_steps(&expr, Ctxt::new(&bounds, &interrupt)).unwrap();
        assert_eq!(simplified, Expr::symbol("x"));
        assert!(steps.contains(&Step::AddZero));
        assert!(steps.contains(&Step::MultiplyOne));
    }
}
