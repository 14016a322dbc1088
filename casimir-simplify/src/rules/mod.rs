//! Implementation of the rewrite rules applied by the simplifier.
//!
//! Each rule in this module is a function that takes the expression to simplify as an
//! argument, and returns `Ok(Some(expr))` with the simplified expression if the rule
//! applies, or `Ok(None)` if the rule does not apply. Rules that discover an undefined
//! value, such as a division by zero, report it as an [`Error`] instead.
//!
//! Rules only ever return `Ok(Some(..))` when the returned expression differs from the
//! input. The engine applies rules in a loop, so a rule that reports progress without making
//! any would never terminate.

pub mod add;
pub mod factor;
pub mod functions;
pub mod multiply;
pub mod power;
pub mod quotient;
pub mod root;
pub mod trigonometry;

use crate::ctxt::Ctxt;
use crate::step::{Step, StepCollector};
use casimir_expr::{BinOp, Error, Expr, Func, TermCollection};

/// The signature shared by every rewrite rule.
pub(crate) type Rule = fn(&Expr, Ctxt, &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error>;

/// Applies the given rules in order, returning the result of the first one that applies.
pub(crate) fn first_of(
    rules: &[Rule],
    expr: &Expr,
    ctxt: Ctxt,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Option<Expr>, Error> {
    for rule in rules {
        if let Some(expr) = rule(expr, ctxt, steps)? {
            return Ok(Some(expr));
        }
    }
    Ok(None)
}

/// If the expression is a binary node with the given operation, calls the given
/// transformation function with its operands.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_binary(
    expr: &Expr,
    op: BinOp,
    f: impl FnOnce(&Expr, &Expr) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Binary(found, lhs, rhs) = expr {
        if *found == op {
            return f(lhs, rhs);
        }
    }
    None
}

/// Fallible counterpart of [`do_binary`] for rules that can report undefined values.
pub(crate) fn try_binary(
    expr: &Expr,
    op: BinOp,
    f: impl FnOnce(&Expr, &Expr) -> Result<Option<Expr>, Error>,
) -> Result<Option<Expr>, Error> {
    if let Expr::Binary(found, lhs, rhs) = expr {
        if *found == op {
            return f(lhs, rhs);
        }
    }
    Ok(None)
}

/// If the expression is a sum or a difference, calls the given transformation function with
/// its flattened signed terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_sum(
    expr: &Expr,
    f: impl FnOnce(&TermCollection<Expr>) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Binary(BinOp::Sum | BinOp::Difference, _, _) = expr {
        f(&expr.summands())
    } else {
        None
    }
}

/// If the expression is a product, calls the given transformation function with its
/// flattened factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_product(
    expr: &Expr,
    f: impl FnOnce(&TermCollection<Expr>) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Binary(BinOp::Product, _, _) = expr {
        f(&expr.factors())
    } else {
        None
    }
}

/// If the expression is a call to the given function, calls the given transformation
/// function with the argument.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_call(expr: &Expr, func: Func, f: impl FnOnce(&Expr) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Call(found, arg) = expr {
        if *found == func {
            return f(arg);
        }
    }
    None
}

/// Reads a factor as a base and an exponent, defaulting to an exponent of one.
///
/// - `a^b` -> `(a, b)`
/// - `a` -> `(a, 1)`
pub(crate) fn exponent_parts(factor: &Expr) -> (Expr, Expr) {
    match factor {
        Expr::Binary(BinOp::Power, base, exp) => ((**base).clone(), (**exp).clone()),
        _ => (factor.clone(), Expr::int(1)),
    }
}

/// Applies all rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(
        &[
            add::all,
            multiply::all,
            quotient::all,
            power::all,
            root::all,
            functions::all,
            trigonometry::all,
            factor::all,
        ],
        expr,
        ctxt,
        steps,
    )
}
