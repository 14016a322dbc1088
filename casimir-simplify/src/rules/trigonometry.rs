//! The rule adapter over the [trigonometric reducer](crate::trig).
//!
//! The reduction logic lives in [`crate::trig`]; this module only recognizes the calls and
//! records the step.

use crate::ctxt::Ctxt;
use crate::rules::first_of;
use crate::step::{Step, StepCollector};
use crate::trig;
use casimir_expr::{Error, Expr};

/// Evaluates or period-reduces the six direct trigonometric functions.
pub fn reduce(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Expr::Call(func, arg) = expr else {
        return Ok(None);
    };
    if !func.is_trig() {
        return Ok(None);
    }

    let Some(out) = trig::reduce(*func, arg, ctxt)? else {
        return Ok(None);
    };
    steps.push(Step::Trigonometry);
    Ok(Some(out))
}

/// Evaluates the six inverse trigonometric functions at known exact values.
pub fn reduce_inverse(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    let Expr::Call(func, arg) = expr else {
        return Ok(None);
    };
    if !func.is_inverse_trig() {
        return Ok(None);
    }

    let Some(out) = trig::reduce_inverse(*func, arg, ctxt)? else {
        return Ok(None);
    };
    steps.push(Step::InverseTrigonometry);
    Ok(Some(out))
}

/// Applies all trigonometric rules.
pub fn all(expr: &Expr, ctxt: Ctxt, steps: &mut dyn StepCollector<Step>) -> Result<Option<Expr>, Error> {
    first_of(&[reduce, reduce_inverse], expr, ctxt, steps)
}
