//! The context threaded through every rule application.

use crate::bounds::Bounds;
use crate::interrupt::Interrupt;
use casimir_expr::{Error, ErrorKind, Expr};

/// Everything a rule needs besides the expression itself: the work limits and the
/// cancellation flag.
///
/// The context is a pair of references and is `Copy`, so rules pass it by value without
/// ceremony. The referenced [`Bounds`] never change during a run.
#[derive(Clone, Copy, Debug)]
pub struct Ctxt<'a> {
    /// Limits on how much work individual rules may do.
    pub bounds: &'a Bounds,

    /// The cancellation flag polled by the engine.
    pub interrupt: &'a Interrupt,
}

impl<'a> Ctxt<'a> {
    /// Creates a context from the given bounds and interruption flag.
    pub fn new(bounds: &'a Bounds, interrupt: &'a Interrupt) -> Self {
        Self { bounds, interrupt }
    }

    /// Returns an [`ErrorKind::Interrupted`] error if cancellation has been requested.
    ///
    /// `at` names the expression being worked on when the interruption was noticed, and is
    /// reported inside the error.
    pub fn check_interrupted(&self, at: &Expr) -> Result<(), Error> {
        if self.interrupt.is_set() {
            Err(Error::new(at.clone(), ErrorKind::Interrupted))
        } else {
            Ok(())
        }
    }
}
