//! Cooperative cancellation of long-running simplifications.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag that asks a running simplification to stop.
///
/// Cloning an [`Interrupt`] produces a handle to the same flag, so one clone can be moved to
/// another thread (or a signal handler) while the original is passed to the simplifier. The
/// engine polls the flag between rule applications and reports
/// [`ErrorKind::Interrupted`](casimir_expr::ErrorKind::Interrupted) once it is set.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// Creates a new, unset interruption flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the simplification in progress stop at the next opportunity.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true if an interruption has been requested.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Resets the flag so the handle can be reused for another run.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let interrupt = Interrupt::new();
        let remote = interrupt.clone();
        assert!(!interrupt.is_set());

        remote.interrupt();
        assert!(interrupt.is_set());

        interrupt.clear();
        assert!(!remote.is_set());
    }
}
