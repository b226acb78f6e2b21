//! Cooperative cancellation for a pipeline run.
//!
//! The front-end holds a `RunControl` and requests abort (e.g. on Ctrl-C);
//! workers stop claiming rows and the in-flight transfer stops from the curl
//! write callback. Rows already recorded keep their terminal status.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared abort token for one pipeline run. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    aborted: Arc<AtomicBool>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a cooperative stop. Idempotent.
    pub fn request_abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_is_visible_through_clones() {
        let control = RunControl::new();
        let clone = control.clone();
        assert!(!clone.is_aborted());
        control.request_abort();
        assert!(clone.is_aborted());
    }
}
