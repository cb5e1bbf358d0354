//! Cooperative cancellation and progress reporting.
//!
//! A handler is threaded by reference through every layer and polled at
//! well-defined points only: after each model is extracted, after each
//! collector commit, and (at the engine's discretion) during a running
//! solve call. Returning `false` from a poll aborts the run; the committed
//! part of the result is returned as-is.

/// Cancellation/progress callback for enumeration and counting runs.
#[allow(unused_variables)]
pub trait IterationHandler {
    /// Invoked once per model found by the engine. `false` aborts.
    fn found_model(&mut self) -> bool {
        true
    }

    /// Invoked after every collector commit or rollback. `false` aborts.
    fn committed(&mut self) -> bool {
        true
    }

    /// Stop signal polled by the engine while a solve call is running.
    fn stop_solve(&mut self) -> bool {
        false
    }
}

/// A handler that never aborts.
pub struct NoAbort;

impl IterationHandler for NoAbort {}

/// Aborts the run once a fixed number of models has been found. The
/// aborting model itself stays uncommitted and is rolled back.
pub struct ModelLimit {
    limit: usize,
    seen: usize,
}

impl ModelLimit {
    pub fn new(limit: usize) -> ModelLimit {
        ModelLimit { limit, seen: 0 }
    }

    pub fn models_seen(&self) -> usize {
        self.seen
    }
}

impl IterationHandler for ModelLimit {
    fn found_model(&mut self) -> bool {
        self.seen += 1;
        self.seen < self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_limit_aborts_at_limit() {
        let mut h = ModelLimit::new(3);
        assert!(h.found_model());
        assert!(h.found_model());
        assert!(!h.found_model());
        assert_eq!(h.models_seen(), 3);
    }
}
