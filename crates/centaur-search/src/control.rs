//! Search control — stop flag and per-invocation budgets.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Controls when a top-level search should stop expanding.
///
/// Checked at every node before any collaborator call. Supports an
/// external stop flag, a wall-clock deadline, and a node budget; hitting
/// any of them turns the remaining subtree into leaves (scored at deep
/// effort), it does not abort the search with an error.
///
/// Individual collaborator calls are bounded by their fixed effort, so
/// the worst-case overshoot past the deadline is a single call.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    /// Control with no budgets; only the external stop flag applies.
    pub fn unlimited(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            time_limit: None,
            node_limit: None,
        }
    }

    /// Control with optional wall-clock and node budgets; the clock
    /// starts immediately.
    pub fn with_budget(
        stopped: Arc<AtomicBool>,
        time_limit: Option<Duration>,
        node_limit: Option<u64>,
    ) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            time_limit,
            node_limit,
        }
    }

    /// Whether the search should stop expanding.
    ///
    /// When the deadline fires, the stop flag is set so subsequent calls
    /// return immediately without re-checking the clock.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        if let Some(limit) = self.node_limit
            && nodes >= limit
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }

        if let Some(limit) = self.time_limit
            && self.elapsed() >= limit
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }

        false
    }

    /// Elapsed time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Reference to the shared stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}
