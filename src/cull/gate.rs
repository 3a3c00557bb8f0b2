//! Completion detection.
//!
//! The gate watches the decision counts and reports the single moment the
//! last undecided photo gets resolved. It fires once per session: undoing a
//! decision afterwards does not re-arm it. A new catalog gets a fresh gate.

use super::state::StateCounts;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionGate {
    fired: bool,
}

impl CompletionGate {
    /// Whether a decision set is complete: every photo resolved, and there
    /// is at least one photo to resolve.
    pub fn finished(counts: StateCounts) -> bool {
        counts.undecided == 0 && counts.total() > 0
    }

    /// Observe the current counts. True exactly when this observation is
    /// the transition into finished; false forever after for this gate.
    pub fn observe(&mut self, counts: StateCounts) -> bool {
        if self.fired || !Self::finished(counts) {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
