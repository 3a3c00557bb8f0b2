//! Per-photo culling decisions.
//!
//! Each photo carries one of three states: undecided, keep, or reject. The
//! store is a vector parallel to the catalog's flat order with counts
//! maintained incrementally. Mutations report the entries that actually
//! changed so the sync queue persists exactly those and nothing else.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::catalog::Catalog;

/// Culling decision for one photo. Any transition between states is legal;
/// this is flag assignment, not a workflow progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullState {
    #[default]
    Undecided,
    Keep,
    Reject,
}

/// Running totals per decision state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateCounts {
    pub undecided: usize,
    pub keep: usize,
    pub reject: usize,
}

impl StateCounts {
    pub fn total(&self) -> usize {
        self.undecided + self.keep + self.reject
    }

    fn slot(&mut self, state: CullState) -> &mut usize {
        match state {
            CullState::Undecided => &mut self.undecided,
            CullState::Keep => &mut self.keep,
            CullState::Reject => &mut self.reject,
        }
    }
}

/// One state change to persist, keyed by the photo's preview path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionChange {
    pub preview_path: PathBuf,
    pub state: CullState,
}

/// Decision store for one catalog. Indexed by flat photo index.
#[derive(Debug, Clone, Default)]
pub struct Decisions {
    states: Vec<CullState>,
    counts: StateCounts,
}

impl Decisions {
    /// Build a store from preloaded sidecar states, one per catalog photo.
    pub fn new(initial: Vec<CullState>) -> Self {
        let mut counts = StateCounts::default();
        for state in &initial {
            *counts.slot(*state) += 1;
        }
        Self {
            states: initial,
            counts,
        }
    }

    pub fn state(&self, index: usize) -> CullState {
        self.states[index]
    }

    pub fn states(&self) -> &[CullState] {
        &self.states
    }

    pub fn counts(&self) -> StateCounts {
        self.counts
    }

    /// Set one photo's state. Returns the change when the state actually
    /// differs from the current one, an empty batch otherwise.
    pub fn mark(&mut self, catalog: &Catalog, index: usize, state: CullState) -> Vec<DecisionChange> {
        let mut changes = Vec::new();
        self.set_one(catalog, index, state, &mut changes);
        changes
    }

    /// Set one photo's state and force every still-undecided photo in the
    /// same group to reject. Already-resolved groupmates keep their state.
    /// The target's change (if any) comes first in the batch.
    pub fn mark_burst(
        &mut self,
        catalog: &Catalog,
        index: usize,
        state: CullState,
    ) -> Vec<DecisionChange> {
        let mut changes = Vec::new();
        self.set_one(catalog, index, state, &mut changes);

        let loc = catalog.location(index);
        for i in loc.group_start..=loc.group_end {
            if i != index && self.states[i] == CullState::Undecided {
                self.set_one(catalog, i, CullState::Reject, &mut changes);
            }
        }
        changes
    }

    fn set_one(
        &mut self,
        catalog: &Catalog,
        index: usize,
        state: CullState,
        changes: &mut Vec<DecisionChange>,
    ) {
        let old = self.states[index];
        if old == state {
            return;
        }
        *self.counts.slot(old) -= 1;
        *self.counts.slot(state) += 1;
        self.states[index] = state;
        changes.push(DecisionChange {
            preview_path: catalog.photo(index).preview_path.clone(),
            state,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cull::catalog::tests::catalog_with_groups;

    fn all_undecided(catalog: &Catalog) -> Decisions {
        Decisions::new(vec![CullState::Undecided; catalog.len()])
    }

    #[test]
    fn test_counts_always_sum_to_total() {
        let catalog = catalog_with_groups(&[3, 2]);
        let mut decisions = all_undecided(&catalog);

        decisions.mark(&catalog, 0, CullState::Keep);
        decisions.mark(&catalog, 1, CullState::Reject);
        decisions.mark(&catalog, 0, CullState::Reject);
        decisions.mark(&catalog, 4, CullState::Keep);
        decisions.mark(&catalog, 4, CullState::Undecided);

        assert_eq!(decisions.counts().total(), catalog.len());
        assert_eq!(decisions.counts().reject, 2);
        assert_eq!(decisions.counts().keep, 0);
        assert_eq!(decisions.counts().undecided, 3);
    }

    #[test]
    fn test_mark_reports_only_real_changes() {
        let catalog = catalog_with_groups(&[2]);
        let mut decisions = all_undecided(&catalog);

        let changes = decisions.mark(&catalog, 0, CullState::Keep);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].state, CullState::Keep);
        assert_eq!(changes[0].preview_path, catalog.photo(0).preview_path);

        // Re-marking the same state is a no-op.
        let changes = decisions.mark(&catalog, 0, CullState::Keep);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_any_transition_is_legal() {
        let catalog = catalog_with_groups(&[1]);
        let mut decisions = all_undecided(&catalog);

        decisions.mark(&catalog, 0, CullState::Keep);
        decisions.mark(&catalog, 0, CullState::Reject);
        assert_eq!(decisions.state(0), CullState::Reject);

        decisions.mark(&catalog, 0, CullState::Undecided);
        assert_eq!(decisions.state(0), CullState::Undecided);
        assert_eq!(decisions.counts().undecided, 1);
    }

    #[test]
    fn test_burst_keep_rejects_undecided_groupmates() {
        let catalog = catalog_with_groups(&[3, 2]);
        let mut decisions = all_undecided(&catalog);

        let changes = decisions.mark_burst(&catalog, 1, CullState::Keep);

        assert_eq!(decisions.state(1), CullState::Keep);
        assert_eq!(decisions.state(0), CullState::Reject);
        assert_eq!(decisions.state(2), CullState::Reject);
        // The second group is untouched.
        assert_eq!(decisions.state(3), CullState::Undecided);
        assert_eq!(decisions.state(4), CullState::Undecided);

        let counts = decisions.counts();
        assert_eq!(counts.keep, 1);
        assert_eq!(counts.reject, 2);
        assert_eq!(counts.undecided, 2);

        // Target first, then swept groupmates.
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].preview_path, catalog.photo(1).preview_path);
    }

    #[test]
    fn test_burst_leaves_resolved_groupmates_alone() {
        let catalog = catalog_with_groups(&[3]);
        let mut decisions = all_undecided(&catalog);

        decisions.mark(&catalog, 0, CullState::Keep);
        let changes = decisions.mark_burst(&catalog, 1, CullState::Keep);

        assert_eq!(decisions.state(0), CullState::Keep);
        assert_eq!(decisions.state(1), CullState::Keep);
        assert_eq!(decisions.state(2), CullState::Reject);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_preloaded_states_are_counted() {
        let decisions = Decisions::new(vec![
            CullState::Keep,
            CullState::Keep,
            CullState::Reject,
            CullState::Undecided,
        ]);
        let counts = decisions.counts();
        assert_eq!(counts.keep, 2);
        assert_eq!(counts.reject, 1);
        assert_eq!(counts.undecided, 1);
        assert_eq!(counts.total(), 4);
    }
}
