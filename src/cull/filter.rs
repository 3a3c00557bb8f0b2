//! Visibility filtering of rejected photos.
//!
//! The filter projects the flat sequence onto a visible subsequence
//! (order-preserving, excluding rejects when hidden) and translates indices
//! between the two spaces. Movement runs in visible space so wraparound and
//! group skips respect the filtered view.

use super::cursor::wrap_index;
use super::state::{CullState, Decisions};

/// Show-rejected toggle plus the full/visible index translation built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewFilter {
    show_rejected: bool,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            show_rejected: true,
        }
    }
}

impl ViewFilter {
    pub fn show_rejected(&self) -> bool {
        self.show_rejected
    }

    pub fn toggle_rejected(&mut self) {
        self.show_rejected = !self.show_rejected;
    }

    pub fn is_visible(&self, decisions: &Decisions, index: usize) -> bool {
        self.show_rejected || decisions.state(index) != CullState::Reject
    }

    /// Number of photos in the visible sequence.
    pub fn visible_len(&self, decisions: &Decisions) -> usize {
        let counts = decisions.counts();
        if self.show_rejected {
            counts.total()
        } else {
            counts.total() - counts.reject
        }
    }

    /// Full index of the `visible`-th visible photo.
    pub fn to_full(&self, decisions: &Decisions, visible: usize) -> Option<usize> {
        (0..decisions.states().len())
            .filter(|&i| self.is_visible(decisions, i))
            .nth(visible)
    }

    /// Visible index of the photo at `full`. When that photo is hidden the
    /// translation falls back to the nearest subsequent visible photo,
    /// wrapping to the first one; `None` only when nothing is visible.
    pub fn to_visible(&self, decisions: &Decisions, full: usize) -> Option<usize> {
        if decisions.states().is_empty() {
            return None;
        }
        let target = if self.is_visible(decisions, full) {
            full
        } else {
            self.next_visible_after(decisions, full)?
        };
        Some(
            (0..target)
                .filter(|&i| self.is_visible(decisions, i))
                .count(),
        )
    }

    /// First visible photo strictly after `full`, wrapping the sequence
    /// once; `full` itself is the final candidate. `None` when nothing is
    /// visible at all.
    pub fn next_visible_after(&self, decisions: &Decisions, full: usize) -> Option<usize> {
        self.scan_visible(decisions, full, 1)
    }

    /// First visible photo strictly before `full`, wrapping the sequence
    /// once; `full` itself is the final candidate.
    pub fn prev_visible_before(&self, decisions: &Decisions, full: usize) -> Option<usize> {
        self.scan_visible(decisions, full, -1)
    }

    fn scan_visible(&self, decisions: &Decisions, full: usize, step: isize) -> Option<usize> {
        let len = decisions.states().len();
        if len == 0 {
            return None;
        }
        for k in 1..=len {
            let idx = wrap_index(full as isize + step * k as isize, len);
            if self.is_visible(decisions, idx) {
                return Some(idx);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cull::catalog::tests::catalog_with_groups;

    /// Five photos with photo 1 and photo 4 rejected.
    fn rejected_1_and_4() -> Decisions {
        let catalog = catalog_with_groups(&[5]);
        let mut decisions = Decisions::new(vec![CullState::Undecided; 5]);
        decisions.mark(&catalog, 1, CullState::Reject);
        decisions.mark(&catalog, 4, CullState::Reject);
        decisions
    }

    #[test]
    fn test_unfiltered_translation_is_identity() {
        let decisions = rejected_1_and_4();
        let filter = ViewFilter::default();
        assert!(filter.show_rejected());
        assert_eq!(filter.visible_len(&decisions), 5);
        for i in 0..5 {
            assert_eq!(filter.to_visible(&decisions, i), Some(i));
            assert_eq!(filter.to_full(&decisions, i), Some(i));
        }
    }

    #[test]
    fn test_filtered_sequence_skips_rejects() {
        let decisions = rejected_1_and_4();
        let mut filter = ViewFilter::default();
        filter.toggle_rejected();

        assert_eq!(filter.visible_len(&decisions), 3);
        assert_eq!(filter.to_full(&decisions, 0), Some(0));
        assert_eq!(filter.to_full(&decisions, 1), Some(2));
        assert_eq!(filter.to_full(&decisions, 2), Some(3));
        assert_eq!(filter.to_full(&decisions, 3), None);
    }

    #[test]
    fn test_hidden_photo_falls_forward_to_next_visible() {
        let decisions = rejected_1_and_4();
        let mut filter = ViewFilter::default();
        filter.toggle_rejected();

        // Photo 1 is hidden; its translation lands on photo 2.
        assert_eq!(filter.to_visible(&decisions, 1), Some(1));
        assert_eq!(filter.to_full(&decisions, 1), Some(2));
    }

    #[test]
    fn test_hidden_photo_at_end_wraps_to_first_visible() {
        let decisions = rejected_1_and_4();
        let mut filter = ViewFilter::default();
        filter.toggle_rejected();

        // Photo 4 is hidden and nothing visible follows it.
        assert_eq!(filter.to_visible(&decisions, 4), Some(0));
    }

    #[test]
    fn test_all_rejected_yields_none() {
        let catalog = catalog_with_groups(&[3]);
        let mut decisions = Decisions::new(vec![CullState::Undecided; 3]);
        for i in 0..3 {
            decisions.mark(&catalog, i, CullState::Reject);
        }
        let mut filter = ViewFilter::default();
        filter.toggle_rejected();

        assert_eq!(filter.visible_len(&decisions), 0);
        assert_eq!(filter.to_visible(&decisions, 1), None);
        assert_eq!(filter.to_full(&decisions, 0), None);
        assert_eq!(filter.next_visible_after(&decisions, 0), None);
    }

    #[test]
    fn test_visible_scans_wrap_once() {
        let decisions = rejected_1_and_4();
        let mut filter = ViewFilter::default();
        filter.toggle_rejected();

        assert_eq!(filter.next_visible_after(&decisions, 0), Some(2));
        assert_eq!(filter.next_visible_after(&decisions, 3), Some(0));
        assert_eq!(filter.prev_visible_before(&decisions, 0), Some(3));
        assert_eq!(filter.prev_visible_before(&decisions, 2), Some(0));
    }

    #[test]
    fn test_sole_visible_photo_scans_to_itself() {
        let catalog = catalog_with_groups(&[3]);
        let mut decisions = Decisions::new(vec![CullState::Undecided; 3]);
        decisions.mark(&catalog, 0, CullState::Reject);
        decisions.mark(&catalog, 2, CullState::Reject);
        let mut filter = ViewFilter::default();
        filter.toggle_rejected();

        assert_eq!(filter.next_visible_after(&decisions, 1), Some(1));
        assert_eq!(filter.prev_visible_before(&decisions, 1), Some(1));
    }

    #[test]
    fn test_empty_catalog_translations() {
        let decisions = Decisions::default();
        let filter = ViewFilter::default();
        assert_eq!(filter.visible_len(&decisions), 0);
        assert_eq!(filter.to_visible(&decisions, 0), None);
        assert_eq!(filter.to_full(&decisions, 0), None);
    }
}
