//! A culling session: one catalog plus all of its view state.
//!
//! The session owns the decision store, cursor, rejected-photo filter, and
//! completion gate for a loaded catalog, and exposes the commands the app
//! layer drives. Movement always goes through the filter so wraparound and
//! group jumps respect the visible sequence; classification returns the
//! change batches the sync queue persists.

use super::catalog::{Catalog, Photo, PhotoLocation};
use super::cursor::{Cursor, Direction};
use super::filter::ViewFilter;
use super::gate::CompletionGate;
use super::state::{CullState, DecisionChange, Decisions, StateCounts};
use super::window::{visible_window, GroupSlice, WindowBounds};

#[derive(Debug)]
pub struct CullSession {
    catalog: Catalog,
    decisions: Decisions,
    cursor: Cursor,
    filter: ViewFilter,
    gate: CompletionGate,
}

impl CullSession {
    /// Open a session over a loaded catalog and its preloaded sidecar
    /// states. The cursor starts on the first undecided photo, or 0 when
    /// everything is already resolved.
    pub fn new(catalog: Catalog, initial: Vec<CullState>) -> Self {
        let decisions = Decisions::new(initial);
        let start = decisions
            .states()
            .iter()
            .position(|s| *s == CullState::Undecided)
            .unwrap_or(0);
        Self {
            catalog,
            decisions,
            cursor: Cursor::at(start),
            filter: ViewFilter::default(),
            gate: CompletionGate::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn counts(&self) -> StateCounts {
        self.decisions.counts()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn current_photo(&self) -> Option<&Photo> {
        if self.catalog.is_empty() {
            None
        } else {
            Some(self.catalog.photo(self.cursor.get()))
        }
    }

    pub fn current_location(&self) -> Option<PhotoLocation> {
        if self.catalog.is_empty() {
            None
        } else {
            Some(self.catalog.location(self.cursor.get()))
        }
    }

    pub fn state_of(&self, index: usize) -> CullState {
        self.decisions.state(index)
    }

    /// All decisions in flat order, for snapshotting at commit time.
    pub fn states(&self) -> &[CullState] {
        self.decisions.states()
    }

    pub fn show_rejected(&self) -> bool {
        self.filter.show_rejected()
    }

    pub fn toggle_show_rejected(&mut self) {
        self.filter.toggle_rejected();
        if !self.filter.show_rejected() {
            // Do not leave the cursor parked on a photo the filter hides.
            self.move_by(0);
        }
    }

    /// Whether every photo is resolved.
    pub fn finished(&self) -> bool {
        CompletionGate::finished(self.decisions.counts())
    }

    /// Cursor position and length in the visible sequence, 1-based for
    /// display. `None` when nothing is visible.
    pub fn visible_position(&self) -> Option<(usize, usize)> {
        let vis = self.filter.to_visible(&self.decisions, self.cursor.get())?;
        Some((vis + 1, self.filter.visible_len(&self.decisions)))
    }

    /// Visible-space neighbor of the cursor. `None` at the boundary of the
    /// visible sequence (the UI shows an end marker there instead).
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        let vis = self.filter.to_visible(&self.decisions, self.cursor.get())?;
        let len = self.filter.visible_len(&self.decisions);
        match direction {
            Direction::Forward if vis + 1 < len => self.filter.to_full(&self.decisions, vis + 1),
            Direction::Backward if vis > 0 => self.filter.to_full(&self.decisions, vis - 1),
            _ => None,
        }
    }

    /// Move by a signed offset in visible-index space, wrapping.
    pub fn move_by(&mut self, offset: isize) {
        if self.catalog.is_empty() {
            return;
        }
        if self.filter.show_rejected() {
            self.cursor.advance(&self.catalog, offset);
            return;
        }
        let Some(vis) = self.filter.to_visible(&self.decisions, self.cursor.get()) else {
            return;
        };
        let vis_len = self.filter.visible_len(&self.decisions);
        let target = super::cursor::wrap_index(vis as isize + offset, vis_len);
        if let Some(full) = self.filter.to_full(&self.decisions, target) {
            self.cursor.set(full);
        }
    }

    /// Jump to the first visible photo past the current group's end
    /// (forward) or before its start (backward), wrapping. Skips entire
    /// groups that the filter hides.
    pub fn move_by_group(&mut self, direction: Direction) {
        if self.catalog.is_empty() {
            return;
        }
        let loc = self.catalog.location(self.cursor.get());
        let next = match direction {
            Direction::Forward => self.filter.next_visible_after(&self.decisions, loc.group_end),
            Direction::Backward => self.filter.prev_visible_before(&self.decisions, loc.group_start),
        };
        if let Some(idx) = next {
            self.cursor.set(idx);
        }
    }

    /// Jump to the nearest undecided photo (undecided photos are never
    /// hidden, so this is filter-safe).
    pub fn seek_undecided(&mut self, direction: Direction) {
        self.cursor
            .seek_undecided(&self.catalog, &self.decisions, direction);
    }

    /// Classify the current photo. Returns the changes to persist.
    pub fn mark(&mut self, state: CullState) -> Vec<DecisionChange> {
        if self.catalog.is_empty() {
            return Vec::new();
        }
        self.decisions.mark(&self.catalog, self.cursor.get(), state)
    }

    /// Classify the current photo and reject its still-undecided
    /// groupmates. Returns the changes to persist.
    pub fn mark_burst(&mut self, state: CullState) -> Vec<DecisionChange> {
        if self.catalog.is_empty() {
            return Vec::new();
        }
        self.decisions
            .mark_burst(&self.catalog, self.cursor.get(), state)
    }

    /// Check the gate after a classification. True exactly once per
    /// session, at the moment the last undecided photo resolves.
    pub fn poll_gate(&mut self) -> bool {
        self.gate.observe(self.decisions.counts())
    }

    /// Thumbnail window for the current cursor position.
    pub fn window(&self, bounds: WindowBounds) -> Vec<GroupSlice> {
        visible_window(&self.catalog, self.cursor.get(), bounds)
    }
}
