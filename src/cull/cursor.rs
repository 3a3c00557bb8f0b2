//! Cursor movement over the flat photo sequence.
//!
//! All movement wraps with true modulo arithmetic, so negative offsets land
//! back inside `[0, len)` instead of going negative. Group jumps anchor on
//! the current group's boundary photo before stepping, which makes forward
//! jumps land on the next group's first photo and backward jumps on the
//! previous group's last photo.

use super::catalog::Catalog;
use super::state::{CullState, Decisions};

/// Scan direction for undecided-photo seeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// True-modulo index wrap. Returns 0 when `len` is 0.
pub fn wrap_index(index: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    (((index % len) + len) % len) as usize
}

/// Position within the flat photo sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pos: usize,
}

impl Cursor {
    pub fn at(pos: usize) -> Self {
        Self { pos }
    }

    pub fn get(&self) -> usize {
        self.pos
    }

    pub fn set(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Move by a signed offset with wraparound. No-op on an empty catalog.
    pub fn advance(&mut self, catalog: &Catalog, offset: isize) {
        if catalog.is_empty() {
            return;
        }
        self.pos = wrap_index(self.pos as isize + offset, catalog.len());
    }

    /// Group jump: anchor at the current group's last photo (forward) or
    /// first photo (backward), then move by `offset` from the anchor.
    pub fn advance_group(&mut self, catalog: &Catalog, offset: isize) {
        if catalog.is_empty() || offset == 0 {
            return;
        }
        let loc = catalog.location(self.pos);
        let anchor = if offset > 0 {
            loc.group_end
        } else {
            loc.group_start
        };
        self.pos = wrap_index(anchor as isize + offset, catalog.len());
    }

    /// Jump to the nearest undecided photo in the given direction, starting
    /// just past the cursor and wrapping the sequence once (the cursor
    /// itself is the final candidate). Falls back to index 0 when nothing
    /// is undecided anywhere.
    pub fn seek_undecided(
        &mut self,
        catalog: &Catalog,
        decisions: &Decisions,
        direction: Direction,
    ) {
        if catalog.is_empty() {
            return;
        }
        let len = catalog.len();
        for k in 1..=len {
            let idx = wrap_index(self.pos as isize + direction.step() * k as isize, len);
            if decisions.state(idx) == CullState::Undecided {
                self.pos = idx;
                return;
            }
        }
        self.pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cull::catalog::tests::catalog_with_groups;

    #[test]
    fn test_wrap_index_true_modulo() {
        assert_eq!(wrap_index(-1, 5), 4);
        assert_eq!(wrap_index(-7, 5), 3);
        assert_eq!(wrap_index(5, 5), 0);
        assert_eq!(wrap_index(12, 5), 2);
        assert_eq!(wrap_index(0, 5), 0);
        assert_eq!(wrap_index(-3, 0), 0);
    }

    #[test]
    fn test_advance_wraps_both_ways() {
        let catalog = catalog_with_groups(&[5]);
        let mut cursor = Cursor::at(0);

        cursor.advance(&catalog, -1);
        assert_eq!(cursor.get(), 4);
        cursor.advance(&catalog, 1);
        assert_eq!(cursor.get(), 0);
        cursor.advance(&catalog, 7);
        assert_eq!(cursor.get(), 2);
    }

    #[test]
    fn test_advance_round_trips() {
        let catalog = catalog_with_groups(&[4, 3]);
        for start in 0..catalog.len() {
            for offset in [-11isize, -3, -1, 1, 2, 9] {
                let mut cursor = Cursor::at(start);
                cursor.advance(&catalog, offset);
                cursor.advance(&catalog, -offset);
                assert_eq!(cursor.get(), start);
            }
        }
    }

    #[test]
    fn test_advance_on_empty_catalog_is_noop() {
        let catalog = catalog_with_groups(&[]);
        let mut cursor = Cursor::default();
        cursor.advance(&catalog, 3);
        cursor.advance_group(&catalog, 1);
        assert_eq!(cursor.get(), 0);
    }

    #[test]
    fn test_group_jump_lands_on_group_boundaries() {
        // Groups: [0..3), [3..5), [5..9)
        let catalog = catalog_with_groups(&[3, 2, 4]);

        let mut cursor = Cursor::at(1);
        cursor.advance_group(&catalog, 1);
        assert_eq!(cursor.get(), 3, "forward lands on next group's first");

        cursor.advance_group(&catalog, 1);
        assert_eq!(cursor.get(), 5);

        let mut cursor = Cursor::at(7);
        cursor.advance_group(&catalog, -1);
        assert_eq!(cursor.get(), 4, "backward lands on previous group's last");

        cursor.advance_group(&catalog, -1);
        assert_eq!(cursor.get(), 2);
    }

    #[test]
    fn test_group_jump_wraps_at_sequence_ends() {
        let catalog = catalog_with_groups(&[3, 2]);

        let mut cursor = Cursor::at(4);
        cursor.advance_group(&catalog, 1);
        assert_eq!(cursor.get(), 0, "forward from last group wraps to start");

        let mut cursor = Cursor::at(1);
        cursor.advance_group(&catalog, -1);
        assert_eq!(cursor.get(), 4, "backward from first group wraps to end");
    }

    #[test]
    fn test_seek_undecided_scans_and_wraps() {
        let catalog = catalog_with_groups(&[5]);
        let mut decisions = Decisions::new(vec![CullState::Undecided; 5]);
        decisions.mark(&catalog, 1, CullState::Keep);
        decisions.mark(&catalog, 2, CullState::Reject);

        let mut cursor = Cursor::at(0);
        cursor.seek_undecided(&catalog, &decisions, Direction::Forward);
        assert_eq!(cursor.get(), 3, "skips resolved photos");

        // Forward from 4 wraps to 0.
        let mut cursor = Cursor::at(4);
        cursor.seek_undecided(&catalog, &decisions, Direction::Forward);
        assert_eq!(cursor.get(), 0);

        // Backward from 0 wraps to 4.
        let mut cursor = Cursor::at(0);
        cursor.seek_undecided(&catalog, &decisions, Direction::Backward);
        assert_eq!(cursor.get(), 4);
    }

    #[test]
    fn test_seek_undecided_stays_when_cursor_is_last_undecided() {
        let catalog = catalog_with_groups(&[3]);
        let mut decisions = Decisions::new(vec![CullState::Undecided; 3]);
        decisions.mark(&catalog, 0, CullState::Keep);
        decisions.mark(&catalog, 2, CullState::Reject);

        let mut cursor = Cursor::at(1);
        cursor.seek_undecided(&catalog, &decisions, Direction::Forward);
        assert_eq!(cursor.get(), 1, "cursor is the only undecided photo");
    }

    #[test]
    fn test_seek_undecided_falls_back_to_zero() {
        let catalog = catalog_with_groups(&[3]);
        let mut decisions = Decisions::new(vec![CullState::Undecided; 3]);
        for i in 0..3 {
            decisions.mark(&catalog, i, CullState::Keep);
        }

        let mut cursor = Cursor::at(2);
        cursor.seek_undecided(&catalog, &decisions, Direction::Forward);
        assert_eq!(cursor.get(), 0);
    }
}
