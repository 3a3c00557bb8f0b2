//! The bounded thumbnail window.
//!
//! A pure function of catalog, cursor, and bounds: at most `max_visible`
//! photos, grouped, with the cursor's photo always present. The forward
//! pass walks the cursor's group and everything after it, slicing the
//! cursor's group so up to `look_behind` earlier shots stay visible; a
//! second pass back-fills with groups before the window start, in catalog
//! order, while budget remains.

use std::ops::Range;

use super::catalog::Catalog;

/// Window sizing, normally taken from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    /// Hard cap on photos shown at once.
    pub max_visible: usize,
    /// How many photos before the cursor stay visible within its group.
    pub look_behind: usize,
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            max_visible: 25,
            look_behind: 10,
        }
    }
}

/// A contiguous run of photos from one group, in flat indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSlice {
    pub group_index: usize,
    pub range: Range<usize>,
}

impl GroupSlice {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn contains(&self, flat_index: usize) -> bool {
        self.range.contains(&flat_index)
    }
}

/// Compute the thumbnail window for a cursor position. Deterministic for
/// identical inputs; total photo count never exceeds
/// `min(max_visible, catalog.len())`.
pub fn visible_window(catalog: &Catalog, cursor: usize, bounds: WindowBounds) -> Vec<GroupSlice> {
    let mut slices = Vec::new();
    if catalog.is_empty() {
        return slices;
    }
    let mut budget = bounds.max_visible.min(catalog.len());

    add_groups(catalog, cursor, bounds.look_behind, false, &mut budget, &mut slices);
    if budget > 0 {
        add_groups(catalog, cursor, bounds.look_behind, true, &mut budget, &mut slices);
    }
    slices
}

/// One pass over the groups. `fill = false` takes the cursor's group and
/// everything after it; `fill = true` takes the groups before it.
fn add_groups(
    catalog: &Catalog,
    cursor: usize,
    look_behind: usize,
    fill: bool,
    budget: &mut usize,
    slices: &mut Vec<GroupSlice>,
) {
    for group_index in 0..catalog.group_count() {
        let span = catalog.group_span(group_index);
        let offset = cursor as isize - span.start as isize;
        let in_group_or_after = offset < span.len() as isize;

        if (!fill && in_group_or_after) || (fill && !in_group_or_after) {
            // Only the first slice (the cursor's group) is trimmed from the
            // front; everything else starts at its group boundary. The trim
            // never reaches further back than the budget allows, so the
            // cursor itself always fits in the first slice.
            let slice_from = if slices.is_empty() {
                let behind = look_behind.min(budget.saturating_sub(1));
                (offset - behind as isize).max(0) as usize
            } else {
                0
            };
            let start = (span.start + slice_from).min(span.end);
            let end = span.end.min(start + *budget);
            if start < end {
                *budget -= end - start;
                slices.push(GroupSlice {
                    group_index,
                    range: start..end,
                });
            }
        }

        if *budget == 0 {
            break;
        }
    }
}
