//! Burst grouping.
//!
//! Photos shot in rapid succession get culled together, so the flat
//! capture-ordered sequence is split into groups wherever the gap between
//! consecutive capture times exceeds the configured threshold.

use chrono::{DateTime, Duration, Utc};

use crate::cull::Photo;

/// Split a capture-ordered photo sequence into burst groups. A new group
/// starts when the gap to the previous photo is larger than `max_gap`.
pub fn group_by_burst(photos: Vec<Photo>, max_gap: Duration) -> Vec<Vec<Photo>> {
    let mut groups: Vec<Vec<Photo>> = Vec::new();
    let mut prev: Option<DateTime<Utc>> = None;

    for photo in photos {
        let start_new = match prev {
            Some(t) => photo.captured - t > max_gap,
            None => true,
        };
        if start_new {
            groups.push(Vec::new());
        }
        prev = Some(photo.captured);
        if let Some(group) = groups.last_mut() {
            group.push(photo);
        }
    }

    groups
}
