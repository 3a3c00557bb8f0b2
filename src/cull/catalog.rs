//! The photo catalog for a culling session.
//!
//! Photos are stored exactly once, in flat presentation order; burst groups
//! are index spans over that sequence. A catalog never changes after load.
//! All mutable per-photo culling state lives in the decisions store, keyed
//! by flat index.

use chrono::{DateTime, Utc};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// A single photograph in a culling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// The original file on disk (RAW, or a fallback format).
    pub path: PathBuf,
    /// The derived preview image. This path is also the photo's stable
    /// identity for sidecar persistence and the preview service.
    pub preview_path: PathBuf,
    /// Capture time: EXIF when available, filesystem times otherwise.
    pub captured: DateTime<Utc>,
}

/// Where a photo sits in the flat sequence and within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoLocation {
    pub flat_index: usize,
    pub group_index: usize,
    /// First flat index of the photo's group.
    pub group_start: usize,
    /// Last flat index of the photo's group (inclusive).
    pub group_end: usize,
}

/// An immutable, grouped photo sequence.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    name: String,
    root: PathBuf,
    photos: Vec<Photo>,
    /// One span per group; spans cover `photos` without gaps or overlap.
    groups: Vec<Range<usize>>,
    locations: Vec<PhotoLocation>,
}

impl Catalog {
    /// Build a catalog from pre-grouped photos. Empty groups are dropped so
    /// every surviving group holds at least one photo.
    pub fn from_groups(name: impl Into<String>, root: PathBuf, grouped: Vec<Vec<Photo>>) -> Self {
        let mut photos: Vec<Photo> = Vec::new();
        let mut groups: Vec<Range<usize>> = Vec::new();

        for group in grouped {
            if group.is_empty() {
                continue;
            }
            let start = photos.len();
            photos.extend(group);
            groups.push(start..photos.len());
        }

        let mut locations = Vec::with_capacity(photos.len());
        for (group_index, span) in groups.iter().enumerate() {
            for flat_index in span.clone() {
                locations.push(PhotoLocation {
                    flat_index,
                    group_index,
                    group_start: span.start,
                    group_end: span.end - 1,
                });
            }
        }

        Self {
            name: name.into(),
            root,
            photos,
            groups,
            locations,
        }
    }

    /// Display name of the session (the culling directory's name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The culling directory the photos were loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// All photos in flat presentation order.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Photo at a flat index. Panics when out of range, like slice indexing.
    pub fn photo(&self, index: usize) -> &Photo {
        &self.photos[index]
    }

    /// Location of the photo at a flat index. Panics when out of range.
    pub fn location(&self, index: usize) -> PhotoLocation {
        self.locations[index]
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Flat-index span of a group. Panics when the group index is out of
    /// range.
    pub fn group_span(&self, group_index: usize) -> Range<usize> {
        self.groups[group_index].clone()
    }

    /// Earliest capture time across the catalog, if any photos exist.
    pub fn earliest_capture(&self) -> Option<DateTime<Utc>> {
        self.photos.iter().map(|p| p.captured).min()
    }
}
