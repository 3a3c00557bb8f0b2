//! Photo discovery for a culling directory.
//!
//! Enumeration is non-recursive: a culling directory is one shoot, dumped
//! flat from a card. RAW files are preferred; when the directory holds no
//! RAWs at all, the fallback extensions (camera JPEGs and friends) are
//! used instead. Photos come back sorted by capture time.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::cull::Photo;

/// Directory holding generated previews and their sidecars, inside the
/// culling directory.
pub const PREVIEW_DIR: &str = "_cull";

/// Preview location for a source file: `<dir>/_cull/<stem>.jpg`.
pub fn preview_path_for(path: &Path) -> Option<PathBuf> {
    let mut preview = path.with_extension("jpg");
    let filename = preview.file_name()?.to_owned();
    preview.pop();
    preview.push(PREVIEW_DIR);
    preview.push(filename);
    Some(preview)
}

/// Find the photos to cull, in capture order (path breaks ties).
pub fn discover_photos(directory: &Path, scan: &ScanConfig) -> Vec<Photo> {
    let mut photos = collect_with_extensions(directory, &scan.raw_extensions);
    if photos.is_empty() {
        photos = collect_with_extensions(directory, &scan.fallback_extensions);
    }

    photos.sort_by(|a, b| {
        a.captured
            .cmp(&b.captured)
            .then_with(|| a.path.cmp(&b.path))
    });
    photos
}

fn collect_with_extensions(directory: &Path, extensions: &[String]) -> Vec<Photo> {
    let mut photos = Vec::new();

    for entry in WalkDir::new(directory)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension() else {
            continue;
        };
        let ext_lower = ext.to_string_lossy().to_lowercase();
        if !extensions.iter().any(|e| e.to_lowercase() == ext_lower) {
            continue;
        }

        let Some(preview_path) = preview_path_for(path) else {
            continue;
        };
        let Some(captured) = capture_time(path) else {
            continue;
        };
        photos.push(Photo {
            path: path.to_path_buf(),
            preview_path,
            captured,
        });
    }

    photos
}

/// Capture time for a file: EXIF `DateTimeOriginal` when readable,
/// otherwise the earlier of the filesystem created and modified times.
fn capture_time(path: &Path) -> Option<DateTime<Utc>> {
    if let Some(t) = exif_capture_time(path) {
        return Some(t);
    }

    let meta = std::fs::metadata(path).ok()?;
    let modified = meta.modified().ok()?;
    let created = meta.created().unwrap_or(modified);
    Some(DateTime::<Utc>::from(created.min(modified)))
}

fn exif_capture_time(path: &Path) -> Option<DateTime<Utc>> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader).ok()?;
    let field = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)?;
    let raw = field.display_value().to_string();

    // EXIF datetimes look like "2024:06:01 14:03:22"
    let naive =
        chrono::NaiveDateTime::parse_from_str(raw.trim_matches('"'), "%Y:%m:%d %H:%M:%S").ok()?;
    Some(naive.and_utc())
}
