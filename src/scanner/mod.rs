pub mod discovery;
pub mod grouping;
pub mod previews;

use chrono::Duration;
use std::path::Path;
use thiserror::Error;

use crate::config::ScanConfig;
use crate::cull::{Catalog, CullState};
use crate::sidecar;

pub use discovery::{discover_photos, preview_path_for, PREVIEW_DIR};
pub use grouping::group_by_burst;
pub use previews::{generate_previews, PreviewProgress};

/// User-meaningful failures when opening a culling directory.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("'{0}' does not exist")]
    DoesNotExist(String),
    #[error("'{0}' is not a directory")]
    NotADirectory(String),
    #[error("no photos found in '{0}'")]
    NoPhotos(String),
}

/// Everything a new culling session needs from disk.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub initial_states: Vec<CullState>,
}

/// Open a culling directory: discover its photos, split them into burst
/// groups, and preload each photo's sidecar state.
pub fn open_culling_dir(path: &Path, scan: &ScanConfig) -> Result<LoadedCatalog, OpenError> {
    let shown = path.display().to_string();
    if !path.exists() {
        return Err(OpenError::DoesNotExist(shown));
    }
    if !path.is_dir() {
        return Err(OpenError::NotADirectory(shown));
    }

    let photos = discover_photos(path, scan);
    if photos.is_empty() {
        return Err(OpenError::NoPhotos(shown));
    }

    let grouped = group_by_burst(photos, Duration::seconds(scan.burst_gap_secs));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| shown.clone());
    let catalog = Catalog::from_groups(name, path.to_path_buf(), grouped);

    let initial_states = catalog
        .photos()
        .iter()
        .map(|p| sidecar::read_meta_or_default(&sidecar::meta_path(&p.preview_path)).state)
        .collect();

    Ok(LoadedCatalog {
        catalog,
        initial_states,
    })
}
