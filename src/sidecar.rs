//! Per-photo sidecar metadata.
//!
//! Culling state persists as a small JSON file next to the photo's preview
//! (`IMG_0001.jpg` → `IMG_0001.cull.json`), so a half-finished cull
//! survives restarts without any database.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cull::CullState;

pub const META_EXT: &str = "cull.json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CullMeta {
    pub state: CullState,
}

/// Sidecar path for a preview file.
pub fn meta_path(preview_path: &Path) -> PathBuf {
    preview_path.with_extension(META_EXT)
}

/// Read a sidecar, treating a missing or unparseable file as undecided.
pub fn read_meta_or_default(path: &Path) -> CullMeta {
    std::fs::read_to_string(path).map_or_else(
        |_| CullMeta::default(),
        |m| serde_json::from_str(&m).unwrap_or_default(),
    )
}

/// Persist one photo's state, skipping the write when the stored state
/// already matches.
pub async fn write_meta_if_changed(path: &Path, state: CullState) -> Result<()> {
    let current = tokio::fs::read_to_string(path)
        .await
        .ok()
        .and_then(|m| serde_json::from_str::<CullMeta>(&m).ok());
    if current.map(|m| m.state) == Some(state) {
        return Ok(());
    }

    // Classifications can land before preview generation has created
    // `_cull/`; the sidecar must not wait for it.
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create sidecar directory {}", parent.display()))?;
    }

    let meta = CullMeta { state };
    tokio::fs::write(path, serde_json::to_vec_pretty(&meta)?)
        .await
        .with_context(|| format!("Failed to write cull sidecar {}", path.display()))?;
    Ok(())
}
