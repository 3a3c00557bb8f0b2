//! Trash handling for rejected photos.
//!
//! Rejects are moved, never deleted: everything lands in a flat trash
//! directory under a unique timestamped name, so a botched cull can always
//! be recovered by hand.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::TrashConfig;

pub struct TrashManager {
    path: PathBuf,
}

impl TrashManager {
    pub fn new(config: &TrashConfig) -> Self {
        Self {
            path: config.path.clone(),
        }
    }

    fn ensure_trash_dir(&self) -> Result<()> {
        if !self.path.exists() {
            fs::create_dir_all(&self.path).context("Failed to create trash directory")?;
        }
        Ok(())
    }

    /// Unique target name: original stem, timestamp, and a process-wide
    /// counter, so parallel moves within the same second cannot collide.
    fn trash_name(&self, original: &Path) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let timestamp = Utc::now().timestamp();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let stem = original
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        let extension = original
            .extension()
            .map(|s| format!(".{}", s.to_string_lossy()))
            .unwrap_or_default();

        self.path.join(format!("{stem}_{timestamp}_{seq}{extension}"))
    }

    /// Move a file into the trash: rename when possible, copy + delete
    /// across filesystems. Returns the file's new location.
    pub fn move_to_trash(&self, path: &Path) -> Result<PathBuf> {
        self.ensure_trash_dir()?;
        let trash_path = self.trash_name(path);

        match fs::rename(path, &trash_path) {
            Ok(()) => Ok(trash_path),
            Err(_) => {
                fs::copy(path, &trash_path).context("Failed to copy file to trash")?;
                fs::remove_file(path)
                    .context("Failed to remove original after copying to trash")?;
                Ok(trash_path)
            }
        }
    }

    pub fn trash_path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager(dir: &Path) -> TrashManager {
        TrashManager::new(&TrashConfig {
            path: dir.join("trash"),
        })
    }

    #[test]
    fn test_move_to_trash() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        let source = dir.path().join("IMG_0001.arw");
        fs::write(&source, b"raw bytes").unwrap();

        let trashed = manager.move_to_trash(&source).unwrap();
        assert!(!source.exists());
        assert!(trashed.exists());
        assert!(trashed.starts_with(manager.trash_path()));
        assert!(trashed
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("IMG_0001_"));
    }

    #[test]
    fn test_repeated_names_do_not_collide() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        let mut trashed = Vec::new();
        for _ in 0..3 {
            let source = dir.path().join("IMG_0001.arw");
            fs::write(&source, b"raw bytes").unwrap();
            trashed.push(manager.move_to_trash(&source).unwrap());
        }

        trashed.sort();
        trashed.dedup();
        assert_eq!(trashed.len(), 3);
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        assert!(manager.move_to_trash(&dir.path().join("gone.arw")).is_err());
    }
}
