//! Finalizing a cull.
//!
//! Kept photos move into a dated edit tree
//! (`edit_root/<year>/Q<quarter>/<name>/`), rejected photos go to the
//! trash, and the derived `_cull` directory is removed. The source
//! directory itself is only removed when nothing else is left inside it.

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cull::{Catalog, CullState};
use crate::scanner::PREVIEW_DIR;
use crate::trash::TrashManager;

#[derive(Debug, Clone)]
pub struct CommitSummary {
    pub kept: usize,
    pub rejected: usize,
    pub destination: PathBuf,
}

/// Dated directory a cull with this earliest capture lands under:
/// `edit_root/<year>/Q<quarter>`.
pub fn dated_parent(edit_root: &Path, earliest: chrono::DateTime<chrono::Utc>) -> PathBuf {
    let date = earliest.date_naive();
    edit_root
        .join(date.year().to_string())
        .join(format!("Q{}", date.month0() / 3 + 1))
}

/// Move every decided photo to its destination. Validates up front that
/// the target name is usable and that no photo is still undecided; there
/// is no rollback once moves begin, so validation is all-or-nothing.
pub fn commit_cull(
    catalog: &Catalog,
    states: &[CullState],
    target_name: &str,
    edit_root: &Path,
    trash: &TrashManager,
) -> Result<CommitSummary> {
    let name = target_name.trim();
    if name.is_empty() {
        bail!("Target folder name is empty");
    }
    if catalog.is_empty() {
        bail!("No photos to commit");
    }
    let undecided = states
        .iter()
        .filter(|s| **s == CullState::Undecided)
        .count();
    if undecided > 0 {
        bail!("{undecided} photo(s) still undecided");
    }

    let earliest = catalog
        .earliest_capture()
        .context("No capture dates in catalog")?;
    let destination = dated_parent(edit_root, earliest).join(name);
    fs::create_dir_all(&destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;

    let mut kept = 0;
    let mut rejected = 0;
    for (photo, state) in catalog.photos().iter().zip(states) {
        match state {
            CullState::Undecided => {}
            CullState::Keep => {
                let file_name = photo
                    .path
                    .file_name()
                    .with_context(|| format!("Invalid photo path {}", photo.path.display()))?;
                move_file(&photo.path, &destination.join(file_name))?;
                kept += 1;
            }
            CullState::Reject => {
                trash.move_to_trash(&photo.path)?;
                rejected += 1;
            }
        }
    }

    // Previews and sidecars are derived data; they go with the cull.
    let preview_dir = catalog.root().join(PREVIEW_DIR);
    if preview_dir.exists() {
        fs::remove_dir_all(&preview_dir)
            .with_context(|| format!("Failed to remove {}", preview_dir.display()))?;
    }
    // Non-recursive on purpose: anything unrelated in the directory keeps
    // it alive.
    let _ = fs::remove_dir(catalog.root());

    Ok(CommitSummary {
        kept,
        rejected,
        destination,
    })
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)
                .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
            fs::remove_file(from)
                .with_context(|| format!("Failed to remove {} after copy", from.display()))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrashConfig;
    use crate::cull::Photo;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn photo_at(dir: &Path, file: &str, y: i32, m: u32) -> Photo {
        let path = dir.join(file);
        fs::write(&path, b"image bytes").unwrap();
        Photo {
            preview_path: dir.join(PREVIEW_DIR).join(file).with_extension("jpg"),
            path,
            captured: Utc.with_ymd_and_hms(y, m, 10, 12, 0, 0).unwrap(),
        }
    }

    fn setup(dir: &Path) -> (PathBuf, TrashManager) {
        let edit_root = dir.join("edit");
        let trash = TrashManager::new(&TrashConfig {
            path: dir.join("trash"),
        });
        (edit_root, trash)
    }

    #[test]
    fn test_commit_moves_keeps_and_trashes_rejects() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("shoot");
        fs::create_dir(&source).unwrap();
        let (edit_root, trash) = setup(dir.path());

        let photos = vec![
            photo_at(&source, "a.arw", 2024, 5),
            photo_at(&source, "b.arw", 2024, 5),
            photo_at(&source, "c.arw", 2024, 5),
        ];
        // A leftover preview directory with a sidecar in it.
        fs::create_dir(source.join(PREVIEW_DIR)).unwrap();
        fs::write(source.join(PREVIEW_DIR).join("a.cull.json"), b"{}").unwrap();

        let catalog = Catalog::from_groups("shoot", source.clone(), vec![photos]);
        let states = [CullState::Keep, CullState::Reject, CullState::Keep];

        let summary =
            commit_cull(&catalog, &states, "wedding", &edit_root, &trash).unwrap();

        assert_eq!(summary.kept, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.destination, edit_root.join("2024/Q2/wedding"));
        assert!(summary.destination.join("a.arw").exists());
        assert!(summary.destination.join("c.arw").exists());
        assert!(!summary.destination.join("b.arw").exists());

        // Reject went to trash, derived data is gone, and the emptied
        // source directory went with it.
        assert_eq!(fs::read_dir(trash.trash_path()).unwrap().count(), 1);
        assert!(!source.join(PREVIEW_DIR).exists());
        assert!(!source.exists());
    }

    #[test]
    fn test_unrelated_files_keep_the_source_directory() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("shoot");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("notes.txt"), b"do not lose me").unwrap();
        let (edit_root, trash) = setup(dir.path());

        let photos = vec![photo_at(&source, "a.arw", 2024, 1)];
        let catalog = Catalog::from_groups("shoot", source.clone(), vec![photos]);

        commit_cull(&catalog, &[CullState::Keep], "test", &edit_root, &trash).unwrap();

        assert!(source.exists());
        assert!(source.join("notes.txt").exists());
    }

    #[test]
    fn test_undecided_photos_block_the_commit() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("shoot");
        fs::create_dir(&source).unwrap();
        let (edit_root, trash) = setup(dir.path());

        let photos = vec![
            photo_at(&source, "a.arw", 2024, 5),
            photo_at(&source, "b.arw", 2024, 5),
        ];
        let catalog = Catalog::from_groups("shoot", source.clone(), vec![photos]);
        let states = [CullState::Keep, CullState::Undecided];

        let err = commit_cull(&catalog, &states, "wedding", &edit_root, &trash).unwrap_err();
        assert!(err.to_string().contains("undecided"));
        assert!(source.join("a.arw").exists(), "nothing moved");
    }

    #[test]
    fn test_blank_target_name_is_rejected() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("shoot");
        fs::create_dir(&source).unwrap();
        let (edit_root, trash) = setup(dir.path());

        let photos = vec![photo_at(&source, "a.arw", 2024, 5)];
        let catalog = Catalog::from_groups("shoot", source, vec![photos]);

        assert!(commit_cull(&catalog, &[CullState::Keep], "   ", &edit_root, &trash).is_err());
    }

    #[test]
    fn test_quarter_comes_from_earliest_capture() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("shoot");
        fs::create_dir(&source).unwrap();
        let (edit_root, trash) = setup(dir.path());

        let photos = vec![
            photo_at(&source, "dec.arw", 2023, 12),
            photo_at(&source, "jan.arw", 2024, 1),
        ];
        let catalog = Catalog::from_groups("shoot", source, vec![photos]);
        let states = [CullState::Keep, CullState::Keep];

        let summary = commit_cull(&catalog, &states, "nye", &edit_root, &trash).unwrap();
        assert_eq!(summary.destination, edit_root.join("2023/Q4/nye"));
    }
}
