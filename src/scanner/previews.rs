//! Preview generation.
//!
//! Culling flips through previews, not the RAW files themselves. Each photo
//! gets a resized JPEG under `_cull/`, generated in parallel once per
//! session. RAW formats the decoder cannot read fall back to a same-stem
//! camera JPEG when one sits next to them; otherwise the photo simply has
//! no preview and the UI shows a placeholder.

use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;

use crate::cull::Photo;

/// Updates emitted while a batch of previews is generated. `Generated`
/// names the finished preview so the UI can retry a load it gave up on.
#[derive(Debug, Clone)]
pub enum PreviewProgress {
    Generated {
        path: PathBuf,
        done: usize,
        total: usize,
    },
    Completed {
        generated: usize,
        failed: usize,
    },
}

/// Generate every missing preview for the given photos, in parallel, and
/// report progress over the channel. Send failures are ignored: if the
/// receiver is gone the session was closed and nobody cares anymore.
pub fn generate_previews(photos: Vec<Photo>, max_edge: u32, progress: Sender<PreviewProgress>) {
    let pending: Vec<&Photo> = photos.iter().filter(|p| !p.preview_path.exists()).collect();
    let total = pending.len();
    if total == 0 {
        let _ = progress.send(PreviewProgress::Completed {
            generated: 0,
            failed: 0,
        });
        return;
    }

    let done = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    pending.par_iter().for_each(|photo| match generate_one(photo, max_edge) {
        Ok(()) => {
            let d = done.fetch_add(1, Ordering::SeqCst) + 1;
            let _ = progress.send(PreviewProgress::Generated {
                path: photo.preview_path.clone(),
                done: d,
                total,
            });
        }
        Err(e) => {
            failed.fetch_add(1, Ordering::SeqCst);
            tracing::warn!(path = %photo.path.display(), error = %e, "Failed to generate preview");
        }
    });

    let _ = progress.send(PreviewProgress::Completed {
        generated: done.load(Ordering::SeqCst),
        failed: failed.load(Ordering::SeqCst),
    });
}

fn generate_one(photo: &Photo, max_edge: u32) -> Result<()> {
    if let Some(dir) = photo.preview_path.parent() {
        fs::create_dir_all(dir)?;
    }

    let source = decode_source(photo)?;
    let preview = if source.width().max(source.height()) > max_edge {
        source.resize(max_edge, max_edge, FilterType::Triangle)
    } else {
        source
    };

    // JPEG previews: small and fast to load back.
    preview.to_rgb8().save(&photo.preview_path)?;
    Ok(())
}

fn decode_source(photo: &Photo) -> Result<DynamicImage> {
    match image::open(&photo.path) {
        Ok(img) => Ok(img),
        Err(raw_err) => {
            if let Some(sibling) = jpeg_sibling(&photo.path) {
                return Ok(image::open(sibling)?);
            }
            Err(raw_err.into())
        }
    }
}

/// Camera-produced JPEG next to a RAW file, if any.
fn jpeg_sibling(path: &Path) -> Option<PathBuf> {
    for ext in ["jpg", "JPG", "jpeg", "JPEG"] {
        let candidate = path.with_extension(ext);
        if candidate != path && candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use image::{ImageBuffer, Rgb};
    use std::sync::mpsc::channel;
    use tempfile::tempdir;

    fn write_png(path: &Path, side: u32) {
        ImageBuffer::from_pixel(side, side, Rgb::<u8>([120, 80, 40]))
            .save(path)
            .unwrap();
    }

    fn photo_in(dir: &Path, file: &str) -> Photo {
        Photo {
            path: dir.join(file),
            preview_path: super::super::discovery::preview_path_for(&dir.join(file)).unwrap(),
            captured: Utc::now(),
        }
    }

    fn run(photos: Vec<Photo>, max_edge: u32) -> (usize, usize) {
        let (tx, rx) = channel();
        generate_previews(photos, max_edge, tx);
        let mut result = (0, 0);
        while let Ok(update) = rx.try_recv() {
            if let PreviewProgress::Completed { generated, failed } = update {
                result = (generated, failed);
            }
        }
        result
    }

    #[test]
    fn test_generates_resized_previews() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 64);
        let photo = photo_in(dir.path(), "a.png");

        let (generated, failed) = run(vec![photo.clone()], 32);
        assert_eq!((generated, failed), (1, 0));
        assert!(photo.preview_path.exists());

        let preview = image::open(&photo.preview_path).unwrap();
        assert_eq!(preview.width().max(preview.height()), 32);
    }

    #[test]
    fn test_existing_previews_are_skipped() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 16);
        let photo = photo_in(dir.path(), "a.png");

        assert_eq!(run(vec![photo.clone()], 32), (1, 0));
        assert_eq!(run(vec![photo], 32), (0, 0));
    }

    #[test]
    fn test_progress_reports_each_generated_path() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 16);
        write_png(&dir.path().join("b.png"), 16);
        let photos = vec![photo_in(dir.path(), "a.png"), photo_in(dir.path(), "b.png")];
        let previews: Vec<PathBuf> = photos.iter().map(|p| p.preview_path.clone()).collect();

        let (tx, rx) = channel();
        generate_previews(photos, 32, tx);

        let mut reported = Vec::new();
        while let Ok(update) = rx.try_recv() {
            if let PreviewProgress::Generated { path, .. } = update {
                reported.push(path);
            }
        }
        reported.sort();
        assert_eq!(reported, previews);
    }

    #[test]
    fn test_raw_falls_back_to_jpeg_sibling() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.arw"), b"not an image").unwrap();
        write_png(&dir.path().join("b.jpeg"), 16);
        let photo = photo_in(dir.path(), "b.arw");

        assert_eq!(run(vec![photo.clone()], 32), (1, 0));
        assert!(photo.preview_path.exists());
    }

    #[test]
    fn test_undecodable_photo_counts_as_failed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c.arw"), b"not an image").unwrap();
        let photo = photo_in(dir.path(), "c.arw");

        assert_eq!(run(vec![photo.clone()], 32), (0, 1));
        assert!(!photo.preview_path.exists());
    }
}
