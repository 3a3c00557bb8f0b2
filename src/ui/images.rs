//! Async preview loading and terminal graphics caching.
//!
//! Decodes run on worker threads and finished images come back over a
//! channel, so a slow file never stalls the draw loop. The app keeps one
//! cache per pane size; re-using a protocol across panes of different
//! sizes would re-encode it every frame.

use image::{imageops::FilterType, DynamicImage};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::config::ImageProtocol;

pub struct PreviewCache {
    picker: Option<Picker>,
    max_edge: u32,
    cache: HashMap<PathBuf, StatefulProtocol>,
    loading: HashSet<PathBuf>,
    receiver: mpsc::Receiver<(PathBuf, DynamicImage)>,
    sender: mpsc::Sender<(PathBuf, DynamicImage)>,
}

impl PreviewCache {
    pub fn new(protocol: ImageProtocol, enabled: bool, max_edge: u32) -> Self {
        let picker = if enabled {
            create_picker(protocol)
        } else {
            None
        };
        let (sender, receiver) = mpsc::channel();
        Self {
            picker,
            max_edge,
            cache: HashMap::new(),
            loading: HashSet::new(),
            receiver,
            sender,
        }
    }

    /// Whether the terminal supports inline graphics at all.
    pub fn is_available(&self) -> bool {
        self.picker.is_some()
    }

    /// Drain finished decodes. Call once per frame, before rendering.
    pub fn poll_async_loads(&mut self) {
        while let Ok((path, image)) = self.receiver.try_recv() {
            self.loading.remove(&path);
            if let Some(ref mut picker) = self.picker {
                let protocol = picker.new_resize_protocol(image);
                self.cache.insert(path, protocol);
            }
        }
    }

    /// Cached render protocol for a path, kicking off a background decode
    /// on the first request.
    pub fn protocol(&mut self, path: &Path) -> Option<&mut StatefulProtocol> {
        if self.cache.contains_key(path) {
            return self.cache.get_mut(path);
        }

        if self.picker.is_some() && !self.loading.contains(path) {
            self.loading.insert(path.to_path_buf());
            let path = path.to_path_buf();
            let sender = self.sender.clone();
            let max_edge = self.max_edge;

            std::thread::spawn(move || match image::open(&path) {
                Ok(img) => {
                    let img = if img.width() > max_edge || img.height() > max_edge {
                        img.resize(max_edge, max_edge, FilterType::Triangle)
                    } else {
                        img
                    };
                    let _ = sender.send((path, img));
                }
                Err(e) => {
                    // Usually a preview that has not been generated yet.
                    tracing::debug!(path = %path.display(), error = %e, "Preview decode failed");
                }
            });
        }

        None
    }

    pub fn is_loading(&self, path: &Path) -> bool {
        self.loading.contains(path)
    }

    /// Drop everything, e.g. when the catalog changes.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.loading.clear();
    }

    /// Forget one path so the next request decodes it again. Used when a
    /// preview finishes generating after a failed load attempt.
    pub fn invalidate(&mut self, path: &Path) {
        self.cache.remove(path);
        self.loading.remove(path);
    }
}

fn create_picker(protocol: ImageProtocol) -> Option<Picker> {
    match protocol {
        ImageProtocol::None => None,
        _ => Picker::from_query_stdio().ok(),
    }
}
