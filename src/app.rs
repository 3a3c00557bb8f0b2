use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crate::commit::{commit_cull, CommitSummary};
use crate::config::Config;
use crate::cull::{CullSession, CullState, Direction, WindowBounds};
use crate::preview_api::{publish_previews, PreviewRegistry, PreviewServer};
use crate::scanner::{self, OpenError, PreviewProgress};
use crate::sync::SyncQueue;
use crate::trash::TrashManager;
use crate::ui;
use crate::ui::finish_dialog::FinishDialog;
use crate::ui::images::PreviewCache;
use crate::ui::open_dialog::OpenDialog;

/// Long-edge size for ribbon thumbnails; the main panes use the full
/// preview size from the config.
const THUMB_EDGE: u32 = 320;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// No catalog loaded.
    Start,
    /// The main culling screen.
    Culling,
    Opening,
    Finishing,
    Help,
}

/// Cursor movement applied after a classification, per key variant.
#[derive(Debug, Clone, Copy)]
enum AfterMark {
    Advance,
    Retreat,
    NextGroup,
}

pub struct App {
    pub config: Config,
    pub mode: AppMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub session: Option<CullSession>,
    pub window_bounds: WindowBounds,
    // Outbound sidecar persistence
    pub sync: SyncQueue,
    // Preview HTTP service handles
    pub preview_addr: SocketAddr,
    preview_registry: PreviewRegistry,
    // Terminal image caches, one per pane size
    pub preview_cache: PreviewCache,
    pub thumb_cache: PreviewCache,
    // Dialog state
    pub open_dialog: Option<OpenDialog>,
    pub finish_dialog: Option<FinishDialog>,
    // Background task channels
    preview_progress: Option<mpsc::Receiver<PreviewProgress>>,
    commit_result: Option<mpsc::Receiver<std::result::Result<CommitSummary, String>>>,
}

impl App {
    pub fn new(config: Config, preview_server: PreviewServer) -> Self {
        let preview_cache = PreviewCache::new(
            config.preview.protocol,
            config.preview.image_preview,
            config.preview.max_edge,
        );
        let thumb_cache = PreviewCache::new(
            config.preview.protocol,
            config.preview.image_preview,
            THUMB_EDGE,
        );
        let window_bounds = WindowBounds {
            max_visible: config.window.max_visible,
            look_behind: config.window.look_behind,
        };
        Self {
            config,
            mode: AppMode::Start,
            should_quit: false,
            status_message: None,
            session: None,
            window_bounds,
            sync: SyncQueue::spawn(),
            preview_addr: preview_server.addr,
            preview_registry: preview_server.registry,
            preview_cache,
            thumb_cache,
            open_dialog: None,
            finish_dialog: None,
            preview_progress: None,
            commit_result: None,
        }
    }

    /// Load a culling directory and start a fresh session over it. Preview
    /// generation runs in the background; the screen switches immediately.
    pub fn open_catalog(&mut self, path: &Path) -> std::result::Result<(), OpenError> {
        let loaded = scanner::open_culling_dir(path, &self.config.scan)?;
        let photos = loaded.catalog.photos().to_vec();
        tracing::info!(
            path = %path.display(),
            photos = photos.len(),
            groups = loaded.catalog.group_count(),
            "Opened culling directory"
        );

        let registry = self.preview_registry.clone();
        let previews: Vec<PathBuf> = photos.iter().map(|p| p.preview_path.clone()).collect();
        tokio::spawn(async move {
            publish_previews(&registry, previews).await;
        });

        let (tx, rx) = mpsc::channel();
        let max_edge = self.config.preview.max_edge;
        std::thread::spawn(move || {
            scanner::generate_previews(photos, max_edge, tx);
        });
        self.preview_progress = Some(rx);

        self.preview_cache.clear();
        self.thumb_cache.clear();
        self.session = Some(CullSession::new(loaded.catalog, loaded.initial_states));
        self.finish_dialog = None;
        self.mode = AppMode::Culling;
        self.status_message = None;
        Ok(())
    }

    /// Drop the current catalog and return to the start screen.
    fn close_catalog(&mut self) {
        self.session = None;
        self.finish_dialog = None;
        self.preview_progress = None;
        self.preview_cache.clear();
        self.thumb_cache.clear();
        let registry = self.preview_registry.clone();
        tokio::spawn(async move {
            publish_previews(&registry, Vec::new()).await;
        });
        self.mode = AppMode::Start;
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        while !self.should_quit {
            self.poll_background();

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Drain every background channel once per tick.
    fn poll_background(&mut self) {
        for failure in self.sync.poll_failures() {
            tracing::warn!(message = %failure, "Sidecar sync failure");
            self.status_message = Some(failure);
        }

        if let Some(rx) = self.preview_progress.take() {
            let mut finished = false;
            while let Ok(update) = rx.try_recv() {
                match update {
                    PreviewProgress::Generated { path, done, total } => {
                        // A load attempted before the preview existed gave
                        // up; let it retry now.
                        self.preview_cache.invalidate(&path);
                        self.thumb_cache.invalidate(&path);
                        self.status_message = Some(format!("Generating previews {done}/{total}"));
                    }
                    PreviewProgress::Completed { generated, failed } => {
                        finished = true;
                        if failed > 0 {
                            self.status_message =
                                Some(format!("Previews ready, {failed} failed to generate"));
                        } else if generated > 0 {
                            self.status_message = None;
                        }
                    }
                }
            }
            if !finished {
                self.preview_progress = Some(rx);
            }
        }

        if let Some(rx) = self.commit_result.take() {
            match rx.try_recv() {
                Ok(Ok(summary)) => {
                    tracing::info!(
                        kept = summary.kept,
                        rejected = summary.rejected,
                        destination = %summary.destination.display(),
                        "Cull committed"
                    );
                    self.close_catalog();
                    self.status_message = Some(format!(
                        "Moved {} photo(s) to {}, {} to trash",
                        summary.kept,
                        summary.destination.display(),
                        summary.rejected
                    ));
                }
                Ok(Err(message)) => {
                    // Local state is untouched; the user fixes the problem
                    // and retries from the same dialog.
                    if let Some(dialog) = self.finish_dialog.as_mut() {
                        dialog.working = false;
                        dialog.error = Some(message);
                    } else {
                        self.status_message = Some(message);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => self.commit_result = Some(rx),
                Err(mpsc::TryRecvError::Disconnected) => {
                    if let Some(dialog) = self.finish_dialog.as_mut() {
                        dialog.working = false;
                        dialog.error = Some("Commit worker vanished".to_string());
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            AppMode::Help => {
                // Any key closes the overlay.
                self.mode = if self.session.is_some() {
                    AppMode::Culling
                } else {
                    AppMode::Start
                };
            }
            AppMode::Start => self.handle_start_key(key),
            AppMode::Culling => self.handle_culling_key(key),
            AppMode::Opening => self.handle_open_dialog_key(key),
            AppMode::Finishing => self.handle_finish_dialog_key(key),
        }
    }

    fn handle_start_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char('o') | KeyCode::Enter => self.open_open_dialog(),
            _ => {}
        }
    }

    fn handle_culling_key(&mut self, key: KeyEvent) {
        // A fresh command replaces any lingering transient message.
        self.status_message = None;
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Esc => self.close_catalog(),
            KeyCode::Char('o') => self.open_open_dialog(),

            // Movement in visible-index space
            KeyCode::Right if shift => self.with_session(|s| s.move_by_group(Direction::Forward)),
            KeyCode::Left if shift => self.with_session(|s| s.move_by_group(Direction::Backward)),
            KeyCode::Right | KeyCode::Char('l') => self.with_session(|s| s.move_by(1)),
            KeyCode::Left | KeyCode::Char('h') => self.with_session(|s| s.move_by(-1)),
            KeyCode::Char('L') => self.with_session(|s| s.move_by_group(Direction::Forward)),
            KeyCode::Char('H') => self.with_session(|s| s.move_by_group(Direction::Backward)),
            KeyCode::Tab => self.with_session(|s| s.seek_undecided(Direction::Forward)),
            KeyCode::BackTab => self.with_session(|s| s.seek_undecided(Direction::Backward)),

            // Classification
            KeyCode::Char(' ') => self.classify(CullState::Keep, false, AfterMark::Advance),
            KeyCode::Backspace | KeyCode::Char('x') => {
                self.classify(CullState::Reject, false, AfterMark::Advance)
            }
            // Chosen reject-key overload: Delete also retreats, for
            // sweeping backwards through a burst.
            KeyCode::Delete => self.classify(CullState::Reject, false, AfterMark::Retreat),
            KeyCode::Char('K') => self.classify(CullState::Keep, true, AfterMark::NextGroup),
            KeyCode::Char('X') => self.classify(CullState::Reject, true, AfterMark::NextGroup),
            KeyCode::Char('u') => self.classify(CullState::Undecided, false, AfterMark::Advance),
            KeyCode::Char('U') => self.classify(CullState::Undecided, false, AfterMark::Retreat),

            KeyCode::Char('.') => self.with_session(|s| s.toggle_show_rejected()),
            KeyCode::Char('f') | KeyCode::Enter => self.confirm_finish(),
            _ => {}
        }
    }

    fn with_session(&mut self, f: impl FnOnce(&mut CullSession)) {
        if let Some(session) = self.session.as_mut() {
            f(session);
        }
    }

    /// Classify the current photo, queue the change batch for the sidecar
    /// writer, apply the variant's movement, and check the completion gate.
    fn classify(&mut self, state: CullState, burst: bool, after: AfterMark) {
        let fired = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let changes = if burst {
                session.mark_burst(state)
            } else {
                session.mark(state)
            };
            self.sync.enqueue(changes);
            match after {
                AfterMark::Advance => session.move_by(1),
                AfterMark::Retreat => session.move_by(-1),
                AfterMark::NextGroup => session.move_by_group(Direction::Forward),
            }
            session.poll_gate()
        };
        if fired {
            self.open_finish_dialog();
        }
    }

    /// The confirm command: open the finish prompt when the cull is fully
    /// resolved, report what remains otherwise.
    fn confirm_finish(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.finished() {
            self.open_finish_dialog();
        } else {
            let counts = session.counts();
            self.status_message = Some(format!(
                "{} photo(s) still undecided (Tab jumps to the next one)",
                counts.undecided
            ));
        }
    }

    fn open_finish_dialog(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.finish_dialog = Some(FinishDialog::new(
            session.catalog().name(),
            session.counts(),
        ));
        self.mode = AppMode::Finishing;
    }

    fn open_open_dialog(&mut self) {
        self.open_dialog = Some(OpenDialog::new(&self.config.paths.culling_root));
        self.mode = AppMode::Opening;
    }

    fn handle_open_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.open_dialog.as_mut() else {
            self.mode = AppMode::Start;
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.open_dialog = None;
                self.mode = if self.session.is_some() {
                    AppMode::Culling
                } else {
                    AppMode::Start
                };
            }
            KeyCode::Enter => {
                let path = dialog.path();
                match self.open_catalog(&path) {
                    Ok(()) => self.open_dialog = None,
                    Err(e) => {
                        if let Some(dialog) = self.open_dialog.as_mut() {
                            dialog.error = Some(e.to_string());
                        }
                    }
                }
            }
            KeyCode::Left => dialog.move_cursor_left(),
            KeyCode::Right => dialog.move_cursor_right(),
            KeyCode::Home => dialog.move_cursor_home(),
            KeyCode::End => dialog.move_cursor_end(),
            KeyCode::Backspace => dialog.backspace(),
            KeyCode::Delete => dialog.delete(),
            KeyCode::Char(c) => dialog.handle_char(c),
            _ => {}
        }
    }

    fn handle_finish_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.finish_dialog.as_mut() else {
            self.mode = AppMode::Culling;
            return;
        };
        if dialog.working {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.finish_dialog = None;
                self.mode = AppMode::Culling;
            }
            KeyCode::Enter => self.start_commit(),
            KeyCode::Left => dialog.move_cursor_left(),
            KeyCode::Right => dialog.move_cursor_right(),
            KeyCode::Home => dialog.move_cursor_home(),
            KeyCode::End => dialog.move_cursor_end(),
            KeyCode::Backspace => dialog.backspace(),
            KeyCode::Delete => dialog.delete(),
            KeyCode::Char(c) => dialog.handle_char(c),
            _ => {}
        }
    }

    /// Validate and kick off the commit on a background thread. The dialog
    /// stays up in its working state until the result comes back.
    fn start_commit(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(dialog) = self.finish_dialog.as_mut() else {
            return;
        };

        let name = dialog.name.trim().to_string();
        if name.is_empty() {
            dialog.error = Some("Folder name is empty".to_string());
            return;
        }
        let counts = session.counts();
        if counts.undecided > 0 {
            dialog.error = Some(format!("{} photo(s) still undecided", counts.undecided));
            return;
        }
        let pending = self.sync.pending();
        if pending > 0 {
            dialog.error = Some(format!("Waiting for {pending} change(s) to sync"));
            return;
        }

        dialog.error = None;
        dialog.working = true;

        let catalog = session.catalog().clone();
        let states = session.states().to_vec();
        let edit_root = self.config.paths.edit_root.clone();
        let trash_config = self.config.trash.clone();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let trash = TrashManager::new(&trash_config);
            let result = commit_cull(&catalog, &states, &name, &edit_root, &trash)
                .map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
        self.commit_result = Some(rx);
    }
}
