//! The main culling screen: previous/current/next previews on top, the
//! grouped thumbnail ribbon below, progress bar at the bottom.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::{Resize, StatefulImage};
use std::path::{Path, PathBuf};

use super::images::PreviewCache;
use super::progress;
use crate::app::App;
use crate::cull::{CullSession, CullState};
use crate::preview_api::preview_url;

const CELL_WIDTH: u16 = 14;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    app.preview_cache.poll_async_loads();
    app.thumb_cache.poll_async_loads();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // preview row
            Constraint::Length(9), // thumbnail ribbon
            Constraint::Length(1), // progress bar
        ])
        .split(area);

    render_preview_row(frame, app, chunks[0]);
    render_ribbon(frame, app, chunks[1]);
    if let Some(session) = app.session.as_ref() {
        progress::render(frame, session.counts(), chunks[2]);
    }
}

/// What a pane needs to draw, copied out so the session borrow ends
/// before the image caches get touched.
struct PaneInfo {
    preview: PathBuf,
    name: String,
    state: CullState,
}

fn pane_info(session: &CullSession, index: usize) -> PaneInfo {
    let photo = session.catalog().photo(index);
    PaneInfo {
        preview: photo.preview_path.clone(),
        name: photo
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        state: session.state_of(index),
    }
}

fn render_preview_row(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(area);

    let Some(session) = app.session.as_ref() else {
        return;
    };
    let prev = session
        .neighbor(crate::cull::Direction::Backward)
        .map(|i| pane_info(session, i));
    let next = session
        .neighbor(crate::cull::Direction::Forward)
        .map(|i| pane_info(session, i));
    let current = session
        .current_photo()
        .map(|_| pane_info(session, session.cursor()));
    let mut detail = current_detail(session);

    // Without inline graphics the served URL is the way to see the frame.
    if !app.preview_cache.is_available() {
        if let (Some(detail), Some(photo)) = (detail.as_mut(), session.current_photo()) {
            if let Some(url) = preview_url(app.preview_addr, &photo.preview_path) {
                detail.push_str("  |  ");
                detail.push_str(url.as_str());
            }
        }
    }

    render_side_pane(frame, app, prev, "Start of catalog", columns[0]);
    render_main_pane(frame, app, current, detail, columns[1]);
    render_side_pane(frame, app, next, "End of catalog", columns[2]);
}

/// Info line under the main preview: capture time plus position within
/// the burst group.
fn current_detail(session: &CullSession) -> Option<String> {
    let photo = session.current_photo()?;
    let location = session.current_location()?;
    Some(format!(
        "{}  |  group {}/{}  |  shot {}/{}",
        photo.captured.format("%Y-%m-%d %H:%M:%S"),
        location.group_index + 1,
        session.catalog().group_count(),
        location.flat_index - location.group_start + 1,
        location.group_end - location.group_start + 1,
    ))
}

fn render_main_pane(
    frame: &mut Frame,
    app: &mut App,
    info: Option<PaneInfo>,
    detail: Option<String>,
    area: Rect,
) {
    let Some(info) = info else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(block, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(state_color(info.state)))
        .title(format!(" {} [{}] ", info.name, state_label(info.state)))
        .title_style(
            Style::default()
                .fg(state_color(info.state))
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    render_image(frame, &mut app.preview_cache, &info.preview, rows[0]);

    if let Some(detail) = detail {
        let line = Paragraph::new(detail)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(line, rows[1]);
    }
}

fn render_side_pane(
    frame: &mut Frame,
    app: &mut App,
    info: Option<PaneInfo>,
    edge_label: &str,
    area: Rect,
) {
    match info {
        Some(info) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(state_color(info.state)))
                .title(format!(" {} ", info.name))
                .title_style(Style::default().fg(Color::DarkGray));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_image(frame, &mut app.preview_cache, &info.preview, inner);
        }
        None => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            if inner.height > 0 {
                let label = Paragraph::new(edge_label)
                    .style(
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )
                    .alignment(Alignment::Center);
                let centered = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
                frame.render_widget(label, centered);
            }
        }
    }
}

fn render_image(frame: &mut Frame, cache: &mut PreviewCache, path: &Path, area: Rect) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    if let Some(protocol) = cache.protocol(path) {
        let image = StatefulImage::new(None).resize(Resize::Fit(None));
        frame.render_stateful_widget(image, area, protocol);
        return;
    }

    let text = if cache.is_loading(path) {
        "Loading..."
    } else if cache.is_available() {
        "(no preview)"
    } else {
        "(image preview unavailable)"
    };
    let placeholder = Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center);
    let centered = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(placeholder, centered);
}

/// One thumbnail cell, flattened out of the window slices.
struct RibbonCell {
    preview: PathBuf,
    state: CullState,
    selected: bool,
    /// Group number to show on the cell that opens a new slice.
    starts_group: Option<usize>,
}

fn render_ribbon(frame: &mut Frame, app: &mut App, area: Rect) {
    let cells = {
        let Some(session) = app.session.as_ref() else {
            return;
        };
        let mut cells: Vec<RibbonCell> = Vec::new();
        for slice in session.window(app.window_bounds) {
            for (offset, flat) in slice.range.clone().enumerate() {
                let photo = session.catalog().photo(flat);
                cells.push(RibbonCell {
                    preview: photo.preview_path.clone(),
                    state: session.state_of(flat),
                    selected: flat == session.cursor(),
                    starts_group: (offset == 0).then_some(slice.group_index),
                });
            }
        }
        cells
    };
    if cells.is_empty() {
        return;
    }

    // Scroll the strip so the cursor's cell stays roughly centered.
    let max_cells = (area.width / CELL_WIDTH).max(1) as usize;
    let cursor_cell = cells.iter().position(|c| c.selected).unwrap_or(0);
    let start = cursor_cell
        .saturating_sub((max_cells - 1) / 2)
        .min(cells.len().saturating_sub(max_cells));
    let shown = &cells[start..cells.len().min(start + max_cells)];

    let constraints: Vec<Constraint> = shown
        .iter()
        .map(|_| Constraint::Length(CELL_WIDTH))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (cell, column) in shown.iter().zip(columns.iter()) {
        render_cell(frame, &mut app.thumb_cache, cell, *column);
    }
}

fn render_cell(frame: &mut Frame, cache: &mut PreviewCache, cell: &RibbonCell, area: Rect) {
    let border = if cell.selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(state_color(cell.state))
    };
    let mut block = Block::default().borders(Borders::ALL).border_style(border);
    if let Some(group) = cell.starts_group {
        block = block
            .title(format!(" G{} ", group + 1))
            .title_style(Style::default().fg(Color::Gray));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if let Some(protocol) = cache.protocol(&cell.preview) {
        // No explicit resize for thumbnails, the protocol handles it.
        let image = StatefulImage::new(None);
        frame.render_stateful_widget(image, inner, protocol);
        return;
    }

    let label = Paragraph::new(state_label(cell.state))
        .style(Style::default().fg(state_color(cell.state)))
        .alignment(Alignment::Center);
    let centered = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
    frame.render_widget(label, centered);
}

fn state_color(state: CullState) -> Color {
    match state {
        CullState::Keep => Color::Green,
        CullState::Reject => Color::Red,
        CullState::Undecided => Color::DarkGray,
    }
}

fn state_label(state: CullState) -> &'static str {
    match state {
        CullState::Keep => "keep",
        CullState::Reject => "reject",
        CullState::Undecided => "undecided",
    }
}
