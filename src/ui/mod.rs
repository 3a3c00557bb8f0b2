mod cull;
mod dialogs;
pub mod finish_dialog;
pub mod images;
pub mod open_dialog;
mod progress;
mod status_bar;

use ratatui::{
    prelude::*,
    widgets::Paragraph,
};

use crate::app::{App, AppMode};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main layout: content area + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    if app.session.is_some() {
        cull::render(frame, app, chunks[0]);
    } else {
        render_start(frame, app, chunks[0]);
    }

    status_bar::render(frame, app, chunks[1]);

    // Dialog overlays on top of whatever screen is underneath.
    match app.mode {
        AppMode::Help => dialogs::render_help(frame, area, Some(app.preview_addr)),
        AppMode::Opening => {
            if let Some(ref dialog) = app.open_dialog {
                open_dialog::render(frame, dialog, area);
            }
        }
        AppMode::Finishing => {
            if let Some(ref dialog) = app.finish_dialog {
                finish_dialog::render(frame, dialog, area);
            }
        }
        _ => {}
    }
}

/// The no-catalog screen: name, keys to get going, configured roots.
fn render_start(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "culpho",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("No shoot is open."),
        Line::from(""),
        Line::from(Span::styled(
            "o: open a culling directory    ?: help    q: quit",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("culling root: {}", app.config.paths.culling_root.display()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("edit root:    {}", app.config.paths.edit_root.display()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let height = lines.len() as u16;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let centered = Rect::new(area.x, y, area.width, height.min(area.height));
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered);
}
