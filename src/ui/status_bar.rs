use ratatui::{
    prelude::*,
    widgets::Paragraph,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // A transient message takes over the whole bar.
    if let Some(ref message) = app.status_message {
        let line = Line::from(vec![Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let Some(session) = app.session.as_ref() else {
        return;
    };

    let counts = session.counts();
    let position = match session.visible_position() {
        Some((pos, len)) => format!("{}/{}", pos, len),
        None => "-/0".to_string(),
    };
    let hidden = if session.show_rejected() {
        String::new()
    } else {
        format!(" ({} hidden)", counts.reject)
    };

    let mut spans = Vec::new();

    spans.push(Span::styled(
        format!(" {} ", session.catalog().name()),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    spans.push(Span::styled(
        format!(" {}{} ", position, hidden),
        Style::default().fg(Color::Gray),
    ));

    spans.push(Span::styled(
        format!(
            " {} keep, {} reject, {} left ",
            counts.keep, counts.reject, counts.undecided
        ),
        Style::default().fg(Color::Gray),
    ));

    let pending = app.sync.pending();
    if pending > 0 {
        spans.push(Span::styled(
            format!(" [sync:{}] ", pending),
            Style::default().fg(Color::Cyan),
        ));
    }

    let help_text = " Space:keep x:reject K/X:burst Tab:next f:finish ?:help ".to_string();

    // Right-align the hints by padding the middle.
    let content_len: usize = spans.iter().map(|s| s.content.len()).sum();
    let available = area.width as usize;
    if available > content_len + help_text.len() {
        let spacing = " ".repeat(available - content_len - help_text.len());
        spans.push(Span::raw(spacing));
    }

    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line), area);
}
