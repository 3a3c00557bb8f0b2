use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::net::SocketAddr;

pub fn render_help(frame: &mut Frame, area: Rect, preview_addr: Option<SocketAddr>) {
    // Center the help dialog
    let dialog_width = 62.min(area.width.saturating_sub(4));
    let dialog_height = 30.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let mut help_text = vec![
        Line::from(Span::styled("Navigation", Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))),
        Line::from(""),
        Line::from("  l / →            Next photo"),
        Line::from("  h / ←            Previous photo"),
        Line::from("  L / Shift+→      Next group"),
        Line::from("  H / Shift+←      Previous group"),
        Line::from("  Tab              Next undecided photo"),
        Line::from("  Shift+Tab        Previous undecided photo"),
        Line::from(""),
        Line::from(Span::styled("Culling", Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))),
        Line::from(""),
        Line::from("  Space            Keep photo and advance"),
        Line::from("  x / ⌫            Reject photo and advance"),
        Line::from("  Del              Reject photo and step back"),
        Line::from("  u / U            Clear decision"),
        Line::from("  K                Keep this, reject rest of group"),
        Line::from("  X                Reject this and rest of group"),
        Line::from(""),
        Line::from(Span::styled("Session", Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))),
        Line::from(""),
        Line::from("  .                Show/hide rejected photos"),
        Line::from("  f / ↵            Finish cull (move files)"),
        Line::from("  o                Open a shoot"),
        Line::from("  Esc              Close catalog"),
        Line::from("  ?                Show this help"),
        Line::from("  q                Quit"),
        Line::from(""),
    ];
    if let Some(addr) = preview_addr {
        help_text.push(Line::from(Span::styled(
            format!("  Previews served at http://{addr}/preview"),
            Style::default().fg(Color::DarkGray),
        )));
        help_text.push(Line::from(""));
    }
    help_text.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, dialog_area);
}
