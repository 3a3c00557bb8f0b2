//! One-line cull progress bar: keeps, undecided, rejects, to scale.

use ratatui::{prelude::*, widgets::Paragraph};

use crate::cull::StateCounts;

pub fn render(frame: &mut Frame, counts: StateCounts, area: Rect) {
    let total = counts.total();
    if total == 0 || area.width == 0 {
        return;
    }

    let width = area.width as usize;
    let keep_width = width * counts.keep / total;
    let reject_width = width * counts.reject / total;
    // Rounding remainder goes to the middle segment so the bar stays full.
    let undecided_width = width - keep_width - reject_width;

    let line = Line::from(vec![
        segment(counts.keep, keep_width, Color::Black, Color::Green),
        segment(counts.undecided, undecided_width, Color::White, Color::DarkGray),
        segment(counts.reject, reject_width, Color::Black, Color::Red),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn segment(count: usize, width: usize, fg: Color, bg: Color) -> Span<'static> {
    let label = count.to_string();
    let text = if label.len() + 2 <= width {
        let pad = width - label.len();
        let left = pad / 2;
        format!("{}{}{}", " ".repeat(left), label, " ".repeat(pad - left))
    } else {
        " ".repeat(width)
    };
    Span::styled(text, Style::default().fg(fg).bg(bg))
}
