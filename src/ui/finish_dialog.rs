//! Finish-cull dialog: collects the target folder name and shows the
//! commit outcome while the files move in the background.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::cull::StateCounts;

pub struct FinishDialog {
    /// Target folder name under the dated edit tree.
    pub name: String,
    /// Cursor position in the name.
    pub cursor: usize,
    pub kept: usize,
    pub rejected: usize,
    /// Validation or commit failure shown inline.
    pub error: Option<String>,
    /// True while the background commit runs; input is frozen.
    pub working: bool,
}

impl FinishDialog {
    /// Pre-fill with the shoot directory's name; most culls keep it.
    pub fn new(default_name: &str, counts: StateCounts) -> Self {
        Self {
            name: default_name.to_string(),
            cursor: default_name.len(),
            kept: counts.keep,
            rejected: counts.reject,
            error: None,
            working: false,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.name.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let mut prev = self.cursor - 1;
            while prev > 0 && !self.name.is_char_boundary(prev) {
                prev -= 1;
            }
            self.name.remove(prev);
            self.cursor = prev;
            self.error = None;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.name.len() {
            self.name.remove(self.cursor);
            self.error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        while self.cursor > 0 {
            self.cursor -= 1;
            if self.name.is_char_boundary(self.cursor) {
                break;
            }
        }
    }

    pub fn move_cursor_right(&mut self) {
        while self.cursor < self.name.len() {
            self.cursor += 1;
            if self.name.is_char_boundary(self.cursor) {
                break;
            }
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.name.len();
    }
}

pub fn render(frame: &mut Frame, dialog: &FinishDialog, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 11.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Finish Cull ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // summary
            Constraint::Length(1), // spacer
            Constraint::Length(3), // name input
            Constraint::Length(1), // error
            Constraint::Length(1), // footer
        ])
        .split(dialog_area);

    let summary = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} to keep", dialog.kept),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} to trash", dialog.rejected),
            Style::default().fg(Color::Red),
        ),
    ]));
    frame.render_widget(summary, chunks[0]);

    let before = &dialog.name[..dialog.cursor];
    let after = &dialog.name[dialog.cursor..];
    let input = Paragraph::new(Line::from(vec![
        Span::raw(before),
        Span::styled(
            "|",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(after),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Folder name ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(input, chunks[2]);

    if let Some(ref error) = dialog.error {
        let line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(line, chunks[3]);
    }

    let footer = if dialog.working {
        Paragraph::new("Moving files...").style(Style::default().fg(Color::Yellow))
    } else {
        Paragraph::new("Enter: move files | Esc: back to culling")
            .style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(footer, chunks[4]);
}
