//! Path-input dialog for opening a culling directory.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::path::{Path, PathBuf};

pub struct OpenDialog {
    /// The path being typed.
    pub input: String,
    /// Cursor position in the input.
    pub cursor: usize,
    /// Validation or open failure shown inline.
    pub error: Option<String>,
}

impl OpenDialog {
    /// Start editing from the configured culling root, with the cursor at
    /// the end so a shoot name can be appended directly.
    pub fn new(culling_root: &Path) -> Self {
        let mut input = culling_root.to_string_lossy().into_owned();
        if !input.is_empty() && !input.ends_with('/') {
            input.push('/');
        }
        let cursor = input.len();
        Self {
            input,
            cursor,
            error: None,
        }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.input.trim())
    }

    pub fn handle_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = floor_char_boundary(&self.input, self.cursor - 1);
            self.input.remove(prev);
            self.cursor = prev;
            self.error = None;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
            self.error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = floor_char_boundary(&self.input, self.cursor - 1);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.input.len() {
            self.cursor = ceil_char_boundary(&self.input, self.cursor + 1);
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.input.len();
    }
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

pub fn render(frame: &mut Frame, dialog: &OpenDialog, area: Rect) {
    let dialog_width = 70.min(area.width.saturating_sub(4));
    let dialog_height = 9.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Open Shoot ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // path input
            Constraint::Length(1), // error
            Constraint::Length(1), // footer
        ])
        .split(dialog_area);

    let header = Paragraph::new("Directory holding the photos to cull:")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(header, chunks[0]);

    let before = &dialog.input[..dialog.cursor];
    let after = &dialog.input[dialog.cursor..];
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
            .title(" Path ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(input, chunks[1]);

    if let Some(ref error) = dialog.error {
        let line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(line, chunks[2]);
    }

    let footer = Paragraph::new("Enter: open | Esc: cancel")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appends_trailing_slash() {
        let dialog = OpenDialog::new(Path::new("/photos/culling"));
        assert_eq!(dialog.input, "/photos/culling/");
        assert_eq!(dialog.cursor, dialog.input.len());
    }

    #[test]
    fn test_editing_keeps_cursor_in_bounds() {
        let mut dialog = OpenDialog::new(Path::new("/p/"));
        dialog.handle_char('a');
        dialog.handle_char('b');
        dialog.move_cursor_left();
        dialog.backspace();
        assert_eq!(dialog.input, "/p/b");

        dialog.move_cursor_home();
        dialog.delete();
        assert_eq!(dialog.input, "p/b");
        dialog.move_cursor_end();
        assert_eq!(dialog.cursor, 3);
    }

    #[test]
    fn test_path_trims_whitespace() {
        let mut dialog = OpenDialog::new(Path::new("/photos"));
        dialog.handle_char(' ');
        assert_eq!(dialog.path(), PathBuf::from("/photos"));
    }

    #[test]
    fn test_typing_clears_a_stale_error() {
        let mut dialog = OpenDialog::new(Path::new("/photos"));
        dialog.error = Some("no photos".to_string());
        dialog.handle_char('x');
        assert!(dialog.error.is_none());
    }
}
