mod buffer;

pub use buffer::LineBuffer;

use unicode_width::UnicodeWidthStr;

/// Plain-text editor state: a line buffer plus cursor and vertical scroll.
/// Columns are char-indexed; display widths only matter when the UI places
/// the terminal cursor. No undo history, matching the app's basic-editing
/// scope.
#[derive(Debug, Default)]
pub struct Editor {
    buffer: LineBuffer,
    row: usize,
    col: usize,
    /// Sticky column for vertical movement across shorter lines.
    desired_col: usize,
    scroll_top: usize,
}

impl Editor {
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: LineBuffer::from_text(text),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_text()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.buffer.lines()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Cursor x in display columns, accounting for wide characters.
    pub fn cursor_display_col(&self) -> usize {
        self.buffer
            .line(self.row)
            .map(|line| {
                let prefix: String = line.chars().take(self.col).collect();
                prefix.width()
            })
            .unwrap_or(0)
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        self.buffer.insert_char(self.row, self.col, c);
        self.col += 1;
        self.desired_col = self.col;
    }

    pub fn insert_newline(&mut self) {
        self.buffer.split_line(self.row, self.col);
        self.row += 1;
        self.col = 0;
        self.desired_col = 0;
    }

    /// Insert possibly-multiline text at the cursor (bracketed paste).
    pub fn insert_text(&mut self, text: &str) {
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.insert_newline();
            }
            if !segment.is_empty() {
                let segment = segment.trim_end_matches('\r');
                self.buffer.insert_str(self.row, self.col, segment);
                self.col += segment.chars().count();
                self.desired_col = self.col;
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.buffer.remove_char(self.row, self.col - 1);
            self.col -= 1;
        } else if let Some(col) = self.buffer.join_with_previous(self.row) {
            self.row -= 1;
            self.col = col;
        }
        self.desired_col = self.col;
    }

    pub fn delete_forward(&mut self) {
        if self.col < self.buffer.char_len(self.row) {
            self.buffer.remove_char(self.row, self.col);
        } else if self.row + 1 < self.buffer.line_count() {
            self.buffer.join_with_previous(self.row + 1);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.buffer.char_len(self.row);
        }
        self.desired_col = self.col;
    }

    pub fn move_right(&mut self) {
        if self.col < self.buffer.char_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.buffer.line_count() {
            self.row += 1;
            self.col = 0;
        }
        self.desired_col = self.col;
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.desired_col.min(self.buffer.char_len(self.row));
        } else {
            self.col = 0;
            self.desired_col = 0;
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.buffer.line_count() {
            self.row += 1;
            self.col = self.desired_col.min(self.buffer.char_len(self.row));
        } else {
            self.col = self.buffer.char_len(self.row);
            self.desired_col = self.col;
        }
    }

    pub fn move_line_start(&mut self) {
        self.col = 0;
        self.desired_col = 0;
    }

    pub fn move_line_end(&mut self) {
        self.col = self.buffer.char_len(self.row);
        self.desired_col = self.col;
    }

    pub fn page_up(&mut self, page: usize) {
        self.row = self.row.saturating_sub(page.max(1));
        self.col = self.desired_col.min(self.buffer.char_len(self.row));
    }

    pub fn page_down(&mut self, page: usize) {
        self.row = (self.row + page.max(1)).min(self.buffer.line_count() - 1);
        self.col = self.desired_col.min(self.buffer.char_len(self.row));
    }

    /// Keep the cursor row inside a viewport of `height` rows, adjusting
    /// the scroll offset. Called before every draw.
    pub fn ensure_cursor_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.row < self.scroll_top {
            self.scroll_top = self.row;
        } else if self.row >= self.scroll_top + height {
            self.scroll_top = self.row + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_builds_text() {
        let mut editor = Editor::default();
        for c in "Hi".chars() {
            editor.insert_char(c);
        }
        editor.insert_newline();
        editor.insert_char('x');
        assert_eq!(editor.text(), "Hi\nx");
        assert_eq!(editor.cursor(), (1, 1));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = Editor::from_text("ab\ncd");
        editor.move_down();
        editor.move_line_start();
        editor.backspace();
        assert_eq!(editor.text(), "abcd");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_delete_forward_at_line_end_joins() {
        let mut editor = Editor::from_text("ab\ncd");
        editor.move_line_end();
        editor.delete_forward();
        assert_eq!(editor.text(), "abcd");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_vertical_movement_keeps_desired_col() {
        let mut editor = Editor::from_text("long line\nx\nlong line");
        editor.move_line_end();
        editor.move_down();
        assert_eq!(editor.cursor(), (1, 1));
        editor.move_down();
        assert_eq!(editor.cursor(), (2, 9));
    }

    #[test]
    fn test_paste_multiline() {
        let mut editor = Editor::default();
        editor.insert_text("one\ntwo\nthree");
        assert_eq!(editor.text(), "one\ntwo\nthree");
        assert_eq!(editor.cursor(), (2, 5));
    }

    #[test]
    fn test_display_col_with_wide_chars() {
        let mut editor = Editor::from_text("日本語");
        editor.move_right();
        editor.move_right();
        assert_eq!(editor.cursor(), (0, 2));
        assert_eq!(editor.cursor_display_col(), 4);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut editor = Editor::from_text("a\nb\nc\nd\ne\nf");
        for _ in 0..5 {
            editor.move_down();
        }
        editor.ensure_cursor_visible(3);
        assert_eq!(editor.scroll_top(), 3);
        for _ in 0..5 {
            editor.move_up();
        }
        editor.ensure_cursor_visible(3);
        assert_eq!(editor.scroll_top(), 0);
    }
}
