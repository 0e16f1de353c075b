use std::cmp::Ordering;

/// Line-oriented gap buffer backing the note editor. Lines before the gap
/// live in `head`; lines at and after it live in `tail`, stored reversed so
/// both sides push and pop at their ends. Localized edits stay O(1).
#[derive(Debug, Clone)]
pub struct LineBuffer {
    head: Vec<String>,
    tail: Vec<String>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self {
            head: vec![String::new()],
            tail: Vec::new(),
        }
    }
}

impl LineBuffer {
    /// Splits on `\n`; a trailing newline yields a trailing empty line so
    /// `to_text` round-trips the original byte-for-byte.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            head: text.split('\n').map(|l| l.to_string()).collect(),
            tail: Vec::new(),
        }
    }

    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    #[inline]
    fn gap(&self) -> usize {
        self.head.len()
    }

    fn seek(&mut self, row: usize) {
        let gap = self.gap();
        match row.cmp(&gap) {
            Ordering::Equal => {}
            Ordering::Less => {
                for _ in row..gap {
                    if let Some(line) = self.head.pop() {
                        self.tail.push(line);
                    }
                }
            }
            Ordering::Greater => {
                let target = row.min(self.line_count());
                for _ in gap..target {
                    if let Some(line) = self.tail.pop() {
                        self.head.push(line);
                    }
                }
            }
        }
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        let gap = self.gap();
        if row < gap {
            self.head.get(row).map(|s| s.as_str())
        } else {
            let idx = self.tail.len().checked_sub(row - gap + 1)?;
            self.tail.get(idx).map(|s| s.as_str())
        }
    }

    fn line_mut(&mut self, row: usize) -> Option<&mut String> {
        self.seek(row + 1);
        self.head.get_mut(row)
    }

    /// Length of a line in chars (columns are char-indexed throughout).
    pub fn char_len(&self, row: usize) -> usize {
        self.line(row).map_or(0, |l| l.chars().count())
    }

    pub fn lines(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.line_count());
        out.extend(self.head.iter().map(|s| s.as_str()));
        out.extend(self.tail.iter().rev().map(|s| s.as_str()));
        out
    }

    pub fn insert_char(&mut self, row: usize, col: usize, c: char) {
        if let Some(line) = self.line_mut(row) {
            let at = byte_index(line, col);
            line.insert(at, c);
        }
    }

    pub fn insert_str(&mut self, row: usize, col: usize, s: &str) {
        if let Some(line) = self.line_mut(row) {
            let at = byte_index(line, col);
            line.insert_str(at, s);
        }
    }

    pub fn remove_char(&mut self, row: usize, col: usize) -> Option<char> {
        let len = self.char_len(row);
        let line = self.line_mut(row)?;
        if col >= len {
            return None;
        }
        let at = byte_index(line, col);
        Some(line.remove(at))
    }

    /// Break a line in two at `col`.
    pub fn split_line(&mut self, row: usize, col: usize) {
        self.seek(row + 1);
        if let Some(line) = self.head.get_mut(row) {
            let at = byte_index(line, col);
            let rest = line.split_off(at);
            self.head.push(rest);
        }
    }

    /// Append line `row` onto the previous line. Returns the join column
    /// (the previous line's old length) so the caller can park the cursor.
    pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.line_count() {
            return None;
        }
        self.seek(row + 1);
        let line = self.head.remove(row);
        let prev = self.head.get_mut(row - 1)?;
        let col = prev.chars().count();
        prev.push_str(&line);
        Some(col)
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}
