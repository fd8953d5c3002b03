//! Editable program text for the program pane
//!
//! The cursor is a character index, the same unit the VM uses for its program
//! counter, so markers from both can be drawn on the same text.

/// Program text plus an insertion cursor
#[derive(Debug, Clone, Default)]
pub struct SourceEditor {
    text: String,
    /// Character index the next insert goes before
    cursor: usize,
    /// Set by every edit, cleared when a run picks the text up
    modified: bool,
}

impl SourceEditor {
    pub fn new(text: String) -> Self {
        SourceEditor {
            text,
            cursor: 0,
            modified: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark the current text as the one being run
    pub fn mark_loaded(&mut self) {
        self.modified = false;
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Byte offset of character index `idx`
    fn byte_offset(&self, idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(idx)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    pub fn insert(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor);
        self.text.insert(offset, c);
        self.cursor += 1;
        self.modified = true;
    }

    /// Delete the character before the cursor (Backspace)
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let offset = self.byte_offset(self.cursor);
        self.text.remove(offset);
        self.modified = true;
    }

    /// Delete the character under the cursor (Delete)
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let offset = self.byte_offset(self.cursor);
        self.text.remove(offset);
        self.modified = true;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Start index and length (in characters) of every line
    fn line_spans(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0;
        let mut len = 0;
        for c in self.text.chars() {
            if c == '\n' {
                spans.push((start, len));
                start += len + 1;
                len = 0;
            } else {
                len += 1;
            }
        }
        spans.push((start, len));
        spans
    }

    /// Line index and column of the cursor
    fn cursor_line(&self, spans: &[(usize, usize)]) -> (usize, usize) {
        for (line, &(start, len)) in spans.iter().enumerate() {
            if self.cursor <= start + len {
                return (line, self.cursor - start);
            }
        }
        (0, 0)
    }

    pub fn move_up(&mut self) {
        let spans = self.line_spans();
        let (line, column) = self.cursor_line(&spans);
        if line > 0 {
            let (start, len) = spans[line - 1];
            self.cursor = start + column.min(len);
        }
    }

    pub fn move_down(&mut self) {
        let spans = self.line_spans();
        let (line, column) = self.cursor_line(&spans);
        if let Some(&(start, len)) = spans.get(line + 1) {
            self.cursor = start + column.min(len);
        }
    }

    pub fn move_home(&mut self) {
        let spans = self.line_spans();
        let (line, _) = self.cursor_line(&spans);
        self.cursor = spans[line].0;
    }

    pub fn move_end(&mut self) {
        let spans = self.line_spans();
        let (line, _) = self.cursor_line(&spans);
        let (start, len) = spans[line];
        self.cursor = start + len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut editor = SourceEditor::new("+-".to_string());
        editor.move_right();
        editor.insert('[');
        assert_eq!(editor.text(), "+[-");
        assert_eq!(editor.cursor(), 2);
        assert!(editor.is_modified());

        editor.delete_backward();
        assert_eq!(editor.text(), "+-");
        editor.delete_forward();
        assert_eq!(editor.text(), "+");
        editor.delete_forward();
        assert_eq!(editor.text(), "+");
    }

    #[test]
    fn test_backspace_at_start_does_nothing() {
        let mut editor = SourceEditor::new("+".to_string());
        editor.delete_backward();
        assert_eq!(editor.text(), "+");
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_multibyte_text() {
        let mut editor = SourceEditor::new("é+".to_string());
        editor.move_right();
        editor.insert('>');
        assert_eq!(editor.text(), "é>+");
        editor.move_end();
        editor.delete_backward();
        assert_eq!(editor.text(), "é>");
    }

    #[test]
    fn test_vertical_moves_keep_column() {
        let mut editor = SourceEditor::new("++++\n+\n+++".to_string());
        editor.move_right();
        editor.move_right();
        editor.move_right();
        editor.move_down();
        // Second line is shorter: clamp to its end
        assert_eq!(editor.cursor(), 6);
        editor.move_down();
        assert_eq!(editor.cursor(), 8);
        editor.move_up();
        editor.move_up();
        assert_eq!(editor.cursor(), 1);
    }

    #[test]
    fn test_home_and_end() {
        let mut editor = SourceEditor::new("ab\ncde".to_string());
        editor.move_down();
        editor.move_end();
        assert_eq!(editor.cursor(), 6);
        editor.move_home();
        assert_eq!(editor.cursor(), 3);
    }
}
