use super::Language;

/// Editing state of one source buffer
///
/// The cursor is a byte offset into `content` and always sits on a char
/// boundary. Row/column coordinates are derived on demand from line starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub language: Language,
    pub content: String,
    cursor: usize,
    pub dirty: bool,
}

impl EditorState {
    pub fn new(language: Language, content: impl Into<String>) -> Self {
        Self {
            language,
            content: content.into(),
            cursor: 0,
            dirty: false,
        }
    }

    /// Replace the whole content, keeping the cursor where it still fits
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.set_cursor(self.cursor);
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to a byte offset, clamped to the content
    pub fn set_cursor(&mut self, offset: usize) {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        self.cursor = offset;
    }

    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, c) in self.content.char_indices() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    fn line_end(&self, start: usize) -> usize {
        self.content[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.content.len())
    }

    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    /// Get cursor position as (row, col), col counted in chars
    pub fn cursor_pos(&self) -> (usize, usize) {
        let starts = self.line_starts();
        let row = starts
            .iter()
            .rposition(|&start| start <= self.cursor)
            .unwrap_or(0);
        let col = self.content[starts[row]..self.cursor].chars().count();
        (row, col)
    }

    /// Convert (row, col) to a byte offset, clamping past-the-end positions
    pub fn cursor_to_offset(&self, row: usize, col: usize) -> usize {
        let starts = self.line_starts();
        let Some(&start) = starts.get(row) else {
            return self.content.len();
        };
        let end = self.line_end(start);
        self.content[start..end]
            .char_indices()
            .nth(col)
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.dirty = true;
    }

    pub fn insert_str(&mut self, text: &str) {
        self.content.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.dirty = true;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the char before the cursor. Returns false at the start of the buffer.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.content.replace_range(prev..self.cursor, "");
        self.cursor = prev;
        self.dirty = true;
        true
    }

    /// Delete the char under the cursor. Returns false at the end of the buffer.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }
        let next = self.next_boundary();
        self.content.replace_range(self.cursor..next, "");
        self.dirty = true;
        true
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.cursor
            + self.content[self.cursor..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(0)
    }

    // Cursor movement methods

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_up(&mut self) {
        let (row, col) = self.cursor_pos();
        if row > 0 {
            self.cursor = self.cursor_to_offset(row - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let (row, col) = self.cursor_pos();
        if row + 1 < self.line_count() {
            self.cursor = self.cursor_to_offset(row + 1, col);
        }
    }

    pub fn move_to_line_start(&mut self) {
        let (row, _) = self.cursor_pos();
        self.cursor = self.cursor_to_offset(row, 0);
    }

    pub fn move_to_line_end(&mut self) {
        let (row, _) = self.cursor_pos();
        self.cursor = self.cursor_to_offset(row, usize::MAX);
    }

    pub fn move_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor = self.content.len();
    }

    pub fn move_word_forward(&mut self) {
        let rest = &self.content[self.cursor..];
        let mut chars = rest.char_indices().peekable();

        // Skip current word (non-whitespace)
        while chars.next_if(|(_, c)| !c.is_whitespace()).is_some() {}
        // Skip whitespace
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        self.cursor += chars.peek().map(|(i, _)| *i).unwrap_or(rest.len());
    }

    pub fn move_word_back(&mut self) {
        let head = &self.content[..self.cursor];
        let mut offset = head.len();
        let mut chars = head.char_indices().rev().peekable();

        while let Some((i, _)) = chars.next_if(|(_, c)| c.is_whitespace()) {
            offset = i;
        }
        while let Some((i, _)) = chars.next_if(|(_, c)| !c.is_whitespace()) {
            offset = i;
        }

        self.cursor = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_movement() {
        let mut editor = EditorState::new(Language::Html, "Hello\nWorld\nTest");

        assert_eq!(editor.cursor_pos(), (0, 0));

        editor.move_down();
        assert_eq!(editor.cursor_pos(), (1, 0));

        editor.move_right();
        editor.move_right();
        assert_eq!(editor.cursor_pos(), (1, 2));

        editor.move_up();
        assert_eq!(editor.cursor_pos(), (0, 2));
    }

    #[test]
    fn test_offset_conversion() {
        let editor = EditorState::new(Language::Css, "Hello\nWorld");

        assert_eq!(editor.cursor_to_offset(0, 0), 0);
        assert_eq!(editor.cursor_to_offset(0, 5), 5);
        assert_eq!(editor.cursor_to_offset(1, 0), 6);
        assert_eq!(editor.cursor_to_offset(1, 5), 11);
        assert_eq!(editor.cursor_to_offset(0, 99), 5);
        assert_eq!(editor.cursor_to_offset(7, 0), 11);
    }

    #[test]
    fn test_editing_marks_dirty() {
        let mut editor = EditorState::new(Language::Js, "ab");
        assert!(!editor.dirty);

        editor.move_to_bottom();
        editor.insert_char('c');
        editor.insert_newline();
        editor.insert_str("d");
        assert_eq!(editor.content, "abc\nd");
        assert!(editor.dirty);
        assert_eq!(editor.cursor_pos(), (1, 1));

        assert!(editor.backspace());
        assert!(editor.backspace());
        assert_eq!(editor.content, "abc");

        editor.move_to_top();
        assert!(!editor.backspace());
        assert!(editor.delete());
        assert_eq!(editor.content, "bc");
    }

    #[test]
    fn test_multibyte_boundaries() {
        let mut editor = EditorState::new(Language::Html, "héllo");
        editor.move_right();
        editor.move_right();
        assert_eq!(editor.cursor(), 3);
        assert_eq!(editor.cursor_pos(), (0, 2));

        editor.backspace();
        assert_eq!(editor.content, "hllo");

        editor.set_cursor(99);
        assert_eq!(editor.cursor(), 4);
    }

    #[test]
    fn test_set_content_clamps_cursor() {
        let mut editor = EditorState::new(Language::Html, "<p>long content</p>");
        editor.move_to_bottom();
        editor.set_content("<b>");
        assert_eq!(editor.cursor(), 3);
        assert!(editor.dirty);
    }

    #[test]
    fn test_word_motion() {
        let mut editor = EditorState::new(Language::Js, "let x = 1;");
        editor.move_word_forward();
        assert_eq!(editor.cursor(), 4);
        editor.move_word_forward();
        assert_eq!(editor.cursor(), 6);

        editor.move_to_line_end();
        editor.move_word_back();
        assert_eq!(editor.cursor(), 8);
    }
}
