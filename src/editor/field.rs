/// Caret position as a zero-based line and character column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    /// Column in characters, not bytes.
    pub col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A single editable text value with a caret.
///
/// The caret is a byte offset that always sits on a char boundary. Lines are
/// separated by `\n`; a field always has at least one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    caret: usize,
}

impl TextField {
    /// Wrap `text`, clamping `caret` to the nearest preceding char boundary.
    pub fn new(text: impl Into<String>, caret: usize) -> Self {
        let text = text.into();
        let caret = floor_boundary(&text, caret);
        Self { text, caret }
    }

    /// A field with the caret after the last character.
    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.len();
        Self { text, caret }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub const fn caret(&self) -> usize {
        self.caret
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Line and character column of the caret.
    pub fn cursor(&self) -> Cursor {
        cursor_at(&self.text, self.caret)
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.caret, ch);
        self.caret += ch.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.caret, s);
        self.caret += s.len();
    }

    /// Remove the character before the caret. Returns `false` at the start.
    pub fn delete_back(&mut self) -> bool {
        let Some((idx, _)) = self.text[..self.caret].char_indices().next_back() else {
            return false;
        };
        self.text.replace_range(idx..self.caret, "");
        self.caret = idx;
        true
    }

    /// Remove the character after the caret. Returns `false` at the end.
    pub fn delete_forward(&mut self) -> bool {
        let Some(ch) = self.text[self.caret..].chars().next() else {
            return false;
        };
        self.text
            .replace_range(self.caret..self.caret + ch.len_utf8(), "");
        true
    }

    pub fn move_left(&mut self) -> bool {
        match self.text[..self.caret].chars().next_back() {
            Some(ch) => {
                self.caret -= ch.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.text[self.caret..].chars().next() {
            Some(ch) => {
                self.caret += ch.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        self.caret = self.text[..self.caret].rfind('\n').map_or(0, |i| i + 1);
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        self.caret = self.text[self.caret..]
            .find('\n')
            .map_or(self.text.len(), |i| self.caret + i);
    }

    /// Move one line up keeping the column. Returns `false` on the first line.
    pub fn move_up(&mut self) -> bool {
        let cursor = self.cursor();
        if cursor.line == 0 {
            return false;
        }
        self.caret = offset_at(&self.text, cursor.line - 1, cursor.col);
        true
    }

    /// Move one line down keeping the column. Returns `false` on the last line.
    pub fn move_down(&mut self) -> bool {
        let cursor = self.cursor();
        if cursor.line + 1 >= self.line_count() {
            return false;
        }
        self.caret = offset_at(&self.text, cursor.line + 1, cursor.col);
        true
    }
}

fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Line and character column of a byte offset.
pub fn cursor_at(text: &str, offset: usize) -> Cursor {
    let before = &text[..floor_boundary(text, offset)];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Cursor::at(line, before[line_start..].chars().count())
}

/// Byte offset of `col` characters into `line`, clamped to the line and to
/// the last line of `text`.
pub fn offset_at(text: &str, line: usize, col: usize) -> usize {
    let mut start = 0;
    let mut lines = text.split('\n').peekable();
    let mut current = 0;
    while let Some(content) = lines.next() {
        if current == line || lines.peek().is_none() {
            return start
                + content
                    .char_indices()
                    .nth(col)
                    .map_or(content.len(), |(i, _)| i);
        }
        start += content.len() + 1;
        current += 1;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_caret_to_boundary() {
        let field = TextField::new("héllo", 2);
        assert_eq!(field.caret(), 1);
        let field = TextField::new("abc", 99);
        assert_eq!(field.caret(), 3);
    }

    #[test]
    fn test_insert_and_delete_back() {
        let mut field = TextField::at_end("ab");
        field.insert_char('ç');
        assert_eq!(field.text(), "abç");
        assert!(field.delete_back());
        assert!(field.delete_back());
        assert_eq!(field.text(), "a");
        assert_eq!(field.caret(), 1);
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut field = TextField::new("abc", 0);
        assert!(!field.delete_back());
        assert_eq!(field.text(), "abc");
    }

    #[test]
    fn test_delete_forward() {
        let mut field = TextField::new("añb", 1);
        assert!(field.delete_forward());
        assert_eq!(field.text(), "ab");
        let mut end = TextField::at_end("x");
        assert!(!end.delete_forward());
    }

    #[test]
    fn test_horizontal_moves_stop_at_edges() {
        let mut field = TextField::new("é", 0);
        assert!(!field.move_left());
        assert!(field.move_right());
        assert_eq!(field.caret(), 2);
        assert!(!field.move_right());
    }

    #[test]
    fn test_home_end_are_line_local() {
        let mut field = TextField::new("one\ntwo", 5);
        field.move_home();
        assert_eq!(field.caret(), 4);
        field.move_end();
        assert_eq!(field.caret(), 7);
        let mut first = TextField::new("one\ntwo", 1);
        first.move_end();
        assert_eq!(first.caret(), 3);
    }

    #[test]
    fn test_vertical_moves_keep_column() {
        let mut field = TextField::new("abcd\nxy\nlonger", 3);
        assert!(field.move_down());
        assert_eq!(field.cursor(), Cursor::at(1, 2));
        assert!(field.move_down());
        assert_eq!(field.cursor(), Cursor::at(2, 2));
        assert!(!field.move_down());
        assert!(field.move_up());
        assert!(field.move_up());
        assert!(!field.move_up());
    }

    #[test]
    fn test_shift_enter_newline() {
        let mut field = TextField::at_end("line");
        field.insert_char('\n');
        assert_eq!(field.line_count(), 2);
        assert_eq!(field.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_offset_at_clamps() {
        assert_eq!(offset_at("ab\ncd", 0, 10), 2);
        assert_eq!(offset_at("ab\ncd", 5, 1), 4);
        assert_eq!(offset_at("", 0, 3), 0);
    }
}
