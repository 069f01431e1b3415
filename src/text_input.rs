//! Single-line text field used inside modals.

use ratatui::style::{Color, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

/// Editable single-line text with a character cursor.
///
/// The field only reacts to edits while focused; modals focus and blur it as
/// focus moves on and off the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field holding `value` with the cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self {
            value,
            cursor,
            focused: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.cursor = self.char_len();
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor. Returns true if the value changed.
    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.focused || c.is_control() {
            return false;
        }
        let byte_pos = self.byte_offset();
        self.value.insert(byte_pos, c);
        self.cursor += 1;
        true
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char_before(&mut self) -> bool {
        if !self.focused || self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_pos = self.byte_offset();
        self.value.remove(byte_pos);
        true
    }

    /// Delete the character at the cursor (delete key).
    pub fn delete_char_at(&mut self) -> bool {
        if !self.focused {
            return false;
        }
        let byte_pos = self.byte_offset();
        if byte_pos < self.value.len() {
            self.value.remove(byte_pos);
            true
        } else {
            false
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Styled spans for the field, scrolled horizontally so the cursor stays
    /// inside `width` columns. The cursor cell is drawn inverted when focused.
    pub fn spans(&self, width: usize, placeholder: &str) -> Vec<Span<'static>> {
        if self.value.is_empty() && !self.focused {
            return vec![Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )];
        }

        let chars: Vec<char> = self.value.chars().collect();
        // the cursor cell takes a column of its own when it sits past the end
        let width = if self.focused {
            width.saturating_sub(1).max(1)
        } else {
            width.max(1)
        };
        let (start, end) = visible_window(&chars, self.cursor, width);
        let visible: String = chars[start..end].iter().collect();

        if !self.focused {
            return vec![Span::styled(visible, Style::default().fg(Color::White))];
        }

        let visible_cursor = self.cursor - start;
        let before: String = chars[start..start + visible_cursor].iter().collect();
        let (cursor_char, rest) = if start + visible_cursor < end {
            (
                chars[start + visible_cursor].to_string(),
                chars[start + visible_cursor + 1..end].iter().collect(),
            )
        } else {
            (" ".to_string(), String::new())
        };

        vec![
            Span::styled(before, Style::default().fg(Color::White)),
            Span::styled(
                cursor_char,
                Style::default().fg(Color::Black).bg(Color::White),
            ),
            Span::styled(rest, Style::default().fg(Color::White)),
        ]
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

/// Char range of `chars` that fits in `width` display cells around `cursor`.
///
/// The cursor sits near the middle of the window, and the window is pulled
/// back to fill the field when it reaches the end of the value.
fn visible_window(chars: &[char], cursor: usize, width: usize) -> (usize, usize) {
    let cells = |c: &char| c.width().unwrap_or(0);
    if chars.iter().map(cells).sum::<usize>() <= width {
        return (0, chars.len());
    }

    let cursor = cursor.min(chars.len());
    let mut start = cursor;
    let mut used = 0;
    while start > 0 && used + cells(&chars[start - 1]) <= width / 2 {
        start -= 1;
        used += cells(&chars[start]);
    }

    let mut end = start;
    used = 0;
    while end < chars.len() && used + cells(&chars[end]) <= width {
        used += cells(&chars[end]);
        end += 1;
    }

    while start > 0 && used + cells(&chars[start - 1]) <= width {
        start -= 1;
        used += cells(&chars[start]);
    }
    (start, end)
}
