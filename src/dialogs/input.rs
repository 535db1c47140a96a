//! Single-line text editing shared by dialogs, the search box and the composer

/// Text buffer with a byte cursor kept on char boundaries
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        TextInput {
            cursor: value.len(),
            value,
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

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.value.len());
        }
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Conversation composer. Only non-blank text is submitted.
#[derive(Clone, Debug, Default)]
pub struct MessageInput {
    pub input: TextInput,
}

impl MessageInput {
    /// Take the trimmed text, leaving the composer empty.
    /// Whitespace-only input is kept as typed and nothing is returned.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.input.value().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.input.clear();
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte() {
        let mut input = TextInput::new("né");
        input.insert('!');
        assert_eq!(input.value(), "né!");
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "é!");
        assert_eq!(input.cursor(), 0);
        input.move_right();
        assert_eq!(input.cursor(), 'é'.len_utf8());
    }

    #[test]
    fn test_message_input_trims() {
        let mut composer = MessageInput::default();
        composer.input.set("   ");
        assert_eq!(composer.submit(), None);
        assert_eq!(composer.input.value(), "   ");

        composer.input.set("  hello there ");
        assert_eq!(composer.submit().as_deref(), Some("hello there"));
        assert_eq!(composer.input.value(), "");
    }
}
