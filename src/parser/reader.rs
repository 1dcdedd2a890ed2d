//! Character source for the lexer
//!
//! [`CharacterSource`] hands out one character at a time from an in-memory
//! buffer and accepts any amount of pushback. Pushed-back text that matches
//! the characters just consumed rewinds the cursor, so line/column always
//! describe the next character that [`CharacterSource::read`] will return.

use super::ast::SourceLocation;

/// In-memory character reader with LIFO pushback and position tracking
#[derive(Debug, Clone)]
pub struct CharacterSource {
    input: Vec<char>,
    position: usize,
    pushback: Vec<char>,
    line: usize,
    column: usize,
    name: Option<String>,
}

impl CharacterSource {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            pushback: Vec::new(),
            line: 1,
            column: 1,
            name: None,
        }
    }

    /// Attach a human-readable source name (usually the file name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Read the next character, `None` at end of input.
    pub fn read(&mut self) -> Option<char> {
        if let Some(ch) = self.pushback.pop() {
            return Some(ch);
        }

        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Push `text` back so that the following reads return it in order.
    pub fn unread(&mut self, text: &str) {
        for ch in text.chars().rev() {
            if self.pushback.is_empty()
                && self.position > 0
                && self.input[self.position - 1] == ch
            {
                self.rewind();
            } else {
                self.pushback.push(ch);
            }
        }
    }

    /// Position of the next character to be read.
    pub fn position(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    pub fn is_at_end(&self) -> bool {
        self.pushback.is_empty() && self.position >= self.input.len()
    }

    /// Step the cursor back over the last consumed input character.
    fn rewind(&mut self) {
        self.position -= 1;
        if self.input[self.position] == '\n' {
            self.line -= 1;
            let line_start = self.input[..self.position]
                .iter()
                .rposition(|&c| c == '\n')
                .map_or(0, |i| i + 1);
            self.column = self.position - line_start + 1;
        } else {
            self.column -= 1;
        }
    }
}

impl Iterator for CharacterSource {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.read()
    }
}
