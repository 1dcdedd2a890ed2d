//! Token model
//!
//! Every token keeps the exact source text it was built from, so printing a
//! token always reproduces the source. Number and string literals also carry
//! their decoded value.

use super::ast::SourceLocation;
use std::fmt;

/// Token classification produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Greedy run of operator characters (`+`, `>>>=`, `?.`, `****`)
    Operator,
    /// Identifier or keyword
    Symbol,
    /// One of `(){}[];`
    Separator,
    /// Numeric literal with its decoded value
    Number(f64),
    /// Quoted string literal with its escape-decoded value
    String(String),
    /// Any unclassified character
    Other,
    /// `// ...` or `/* ... */`
    Comment,
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
    /// Comments that appeared between the previous token and this one.
    pub comments: Vec<Token>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
            comments: Vec::new(),
        }
    }

    pub fn operator(text: &str, location: SourceLocation) -> Self {
        Self::new(TokenKind::Operator, text, location)
    }

    pub fn symbol(text: &str, location: SourceLocation) -> Self {
        Self::new(TokenKind::Symbol, text, location)
    }

    pub fn separator(ch: char, location: SourceLocation) -> Self {
        Self::new(TokenKind::Separator, ch.to_string(), location)
    }

    pub fn number(text: &str, location: SourceLocation) -> Self {
        Self::new(TokenKind::Number(decode_number(text)), text, location)
    }

    pub fn string(text: &str, location: SourceLocation) -> Self {
        Self::new(TokenKind::String(decode_string(text)), text, location)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == text
    }

    pub fn is_separator(&self, ch: char) -> bool {
        self.kind == TokenKind::Separator && self.text.starts_with(ch)
    }

    pub fn is_symbol(&self, text: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == text
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Operator => format!("operator '{}'", self.text),
            TokenKind::Symbol => format!("symbol '{}'", self.text),
            TokenKind::Separator => format!("'{}'", self.text),
            TokenKind::Number(_) => format!("number {}", self.text),
            TokenKind::String(_) => format!("string {}", self.text),
            TokenKind::Other => format!("character '{}'", self.text),
            TokenKind::Comment => "comment".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Decode a numeric literal: `0x`/`0o`/`0b` radix prefixes, otherwise
/// decimal with optional fraction and exponent (`3.`, `.5`, `9e4`).
pub fn decode_number(text: &str) -> f64 {
    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => return text.parse::<f64>().unwrap_or(f64::NAN),
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0, |acc, ch| {
        ch.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
    .unwrap_or(f64::NAN)
}

/// Decode a quoted string literal (including its quotes).
///
/// Recognised escapes are `\n \t \r \b \f \v \0 \xHH \uHHHH \u{H..}`; a
/// backslash before any other character yields that character, and a
/// backslash-newline is a line continuation.
pub fn decode_string(text: &str) -> String {
    let mut chars = text.chars();
    let quote = chars.next();
    let mut body: Vec<char> = chars.collect();
    if quote.is_some() && body.last() == quote.as_ref() {
        body.pop();
    }

    let mut out = String::with_capacity(body.len());
    let mut iter = body.into_iter().peekable();
    while let Some(ch) = iter.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escaped) = iter.next() else {
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => {
                let hex: String = iter.by_ref().take(2).collect();
                push_code_point(&mut out, 'x', &hex);
            }
            'u' if iter.peek() == Some(&'{') => {
                iter.next();
                let hex: String = iter.by_ref().take_while(|&c| c != '}').collect();
                push_code_point(&mut out, 'u', &hex);
            }
            'u' => {
                let hex: String = iter.by_ref().take(4).collect();
                push_code_point(&mut out, 'u', &hex);
            }
            other => out.push(other),
        }
    }
    out
}

fn push_code_point(out: &mut String, marker: char, hex: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(ch) => out.push(ch),
        None => {
            out.push(marker);
            out.push_str(hex);
        }
    }
}
