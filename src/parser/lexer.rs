//! Lexer (tokenizer)
//!
//! Groups the characters of a [`CharacterSource`] into [`Token`]s on demand.
//! Classification looks only at the first significant character; each class
//! then extends greedily and pushes back whatever did not fit:
//!
//! - `(){}[];` are single-character separators
//! - `[A-Za-z_$][A-Za-z0-9_$]*` is a symbol
//! - a digit or `.` starts a number, backtracking to the longest valid numeral
//! - runs of `+-*/%<=>?:!&|^~,.` form one operator token, validated later by the parser
//! - `'` / `"` start a string literal with `\` escaping exactly one character
//! - anything else is a one-character [`TokenKind::Other`]
//!
//! Comments are not returned on their own; they are attached to the next
//! token's `comments`. Unterminated strings and block comments end the token
//! stream.

use super::ast::SourceLocation;
use super::reader::CharacterSource;
use super::token::{Token, TokenKind};

const SEPARATORS: &str = "(){}[];";
const OPERATOR_CHARS: &str = "+-*/%<=>?:!&|^~,.";

pub(crate) fn is_operator_char(ch: char) -> bool {
    OPERATOR_CHARS.contains(ch)
}

pub(crate) fn is_symbol_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

pub(crate) fn is_symbol_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// How much of the numeric grammar a candidate string satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumeralShape {
    /// Cannot be extended into a numeral
    Invalid,
    /// A proper prefix of some numeral (`0x`, `1e`, `.`)
    Partial,
    /// A complete numeral
    Complete,
}

fn numeral_shape(text: &str) -> NumeralShape {
    let chars: Vec<char> = text.chars().collect();

    if chars.len() >= 2 && chars[0] == '0' {
        let radix = match chars[1] {
            'x' | 'X' => Some(16),
            'o' | 'O' => Some(8),
            'b' | 'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let digits = &chars[2..];
            return if !digits.iter().all(|c| c.is_digit(radix)) {
                NumeralShape::Invalid
            } else if digits.is_empty() {
                NumeralShape::Partial
            } else {
                NumeralShape::Complete
            };
        }
    }

    let mut i = 0;
    let count_digits = |i: &mut usize| {
        let start = *i;
        while *i < chars.len() && chars[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };

    let int_digits = count_digits(&mut i);
    let mut frac_digits = 0;
    let mut has_dot = false;
    if i < chars.len() && chars[i] == '.' {
        has_dot = true;
        i += 1;
        frac_digits = count_digits(&mut i);
    }
    if int_digits == 0 && !has_dot {
        return NumeralShape::Invalid;
    }

    let mut exponent = None;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        i += 1;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            i += 1;
        }
        exponent = Some(count_digits(&mut i));
    }

    if i != chars.len() {
        return NumeralShape::Invalid;
    }

    let mantissa_ok = int_digits > 0 || frac_digits > 0;
    let exponent_ok = exponent.map_or(true, |digits| digits > 0);
    if mantissa_ok && exponent_ok {
        NumeralShape::Complete
    } else {
        NumeralShape::Partial
    }
}

/// Token reader with unlimited pushback.
pub struct Lexer {
    source: CharacterSource,
    pending: Vec<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::from_source(CharacterSource::new(input))
    }

    pub fn from_source(source: CharacterSource) -> Self {
        Self {
            source,
            pending: Vec::new(),
        }
    }

    pub fn source(&self) -> &CharacterSource {
        &self.source
    }

    /// Read the next token, `None` at end of input.
    pub fn read(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.pop() {
            return Some(token);
        }

        let mut comments = Vec::new();
        loop {
            let ch = self.skip_whitespace()?;
            let location = self.source.position();
            self.source.read();

            if ch == '/' {
                if let Some(comment) = self.comment(location)? {
                    comments.push(comment);
                    continue;
                }
            }

            let mut token = self.token(ch, location)?;
            token.comments = comments;
            return Some(token);
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&Token> {
        if self.pending.is_empty() {
            let token = self.read()?;
            self.pending.push(token);
        }
        self.pending.last()
    }

    /// Push one token back.
    pub fn unread(&mut self, token: Token) {
        self.pending.push(token);
    }

    /// Push a sequence back; subsequent reads return it in its original order.
    pub fn unread_all(&mut self, tokens: impl IntoIterator<Item = Token>) {
        let tokens: Vec<Token> = tokens.into_iter().collect();
        self.pending.extend(tokens.into_iter().rev());
    }

    /// Skip whitespace and return (without consuming) the next character.
    fn skip_whitespace(&mut self) -> Option<char> {
        loop {
            let ch = self.source.read()?;
            if !ch.is_whitespace() {
                self.source.unread(&ch.to_string());
                return Some(ch);
            }
        }
    }

    /// Called after a `/` was consumed.
    ///
    /// Outer `None` means input ended inside a block comment; inner `None`
    /// means the `/` does not start a comment.
    fn comment(&mut self, location: SourceLocation) -> Option<Option<Token>> {
        match self.source.read() {
            Some('/') => {
                let mut text = String::from("//");
                while let Some(ch) = self.source.read() {
                    if ch == '\n' {
                        self.source.unread("\n");
                        break;
                    }
                    text.push(ch);
                }
                Some(Some(Token::new(TokenKind::Comment, text, location)))
            }
            Some('*') => {
                let mut text = String::from("/*");
                loop {
                    let ch = self.source.read()?;
                    text.push(ch);
                    if text.len() >= 4 && text.ends_with("*/") {
                        break;
                    }
                }
                Some(Some(Token::new(TokenKind::Comment, text, location)))
            }
            Some(other) => {
                self.source.unread(&other.to_string());
                Some(None)
            }
            None => Some(None),
        }
    }

    /// Lex one token whose first character `ch` was already consumed.
    fn token(&mut self, ch: char, location: SourceLocation) -> Option<Token> {
        if SEPARATORS.contains(ch) {
            return Some(Token::separator(ch, location));
        }
        if is_symbol_start(ch) {
            return Some(self.symbol(ch, location));
        }
        if ch.is_ascii_digit() || ch == '.' {
            return Some(self.number(ch, location));
        }
        if is_operator_char(ch) {
            return Some(self.operator(ch.to_string(), location));
        }
        if ch == '\'' || ch == '"' {
            return self.string(ch, location);
        }
        Some(Token::new(TokenKind::Other, ch.to_string(), location))
    }

    fn symbol(&mut self, first: char, location: SourceLocation) -> Token {
        let mut text = first.to_string();
        while let Some(ch) = self.source.read() {
            if !is_symbol_char(ch) {
                self.source.unread(&ch.to_string());
                break;
            }
            text.push(ch);
        }
        Token::symbol(&text, location)
    }

    /// Longest-match numeral scan with backtracking.
    fn number(&mut self, first: char, location: SourceLocation) -> Token {
        let mut text = first.to_string();
        let mut longest = String::new();
        let mut ahead = String::new();

        loop {
            match numeral_shape(&text) {
                NumeralShape::Invalid => break,
                NumeralShape::Complete => {
                    longest.clone_from(&text);
                    ahead.clear();
                }
                NumeralShape::Partial => {}
            }
            let Some(ch) = self.source.read() else {
                break;
            };
            text.push(ch);
            ahead.push(ch);
        }
        self.source.unread(&ahead);

        // A lone '.' is the start of an operator.
        if longest.is_empty() {
            return self.operator(first.to_string(), location);
        }

        // `123.toString` and `1..2`: the trailing dot belongs to an operator.
        if longest.len() > 1 && longest.ends_with('.') {
            let follows = ahead.chars().next();
            if follows.is_some_and(|c| c == '.' || is_symbol_start(c)) {
                longest.pop();
                self.source.unread(".");
            }
        }

        Token::number(&longest, location)
    }

    /// Greedy operator scan starting from `text`.
    ///
    /// The scan stops in front of `//` or `/*` so that a comment directly
    /// after an operator is still recognised.
    fn operator(&mut self, mut text: String, location: SourceLocation) -> Token {
        while let Some(ch) = self.source.read() {
            if !is_operator_char(ch) {
                self.source.unread(&ch.to_string());
                break;
            }
            if ch == '/' {
                if let Some(next) = self.source.read() {
                    self.source.unread(&next.to_string());
                    if next == '/' || next == '*' {
                        self.source.unread("/");
                        break;
                    }
                }
            }
            text.push(ch);
        }
        Token::operator(&text, location)
    }

    /// String literal; `None` if the input ends before the closing quote.
    fn string(&mut self, quote: char, location: SourceLocation) -> Option<Token> {
        let mut text = quote.to_string();
        loop {
            let ch = self.source.read()?;
            text.push(ch);
            if ch == '\\' {
                text.push(self.source.read()?);
            } else if ch == quote {
                return Some(Token::string(&text, location));
            }
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        Lexer::new(input).map(|t| t.text).collect()
    }

    #[test]
    fn test_number_member_split() {
        assert_eq!(texts("123.toString"), vec!["123", ".", "toString"]);
        assert_eq!(texts("123..toString"), vec!["123", "..", "toString"]);
        assert_eq!(texts("1..2"), vec!["1", "..", "2"]);
        assert_eq!(texts("1...3"), vec!["1", "...", "3"]);
        assert_eq!(texts("1.2"), vec!["1.2"]);
    }

    #[test]
    fn test_number_longest_prefix() {
        assert_eq!(texts("123.3e12ee"), vec!["123.3e12", "ee"]);
        assert_eq!(texts("3."), vec!["3."]);
        assert_eq!(texts(".3"), vec![".3"]);
        assert_eq!(texts("1e+"), vec!["1", "e", "+"]);
        assert_eq!(texts(",.2"), vec![",.", "2"]);
    }

    #[test]
    fn test_radix_literals() {
        for (input, expected) in [("0x11", 17.0), ("0o77", 63.0), ("0b11", 3.0)] {
            let token = Lexer::new(input).read().unwrap();
            assert_eq!(token.text, input);
            assert_eq!(token.kind, TokenKind::Number(expected));
        }
    }

    #[test]
    fn test_symbols_and_greedy_operators() {
        assert_eq!(texts("$.$$"), vec!["$", ".", "$$"]);
        assert_eq!(texts("<<<"), vec!["<<<"]);
        assert_eq!(texts("a****b"), vec!["a", "****", "b"]);
        assert_eq!(texts("x>>>=1;"), vec!["x", ">>>=", "1", ";"]);
        assert_eq!(texts("f(a)[0]{}"), vec!["f", "(", "a", ")", "[", "0", "]", "{", "}"]);
    }

    #[test]
    fn test_other_character() {
        let tokens: Vec<Token> = Lexer::new("a # b").collect();
        assert_eq!(tokens[1].kind, TokenKind::Other);
        assert_eq!(tokens[1].text, "#");
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let tokens: Vec<Token> = Lexer::new(r"'a\'b'").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, r"'a\'b'");
        assert_eq!(tokens[0].kind, TokenKind::String("a'b".to_string()));
    }

    #[test]
    fn test_unterminated_literals_end_stream() {
        assert_eq!(texts("a 'open"), vec!["a"]);
        assert_eq!(texts("a /* open"), vec!["a"]);
    }

    #[test]
    fn test_comments_attach_to_next_token() {
        let mut lexer = Lexer::new("// one\n/* two */ x /* three */ + y");
        let x = lexer.read().unwrap();
        assert_eq!(x.text, "x");
        let comments: Vec<&str> = x.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(comments, vec!["// one", "/* two */"]);
        assert!(x.comments.iter().all(|c| c.kind == TokenKind::Comment));

        let plus = lexer.read().unwrap();
        assert_eq!(plus.text, "+");
        assert_eq!(plus.comments.len(), 1);

        let y = lexer.read().unwrap();
        assert!(y.comments.is_empty());
    }

    #[test]
    fn test_comment_after_operator() {
        let tokens: Vec<Token> = Lexer::new("a=//c\n1").collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "=", "1"]);
        assert_eq!(tokens[2].comments[0].text, "//c");
    }

    #[test]
    fn test_trailing_comment_is_dropped() {
        let mut lexer = Lexer::new("1 // done");
        assert_eq!(lexer.read().unwrap().text, "1");
        assert!(lexer.read().is_none());
        assert!(Lexer::new("/* only */").read().is_none());
    }

    #[test]
    fn test_peek_and_unread() {
        let mut lexer = Lexer::new("a b c");
        assert_eq!(lexer.peek().unwrap().text, "a");
        let a = lexer.read().unwrap();
        let b = lexer.read().unwrap();
        assert_eq!(a.text, "a");
        lexer.unread_all(vec![a, b]);
        assert_eq!(texts_of(&mut lexer), vec!["a", "b", "c"]);

        let mut lexer = Lexer::new("x y");
        let x = lexer.read().unwrap();
        lexer.unread(x);
        assert_eq!(lexer.read().unwrap().text, "x");
    }

    fn texts_of(lexer: &mut Lexer) -> Vec<String> {
        lexer.by_ref().map(|t| t.text).collect()
    }

    #[test]
    fn test_token_locations() {
        let tokens: Vec<Token> = Lexer::new("var a\n  = 10;").collect();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[3].location, SourceLocation::new(2, 5));
        assert_eq!(tokens[4].location, SourceLocation::new(2, 7));
    }
}
