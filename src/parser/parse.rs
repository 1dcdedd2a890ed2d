//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, token helpers, and the statement entry points.
//!
//! # Parser Architecture
//!
//! The Parser is a pull parser over a [`Lexer`]; it never tokenizes ahead
//! beyond what the grammar needs. Its methods are split across files using
//! `impl Parser` blocks:
//! - This module: Parser struct, helper methods, `parse_statement`, `parse_program`
//! - `statements`: blocks, `var` declarations, `if` chains
//! - `expressions`: precedence climbing over the operator levels
//!
//! Sub-parsers return `Ok(None)` when the next token cannot start their
//! construct, leaving that token unread, and `Err` once a construct has been
//! started but cannot be completed.

use super::ast::*;
use super::lexer::Lexer;
use super::token::{Token, TokenKind};
use std::fmt;

/// Symbols that never parse as a plain identifier.
pub(crate) const KEYWORDS: &[&str] = &[
    "var",
    "if",
    "else",
    "elseif",
    "elsif",
    "new",
    "typeof",
    "void",
    "delete",
    "in",
    "instanceof",
];

pub(crate) fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Whether some operator table of the grammar contains `text`.
pub(crate) fn is_known_operator(text: &str) -> bool {
    matches!(text, "?" | ":" | ",")
        || BinaryOp::from_symbol(text).is_some()
        || PrefixOp::from_symbol(text).is_some()
        || PostfixOp::from_symbol(text).is_some()
        || AccessOp::from_symbol(text).is_some()
}

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    /// The offending token, `None` at end of input.
    pub token: Option<Token>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            token: None,
        }
    }

    pub(crate) fn at_token(message: impl Into<String>, token: Token) -> Self {
        Self {
            message: message.into(),
            location: token.location,
            token: Some(token),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Deepest nesting of parentheses, prefix operators, `new` and blocks
pub const MAX_NESTING: usize = 64;

/// Recursive descent parser over a token stream
pub struct Parser {
    pub(crate) lexer: Lexer,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::from_lexer(Lexer::new(source))
    }

    pub fn from_lexer(lexer: Lexer) -> Self {
        Self { lexer, depth: 0 }
    }

    /// Name of the underlying source, for diagnostics
    pub fn source_name(&self) -> Option<&str> {
        self.lexer.source().name()
    }

    /// Parse one statement.
    ///
    /// Returns `Ok(None)` at end of input and in front of a `}` that closes
    /// the current nesting level; the `}` is left unread.
    pub fn parse_statement(&mut self) -> Result<Option<Syntax>, ParseError> {
        let Some(token) = self.lexer.peek().cloned() else {
            return Ok(None);
        };

        if token.is_separator('}') {
            return Ok(None);
        }
        if token.is_separator(';') {
            self.lexer.read();
            return Ok(Some(Syntax::Empty {
                location: token.location,
            }));
        }
        if token.is_separator('{') {
            return self.parse_block().map(Some);
        }
        if token.is_symbol("var") {
            return self.parse_var_statement().map(Some);
        }
        if token.is_symbol("if") {
            return self.parse_if_statement().map(Some);
        }

        let Some(expr) = self.parse_expression()? else {
            let found = self.lexer.peek().cloned();
            return Err(self.unexpected(found));
        };
        self.check_statement_end()?;
        self.match_separator(';');

        Ok(Some(Syntax::ExpressionStatement {
            expr: Box::new(expr),
            location: token.location,
        }))
    }

    /// Parse every remaining statement.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while let Some(statement) = self.parse_statement()? {
            program.statements.push(statement);
        }

        self.expect_end()?;
        Ok(program)
    }

    /// Fail on any leftover token, such as a `}` with no matching `{`.
    /// The offending token is consumed.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.lexer.read() {
            Some(token) => Err(self.unexpected(Some(token))),
            None => Ok(()),
        }
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING`].
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            let location = self.current_location();
            return Err(ParseError::new(
                format!("nesting deeper than {} levels", MAX_NESTING),
                location,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Discard tokens through the next `;` or `}` after a grammar error.
    pub fn synchronize(&mut self) {
        while let Some(token) = self.lexer.read() {
            if token.is_separator(';') || token.is_separator('}') {
                break;
            }
        }
    }

    pub fn is_at_end(&mut self) -> bool {
        self.lexer.peek().is_none()
    }

    // ===== Helper methods =====

    /// A complete expression statement may only be followed by `;`, a new
    /// statement, or the end of the enclosing block.
    fn check_statement_end(&mut self) -> Result<(), ParseError> {
        match self.lexer.peek() {
            Some(token) if matches!(token.kind, TokenKind::Operator | TokenKind::Other) => {
                let token = token.clone();
                Err(self.unexpected(Some(token)))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn check_separator(&mut self, ch: char) -> bool {
        self.lexer.peek().is_some_and(|t| t.is_separator(ch))
    }

    pub(crate) fn check_operator(&mut self, text: &str) -> bool {
        self.lexer.peek().is_some_and(|t| t.is_operator(text))
    }

    pub(crate) fn check_keyword(&mut self, keyword: &str) -> bool {
        self.lexer.peek().is_some_and(|t| t.is_symbol(keyword))
    }

    pub(crate) fn match_separator(&mut self, ch: char) -> Option<Token> {
        if self.check_separator(ch) {
            self.lexer.read()
        } else {
            None
        }
    }

    pub(crate) fn match_operator(&mut self, text: &str) -> Option<Token> {
        if self.check_operator(text) {
            self.lexer.read()
        } else {
            None
        }
    }

    /// Consume the separator `ch` or fail, leaving the offending token unread.
    pub(crate) fn expect_separator(&mut self, ch: char, ctx: &str) -> Result<Token, ParseError> {
        if let Some(token) = self.match_separator(ch) {
            return Ok(token);
        }
        let found = self.lexer.peek().cloned();
        Err(self.expected(&format!("'{}' {}", ch, ctx), found))
    }

    /// Turn a missing operand into an error naming what preceded it.
    pub(crate) fn require(
        &mut self,
        expr: Option<Syntax>,
        after: &str,
    ) -> Result<Syntax, ParseError> {
        match expr {
            Some(expr) => Ok(expr),
            None => {
                let found = self.lexer.peek().cloned();
                Err(self.expected(&format!("expression after {}", after), found))
            }
        }
    }

    pub(crate) fn current_location(&mut self) -> SourceLocation {
        match self.lexer.peek() {
            Some(token) => token.location,
            None => self.lexer.source().position(),
        }
    }

    pub(crate) fn unexpected(&mut self, found: Option<Token>) -> ParseError {
        match found {
            Some(token) if is_unknown_operator(&token) => unknown_operator(token),
            Some(token) => ParseError::at_token(format!("unexpected {}", token.describe()), token),
            None => ParseError::new("unexpected end of input", self.current_location()),
        }
    }

    pub(crate) fn expected(&mut self, what: &str, found: Option<Token>) -> ParseError {
        match found {
            Some(token) if is_unknown_operator(&token) => unknown_operator(token),
            Some(token) => ParseError::at_token(
                format!("expected {}, found {}", what, token.describe()),
                token,
            ),
            None => ParseError::new(
                format!("expected {}, found end of input", what),
                self.current_location(),
            ),
        }
    }
}

fn is_unknown_operator(token: &Token) -> bool {
    token.kind == TokenKind::Operator && !is_known_operator(&token.text)
}

fn unknown_operator(token: Token) -> ParseError {
    ParseError::at_token(format!("unknown operator '{}'", token.text), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::reader::CharacterSource;

    fn parse_one(source: &str) -> Syntax {
        Parser::new(source).parse_statement().unwrap().unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        Parser::new(source).parse_program().unwrap_err()
    }

    #[test]
    fn test_statement_dispatch() {
        assert!(matches!(parse_one(";"), Syntax::Empty { .. }));
        assert!(matches!(parse_one("{}"), Syntax::Block { .. }));
        assert!(matches!(parse_one("var a;"), Syntax::Var { .. }));
        assert!(matches!(parse_one("if (a) b;"), Syntax::If { .. }));
        assert!(matches!(
            parse_one("a + 1;"),
            Syntax::ExpressionStatement { .. }
        ));
    }

    #[test]
    fn test_end_of_input_and_closer_yield_none() {
        assert_eq!(Parser::new("").parse_statement().unwrap(), None);
        assert_eq!(Parser::new("  // note").parse_statement().unwrap(), None);

        let mut parser = Parser::new("} x");
        assert_eq!(parser.parse_statement().unwrap(), None);
        assert!(parser.check_separator('}'));
    }

    #[test]
    fn test_semicolon_is_optional() {
        let program = Parser::new("1 2; 3").parse_program().unwrap();
        assert_eq!(program.statements.len(), 3);
        assert_eq!(program.to_string(), "1;\n2;\n3;\n");
    }

    #[test]
    fn test_unknown_operator_is_reported() {
        let err = parse_err("a **** b;");
        assert_eq!(err.message, "unknown operator '****'");
        assert_eq!(err.location, SourceLocation::new(1, 3));
        assert_eq!(err.token.map(|t| t.text), Some("****".to_string()));

        let err = parse_err("1..2;");
        assert_eq!(err.message, "unknown operator '..'");
    }

    #[test]
    fn test_known_operator_in_wrong_place() {
        let err = parse_err("a : b;");
        assert_eq!(err.message, "unexpected operator ':'");
    }

    #[test]
    fn test_stray_closer() {
        let err = parse_err("1; }");
        assert_eq!(err.message, "unexpected '}'");
    }

    #[test]
    fn test_error_display() {
        let err = parse_err("(1;");
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 3: expected ')' to close '(', found ';'"
        );
    }

    #[test]
    fn test_source_name() {
        let reader = CharacterSource::new("1;").with_name("main.nl");
        let parser = Parser::from_lexer(Lexer::from_source(reader));
        assert_eq!(parser.source_name(), Some("main.nl"));
        assert_eq!(Parser::new("1;").source_name(), None);
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let deep = format!("{}1{};", "(".repeat(3000), ")".repeat(3000));
        let err = parse_err(&deep);
        assert_eq!(err.message, "nesting deeper than 64 levels");

        let err = parse_err(&format!("{}x;", "- ".repeat(3000)));
        assert_eq!(err.message, "nesting deeper than 64 levels");

        let err = parse_err(&format!("{}1;", "{".repeat(3000)));
        assert_eq!(err.message, "nesting deeper than 64 levels");

        let err = parse_err(&format!("{}1;", "a=".repeat(3000)));
        assert_eq!(err.message, "nesting deeper than 64 levels");
    }

    #[test]
    fn test_nesting_depth_recovers_after_error() {
        let mut parser = Parser::new(&format!("{}1; 2;", "(".repeat(500)));
        assert!(parser.parse_statement().is_err());
        parser.synchronize();
        assert_eq!(parser.parse_statement().unwrap().unwrap().to_string(), "2;");

        let shallow = format!("{}1{};", "(".repeat(40), ")".repeat(40));
        assert_eq!(parse_one(&shallow).to_string(), "(1);");
    }

    #[test]
    fn test_synchronize_skips_to_next_statement() {
        let mut parser = Parser::new("1 + ; 2;");
        assert!(parser.parse_statement().is_err());
        parser.synchronize();
        let next = parser.parse_statement().unwrap().unwrap();
        assert_eq!(next.to_string(), "2;");
        assert!(parser.is_at_end());
    }
}
