//! Statement parsing implementation
//!
//! Handles the statement forms that need more than an expression:
//!
//! - Blocks: `{ ... }`
//! - Variable declarations: `var a = 1, b;`
//! - Conditional chains: `if (c) s elseif (c) s elsif (c) s else if (c) s else s`
//!
//! # Grammar
//!
//! ```text
//! block    ::= '{' statement* '}'
//! var_stmt ::= 'var' symbol ['=' assign_expr] (',' symbol ['=' assign_expr])* [';']
//! if_stmt  ::= 'if' '(' expr ')' statement
//!              (('elseif' | 'elsif' | 'else' 'if') '(' expr ')' statement)*
//!              ['else' statement]
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{is_keyword, ParseError, Parser};
use crate::parser::token::{Token, TokenKind};

impl Parser {
    /// Parse a braced block.
    ///
    /// A block that reaches end of input after at least one statement is
    /// accepted without its closer; an empty one is not.
    pub fn parse_block(&mut self) -> Result<Syntax, ParseError> {
        let open = self.expect_separator('{', "to open block")?;

        let mut statements = Vec::new();
        while let Some(statement) = self.nested(Self::parse_statement)? {
            statements.push(statement);
        }

        if self.match_separator('}').is_none() && statements.is_empty() {
            return Err(ParseError::new(
                "unexpected end of input inside block",
                self.current_location(),
            ));
        }

        Ok(Syntax::Block {
            statements,
            location: open.location,
        })
    }

    pub(crate) fn parse_var_statement(&mut self) -> Result<Syntax, ParseError> {
        let keyword = self.expect_keyword("var")?;
        let mut declarations = Vec::new();
        let mut separator = None;

        while let Some(token) = self.lexer.read() {
            if token.kind != TokenKind::Symbol || is_keyword(&token.text) {
                let err = ParseError::at_token(
                    format!("expected symbol after 'var', found {}", token.describe()),
                    token.clone(),
                );
                self.lexer.unread(token);
                return Err(err);
            }

            let mut init = None;
            separator = self.lexer.read();
            if separator.as_ref().is_some_and(|t| t.is_operator("=")) {
                let expr = self.parse_assignment()?;
                init = Some(self.require(expr, &format!("'{} ='", token.text))?);
                separator = self.lexer.read();
            }

            declarations.push(VarDeclarator {
                name: token.text,
                init,
                location: token.location,
            });

            if !separator.as_ref().is_some_and(|t| t.is_operator(",")) {
                break;
            }
        }

        if declarations.is_empty() {
            return Err(ParseError::new(
                "expected symbol after 'var', found end of input",
                self.current_location(),
            ));
        }

        match separator {
            Some(token) if token.is_separator(';') => {}
            Some(token) => self.lexer.unread(token),
            None => {}
        }

        Ok(Syntax::Var {
            declarations,
            location: keyword.location,
        })
    }

    pub(crate) fn parse_if_statement(&mut self) -> Result<Syntax, ParseError> {
        let keyword = self.expect_keyword("if")?;
        let mut branches = vec![self.parse_if_branch(BranchKeyword::If)?];

        loop {
            let keyword = if self.check_keyword("elseif") {
                BranchKeyword::ElseIf
            } else if self.check_keyword("elsif") {
                BranchKeyword::Elsif
            } else if self.check_keyword("else") {
                BranchKeyword::Else
            } else {
                break;
            };
            self.lexer.read();

            if keyword == BranchKeyword::Else {
                if self.check_keyword("if") {
                    self.lexer.read();
                    branches.push(self.parse_if_branch(BranchKeyword::ElseSpaceIf)?);
                    continue;
                }
                let body = self.parse_branch_body(keyword)?;
                branches.push(IfBranch {
                    keyword,
                    condition: None,
                    body,
                });
                break;
            }

            branches.push(self.parse_if_branch(keyword)?);
        }

        Ok(Syntax::If {
            branches,
            location: keyword.location,
        })
    }

    /// `( condition ) statement`, after the branch keyword.
    fn parse_if_branch(&mut self, keyword: BranchKeyword) -> Result<IfBranch, ParseError> {
        let ctx = format!("after '{}'", keyword.text());
        self.expect_separator('(', &ctx)?;
        let condition = self.parse_expression()?;
        let condition = self.require(condition, "'('")?;
        self.expect_separator(')', "after condition")?;
        let body = self.parse_branch_body(keyword)?;

        Ok(IfBranch {
            keyword,
            condition: Some(condition),
            body,
        })
    }

    fn parse_branch_body(&mut self, keyword: BranchKeyword) -> Result<Syntax, ParseError> {
        match self.nested(Self::parse_statement)? {
            Some(body) => Ok(body),
            None => {
                let found = self.lexer.peek().cloned();
                Err(self.expected(&format!("statement after '{}'", keyword.text()), found))
            }
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Token, ParseError> {
        match self.lexer.read() {
            Some(token) if token.is_symbol(keyword) => Ok(token),
            found => {
                if let Some(token) = found.clone() {
                    self.lexer.unread(token);
                }
                Err(self.expected(&format!("'{}'", keyword), found))
            }
        }
    }
}
