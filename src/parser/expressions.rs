//! Expression parsing implementation
//!
//! Precedence climbing from the loosest level (comma, 180) down to the
//! atoms (0). Left-associative binary levels are table driven through
//! [`BINARY_LEVELS`]; assignment and the conditional level recurse into
//! themselves and therefore group to the right.
//!
//! ```text
//! expr        ::= assign (',' assign)*
//! assign      ::= cond [assign_op assign]
//! cond        ::= or ['?' cond ':' cond | ('?:' | '??') cond]
//! or .. mul   ::= BINARY_LEVELS
//! unary       ::= prefix_op unary | update
//! update      ::= ('++' | '--') call | call ['++' | '--']
//! call        ::= access ('(' args ')' | member)*
//! access      ::= 'new' access | core member*
//! member      ::= '.' symbol | '?.' symbol | '->' symbol | '[' expr ']'
//! core        ::= '(' expr ')' | number | string | symbol
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{is_keyword, ParseError, Parser};
use crate::parser::token::{Token, TokenKind};

/// Left-associative binary levels, loosest first.
const BINARY_LEVELS: &[&[BinaryOp]] = &[
    &[BinaryOp::Or],
    &[BinaryOp::And],
    &[BinaryOp::BitOr],
    &[BinaryOp::BitXor],
    &[BinaryOp::BitAnd],
    &[
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::StrictEq,
        BinaryOp::StrictNe,
    ],
    &[
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Gt,
        BinaryOp::Ge,
        BinaryOp::In,
        BinaryOp::Instanceof,
    ],
    &[BinaryOp::Shl, BinaryOp::Shr, BinaryOp::UShr],
    &[BinaryOp::Add, BinaryOp::Sub],
    &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod],
];

const ASSIGNMENT_OPS: &[BinaryOp] = &[
    BinaryOp::Assign,
    BinaryOp::AddAssign,
    BinaryOp::SubAssign,
    BinaryOp::MulAssign,
    BinaryOp::DivAssign,
    BinaryOp::ModAssign,
    BinaryOp::ShlAssign,
    BinaryOp::ShrAssign,
    BinaryOp::UShrAssign,
    BinaryOp::BitAndAssign,
    BinaryOp::BitXorAssign,
    BinaryOp::BitOrAssign,
    BinaryOp::Lambda,
];

const ELVIS_OPS: &[BinaryOp] = &[BinaryOp::Elvis, BinaryOp::NullishCoalesce];

const UNARY_OPS: &[PrefixOp] = &[
    PrefixOp::Plus,
    PrefixOp::Minus,
    PrefixOp::Not,
    PrefixOp::BitNot,
    PrefixOp::Typeof,
    PrefixOp::Void,
    PrefixOp::Delete,
];

const UPDATE_OPS: &[PrefixOp] = &[PrefixOp::PreInc, PrefixOp::PreDec];

/// Operator tokens are matched by text; `in`, `typeof` and friends arrive
/// as symbols.
fn is_operator_like(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Operator | TokenKind::Symbol)
}

impl Parser {
    /// Parse a full expression, including the comma operator
    pub(crate) fn parse_expression(&mut self) -> Result<Option<Syntax>, ParseError> {
        let Some(first) = self.parse_assignment()? else {
            return Ok(None);
        };
        if !self.check_operator(",") {
            return Ok(Some(first));
        }

        let location = first.location();
        let mut exprs = vec![first];
        while self.match_operator(",").is_some() {
            let expr = self.parse_assignment()?;
            exprs.push(self.require(expr, "','")?);
        }

        Ok(Some(Syntax::Comma { exprs, location }))
    }

    /// Parse assignment (right-associative)
    pub(crate) fn parse_assignment(&mut self) -> Result<Option<Syntax>, ParseError> {
        let Some(lhs) = self.parse_conditional()? else {
            return Ok(None);
        };

        let Some((op, token)) = self.match_binary(ASSIGNMENT_OPS) else {
            return Ok(Some(lhs));
        };
        let rhs = self.nested(Self::parse_assignment)?;
        let rhs = self.require(rhs, &format!("'{}'", op.symbol()))?;

        Ok(Some(binary(op, lhs, rhs, token.location)))
    }

    /// Parse `c ? a : b`, `a ?: b` and `a ?? b` (right-associative)
    fn parse_conditional(&mut self) -> Result<Option<Syntax>, ParseError> {
        let Some(condition) = self.parse_binary(0)? else {
            return Ok(None);
        };

        if let Some(question) = self.match_operator("?") {
            let then_branch = self.nested(Self::parse_conditional)?;
            let then_branch = self.require(then_branch, "'?'")?;

            if self.match_operator(":").is_none() {
                let found = self.lexer.peek().cloned();
                return Err(self.expected("':' in conditional expression", found));
            }
            let else_branch = self.nested(Self::parse_conditional)?;
            let else_branch = self.require(else_branch, "':'")?;

            return Ok(Some(Syntax::Ternary {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
                location: question.location,
            }));
        }

        if let Some((op, token)) = self.match_binary(ELVIS_OPS) {
            let rhs = self.nested(Self::parse_conditional)?;
            let rhs = self.require(rhs, &format!("'{}'", op.symbol()))?;
            return Ok(Some(binary(op, condition, rhs, token.location)));
        }

        Ok(Some(condition))
    }

    /// Parse one left-associative level of [`BINARY_LEVELS`]
    fn parse_binary(&mut self, level: usize) -> Result<Option<Syntax>, ParseError> {
        let Some(ops) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };

        let Some(mut lhs) = self.parse_binary(level + 1)? else {
            return Ok(None);
        };

        while let Some((op, token)) = self.match_binary(ops) {
            let rhs = self.parse_binary(level + 1)?;
            let rhs = self.require(rhs, &format!("'{}'", op.symbol()))?;
            lhs = binary(op, lhs, rhs, token.location);
        }

        Ok(Some(lhs))
    }

    /// Parse prefix operators: `+ - ! ~ typeof void delete`
    fn parse_unary(&mut self) -> Result<Option<Syntax>, ParseError> {
        self.nested(|parser| {
            if let Some((op, token)) = parser.match_prefix(UNARY_OPS) {
                let operand = parser.parse_unary()?;
                let operand = parser.require(operand, &format!("'{}'", op.symbol()))?;
                return Ok(Some(Syntax::prefix(op, operand, token.location)));
            }

            parser.parse_update()
        })
    }

    /// Parse `++x`, `--x`, `x++`, `x--`
    fn parse_update(&mut self) -> Result<Option<Syntax>, ParseError> {
        if let Some((op, token)) = self.match_prefix(UPDATE_OPS) {
            let operand = self.parse_call()?;
            let operand = self.require(operand, &format!("'{}'", op.symbol()))?;
            return Ok(Some(Syntax::prefix(op, operand, token.location)));
        }

        let Some(expr) = self.parse_call()? else {
            return Ok(None);
        };

        let postfix = self
            .lexer
            .peek()
            .filter(|t| t.kind == TokenKind::Operator)
            .and_then(|t| PostfixOp::from_symbol(&t.text));
        if let Some(op) = postfix {
            if let Some(token) = self.lexer.read() {
                return Ok(Some(Syntax::Postfix {
                    op,
                    operand: Box::new(expr),
                    location: token.location,
                }));
            }
        }

        Ok(Some(expr))
    }

    /// Parse calls and any member access that follows them
    fn parse_call(&mut self) -> Result<Option<Syntax>, ParseError> {
        let Some(mut expr) = self.parse_access()? else {
            return Ok(None);
        };

        loop {
            if let Some(open) = self.match_separator('(') {
                let args = self.parse_arguments()?;
                expr = Syntax::Call {
                    callee: Box::new(expr),
                    args,
                    location: open.location,
                };
            } else if let Some(op) = self.peek_access() {
                expr = self.parse_member(expr, op)?;
            } else {
                break;
            }
        }

        Ok(Some(expr))
    }

    /// Parse the argument list after `(`, through the closing `)`
    fn parse_arguments(&mut self) -> Result<Vec<Syntax>, ParseError> {
        let mut args = Vec::new();
        if self.match_separator(')').is_some() {
            return Ok(args);
        }

        loop {
            let arg = self.parse_assignment()?;
            args.push(self.require(arg, "'(' or ','")?);

            match self.lexer.read() {
                Some(token) if token.is_operator(",") => continue,
                Some(token) if token.is_separator(')') => return Ok(args),
                found => {
                    if let Some(token) = found.clone() {
                        self.lexer.unread(token);
                    }
                    return Err(self.expected("',' or ')' in argument list", found));
                }
            }
        }
    }

    /// Parse `new` and member access chains
    fn parse_access(&mut self) -> Result<Option<Syntax>, ParseError> {
        if self.check_keyword("new") {
            let Some(token) = self.lexer.read() else {
                return Ok(None);
            };
            let operand = self.nested(Self::parse_access)?;
            let operand = self.require(operand, "'new'")?;
            return Ok(Some(Syntax::prefix(PrefixOp::New, operand, token.location)));
        }

        let Some(mut expr) = self.parse_core()? else {
            return Ok(None);
        };
        while let Some(op) = self.peek_access() {
            expr = self.parse_member(expr, op)?;
        }

        Ok(Some(expr))
    }

    /// Parse one `.name`, `?.name`, `->name` or `[index]` suffix
    fn parse_member(&mut self, object: Syntax, op: AccessOp) -> Result<Syntax, ParseError> {
        let Some(token) = self.lexer.read() else {
            return Ok(object);
        };

        let property = if op == AccessOp::Index {
            let index = self.parse_expression()?;
            let index = self.require(index, "'['")?;
            self.expect_separator(']', "after index expression")?;
            index
        } else {
            match self.lexer.read() {
                Some(name) if name.kind == TokenKind::Symbol && !is_keyword(&name.text) => {
                    Syntax::symbol(name.text, name.location)
                }
                found => {
                    return Err(match found {
                        Some(found) => ParseError::at_token(
                            format!(
                                "expected symbol after '{}', found {}",
                                op.symbol(),
                                found.describe()
                            ),
                            found,
                        ),
                        None => ParseError::new(
                            format!("expected symbol after '{}', found end of input", op.symbol()),
                            self.current_location(),
                        ),
                    });
                }
            }
        };

        Ok(Syntax::Access {
            op,
            object: Box::new(object),
            property: Box::new(property),
            location: token.location,
        })
    }

    /// Parse atoms: parenthesized expressions, literals and symbols
    fn parse_core(&mut self) -> Result<Option<Syntax>, ParseError> {
        let Some(token) = self.lexer.read() else {
            return Ok(None);
        };
        let location = token.location;

        let expr = match token.kind {
            TokenKind::Separator if token.is_separator('(') => {
                let inner = self.parse_expression()?;
                let inner = self.require(inner, "'('")?;
                self.expect_separator(')', "to close '('")?;
                match inner {
                    Syntax::Paren { .. } => inner,
                    inner => Syntax::Paren {
                        expr: Box::new(inner),
                        location,
                    },
                }
            }
            TokenKind::Number(value) => Syntax::Number {
                value,
                text: token.text,
                location,
            },
            TokenKind::String(value) => Syntax::Str {
                value,
                text: token.text,
                location,
            },
            TokenKind::Symbol if !is_keyword(&token.text) => Syntax::Symbol {
                name: token.text,
                location,
            },
            _ => {
                self.lexer.unread(token);
                return Ok(None);
            }
        };

        Ok(Some(expr))
    }

    // ===== Operator matching =====

    fn match_binary(&mut self, ops: &[BinaryOp]) -> Option<(BinaryOp, Token)> {
        let op = {
            let token = self.lexer.peek().filter(|t| is_operator_like(t))?;
            ops.iter().copied().find(|op| op.symbol() == token.text)?
        };
        self.lexer.read().map(|token| (op, token))
    }

    fn match_prefix(&mut self, ops: &[PrefixOp]) -> Option<(PrefixOp, Token)> {
        let op = {
            let token = self.lexer.peek().filter(|t| is_operator_like(t))?;
            ops.iter().copied().find(|op| op.symbol() == token.text)?
        };
        self.lexer.read().map(|token| (op, token))
    }

    fn peek_access(&mut self) -> Option<AccessOp> {
        let token = self.lexer.peek()?;
        match token.kind {
            TokenKind::Operator | TokenKind::Separator => AccessOp::from_symbol(&token.text),
            _ => None,
        }
    }
}

fn binary(op: BinaryOp, lhs: Syntax, rhs: Syntax, location: SourceLocation) -> Syntax {
    Syntax::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(source: &str) -> Syntax {
        let mut parser = Parser::new(source);
        let expr = parser.parse_expression().unwrap().unwrap();
        assert!(parser.is_at_end(), "trailing input in {:?}", source);
        expr
    }

    fn print(source: &str) -> String {
        parse_expr(source).to_string()
    }

    fn parse_err(source: &str) -> ParseError {
        Parser::new(source).parse_program().unwrap_err()
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        match parse_expr("1+2*3") {
            Syntax::Binary { op, rhs, .. } => {
                assert_eq!(op, BinaryOp::Add);
                assert!(matches!(
                    *rhs,
                    Syntax::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("Expected binary, got {:?}", other),
        }
        assert_eq!(print("1+2*3"), "1+2*3");
    }

    #[test]
    fn test_left_associative_chain() {
        match parse_expr("a-b-c") {
            Syntax::Binary { lhs, rhs, .. } => {
                assert!(matches!(*lhs, Syntax::Binary { .. }));
                assert!(matches!(*rhs, Syntax::Symbol { .. }));
            }
            other => panic!("Expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match parse_expr("a = b += 1") {
            Syntax::Binary { op, rhs, .. } => {
                assert_eq!(op, BinaryOp::Assign);
                assert!(matches!(
                    *rhs,
                    Syntax::Binary {
                        op: BinaryOp::AddAssign,
                        ..
                    }
                ));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
        assert_eq!(print("a >>>= 2"), "a>>>=2");
        assert_eq!(print("x => x"), "x=>x");
    }

    #[test]
    fn test_nested_parens_collapse() {
        assert_eq!(print("2*((2+3))"), "2*(2+3)");
        assert_eq!(print("(((a)))"), "(a)");
    }

    #[test]
    fn test_conditional_forms() {
        assert_eq!(print("1?\"aaa\":3"), "1?\"aaa\":3");
        assert_eq!(print("a ? b : c ? d : e"), "a?b:c?d:e");
        assert_eq!(print("a ?: b"), "a?:b");
        assert_eq!(print("a ?? b ?? c"), "a??b??c");
        assert!(matches!(
            parse_expr("a ?? b ?? c"),
            Syntax::Binary { ref rhs, .. } if matches!(**rhs, Syntax::Binary { .. })
        ));
    }

    #[test]
    fn test_conditional_requires_colon() {
        let err = parse_err("a ? b;");
        assert_eq!(err.message, "expected ':' in conditional expression, found ';'");
    }

    #[test]
    fn test_unary_and_update() {
        assert_eq!(print("-x"), "-x");
        assert_eq!(print("! ~x"), "! ~x");
        assert_eq!(print("typeof x"), "typeof x");
        assert_eq!(print("void 0"), "void 0");
        assert_eq!(print("delete a"), "delete a");
        assert_eq!(print("++x"), "++x");
        assert_eq!(print("x--"), "x--");
        assert_eq!(print("-x++"), "-x++");
        assert!(matches!(
            parse_expr("i++"),
            Syntax::Postfix {
                op: PostfixOp::PostInc,
                ..
            }
        ));
    }

    #[test]
    fn test_relational_keywords() {
        assert_eq!(print("a in b"), "a in b");
        assert_eq!(print("a instanceof b"), "a instanceof b");
        assert_eq!(print("a===b!==c"), "a===b!==c");
        assert_eq!(print("a<b==c>=d"), "a<b==c>=d");
    }

    #[test]
    fn test_calls() {
        assert_eq!(print("f()"), "f()");
        assert_eq!(print("f(1, a=2)"), "f(1, a=2)");
        assert_eq!(print("f(1)(2)"), "f(1)(2)");
        assert_eq!(print("f((1,2))"), "f((1,2))");
        match parse_expr("f(a, b)") {
            Syntax::Call { args, .. } => assert_eq!(args.len(), 2),
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_call_argument_errors() {
        let err = parse_err("f(1;");
        assert_eq!(err.message, "expected ',' or ')' in argument list, found ';'");
        assert!(parse_err("f(1,)").message.starts_with("expected expression"));
    }

    #[test]
    fn test_member_access() {
        assert_eq!(print("a.b.c"), "a.b.c");
        assert_eq!(print("a?.b"), "a?.b");
        assert_eq!(print("a->b"), "a->b");
        assert_eq!(print("a[i+1][0]"), "a[i+1][0]");
        assert_eq!(print("f().x"), "f().x");
        assert_eq!(print("(a+b).c"), "(a+b).c");
    }

    #[test]
    fn test_member_access_requires_symbol() {
        let err = parse_err("a.if;");
        assert_eq!(err.message, "expected symbol after '.', found symbol 'if'");
        let err = parse_err("a->(b);");
        assert_eq!(err.message, "expected symbol after '->', found '('");
        let err = parse_err("a[1;");
        assert_eq!(err.message, "expected ']' after index expression, found ';'");
    }

    #[test]
    fn test_new_expression() {
        assert_eq!(print("new Foo()"), "new Foo()");
        assert_eq!(print("new a.b(1)"), "new a.b(1)");
        match parse_expr("new Foo()") {
            Syntax::Call { callee, .. } => assert!(matches!(
                *callee,
                Syntax::Prefix {
                    op: PrefixOp::New,
                    ..
                }
            )),
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_comma_expression() {
        match parse_expr("a=1, b=2, c") {
            Syntax::Comma { exprs, .. } => assert_eq!(exprs.len(), 3),
            other => panic!("Expected comma, got {:?}", other),
        }
        assert_eq!(print("a=1, b"), "a=1,b");
    }

    #[test]
    fn test_missing_operand() {
        let err = parse_err("1 + ;");
        assert_eq!(err.message, "expected expression after '+', found ';'");
        let err = parse_err("(1 + 2");
        assert_eq!(err.message, "expected ')' to close '(', found end of input");
    }

    #[test]
    fn test_binary_nodes_never_hold_looser_children() {
        fn check(node: &Syntax) {
            if let Syntax::Binary { op, lhs, rhs, .. } = node {
                assert!(lhs.precedence() <= op.precedence());
                assert!(rhs.precedence() <= op.precedence());
                check(lhs);
                check(rhs);
            }
        }
        for source in ["a+b*c-d/e%f", "a<<b+c<d==e&f^g|h&&i||j", "a=b?c:d", "x|y|z&w"] {
            check(&parse_expr(source));
        }
    }
}
