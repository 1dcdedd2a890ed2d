//! Expression evaluation
//!
//! [`Syntax::run`] evaluates any node against a [`Context`];
//! [`Syntax::locate`] resolves a node used as an assignment target.
//! Operator families are implemented in [`super::ops`], statement forms in
//! [`super::statements`].

use super::constants::reserved_literal;
use super::errors::RuntimeError;
use super::ops::{binary, unary};
use crate::memory::{Context, Location, Value};
use crate::parser::ast::{AccessOp, PrefixOp, Syntax};

impl Syntax {
    /// Evaluate this node.
    ///
    /// Statements yield `undefined` except blocks and expression statements,
    /// which yield the value of their last expression.
    pub fn run(&self, ctx: &mut Context) -> Result<Value, RuntimeError> {
        match self {
            Syntax::Empty { .. }
            | Syntax::Block { .. }
            | Syntax::ExpressionStatement { .. }
            | Syntax::Var { .. }
            | Syntax::If { .. } => self.run_statement(ctx),

            Syntax::Comma { exprs, .. } => {
                let mut last = Value::Undefined;
                for expr in exprs {
                    last = expr.run(ctx)?;
                }
                Ok(last)
            }
            Syntax::Paren { expr, .. } => expr.run(ctx),

            Syntax::Prefix {
                op,
                operand,
                location,
            } => unary::run_prefix(*op, operand, *location, ctx),
            Syntax::Postfix { op, operand, .. } => unary::run_postfix(*op, operand, ctx),
            Syntax::Binary {
                op,
                lhs,
                rhs,
                location,
            } => binary::run_binary(*op, lhs, rhs, *location, ctx),

            Syntax::Ternary {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if condition.run(ctx)?.is_truthy() {
                    then_branch.run(ctx)
                } else {
                    else_branch.run(ctx)
                }
            }

            Syntax::Call {
                callee, location, ..
            } => {
                let feature = match **callee {
                    Syntax::Prefix {
                        op: PrefixOp::New, ..
                    } => "object construction",
                    _ => "function call",
                };
                Err(RuntimeError::unsupported(feature, *location))
            }
            Syntax::Access { op, location, .. } => {
                Err(RuntimeError::unsupported(access_feature(*op), *location))
            }

            Syntax::Number { value, .. } => Ok(Value::Number(*value)),
            Syntax::Str { value, .. } => Ok(Value::Str(value.clone())),
            Syntax::Symbol { name, location } => match reserved_literal(name) {
                Some(value) => Ok(value),
                None => ctx
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location: *location,
                    }),
            },
        }
    }

    /// Resolve this node as an assignment target.
    ///
    /// Only symbols (optionally parenthesized) are assignable. The returned
    /// [`Location`] does not check that the name is bound; `get`/`set` do.
    pub fn locate<'a>(&'a self, ctx: &'a mut Context) -> Result<Location<'a>, RuntimeError> {
        match self {
            Syntax::Symbol { name, location } => {
                if reserved_literal(name).is_some() {
                    return Err(RuntimeError::ReservedAssignment {
                        name: name.clone(),
                        location: *location,
                    });
                }
                Ok(ctx.locate(name, *location))
            }
            Syntax::Paren { expr, .. } => expr.locate(ctx),
            Syntax::Access { op, location, .. } => {
                Err(RuntimeError::unsupported(access_feature(*op), *location))
            }
            Syntax::Call { location, .. } => {
                Err(RuntimeError::unsupported("function call", *location))
            }
            other => Err(RuntimeError::TypeError {
                message: format!("invalid assignment target '{}'", other),
                location: other.location(),
            }),
        }
    }

    /// Assignment to this node, with the right-hand side evaluated only after
    /// the target has been validated.
    pub(crate) fn assign_from(
        &self,
        rhs: &Syntax,
        ctx: &mut Context,
    ) -> Result<Value, RuntimeError> {
        self.locate(ctx)?;
        let value = rhs.run(ctx)?;
        self.locate(ctx)?.set(value)
    }
}

fn access_feature(op: AccessOp) -> &'static str {
    match op {
        AccessOp::Dot => "member access",
        AccessOp::WeakDot => "optional member access",
        AccessOp::Index => "index access",
        AccessOp::ThinArrow => "arrow member access",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn eval(source: &str, ctx: &mut Context) -> Result<Value, RuntimeError> {
        let mut parser = Parser::new(source);
        let mut last = Value::Undefined;
        while let Some(statement) = parser.parse_statement().unwrap() {
            last = statement.run(ctx)?;
        }
        Ok(last)
    }

    #[test]
    fn test_literals_and_symbols() {
        let mut ctx = Context::new();
        assert_eq!(eval("42;", &mut ctx), Ok(Value::Number(42.0)));
        assert_eq!(eval("'hi';", &mut ctx), Ok(Value::from("hi")));
        assert_eq!(eval("null;", &mut ctx), Ok(Value::Null));
        assert_eq!(eval("true;", &mut ctx), Ok(Value::Bool(true)));
        assert_eq!(eval("undefined;", &mut ctx), Ok(Value::Undefined));
    }

    #[test]
    fn test_unbound_symbol() {
        let mut ctx = Context::new();
        assert!(matches!(
            eval("x;", &mut ctx),
            Err(RuntimeError::UndefinedVariable { ref name, .. }) if name == "x"
        ));
    }

    #[test]
    fn test_reserved_literal_cannot_be_located() {
        let mut ctx = Context::new();
        assert!(matches!(
            eval("null = 1;", &mut ctx),
            Err(RuntimeError::ReservedAssignment { .. })
        ));
        assert!(matches!(
            eval("true++;", &mut ctx),
            Err(RuntimeError::ReservedAssignment { .. })
        ));
    }

    #[test]
    fn test_parenthesized_target() {
        let mut ctx = Context::new();
        assert_eq!(eval("var a; (a) = 3; a;", &mut ctx), Ok(Value::Number(3.0)));
        assert!(matches!(
            eval("1 = 2;", &mut ctx),
            Err(RuntimeError::TypeError { .. })
        ));
    }

    #[test]
    fn test_unsupported_forms() {
        let mut ctx = Context::new();
        ctx.define_local("f", Value::Undefined);
        let cases = [
            ("new Foo();", "object construction"),
            ("new Foo;", "object construction"),
            ("f();", "function call"),
            ("f.x;", "member access"),
            ("f?.x;", "optional member access"),
            ("f[0];", "index access"),
            ("f->x;", "arrow member access"),
            ("f.x = 1;", "member access"),
            ("x => x;", "lambda"),
        ];
        for (source, expected) in cases {
            match eval(source, &mut ctx) {
                Err(RuntimeError::Unsupported { feature, .. }) => {
                    assert_eq!(feature, expected, "{}", source)
                }
                other => panic!("{}: expected unsupported, got {:?}", source, other),
            }
        }
    }

    #[test]
    fn test_comma_yields_last() {
        let mut ctx = Context::new();
        assert_eq!(eval("var a, b; a = 1, b = 2;", &mut ctx), Ok(Value::Number(2.0)));
        assert_eq!(ctx.get("a"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_ternary_evaluates_one_branch() {
        let mut ctx = Context::new();
        assert_eq!(eval("1?\"aaa\":3;", &mut ctx), Ok(Value::from("aaa")));
        assert_eq!(eval("var n = 0; 0 ? (n = 1) : (n = 2); n;", &mut ctx), Ok(Value::Number(2.0)));
        assert_eq!(eval("'' ? missing : 5;", &mut ctx), Ok(Value::Number(5.0)));
    }

    #[test]
    fn test_same_tree_runs_twice() {
        let mut ctx = Context::new();
        ctx.define_local("a", Value::Number(4.0));
        let expr = Parser::new("a*a+1;").parse_statement().unwrap().unwrap();
        assert_eq!(expr.run(&mut ctx), Ok(Value::Number(17.0)));
        assert_eq!(expr.run(&mut ctx), Ok(Value::Number(17.0)));
    }
}
