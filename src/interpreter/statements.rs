//! Statement execution
//!
//! Statements run against the same [`Context`] as expressions. Blocks do not
//! open a scope: a `var` inside `{ }` binds in the enclosing scope.

use super::constants::reserved_literal;
use super::errors::RuntimeError;
use crate::memory::{Context, Value};
use crate::parser::ast::{IfBranch, Syntax, VarDeclarator};

impl Syntax {
    pub(crate) fn run_statement(&self, ctx: &mut Context) -> Result<Value, RuntimeError> {
        match self {
            Syntax::Block { statements, .. } => {
                let mut last = Value::Undefined;
                for statement in statements {
                    last = statement.run(ctx)?;
                }
                Ok(last)
            }
            Syntax::ExpressionStatement { expr, .. } => expr.run(ctx),
            Syntax::Var { declarations, .. } => {
                for declarator in declarations {
                    declare(declarator, ctx)?;
                }
                Ok(Value::Undefined)
            }
            Syntax::If { branches, .. } => run_if(branches, ctx),
            Syntax::Empty { .. } => Ok(Value::Undefined),
            other => other.run(ctx),
        }
    }
}

/// Bind one declarator in the innermost scope. The initializer runs first,
/// so `var a = a;` reads any outer `a`.
fn declare(declarator: &VarDeclarator, ctx: &mut Context) -> Result<(), RuntimeError> {
    if reserved_literal(&declarator.name).is_some() {
        return Err(RuntimeError::ReservedAssignment {
            name: declarator.name.clone(),
            location: declarator.location,
        });
    }

    let value = match &declarator.init {
        Some(init) => init.run(ctx)?,
        None => Value::Undefined,
    };
    ctx.define_local(&declarator.name, value);
    Ok(())
}

fn run_if(branches: &[IfBranch], ctx: &mut Context) -> Result<Value, RuntimeError> {
    for branch in branches {
        let taken = match &branch.condition {
            Some(condition) => condition.run(ctx)?.is_truthy(),
            None => true,
        };
        if taken {
            return branch.body.run(ctx);
        }
    }
    Ok(Value::Undefined)
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
    fn test_var_binds_and_yields_undefined() {
        let mut ctx = Context::new();
        assert_eq!(eval("var a = 1, b, c = a + 2;", &mut ctx), Ok(Value::Undefined));
        assert_eq!(ctx.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(ctx.get("b"), Some(&Value::Undefined));
        assert_eq!(ctx.get("c"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_var_reserved_name() {
        let mut ctx = Context::new();
        assert!(matches!(
            eval("var null = 1;", &mut ctx),
            Err(RuntimeError::ReservedAssignment { ref name, .. }) if name == "null"
        ));
    }

    #[test]
    fn test_failed_initializer_keeps_earlier_bindings() {
        let mut ctx = Context::new();
        assert!(eval("var a = 1, b = missing, c = 3;", &mut ctx).is_err());
        assert!(ctx.is_defined("a"));
        assert!(!ctx.is_defined("b"));
        assert!(!ctx.is_defined("c"));
    }

    #[test]
    fn test_block_yields_last_value() {
        let mut ctx = Context::new();
        assert_eq!(eval("{1;2}", &mut ctx), Ok(Value::Number(2.0)));
        assert_eq!(eval("{}", &mut ctx), Ok(Value::Undefined));
        assert_eq!(eval("{ var inner = 5; } inner;", &mut ctx), Ok(Value::Number(5.0)));
    }

    #[test]
    fn test_if_chain_picks_first_truthy_branch() {
        let mut ctx = Context::new();
        let source = "var r; if (x < 0) r = 'neg'; elseif (x == 0) r = 'zero'; else r = 'pos';";
        for (x, expected) in [(-1.0, "neg"), (0.0, "zero"), (3.0, "pos")] {
            ctx.define_local("x", Value::Number(x));
            eval(source, &mut ctx).unwrap();
            assert_eq!(ctx.get("r"), Some(&Value::from(expected)));
        }
    }

    #[test]
    fn test_if_without_match_is_undefined() {
        let mut ctx = Context::new();
        assert_eq!(eval("if (0) 1;", &mut ctx), Ok(Value::Undefined));
        assert_eq!(eval("if (1) { 7; }", &mut ctx), Ok(Value::Number(7.0)));
        assert_eq!(eval("if (0) 1; else if (1) 2;", &mut ctx), Ok(Value::Number(2.0)));
    }

    #[test]
    fn test_empty_statement() {
        let mut ctx = Context::new();
        assert_eq!(eval(";", &mut ctx), Ok(Value::Undefined));
    }
}
