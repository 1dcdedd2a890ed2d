//! Prefix and postfix operators

use super::assign;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Context, Value};
use crate::parser::ast::{PostfixOp, PrefixOp, SourceLocation, Syntax};

pub(crate) fn run_prefix(
    op: PrefixOp,
    operand: &Syntax,
    location: SourceLocation,
    ctx: &mut Context,
) -> Result<Value, RuntimeError> {
    let value = match op {
        PrefixOp::New => return Err(RuntimeError::unsupported("object construction", location)),
        PrefixOp::PreInc => return assign::run_update(operand, 1.0, true, ctx),
        PrefixOp::PreDec => return assign::run_update(operand, -1.0, true, ctx),

        PrefixOp::Plus => Value::Number(operand.run(ctx)?.to_number()),
        PrefixOp::Minus => Value::Number(-operand.run(ctx)?.to_number()),
        PrefixOp::BitNot => Value::Number(f64::from(!operand.run(ctx)?.to_int32())),
        PrefixOp::Not => Value::Bool(!operand.run(ctx)?.is_truthy()),
        PrefixOp::Typeof => Value::from(operand.run(ctx)?.type_of()),
        PrefixOp::Void => {
            operand.run(ctx)?;
            Value::Undefined
        }
        // Nothing is deletable: bindings are not properties.
        PrefixOp::Delete => {
            operand.run(ctx)?;
            Value::Bool(true)
        }
    };
    Ok(value)
}

pub(crate) fn run_postfix(
    op: PostfixOp,
    operand: &Syntax,
    ctx: &mut Context,
) -> Result<Value, RuntimeError> {
    match op {
        PostfixOp::PostInc => assign::run_update(operand, 1.0, false, ctx),
        PostfixOp::PostDec => assign::run_update(operand, -1.0, false, ctx),
    }
}
