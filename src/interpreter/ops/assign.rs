//! Assignment, compound assignment and `++` / `--`

use super::binary;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Context, Value};
use crate::parser::ast::{BinaryOp, SourceLocation, Syntax};

/// `=` and the compound forms. The target is resolved before the
/// right-hand side runs, so `1 = x` fails without touching `x`.
pub(crate) fn run_assignment(
    op: BinaryOp,
    lhs: &Syntax,
    rhs: &Syntax,
    location: SourceLocation,
    ctx: &mut Context,
) -> Result<Value, RuntimeError> {
    let Some(base) = op.compound_base() else {
        return lhs.assign_from(rhs, ctx);
    };

    let current = lhs.locate(ctx)?.get()?;
    let right = rhs.run(ctx)?;
    let value = binary::apply(base, &current, &right, location)?;
    lhs.locate(ctx)?.set(value)
}

/// Add `delta` to a variable. Prefix forms yield the new value, postfix forms
/// the old one converted to a number.
pub(crate) fn run_update(
    operand: &Syntax,
    delta: f64,
    prefix: bool,
    ctx: &mut Context,
) -> Result<Value, RuntimeError> {
    let mut target = operand.locate(ctx)?;
    let old = target.get()?.to_number();
    let new = target.set(Value::Number(old + delta))?;
    Ok(if prefix { new } else { Value::Number(old) })
}
