//! Binary operators
//!
//! `&&`, `||`, `?:` and `??` short-circuit and return one of their operand
//! values unchanged; `?:` and `??` fall through to the right only on `null`
//! or `undefined`. Everything else evaluates both sides left to right and
//! combines them with [`apply`].

use super::assign;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Context, Value};
use crate::parser::ast::{BinaryOp, SourceLocation, Syntax};
use std::cmp::Ordering;

pub(crate) fn run_binary(
    op: BinaryOp,
    lhs: &Syntax,
    rhs: &Syntax,
    location: SourceLocation,
    ctx: &mut Context,
) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::And => {
            let left = lhs.run(ctx)?;
            if left.is_truthy() {
                rhs.run(ctx)
            } else {
                Ok(left)
            }
        }
        BinaryOp::Or => {
            let left = lhs.run(ctx)?;
            if left.is_truthy() {
                Ok(left)
            } else {
                rhs.run(ctx)
            }
        }
        BinaryOp::Elvis | BinaryOp::NullishCoalesce => {
            let left = lhs.run(ctx)?;
            if left.is_nullish() {
                rhs.run(ctx)
            } else {
                Ok(left)
            }
        }
        BinaryOp::Lambda => Err(RuntimeError::unsupported("lambda", location)),
        op if op.is_assignment() => assign::run_assignment(op, lhs, rhs, location, ctx),
        op => {
            let left = lhs.run(ctx)?;
            let right = rhs.run(ctx)?;
            apply(op, &left, &right, location)
        }
    }
}

/// Combine two already evaluated operands.
pub(crate) fn apply(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let value = match op {
        BinaryOp::Add => match (left, right) {
            (Value::Str(_), _) | (_, Value::Str(_)) => Value::Str(format!("{}{}", left, right)),
            _ => Value::Number(left.to_number() + right.to_number()),
        },
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Mod => Value::Number(left.to_number() % right.to_number()),

        BinaryOp::Shl => {
            let shift = right.to_uint32() & 31;
            Value::Number(f64::from(left.to_int32().wrapping_shl(shift)))
        }
        BinaryOp::Shr => {
            let shift = right.to_uint32() & 31;
            Value::Number(f64::from(left.to_int32() >> shift))
        }
        BinaryOp::UShr => {
            let shift = right.to_uint32() & 31;
            Value::Number(f64::from(left.to_uint32() >> shift))
        }

        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),

        BinaryOp::Eq => Value::Bool(left.loose_equals(right)),
        BinaryOp::Ne => Value::Bool(!left.loose_equals(right)),
        BinaryOp::StrictEq => Value::Bool(left.strict_equals(right)),
        BinaryOp::StrictNe => Value::Bool(!left.strict_equals(right)),

        BinaryOp::BitAnd => Value::Number(f64::from(left.to_int32() & right.to_int32())),
        BinaryOp::BitXor => Value::Number(f64::from(left.to_int32() ^ right.to_int32())),
        BinaryOp::BitOr => Value::Number(f64::from(left.to_int32() | right.to_int32())),

        BinaryOp::In | BinaryOp::Instanceof => {
            return Err(RuntimeError::TypeError {
                message: format!(
                    "right-hand side of '{}' is not an object: {}",
                    op.symbol(),
                    right.inspect()
                ),
                location,
            })
        }

        other => {
            return Err(RuntimeError::TypeError {
                message: format!("'{}' cannot be applied to values", other.symbol()),
                location,
            })
        }
    };
    Ok(value)
}

/// Strings compare by code point when both sides are strings; otherwise
/// numerically, with `NaN` unordered.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}
