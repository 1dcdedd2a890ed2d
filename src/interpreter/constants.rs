//! Names with fixed meaning at evaluation time

use crate::memory::value::Value;

/// Symbols that evaluate to a constant and cannot be assigned or declared
pub const RESERVED_LITERALS: &[&str] = &["null", "undefined", "true", "false"];

pub fn reserved_literal(name: &str) -> Option<Value> {
    match name {
        "null" => Some(Value::Null),
        "undefined" => Some(Value::Undefined),
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reserved_name_has_a_value() {
        for name in RESERVED_LITERALS {
            assert!(reserved_literal(name).is_some(), "{}", name);
        }
        assert_eq!(reserved_literal("nil"), None);
    }
}
