//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime
//! values of the language, together with the implicit conversions the operators
//! rely on.
//!
//! # Value Types
//!
//! - [`Value::Undefined`]: the value of an uninitialized `var` and of `void`
//! - [`Value::Null`]: the `null` literal
//! - [`Value::Bool`]: `true` / `false`
//! - [`Value::Number`]: IEEE-754 double
//! - [`Value::Str`]: immutable text
//!
//! # Conversions
//!
//! Truthiness, number conversion and the 32-bit integer views used by the
//! bitwise operators follow the usual dynamic-language rules: `0`, `NaN`,
//! `""`, `null`, `undefined` and `false` are falsy, strings convert to
//! numbers after trimming, and bitwise operators work modulo 2^32.

use crate::parser::token::decode_number;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(n.is_nan() || *n == 0.0),
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// `null` or `undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => parse_number(s),
        }
    }

    /// Signed 32-bit view used by `|`, `&`, `^`, `~`, `<<` and `>>`
    pub fn to_int32(&self) -> i32 {
        self.to_uint32() as i32
    }

    /// Unsigned 32-bit view used by `>>>`
    pub fn to_uint32(&self) -> u32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        n.trunc().rem_euclid(4_294_967_296.0) as u32
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
        }
    }

    /// `===`: same type and same value (`NaN` is never equal to itself)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }

    /// `==`: `null` and `undefined` only equal each other, everything else
    /// compares numerically unless both sides have the same type
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => self.to_number() == other.to_number(),
        }
    }

    /// Quoted form used when echoing results.
    pub fn inspect(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            other => other.to_string(),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// Convert text to a number; anything that is not a complete numeral is `NaN`.
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let lower = text.to_ascii_lowercase();
    if lower.starts_with("0x") || lower.starts_with("0o") || lower.starts_with("0b") {
        return decode_number(text);
    }

    let numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if numeric {
        text.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Shortest round-trip rendering, switching to exponent form outside
/// `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }

    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
        assert_eq!(Value::from("  42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::from("0x10").to_number(), 16.0);
        assert_eq!(Value::from("-Infinity").to_number(), f64::NEG_INFINITY);
        assert!(Value::from("12px").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert!(Value::Undefined.to_number().is_nan());
    }

    #[test]
    fn test_int32_views() {
        assert_eq!(Value::Number(-1.0).to_uint32(), 4_294_967_295);
        assert_eq!(Value::Number(4_294_967_297.0).to_int32(), 1);
        assert_eq!(Value::Number(2_147_483_648.0).to_int32(), -2_147_483_648);
        assert_eq!(Value::Number(-3.7).to_int32(), -3);
        assert_eq!(Value::Number(f64::NAN).to_int32(), 0);
    }

    #[test]
    fn test_equality() {
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
        assert!(Value::from("1").loose_equals(&Value::Number(1.0)));
        assert!(Value::Bool(true).loose_equals(&Value::from("1")));
        assert!(!Value::from("1").strict_equals(&Value::Number(1.0)));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(255.0), "255");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_display_and_inspect() {
        assert_eq!(Value::from("aaa").to_string(), "aaa");
        assert_eq!(Value::from("aaa").inspect(), "'aaa'");
        assert_eq!(Value::Undefined.inspect(), "undefined");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }
}
