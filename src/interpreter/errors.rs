//! Runtime error types
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! while evaluating a syntax tree (as opposed to parse errors), and [`EvalError`],
//! which covers both phases for callers that parse and run in one go.
//!
//! A runtime error aborts the statement being evaluated. Bindings made before
//! the failure stay in place, so the next statement can run against the same
//! context.

use crate::parser::ast::SourceLocation;
use crate::parser::parse::ParseError;
use std::fmt;

/// Runtime errors that can occur during evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Read or assignment of a name with no binding in any scope
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Assignment to `null`, `undefined`, `true` or `false`
    ReservedAssignment {
        name: String,
        location: SourceLocation,
    },

    /// Construct that parses but has no evaluation semantics
    /// (calls, member access, `new`, `=>`)
    Unsupported {
        feature: String,
        location: SourceLocation,
    },

    /// Operand of the wrong kind (`in` / `instanceof` without an object,
    /// assignment to a non-reference)
    TypeError {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            RuntimeError::UndefinedVariable { location, .. } => location,
            RuntimeError::ReservedAssignment { location, .. } => location,
            RuntimeError::Unsupported { location, .. } => location,
            RuntimeError::TypeError { location, .. } => location,
        }
    }

    pub(crate) fn unsupported(feature: &str, location: SourceLocation) -> Self {
        RuntimeError::Unsupported {
            feature: feature.to_string(),
            location,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name, location } => {
                write!(
                    f,
                    "Symbol '{}' not found at line {}, column {}",
                    name, location.line, location.column
                )
            }
            RuntimeError::ReservedAssignment { name, location } => {
                write!(
                    f,
                    "Cannot assign to reserved keyword '{}' at line {}, column {}",
                    name, location.line, location.column
                )
            }
            RuntimeError::Unsupported { feature, location } => {
                write!(
                    f,
                    "{} not supported at line {}, column {}",
                    feature, location.line, location.column
                )
            }
            RuntimeError::TypeError { message, location } => {
                write!(
                    f,
                    "Type error at line {}, column {}: {}",
                    location.line, location.column, message
                )
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Failure of a parse-then-run step
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl EvalError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            EvalError::Parse(err) => &err.location,
            EvalError::Runtime(err) => err.location(),
        }
    }

    /// The message prefixed with `name:line:column` when the source is named
    pub fn diagnostic(&self, source_name: Option<&str>) -> String {
        match source_name {
            Some(name) => format!("{}:{}: {}", name, self.location(), self),
            None => self.to_string(),
        }
    }
}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        EvalError::Parse(err)
    }
}

impl From<RuntimeError> for EvalError {
    fn from(err: RuntimeError) -> Self {
        EvalError::Runtime(err)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Parse(err) => write!(f, "{}", err),
            EvalError::Runtime(err) => write!(f, "Runtime error: {}", err),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Parse(err) => Some(err),
            EvalError::Runtime(err) => Some(err),
        }
    }
}
