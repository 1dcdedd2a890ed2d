//! Tree-walking evaluator
//!
//! This module provides the execution side of the language:
//! - [`engine`]: [`Interpreter`] driver that parses and runs source text
//! - [`errors`]: runtime and combined error types
//! - [`constants`]: literal names that evaluate to fixed values
//! - [`ops`]: operator families
//!
//! # Execution Model
//!
//! Every [`Syntax`](crate::parser::Syntax) node can be run directly against a
//! [`Context`](crate::memory::Context). Nodes are never modified by running
//! them, so one tree may be run any number of times.
//!
//! Calls, member access, `new` and `=>` parse but are not evaluated; running
//! them yields [`RuntimeError::Unsupported`].

pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
pub mod ops;
mod statements;

pub use engine::{Interpreter, StatementOutcome};
pub use errors::{EvalError, RuntimeError};
