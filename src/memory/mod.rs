//! Runtime state for the evaluator
//!
//! - [`value`]: runtime value representation and conversions
//! - [`context`]: scope chain of variable bindings and the assignable
//!   [`context::Location`] view
//!
//! There is no heap: values are plain data, copied on read and replaced on
//! write.

pub mod context;
pub mod value;

pub use context::{Context, Location};
pub use value::Value;
