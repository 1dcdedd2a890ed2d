//! Operator evaluation, split by operator family

pub mod assign;
pub mod binary;
pub mod unary;
