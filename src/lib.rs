//! # Introduction
//!
//! newlang is the front end of a small JavaScript-like language: a character
//! source, a lexer, an operator-precedence parser producing a syntax tree that
//! prints back to canonical source, and a tree-walking evaluator over
//! numbers, strings, booleans, `null` and `undefined`.
//!
//! ## Pipeline
//!
//! ```text
//! Source → CharacterSource → Lexer → Parser → Syntax → run(Context) → Value
//!                                               └──→ Display (canonical source)
//! ```
//!
//! 1. [`parser`]: reads characters, groups them into tokens and builds
//!    [`parser::Syntax`] trees, one statement at a time.
//! 2. [`memory`]: runtime [`memory::Value`]s and the [`memory::Context`]
//!    holding variable bindings.
//! 3. [`interpreter`]: evaluation of syntax trees and the
//!    [`interpreter::Interpreter`] driver used by the command-line tool.
//!
//! ## Example
//!
//! ```
//! use newlang::interpreter::Interpreter;
//! use newlang::memory::Value;
//! use newlang::parser::Parser;
//!
//! let statement = Parser::new("2*((2+3))").parse_statement().unwrap().unwrap();
//! assert_eq!(statement.to_string(), "2*(2+3);");
//!
//! let mut interp = Interpreter::new();
//! assert_eq!(interp.execute(&statement), Ok(Value::Number(10.0)));
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
