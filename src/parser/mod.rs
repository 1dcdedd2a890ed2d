//! Source parser
//!
//! This module turns source text into [`ast::Syntax`] trees:
//! - [`reader`]: character source with pushback and line/column tracking
//! - [`token`]: token model and literal decoding
//! - [`lexer`]: tokenization (characters → tokens)
//! - [`parse`]: [`Parser`] and [`ParseError`], statement entry points
//! - [`ast`]: node definitions, precedence table and printer
//!
//! # Language
//!
//! A small JavaScript-like language: `var` declarations, blocks, `if`
//! chains, and the full operator set from member access (precedence 10) to
//! the comma operator (180). Functions, objects and `new` parse but do not
//! evaluate.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with precedence climbing for binary
//! operators. No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod reader;
mod statements;
pub mod token;

pub use ast::{Program, SourceLocation, Syntax};
pub use lexer::Lexer;
pub use parse::{ParseError, Parser};
pub use reader::CharacterSource;
pub use token::{Token, TokenKind};
