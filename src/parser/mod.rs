//! Parser for Go-syntax declaration sources
//!
//! This module provides a fast, error-collecting parser using:
//! - **logos** for lexing
//! - a hand-written recursive-descent parser producing a typed AST
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Semicolon insertion → significant tokens only
//!     ↓
//! Parser → SourceFile { imports, bindings }
//!     ↓
//! HIR → declarations and reference maps
//! ```
//!
//! Only top-level bindings are modelled. Function and type declarations are
//! skipped by bracket balancing, so the parser tolerates arbitrary code in
//! function bodies.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod lexer;
mod syntax_kind;

pub use ast::*;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse, unquote, unquote_raw};
pub use syntax_kind::SyntaxKind;
