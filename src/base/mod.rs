//! Foundation types for the stackform toolchain.
//!
//! This module provides fundamental types used throughout the pipeline:
//! - [`Location`] - File plus 1-based line of a declaration
//! - [`LineIndex`], [`LineCol`] - Byte offset to line/column conversion
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - Domain constants (file extension, format version, separators)
//!
//! This module has NO dependencies on other stackform modules.

pub mod constants;
mod position;

pub use position::{LineCol, LineIndex, Location};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
