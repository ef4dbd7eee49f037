//! # stackform-base
//!
//! Static discovery of infrastructure declarations written as Go-syntax
//! top-level bindings, and assembly of a provisioning template from them.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! template  → Value extraction, resource ordering, document encoding
//!   ↓
//! project   → Injected config tables, source-tree scanning
//!   ↓
//! hir       → Declarations, reference extraction, resolution, validation
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, typed AST
//!   ↓
//! base      → Primitives (Location, LineIndex, TextRange, constants)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use stackform::project::{ScanConfig, SourceRoot, WorkspaceLoader};
//! use stackform::template::{StaticEvaluator, TemplateBuilder, build_template};
//!
//! let config = ScanConfig::builtin();
//! let discovery = WorkspaceLoader::new(config.clone()).scan(&[SourceRoot::recursive("infra")]);
//! for diagnostic in discovery.diagnostics() {
//!     eprintln!("{diagnostic}");
//! }
//! let evaluator = StaticEvaluator::new(&discovery, &config.shapes, &config.reserved);
//! let template = build_template(&discovery, &evaluator, &TemplateBuilder::new(&config))?;
//! println!("{}", template.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → hir → project → template)
// ============================================================================

/// Foundation types: Location, LineIndex, TextRange
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// High-level IR: declarations and reference maps
pub mod hir;

/// Project management: configuration tables, workspace scanning
pub mod project;

/// Template assembly and encoding
pub mod template;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Location, TextRange, TextSize};
