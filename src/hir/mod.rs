//! High-level IR (HIR): declarations and their cross-references.
//!
//! Discovery turns parsed files into a [`Discovery`]: classified
//! declarations, every named binding, and per-binding reference records.
//!
//! ## Pipeline
//!
//! ```text
//! SourceFile (per file)
//!     │
//!     ▼
//! scan_file            ← classify bindings, extract references
//!     │
//!     ▼
//! FileScan             ← ScannedBinding { site, declaration?, refs? }
//!     │  (merged in root order, file order)
//!     ▼
//! Discovery            ← first site per name wins + DependencyValidator
//!     │
//!     ├── resolve_attr_refs(name)   ← AttrRefResolver
//!     └── diagnostics()             ← consumed by the build policy
//! ```
//!
//! Classification and reference extraction are naming-convention
//! heuristics: capitalized identifiers are candidates, validated later.

mod diagnostics;
mod discovery;
mod references;
mod resolve;
mod scan;
mod symbols;

use std::path::Path;

pub use diagnostics::{
    DependencyValidator, Diagnostic, DiagnosticCollector, ScanError, codes,
};
pub use discovery::Discovery;
pub use references::{ReferenceExtractor, extract_references};
pub use resolve::AttrRefResolver;
pub use scan::{FileScan, ScannedBinding, classify, scan_file, scan_source_file};
pub use symbols::{
    AttributeRef, BindingSite, Declaration, DeclarationKind, FieldRef, References, ShapeId,
    VariableRefs,
};

use crate::project::ScanConfig;

/// Discover declarations from in-memory `(path, text)` sources.
///
/// Files failing to parse are reported as scan errors and contribute nothing.
pub fn discover_sources<P: AsRef<Path>>(sources: &[(P, &str)], config: &ScanConfig) -> Discovery {
    let mut scans = Vec::with_capacity(sources.len());
    let mut errors = Vec::new();
    for (path, text) in sources {
        match scan_file(path.as_ref(), text, config) {
            Ok(scan) => scans.push(scan),
            Err(err) => errors.push(err),
        }
    }
    Discovery::from_scans(scans, errors)
}
