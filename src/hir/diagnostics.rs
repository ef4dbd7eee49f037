//! Discovery-time error reporting.
//!
//! Scan failures ([`ScanError`]) abort a single source root. Semantic
//! problems found after the merge ([`Diagnostic`]) are collected and the
//! caller decides whether to build.

use std::fmt;
use std::io;
use std::path::PathBuf;

use indexmap::IndexMap;
use smol_str::SmolStr;
use thiserror::Error;

use super::symbols::{BindingSite, Declaration};
use crate::base::Location;

// ============================================================================
// SCAN ERRORS
// ============================================================================

/// A failure that aborts the scan of one source root.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("source root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}:{column}: syntax error: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: u32,
        column: u32,
        message: String,
    },
}

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Standard diagnostic codes.
pub mod codes {
    /// Resource depends on a name that is bound nowhere.
    pub const UNDEFINED_REFERENCE: &str = "E0001";
    /// Two declarations share a name.
    pub const DUPLICATE_DEFINITION: &str = "E0004";
}

/// A discovery error tied to a declaration site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn error(location: Location, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            location,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn undefined_reference(&mut self, declaration: &Declaration, name: &str) {
        self.add(Diagnostic::error(
            declaration.location.clone(),
            codes::UNDEFINED_REFERENCE,
            format!(
                "{} references undefined resource \"{}\"",
                declaration.name, name
            ),
        ));
    }

    pub fn duplicate_definition(&mut self, duplicate: &BindingSite, first: &BindingSite) {
        self.add(Diagnostic::error(
            duplicate.location.clone(),
            codes::DUPLICATE_DEFINITION,
            format!(
                "duplicate declaration \"{}\" (first declared at {})",
                duplicate.name, first.location
            ),
        ));
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

// ============================================================================
// DEPENDENCY VALIDATOR
// ============================================================================

/// Checks that every resource dependency names some top-level binding.
///
/// Only resources are checked; other declaration kinds may reference
/// arbitrary helper code.
pub struct DependencyValidator<'a> {
    declarations: &'a IndexMap<SmolStr, Declaration>,
    bindings: &'a IndexMap<SmolStr, BindingSite>,
}

impl<'a> DependencyValidator<'a> {
    pub fn new(
        declarations: &'a IndexMap<SmolStr, Declaration>,
        bindings: &'a IndexMap<SmolStr, BindingSite>,
    ) -> Self {
        Self {
            declarations,
            bindings,
        }
    }

    /// One diagnostic per (resource, undefined dependency) pair, in
    /// declaration order.
    pub fn validate(&self, collector: &mut DiagnosticCollector) {
        for declaration in self.declarations.values().filter(|d| d.is_resource()) {
            for dep in &declaration.dependencies {
                if !self.bindings.contains_key(dep) {
                    collector.undefined_reference(declaration, dep);
                }
            }
        }
    }
}
