//! The merged, immutable result of one scan.

use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use super::diagnostics::{DependencyValidator, Diagnostic, DiagnosticCollector, ScanError};
use super::resolve::AttrRefResolver;
use super::scan::FileScan;
use super::symbols::{AttributeRef, BindingSite, Declaration, DeclarationKind, VariableRefs};

/// Declarations, bindings and reference maps across all scanned roots.
///
/// Built once by merging per-file scans in a fixed order; validation runs as
/// part of the merge and its findings are available via [`diagnostics`].
///
/// [`diagnostics`]: Discovery::diagnostics
#[derive(Debug, Default)]
pub struct Discovery {
    declarations: IndexMap<SmolStr, Declaration>,
    bindings: IndexMap<SmolStr, BindingSite>,
    var_refs: FxHashMap<SmolStr, VariableRefs>,
    diagnostics: Vec<Diagnostic>,
    scan_errors: Vec<ScanError>,
}

impl Discovery {
    /// Merge file scans in iteration order.
    ///
    /// Names are unique across every named binding: the first site wins and
    /// its declaration and reference record are the ones kept, whatever the
    /// kinds of the colliding bindings.
    pub fn from_scans(scans: impl IntoIterator<Item = FileScan>, scan_errors: Vec<ScanError>) -> Self {
        let mut declarations: IndexMap<SmolStr, Declaration> = IndexMap::new();
        let mut bindings: IndexMap<SmolStr, BindingSite> = IndexMap::new();
        let mut var_refs: FxHashMap<SmolStr, VariableRefs> = FxHashMap::default();
        let mut collector = DiagnosticCollector::new();

        for scanned in scans.into_iter().flat_map(|scan| scan.bindings) {
            let name = scanned.site.name.clone();
            match bindings.entry(name.clone()) {
                Entry::Occupied(first) => {
                    collector.duplicate_definition(&scanned.site, first.get());
                }
                Entry::Vacant(slot) => {
                    slot.insert(scanned.site);
                    if let Some(declaration) = scanned.declaration {
                        declarations.insert(name.clone(), declaration);
                    }
                    if let Some(refs) = scanned.refs {
                        var_refs.insert(name, refs);
                    }
                }
            }
        }

        DependencyValidator::new(&declarations, &bindings).validate(&mut collector);
        let diagnostics = collector.finish();

        debug!(
            "discovery: {} declarations, {} bindings, {} diagnostics, {} scan errors",
            declarations.len(),
            bindings.len(),
            diagnostics.len(),
            scan_errors.len()
        );

        Self {
            declarations,
            bindings,
            var_refs,
            diagnostics,
            scan_errors,
        }
    }

    /// All declarations in discovery order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    pub fn declarations_of(&self, kind: DeclarationKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.values().filter(move |d| d.kind == kind)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations_of(DeclarationKind::Resource)
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    pub fn is_resource(&self, name: &str) -> bool {
        self.declaration(name).is_some_and(Declaration::is_resource)
    }

    pub fn binding(&self, name: &str) -> Option<&BindingSite> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &BindingSite> {
        self.bindings.values()
    }

    pub fn var_refs(&self, name: &str) -> Option<&VariableRefs> {
        self.var_refs.get(name)
    }

    /// Attribute references reachable from `name` through helper bindings.
    pub fn resolve_attr_refs(&self, name: &str) -> Vec<AttributeRef> {
        AttrRefResolver::new(&self.declarations, &self.var_refs).resolve(name)
    }

    /// Undefined references and duplicate declarations.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Roots that failed to scan and contributed nothing.
    pub fn scan_errors(&self) -> &[ScanError] {
        &self.scan_errors
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty() || !self.scan_errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
