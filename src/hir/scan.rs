//! Per-file discovery: classify bindings and extract their references.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use super::diagnostics::ScanError;
use super::references::extract_references;
use super::symbols::{BindingSite, Declaration, DeclarationKind, ShapeId, VariableRefs};
use crate::base::constants::{CONDITION_SHAPES, MAPPING_SHAPE, OUTPUT_SHAPE, PARAMETER_SHAPE};
use crate::base::{LineIndex, Location};
use crate::parser::{self, Binding, SourceFile};
use crate::project::{ScanConfig, ShapeRegistry};

/// One named top-level binding with what was derived from it.
#[derive(Debug, Clone)]
pub struct ScannedBinding {
    pub site: BindingSite,
    /// Set when the initializer has a recognised shape
    pub declaration: Option<Declaration>,
    /// Set when the binding has an initializer
    pub refs: Option<VariableRefs>,
}

/// Everything discovered in one source file, in source order.
#[derive(Debug, Clone, Default)]
pub struct FileScan {
    pub bindings: Vec<ScannedBinding>,
}

impl FileScan {
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.bindings.iter().filter_map(|b| b.declaration.as_ref())
    }
}

/// Parse and scan one file. Any syntax error makes the whole file fail.
pub fn scan_file(path: &Path, text: &str, config: &ScanConfig) -> Result<FileScan, ScanError> {
    let parse = parser::parse(text);
    let index = LineIndex::new(text);

    if let Some(error) = parse.errors.first() {
        let pos = index.line_col(error.range.start());
        return Err(ScanError::Syntax {
            path: path.to_path_buf(),
            line: pos.line + 1,
            column: pos.col + 1,
            message: error.message.clone(),
        });
    }

    Ok(scan_source_file(path, &parse.file, &index, config))
}

/// Scan an already-parsed file.
pub fn scan_source_file(
    path: &Path,
    file: &SourceFile,
    index: &LineIndex,
    config: &ScanConfig,
) -> FileScan {
    let file_path: Arc<Path> = Arc::from(path);
    let aliases = file.namespace_aliases();
    let mut scan = FileScan::default();

    for binding in file.bindings.iter().filter(|b| !b.is_blank()) {
        let location = Location {
            file: file_path.clone(),
            line: index.line_number(binding.name.range.start()),
        };
        scan_binding(binding, location, file, &aliases, config, &mut scan);
    }

    trace!(
        "scanned {}: {} bindings, {} declarations",
        path.display(),
        scan.bindings.len(),
        scan.declarations().count()
    );
    scan
}

fn scan_binding(
    binding: &Binding,
    location: Location,
    file: &SourceFile,
    aliases: &FxHashSet<SmolStr>,
    config: &ScanConfig,
    scan: &mut FileScan,
) {
    let name = binding.name.text.clone();
    let mut declaration = None;
    let mut var_refs = None;

    if let Some(value) = &binding.value {
        let refs = extract_references(value, aliases, &config.reserved);
        let shape = classify(binding, file, &config.shapes).filter(|_| !binding.is_underscored());
        if let Some((kind, shape)) = shape {
            declaration = Some(Declaration {
                name: name.clone(),
                kind,
                shape,
                location: location.clone(),
                dependencies: refs.dependencies.clone(),
                attr_refs: refs.attr_refs.clone(),
            });
        }
        var_refs = Some(VariableRefs::from(refs));
    }

    scan.bindings.push(ScannedBinding {
        site: BindingSite {
            name,
            location,
            value: binding.value.clone(),
        },
        declaration,
        refs: var_refs,
    });
}

/// Classify a binding by the shape of its composite-literal initializer.
pub fn classify(
    binding: &Binding,
    file: &SourceFile,
    shapes: &ShapeRegistry,
) -> Option<(DeclarationKind, ShapeId)> {
    let (alias, name) = binding.value.as_ref()?.as_composite()?.shape()?;
    let canonical = alias.map(|alias| file.canonical_namespace(alias));
    let namespace = canonical.as_deref();

    if shapes.is_resource_shape(namespace, name) {
        return Some((DeclarationKind::Resource, ShapeId::new(namespace, name)));
    }
    // nested property types of a registered namespace
    if namespace.is_some_and(|ns| shapes.is_resource_namespace(ns)) {
        return None;
    }

    let kind = match name {
        PARAMETER_SHAPE => DeclarationKind::Parameter,
        OUTPUT_SHAPE => DeclarationKind::Output,
        MAPPING_SHAPE => DeclarationKind::Mapping,
        n if CONDITION_SHAPES.contains(&n) => DeclarationKind::Condition,
        _ => return None,
    };
    Some((kind, ShapeId::new(namespace, name)))
}
