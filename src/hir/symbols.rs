//! Declarations and reference records produced by discovery.

use std::fmt;

use smol_str::SmolStr;

use crate::base::Location;
use crate::parser::Expr;

// ============================================================================
// DECLARATIONS
// ============================================================================

/// What a declaration contributes to the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    Resource,
    Parameter,
    Output,
    Mapping,
    Condition,
}

impl DeclarationKind {
    pub fn display(&self) -> &'static str {
        match self {
            DeclarationKind::Resource => "resource",
            DeclarationKind::Parameter => "parameter",
            DeclarationKind::Output => "output",
            DeclarationKind::Mapping => "mapping",
            DeclarationKind::Condition => "condition",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Namespace-qualified shape of a composite literal, e.g. `s3.Bucket`.
///
/// The namespace is the imported package's name, not the local alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeId {
    pub namespace: Option<SmolStr>,
    pub name: SmolStr,
}

impl ShapeId {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(SmolStr::new),
            name: SmolStr::new(name),
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A top-level binding that contributes to the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: SmolStr,
    pub kind: DeclarationKind,
    pub shape: ShapeId,
    pub location: Location,
    /// Unique candidate names referenced by the initializer, in first-seen order
    pub dependencies: Vec<SmolStr>,
    /// `X.Y` usages found directly in the initializer
    pub attr_refs: Vec<AttributeRef>,
}

impl Declaration {
    pub fn is_resource(&self) -> bool {
        self.kind == DeclarationKind::Resource
    }
}

// ============================================================================
// REFERENCES
// ============================================================================

/// A qualified `Resource.Attribute` usage and where it sits in the literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeRef {
    pub resource: SmolStr,
    pub attribute: SmolStr,
    /// Dot-joined field path; empty at the literal root
    pub field_path: String,
}

/// A bare capitalized identifier used at a non-empty field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub path: String,
    pub name: SmolStr,
}

/// Everything the reference walk collects from one initializer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct References {
    pub dependencies: Vec<SmolStr>,
    pub field_refs: Vec<FieldRef>,
    pub attr_refs: Vec<AttributeRef>,
}

/// Field and attribute references kept per binding for transitive resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableRefs {
    pub field_refs: Vec<FieldRef>,
    pub attr_refs: Vec<AttributeRef>,
}

impl From<References> for VariableRefs {
    fn from(refs: References) -> Self {
        Self {
            field_refs: refs.field_refs,
            attr_refs: refs.attr_refs,
        }
    }
}

/// Any top-level binding, declaration or not.
///
/// The initializer is retained so values can later be evaluated statically.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSite {
    pub name: SmolStr,
    pub location: Location,
    pub value: Option<Expr>,
}
