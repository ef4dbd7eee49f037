//! Typed AST for declaration sources
//!
//! Only the parts of a source file that discovery needs are represented:
//! the package clause, imports, and top-level `var`/`const` bindings with
//! their initializer expressions. `type` and `func` declarations are skipped
//! by the parser and never appear here.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextRange;

// ============================================================================
// FILE LEVEL
// ============================================================================

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    pub package: Option<SmolStr>,
    pub imports: Vec<Import>,
    pub bindings: Vec<Binding>,
}

impl SourceFile {
    /// Local names introduced by this file's imports.
    ///
    /// A qualified reference whose base is one of these names is a package
    /// member, never an attribute of a declaration.
    pub fn namespace_aliases(&self) -> FxHashSet<SmolStr> {
        self.imports.iter().filter_map(Import::local_name).collect()
    }

    /// Package name behind a local alias: `iam2` imported from `.../aws/iam`
    /// is `iam`. Names that are not import aliases are returned unchanged.
    pub fn canonical_namespace(&self, alias: &str) -> SmolStr {
        self.imports
            .iter()
            .find(|import| import.local_name().as_deref() == Some(alias))
            .and_then(Import::package_name)
            .unwrap_or_else(|| SmolStr::new(alias))
    }
}

/// `import alias "path"`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub alias: Option<SmolStr>,
    pub path: String,
    pub range: TextRange,
}

impl Import {
    /// The name this import is referred to by inside the file.
    ///
    /// Dot and blank imports introduce no name. Without an alias the last
    /// path segment is used, skipping a trailing major-version segment
    /// (`.../service/v2` is `service`).
    pub fn local_name(&self) -> Option<SmolStr> {
        match self.alias.as_deref() {
            Some(".") | Some("_") => None,
            Some(alias) => Some(SmolStr::new(alias)),
            None => self.package_name(),
        }
    }

    /// Last path segment, skipping a trailing major-version segment.
    pub fn package_name(&self) -> Option<SmolStr> {
        let mut segments = self.path.rsplit('/').filter(|s| !s.is_empty());
        let last = segments.next()?;
        if is_major_version(last) {
            segments.next().map(SmolStr::new)
        } else {
            Some(SmolStr::new(last))
        }
    }
}

fn is_major_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Var,
    Const,
}

/// A top-level `var`/`const` binding: `var Name Type = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub kind: BindingKind,
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub value: Option<Expr>,
}

impl Binding {
    /// Blank (`_`) bindings are never recorded.
    pub fn is_blank(&self) -> bool {
        self.name.text == "_"
    }

    /// `_name` bindings are helpers: recorded, but never declarations.
    pub fn is_underscored(&self) -> bool {
        self.name.text.len() > 1 && self.name.text.starts_with('_')
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub text: SmolStr,
    pub range: TextRange,
}

impl Ident {
    pub fn new(text: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }

    /// Exported (capitalized) identifier
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    /// `base.field`
    Selector {
        base: Box<Expr>,
        field: Ident,
    },
    Literal(Literal),
    Composite(CompositeLit),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        base: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    Paren(Box<Expr>),
    /// A type used as an expression (conversion callee)
    Type(TypeExpr),
    /// Function literal; the body is not kept
    FuncLit,
}

impl Expr {
    /// Strip `&` and parentheses.
    pub fn unwrap_address(&self) -> &Expr {
        match self {
            Expr::Unary {
                op: UnaryOp::Addr,
                operand,
            } => operand.unwrap_address(),
            Expr::Paren(inner) => inner.unwrap_address(),
            other => other,
        }
    }

    /// The composite literal this expression builds, looking through `&`.
    pub fn as_composite(&self) -> Option<&CompositeLit> {
        match self.unwrap_address() {
            Expr::Composite(lit) => Some(lit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(SmolStr),
    Float(SmolStr),
    /// Decoded string value (interpreted or raw)
    String(String),
    Rune(SmolStr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
    Deref,
    Addr,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    AndNot,
    Add,
    Sub,
    BitOr,
    BitXor,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// `Type{elements}`; `ty` is `None` for elided element literals (`{...}`)
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    pub ty: Option<TypeExpr>,
    pub elements: Vec<Element>,
    pub range: TextRange,
}

impl CompositeLit {
    /// Namespace and local name when the literal's type is a named type.
    pub fn shape(&self) -> Option<(Option<&str>, &str)> {
        match &self.ty {
            Some(TypeExpr::Named { namespace, name }) => Some((namespace.as_deref(), name)),
            _ => None,
        }
    }

    pub fn is_keyed(&self) -> bool {
        self.elements.iter().any(|e| e.key.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: Option<ElementKey>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKey {
    /// Identifier or string-literal key: names a field
    Field(SmolStr),
    /// Any other key expression
    Expr(Expr),
}

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named {
        namespace: Option<SmolStr>,
        name: SmolStr,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// interface, struct, func and chan types; their structure is not needed
    Opaque,
}

impl TypeExpr {
    /// Slices and arrays build JSON arrays.
    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeExpr::Slice(_) | TypeExpr::Array(_))
    }
}
