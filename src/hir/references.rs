//! Reference extraction from binding initializers.
//!
//! The walk threads a dot-joined *field path* through nested keyed composite
//! literals so that a reference can be located relative to the literal root.
//!
//! ```text
//! lambda.Function{                      path ""
//!     Environment: &Env{                path "Environment"
//!         Variables: map[string]any{    path "Environment.Variables"
//!             "ROLE": Role.Arn,         → AttributeRef(Role, Arn, "Environment.Variables.ROLE")
//!             "NAME": Bucket,           → FieldRef("Environment.Variables.NAME", Bucket)
//!         },
//!     },
//! }
//! ```
//!
//! A *candidate* is a capitalized identifier that is neither an import alias
//! of the file nor a reserved name. Function literals and call callees are
//! never inspected; slice bounds are skipped.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::symbols::{AttributeRef, FieldRef, References};
use crate::parser::{ElementKey, Expr, Ident};
use crate::project::ReservedNames;

/// Extract dependencies, field references and attribute references from an
/// initializer expression.
pub fn extract_references(
    expr: &Expr,
    aliases: &FxHashSet<SmolStr>,
    reserved: &ReservedNames,
) -> References {
    ReferenceExtractor::new(aliases, reserved).extract(expr)
}

/// Single-use walker over one initializer.
pub struct ReferenceExtractor<'a> {
    aliases: &'a FxHashSet<SmolStr>,
    reserved: &'a ReservedNames,
    seen: FxHashSet<SmolStr>,
    refs: References,
}

impl<'a> ReferenceExtractor<'a> {
    pub fn new(aliases: &'a FxHashSet<SmolStr>, reserved: &'a ReservedNames) -> Self {
        Self {
            aliases,
            reserved,
            seen: FxHashSet::default(),
            refs: References::default(),
        }
    }

    pub fn extract(mut self, expr: &Expr) -> References {
        self.walk(expr, "");
        self.refs
    }

    fn walk(&mut self, expr: &Expr, path: &str) {
        match expr {
            Expr::Ident(ident) => {
                if self.is_candidate(ident) {
                    self.add_dependency(&ident.text);
                    if !path.is_empty() {
                        self.refs.field_refs.push(FieldRef {
                            path: path.to_string(),
                            name: ident.text.clone(),
                        });
                    }
                }
            }
            Expr::Selector { base, field } => match base.as_ref() {
                Expr::Ident(base) => {
                    if self.is_candidate(base) {
                        self.add_dependency(&base.text);
                        self.refs.attr_refs.push(AttributeRef {
                            resource: base.text.clone(),
                            attribute: field.text.clone(),
                            field_path: path.to_string(),
                        });
                    }
                }
                other => self.walk(other, path),
            },
            Expr::Composite(lit) => {
                for element in &lit.elements {
                    match &element.key {
                        Some(ElementKey::Field(name)) => {
                            let child = join_path(path, name);
                            self.walk(&element.value, &child);
                        }
                        Some(ElementKey::Expr(key)) => {
                            self.walk(key, path);
                            self.walk(&element.value, path);
                        }
                        None => self.walk(&element.value, path),
                    }
                }
            }
            Expr::Unary { operand, .. } => self.walk(operand, path),
            Expr::Paren(inner) => self.walk(inner, path),
            Expr::Binary { lhs, rhs, .. } => {
                self.walk(lhs, path);
                self.walk(rhs, path);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    self.walk(arg, path);
                }
            }
            Expr::Index { base, index } => {
                self.walk(base, path);
                self.walk(index, path);
            }
            Expr::Slice { base, .. } => self.walk(base, path),
            Expr::Literal(_) | Expr::Type(_) | Expr::FuncLit => {}
        }
    }

    fn is_candidate(&self, ident: &Ident) -> bool {
        ident.is_capitalized()
            && !self.aliases.contains(&ident.text)
            && !self.reserved.is_reserved(&ident.text)
    }

    fn add_dependency(&mut self, name: &SmolStr) {
        if self.seen.insert(name.clone()) {
            self.refs.dependencies.push(name.clone());
        }
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}
