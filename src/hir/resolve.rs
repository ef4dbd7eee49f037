//! Transitive attribute-reference resolution.
//!
//! A resource's own initializer may reach other resources' attributes
//! indirectly, through helper bindings placed at some field:
//!
//! ```text
//! var Env = &lambda.Function_Environment{Variables: map[string]any{"ROLE": Role.Arn}}
//! var Fn  = lambda.Function{Environment: Env}
//!
//! resolve(Fn) → (Role, Arn, "Environment.Variables.ROLE")
//! ```
//!
//! Field paths are composed by prefixing the path where the helper is used.
//! Resolution walks an explicit stack; each binding name is expanded at most
//! once, which bounds the work and terminates on self-referential helpers.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::symbols::{AttributeRef, Declaration, VariableRefs};

pub struct AttrRefResolver<'a> {
    declarations: &'a IndexMap<SmolStr, Declaration>,
    var_refs: &'a FxHashMap<SmolStr, VariableRefs>,
}

impl<'a> AttrRefResolver<'a> {
    pub fn new(
        declarations: &'a IndexMap<SmolStr, Declaration>,
        var_refs: &'a FxHashMap<SmolStr, VariableRefs>,
    ) -> Self {
        Self {
            declarations,
            var_refs,
        }
    }

    /// All attribute references reachable from `resource`, with paths
    /// relative to its literal root. Empty for unknown names.
    ///
    /// Field references naming other resource declarations are not
    /// followed: those resources resolve on their own.
    pub fn resolve(&self, resource: &str) -> Vec<AttributeRef> {
        let mut resolved = Vec::new();
        let mut seen_refs: FxHashSet<AttributeRef> = FxHashSet::default();
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut stack: Vec<(&str, String)> = vec![(resource, String::new())];

        while let Some((name, prefix)) = stack.pop() {
            if !visited.insert(name) {
                continue;
            }
            let Some(refs) = self.var_refs.get(name) else {
                continue;
            };

            for attr in &refs.attr_refs {
                let resolved_ref = AttributeRef {
                    resource: attr.resource.clone(),
                    attribute: attr.attribute.clone(),
                    field_path: compose_path(&prefix, &attr.field_path),
                };
                if seen_refs.insert(resolved_ref.clone()) {
                    resolved.push(resolved_ref);
                }
            }

            // Pushed in reverse so helpers expand in source order.
            for field in refs.field_refs.iter().rev() {
                if visited.contains(field.name.as_str()) || self.is_resource(&field.name) {
                    continue;
                }
                stack.push((field.name.as_str(), compose_path(&prefix, &field.path)));
            }
        }

        resolved
    }

    fn is_resource(&self, name: &str) -> bool {
        self.declarations.get(name).is_some_and(Declaration::is_resource)
    }
}

fn compose_path(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}.{path}"),
    }
}
