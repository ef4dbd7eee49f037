//! Deterministic resource ordering.
//!
//! Edges run from a dependency to its dependent and only between resources.
//! Kahn's algorithm always emits the lexicographically smallest ready name,
//! so the order depends only on the graph, never on map iteration order.
//! When the order comes up short, a depth-first search over the leftover
//! nodes extracts one concrete cycle for the error.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::trace;

use super::error::{BuildError, CycleMember};
use crate::hir::Declaration;

/// Topologically order `resources` (dependencies first).
pub fn resource_order(resources: &[&Declaration]) -> Result<Vec<SmolStr>, BuildError> {
    let by_name: FxHashMap<&str, &Declaration> = resources
        .iter()
        .map(|decl| (decl.name.as_str(), *decl))
        .collect();

    let mut in_degree: FxHashMap<&str, usize> = by_name.keys().map(|name| (*name, 0)).collect();
    let mut dependents: FxHashMap<&str, Vec<&str>> = FxHashMap::default();

    for (&name, &decl) in &by_name {
        for dep in resource_deps(decl, &by_name) {
            *in_degree.entry(name).or_default() += 1;
            dependents.entry(dep).or_default().push(name);
        }
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| *name)
        .collect();
    let mut order = Vec::with_capacity(by_name.len());

    while let Some(name) = ready.pop_first() {
        order.push(SmolStr::new(name));
        for &dependent in dependents.get(name).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() < by_name.len() {
        let emitted: FxHashSet<&str> = order.iter().map(SmolStr::as_str).collect();
        return Err(cycle_error(&by_name, &emitted));
    }

    trace!("resource order: {:?}", order);
    Ok(order)
}

/// Distinct dependencies of `decl` that are themselves resources.
fn resource_deps<'a>(
    decl: &'a Declaration,
    by_name: &FxHashMap<&str, &'a Declaration>,
) -> Vec<&'a str> {
    let mut seen = FxHashSet::default();
    decl.dependencies
        .iter()
        .map(SmolStr::as_str)
        .filter(|dep| by_name.contains_key(dep) && seen.insert(*dep))
        .collect()
}

// ============================================================================
// CYCLE EXTRACTION
// ============================================================================

struct CycleFinder<'a, 'g> {
    by_name: &'g FxHashMap<&'a str, &'a Declaration>,
    emitted: &'g FxHashSet<&'a str>,
    visited: FxHashSet<&'a str>,
}

/// One node on the explicit DFS stack with its pending dependencies.
struct Frame<'a> {
    name: &'a str,
    deps: Vec<&'a str>,
    next: usize,
}

impl<'a> CycleFinder<'a, '_> {
    fn frame(&self, name: &'a str) -> Frame<'a> {
        let mut deps: Vec<&'a str> = self
            .by_name
            .get(name)
            .map(|decl| resource_deps(decl, self.by_name))
            .unwrap_or_default()
            .into_iter()
            .filter(|dep| !self.emitted.contains(dep))
            .collect();
        deps.sort_unstable();
        Frame { name, deps, next: 0 }
    }

    /// Depth-first search from `start` with an explicit stack. Returns the
    /// cycle as a closed path (`A, B, A`).
    fn visit(&mut self, start: &'a str) -> Option<Vec<&'a str>> {
        let mut on_stack: FxHashSet<&'a str> = FxHashSet::default();
        let mut stack = vec![self.frame(start)];
        self.visited.insert(start);
        on_stack.insert(start);

        while let Some(top) = stack.last_mut() {
            let Some(&dep) = top.deps.get(top.next) else {
                on_stack.remove(top.name);
                stack.pop();
                continue;
            };
            top.next += 1;

            if on_stack.contains(dep) {
                let from = stack.iter().position(|frame| frame.name == dep)?;
                let mut cycle: Vec<&'a str> = stack[from..].iter().map(|frame| frame.name).collect();
                cycle.push(dep);
                return Some(cycle);
            }
            if self.visited.insert(dep) {
                on_stack.insert(dep);
                let frame = self.frame(dep);
                stack.push(frame);
            }
        }
        None
    }
}

fn cycle_error<'a>(
    by_name: &FxHashMap<&'a str, &'a Declaration>,
    emitted: &FxHashSet<&'a str>,
) -> BuildError {
    let mut remaining: Vec<&str> = by_name
        .keys()
        .copied()
        .filter(|name| !emitted.contains(name))
        .collect();
    remaining.sort_unstable();

    let mut finder = CycleFinder {
        by_name,
        emitted,
        visited: FxHashSet::default(),
    };

    let names = remaining
        .iter()
        .find_map(|&name| {
            if finder.visited.contains(name) {
                None
            } else {
                finder.visit(name)
            }
        })
        // Every leftover node waits on another leftover node, so a cycle is
        // always reachable; listing the leftovers keeps the error useful.
        .unwrap_or(remaining);

    let cycle = names
        .into_iter()
        .filter_map(|name| by_name.get(name))
        .map(|decl| CycleMember {
            name: decl.name.clone(),
            location: decl.location.clone(),
        })
        .collect();
    BuildError::Cycle { cycle }
}
