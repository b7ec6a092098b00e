//! Dependency ordering of a batch of compilation units.
//!
//! A unit depends on another unit of the batch when it imports its module or
//! refers to one of its members by qualified name. Units are grouped into
//! levels: every dependency of a unit sits in an earlier level, so the units
//! of one level can be analysed concurrently once the previous levels have
//! published their schemes.

use mina_ir::{CompilationUnit, Name, Span};
use rustc_hash::FxHashMap;

/// One dependency edge, with the span that introduced it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Dependency {
    pub target: usize,
    pub span: Span,
}

#[derive(Debug)]
pub(crate) struct DependencyGraph {
    /// `deps[i]`: units that unit `i` depends on, first occurrence only.
    deps: Vec<Vec<Dependency>>,
}

/// Result of [`DependencyGraph::levels`].
#[derive(Debug, Default, Eq, PartialEq)]
pub(crate) struct Levels {
    /// Acyclic part, in dependency order. Indices ascend within a level.
    pub ordered: Vec<Vec<usize>>,
    /// Units on or behind an import cycle, ascending.
    pub cyclic: Vec<usize>,
}

impl DependencyGraph {
    pub fn build(units: &[CompilationUnit]) -> Self {
        let by_path: FxHashMap<&[Name], usize> = units
            .iter()
            .enumerate()
            .map(|(index, unit)| (unit.module.segments(), index))
            .collect();

        let deps = units
            .iter()
            .enumerate()
            .map(|(index, unit)| {
                let mut found: Vec<Dependency> = Vec::new();
                let mut add = |target: Option<&usize>, span: Span| {
                    if let Some(&target) = target {
                        if target != index && found.iter().all(|d| d.target != target) {
                            found.push(Dependency { target, span });
                        }
                    }
                };
                for import in &unit.imports {
                    add(by_path.get(import.module.segments()), import.span);
                }
                for (_, ident) in unit.arena.idents() {
                    if ident.is_qualified() {
                        add(by_path.get(ident.segments.as_slice()), ident.span);
                    }
                }
                found
            })
            .collect();

        DependencyGraph { deps }
    }

    pub fn dependencies(&self, unit: usize) -> &[Dependency] {
        &self.deps[unit]
    }

    /// Group units by dependency depth (Kahn's algorithm).
    pub fn levels(&self) -> Levels {
        let count = self.deps.len();
        let mut remaining: Vec<usize> = self.deps.iter().map(Vec::len).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (unit, deps) in self.deps.iter().enumerate() {
            for dep in deps {
                dependents[dep.target].push(unit);
            }
        }

        let mut ordered = Vec::new();
        let mut current: Vec<usize> = (0..count).filter(|&u| remaining[u] == 0).collect();
        let mut placed = vec![false; count];
        while !current.is_empty() {
            let mut next = Vec::new();
            for &unit in &current {
                placed[unit] = true;
                for &dependent in &dependents[unit] {
                    remaining[dependent] -= 1;
                    if remaining[dependent] == 0 {
                        next.push(dependent);
                    }
                }
            }
            next.sort_unstable();
            ordered.push(current);
            current = next;
        }

        let cyclic = (0..count).filter(|&u| !placed[u]).collect();
        Levels { ordered, cyclic }
    }

    /// Edges among `units` that lie on a cycle: `from -> to` where `to`
    /// reaches back to `from`.
    pub fn cycle_edges(&self, units: &[usize]) -> Vec<(usize, Dependency)> {
        let mut edges = Vec::new();
        for &from in units {
            for dep in self.dependencies(from) {
                if self.reaches(dep.target, from) {
                    edges.push((from, *dep));
                }
            }
        }
        edges
    }

    fn reaches(&self, start: usize, goal: usize) -> bool {
        let mut seen = vec![false; self.deps.len()];
        let mut stack = vec![start];
        while let Some(unit) = stack.pop() {
            if unit == goal {
                return true;
            }
            if std::mem::replace(&mut seen[unit], true) {
                continue;
            }
            stack.extend(self.deps[unit].iter().map(|d| d.target));
        }
        false
    }
}

#[cfg(test)]
mod tests;
