//! Lexical scopes for local bindings.
//!
//! Scopes are stored flat with parent links. Popping a scope only moves the
//! cursor back to the parent, so a finished scope can never be re-entered
//! by accident and its names stop being visible.

use mina_ir::Name;
use rustc_hash::FxHashMap;

use crate::LocalId;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Top-level scope of a declaration body; holds no bindings itself.
    pub const ROOT: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    bindings: FxHashMap<Name, LocalId>,
}

#[derive(Debug)]
pub struct Scopes {
    scopes: Vec<ScopeData>,
    current: ScopeId,
}

impl Scopes {
    pub fn new() -> Self {
        Scopes {
            scopes: vec![ScopeData {
                parent: None,
                bindings: FxHashMap::default(),
            }],
            current: ScopeId::ROOT,
        }
    }

    /// Enter a child of the current scope.
    pub fn push(&mut self) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(ScopeData {
            parent: Some(self.current),
            bindings: FxHashMap::default(),
        });
        self.current = id;
        id
    }

    /// Leave the current scope.
    pub fn pop(&mut self) {
        if let Some(parent) = self.scopes[self.current.index()].parent {
            self.current = parent;
        }
    }

    /// Bind `name` in the current scope, shadowing outer bindings.
    pub fn define(&mut self, name: Name, local: LocalId) {
        self.scopes[self.current.index()].bindings.insert(name, local);
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: Name) -> Option<LocalId> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let data = &self.scopes[id.index()];
            if let Some(local) = data.bindings.get(&name) {
                return Some(*local);
            }
            scope = data.parent;
        }
        None
    }

    /// Whether the cursor is back at the root.
    pub fn is_balanced(&self) -> bool {
        self.current == ScopeId::ROOT
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
