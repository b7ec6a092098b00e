//! Side tables produced by name resolution.

use mina_ir::{BinderId, IdentId, Name, PatternId, Span};
use mina_symbols::DeclId;
use rustc_hash::FxHashMap;
use std::fmt;

/// A local variable introduced by a pattern, lambda parameter or `let`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn new(index: u32) -> Self {
        LocalId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

/// What an identifier refers to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Resolution {
    Local(LocalId),
    Global(DeclId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalInfo {
    pub name: Name,
    pub span: Span,
}

/// Resolution results for one unit, keyed by node id.
///
/// Identifiers that failed to resolve have no entry.
#[derive(Clone, Debug, Default)]
pub struct Resolutions {
    idents: FxHashMap<IdentId, Resolution>,
    pattern_locals: FxHashMap<PatternId, LocalId>,
    binder_locals: FxHashMap<BinderId, LocalId>,
    locals: Vec<LocalInfo>,
}

impl Resolutions {
    pub fn ident(&self, id: IdentId) -> Option<Resolution> {
        self.idents.get(&id).copied()
    }

    /// Global target of `id`, if it resolved to a declaration.
    pub fn global(&self, id: IdentId) -> Option<DeclId> {
        match self.ident(id)? {
            Resolution::Global(decl) => Some(decl),
            Resolution::Local(_) => None,
        }
    }

    /// Local bound by a binding or `as` pattern.
    pub fn pattern_local(&self, id: PatternId) -> Option<LocalId> {
        self.pattern_locals.get(&id).copied()
    }

    pub fn binder_local(&self, id: BinderId) -> Option<LocalId> {
        self.binder_locals.get(&id).copied()
    }

    pub fn local(&self, id: LocalId) -> &LocalInfo {
        &self.locals[id.index()]
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    pub fn resolved_count(&self) -> usize {
        self.idents.len()
    }

    pub(crate) fn new_local(&mut self, name: Name, span: Span) -> LocalId {
        let id = LocalId(u32::try_from(self.locals.len()).unwrap_or(u32::MAX));
        self.locals.push(LocalInfo { name, span });
        id
    }

    pub(crate) fn record_ident(&mut self, id: IdentId, resolution: Resolution) {
        self.idents.insert(id, resolution);
    }

    pub(crate) fn record_pattern(&mut self, id: PatternId, local: LocalId) {
        self.pattern_locals.insert(id, local);
    }

    pub(crate) fn record_binder(&mut self, id: BinderId, local: LocalId) {
        self.binder_locals.insert(id, local);
    }
}
