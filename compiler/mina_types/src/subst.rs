//! Variable bindings produced by unification.

use rustc_hash::FxHashMap;

use crate::{TypeFlags, TypeId, TypeInterner, TypeKind, TypeVar};

/// Mapping from unification variables to types.
///
/// Bindings are only ever added. Applying a substitution builds a new,
/// fully resolved type; interned types are never changed in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: FxHashMap<TypeVar, TypeId>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: TypeVar) -> Option<TypeId> {
        self.bindings.get(&var).copied()
    }

    pub(crate) fn bind(&mut self, var: TypeVar, ty: TypeId) {
        debug_assert!(!self.bindings.contains_key(&var), "{var:?} rebound");
        self.bindings.insert(var, ty);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVar, TypeId)> + '_ {
        self.bindings.iter().map(|(v, t)| (*v, *t))
    }

    /// Follow variable bindings at the root of `ty` only.
    pub fn shallow_resolve(&self, types: &TypeInterner, mut ty: TypeId) -> TypeId {
        while let TypeKind::Var(var) = types.kind(ty) {
            match self.get(var) {
                Some(next) => ty = next,
                None => break,
            }
        }
        ty
    }

    /// Resolve every bound variable inside `ty`.
    pub fn apply(&self, types: &TypeInterner, ty: TypeId) -> TypeId {
        if !types.flags(ty).contains(TypeFlags::HAS_VAR) {
            return ty;
        }
        let ty = self.shallow_resolve(types, ty);
        match types.kind(ty) {
            TypeKind::Var(_) => ty,
            _ => types.map_children(ty, |child| self.apply(types, child)),
        }
    }
}
