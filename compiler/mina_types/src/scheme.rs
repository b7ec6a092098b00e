//! Polymorphic type schemes.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{TypeFlags, TypeId, TypeInterner, TypeKind, TypeVar, Unifier};

/// `forall p0..pn. ty`, with quantified variables written as `Param(i)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeScheme {
    pub params: u32,
    pub ty: TypeId,
}

impl TypeScheme {
    /// Scheme without quantified variables.
    pub const fn mono(ty: TypeId) -> Self {
        TypeScheme { params: 0, ty }
    }

    pub const fn is_mono(&self) -> bool {
        self.params == 0
    }

    /// Replace each quantified parameter with a fresh variable.
    pub fn instantiate(&self, unifier: &mut Unifier<'_>) -> TypeId {
        if self.is_mono() {
            return self.ty;
        }
        let args = unifier.fresh_vars(self.params as usize);
        unifier.types().substitute_params(self.ty, &args)
    }

    /// Quantify the variables of `ty` that are not free in the environment.
    ///
    /// Parameters are numbered in order of first occurrence.
    pub fn generalize(unifier: &Unifier<'_>, ty: TypeId, env_free: &FxHashSet<TypeVar>) -> Self {
        let types = unifier.types();
        let ty = unifier.apply(ty);
        let mut vars = Vec::new();
        free_vars(types, ty, &mut vars);
        vars.retain(|v| !env_free.contains(v));
        if vars.is_empty() {
            return TypeScheme::mono(ty);
        }
        let mapping: FxHashMap<TypeVar, TypeId> = vars
            .iter()
            .zip(0u32..)
            .map(|(var, i)| (*var, types.param(i)))
            .collect();
        TypeScheme {
            params: u32::try_from(vars.len()).unwrap_or(u32::MAX),
            ty: replace_vars(types, ty, &mapping),
        }
    }
}

/// Unbound variables of an already applied type, in order of first
/// occurrence and without duplicates.
pub fn free_vars(types: &TypeInterner, ty: TypeId, out: &mut Vec<TypeVar>) {
    if !types.flags(ty).contains(TypeFlags::HAS_VAR) {
        return;
    }
    match types.kind(ty) {
        TypeKind::Var(var) => {
            if !out.contains(&var) {
                out.push(var);
            }
        }
        kind => {
            for child in kind.children() {
                free_vars(types, child, out);
            }
        }
    }
}

fn replace_vars(types: &TypeInterner, ty: TypeId, mapping: &FxHashMap<TypeVar, TypeId>) -> TypeId {
    if !types.flags(ty).contains(TypeFlags::HAS_VAR) {
        return ty;
    }
    match types.kind(ty) {
        TypeKind::Var(var) => mapping.get(&var).copied().unwrap_or(ty),
        _ => types.map_children(ty, |child| replace_vars(types, child, mapping)),
    }
}
