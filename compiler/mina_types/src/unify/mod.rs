//! Hindley-Milner unification.
//!
//! A [`Unifier`] owns the substitution of one compilation unit. It is never
//! shared across units; only the [`TypeInterner`] is.

mod error;

pub use error::UnifyError;

use crate::{Substitution, TypeFlags, TypeId, TypeInterner, TypeKind, TypeVar};

pub struct Unifier<'a> {
    types: &'a TypeInterner,
    subst: Substitution,
    next_var: u32,
}

impl<'a> Unifier<'a> {
    pub fn new(types: &'a TypeInterner) -> Self {
        Unifier {
            types,
            subst: Substitution::new(),
            next_var: 0,
        }
    }

    pub fn types(&self) -> &'a TypeInterner {
        self.types
    }

    pub fn substitution(&self) -> &Substitution {
        &self.subst
    }

    /// Allocate an unbound variable, unique within this unifier.
    pub fn fresh_var(&mut self) -> TypeId {
        let var = TypeVar(self.next_var);
        self.next_var += 1;
        self.types.var(var)
    }

    pub fn fresh_vars(&mut self, count: usize) -> Vec<TypeId> {
        (0..count).map(|_| self.fresh_var()).collect()
    }

    /// Follow bindings at the root of `ty`.
    pub fn resolve(&self, ty: TypeId) -> TypeId {
        self.subst.shallow_resolve(self.types, ty)
    }

    /// Fully apply the current substitution to `ty`.
    pub fn apply(&self, ty: TypeId) -> TypeId {
        self.subst.apply(self.types, ty)
    }

    /// Make `expected` and `found` equal, extending the substitution.
    ///
    /// Bindings made before a failure are kept.
    pub fn unify(&mut self, expected: TypeId, found: TypeId) -> Result<(), UnifyError> {
        let expected = self.resolve(expected);
        let found = self.resolve(found);
        if expected == found || expected.is_error() || found.is_error() {
            return Ok(());
        }

        match (self.types.kind(expected), self.types.kind(found)) {
            (TypeKind::Var(var), _) => self.bind(var, found),
            (_, TypeKind::Var(var)) => self.bind(var, expected),

            (
                TypeKind::Con {
                    module: m1,
                    name: n1,
                    args: a1,
                },
                TypeKind::Con {
                    module: m2,
                    name: n2,
                    args: a2,
                },
            ) if m1 == m2 && n1 == n2 && a1.len() == a2.len() => {
                for (l, r) in a1.iter().zip(a2.iter()) {
                    self.unify(*l, *r)?;
                }
                Ok(())
            }

            (
                TypeKind::Function {
                    params: p1,
                    ret: r1,
                },
                TypeKind::Function {
                    params: p2,
                    ret: r2,
                },
            ) => {
                if p1.len() != p2.len() {
                    return Err(UnifyError::ArityMismatch {
                        expected: p1.len(),
                        found: p2.len(),
                    });
                }
                for (l, r) in p1.iter().zip(p2.iter()) {
                    self.unify(*l, *r)?;
                }
                self.unify(r1, r2)
            }

            (TypeKind::Tuple(e1), TypeKind::Tuple(e2)) => {
                if e1.len() != e2.len() {
                    return Err(UnifyError::ArityMismatch {
                        expected: e1.len(),
                        found: e2.len(),
                    });
                }
                for (l, r) in e1.iter().zip(e2.iter()) {
                    self.unify(*l, *r)?;
                }
                Ok(())
            }

            _ => Err(UnifyError::Mismatch { expected, found }),
        }
    }

    fn bind(&mut self, var: TypeVar, ty: TypeId) -> Result<(), UnifyError> {
        if self.occurs(var, ty) {
            tracing::debug!(?var, ?ty, "occurs check failed");
            return Err(UnifyError::InfiniteType { var, ty });
        }
        self.subst.bind(var, ty);
        Ok(())
    }

    fn occurs(&self, var: TypeVar, ty: TypeId) -> bool {
        if !self.types.flags(ty).contains(TypeFlags::HAS_VAR) {
            return false;
        }
        let ty = self.resolve(ty);
        match self.types.kind(ty) {
            TypeKind::Var(other) => other == var,
            kind => kind.children().any(|child| self.occurs(var, child)),
        }
    }
}
