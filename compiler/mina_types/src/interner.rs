//! Concurrent hash-consing of types.
//!
//! One [`TypeInterner`] is shared by every unit analysed in a session.
//! Children are stored by id, so interning a compound type deduplicates it
//! structurally: `Option[Int]` built twice on two threads yields one id.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mina_ir::Name;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;

use crate::{TypeFlags, TypeId, TypeKind, TypeList, TypeVar};

struct TypeData {
    kind: TypeKind,
    flags: TypeFlags,
}

pub struct TypeInterner {
    ids: DashMap<TypeKind, TypeId, FxBuildHasher>,
    types: RwLock<Vec<TypeData>>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = TypeInterner {
            ids: DashMap::with_hasher(FxBuildHasher),
            types: RwLock::new(Vec::with_capacity(256)),
        };
        let primitives = [
            (TypeId::INT, TypeKind::Int),
            (TypeId::FLOAT, TypeKind::Float),
            (TypeId::BOOL, TypeKind::Bool),
            (TypeId::CHAR, TypeKind::Char),
            (TypeId::STRING, TypeKind::String),
            (TypeId::UNIT, TypeKind::Unit),
            (TypeId::ERROR, TypeKind::Error),
        ];
        for (expected, kind) in primitives {
            let id = interner.intern(kind);
            debug_assert_eq!(id, expected);
        }
        interner
    }

    /// Intern `kind`, returning the id shared by all equal types.
    pub fn intern(&self, kind: TypeKind) -> TypeId {
        let kind = match kind {
            TypeKind::Tuple(elems) if elems.is_empty() => TypeKind::Unit,
            other => other,
        };
        if let Some(id) = self.ids.get(&kind) {
            return *id;
        }

        let flags = kind
            .children()
            .fold(TypeFlags::own(&kind), |acc, child| acc | self.flags(child));

        // The entry guard holds the shard lock, so two threads racing on the
        // same kind cannot both allocate.
        match self.ids.entry(kind) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write();
                let id = TypeId::new(u32::try_from(types.len()).unwrap_or(u32::MAX));
                types.push(TypeData {
                    kind: entry.key().clone(),
                    flags,
                });
                entry.insert(id);
                id
            }
        }
    }

    /// Structure of `id`.
    pub fn kind(&self, id: TypeId) -> TypeKind {
        self.types
            .read()
            .get(id.index())
            .map_or(TypeKind::Error, |data| data.kind.clone())
    }

    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.types
            .read()
            .get(id.index())
            .map_or(TypeFlags::HAS_ERROR, |data| data.flags)
    }

    pub fn var(&self, var: TypeVar) -> TypeId {
        self.intern(TypeKind::Var(var))
    }

    pub fn param(&self, index: u32) -> TypeId {
        self.intern(TypeKind::Param(index))
    }

    pub fn con(&self, module: Name, name: Name, args: impl IntoIterator<Item = TypeId>) -> TypeId {
        self.intern(TypeKind::Con {
            module,
            name,
            args: args.into_iter().collect(),
        })
    }

    pub fn function(&self, params: impl IntoIterator<Item = TypeId>, ret: TypeId) -> TypeId {
        self.intern(TypeKind::Function {
            params: params.into_iter().collect(),
            ret,
        })
    }

    pub fn tuple(&self, elems: impl IntoIterator<Item = TypeId>) -> TypeId {
        self.intern(TypeKind::Tuple(elems.into_iter().collect()))
    }

    /// Rebuild a compound type with every child mapped through `f`.
    pub fn map_children(&self, id: TypeId, mut f: impl FnMut(TypeId) -> TypeId) -> TypeId {
        let kind = self.kind(id);
        let mapped = match kind {
            TypeKind::Con { module, name, args } => TypeKind::Con {
                module,
                name,
                args: args.iter().map(|t| f(*t)).collect(),
            },
            TypeKind::Function { params, ret } => TypeKind::Function {
                params: params.iter().map(|t| f(*t)).collect::<TypeList>(),
                ret: f(ret),
            },
            TypeKind::Tuple(elems) => TypeKind::Tuple(elems.iter().map(|t| f(*t)).collect()),
            _ => return id,
        };
        self.intern(mapped)
    }

    /// Replace `Param(i)` with `args[i]`. Out-of-range parameters become the
    /// error type.
    pub fn substitute_params(&self, id: TypeId, args: &[TypeId]) -> TypeId {
        if !self.flags(id).contains(TypeFlags::HAS_PARAM) {
            return id;
        }
        match self.kind(id) {
            TypeKind::Param(i) => args.get(i as usize).copied().unwrap_or(TypeId::ERROR),
            _ => self.map_children(id, |child| self.substitute_params(child, args)),
        }
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_COMPOUND as usize
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner")
            .field("len", &self.len())
            .finish()
    }
}
