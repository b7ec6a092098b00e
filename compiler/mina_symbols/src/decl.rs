//! Declarations registered in the symbol table.

use mina_ir::{Name, Span};
use mina_types::{TypeId, TypeInterner, TypeScheme};

use crate::{DeclId, ModuleId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: Name,
    pub module: ModuleId,
    pub span: Span,
    pub kind: DeclKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    /// Top-level value. `scheme` is `None` until an annotation is lowered or
    /// the value's type has been inferred.
    Value { scheme: Option<TypeScheme> },
    Data(DataInfo),
    Constructor(CtorInfo),
    /// Built-in type from the prelude.
    Primitive(TypeId),
}

/// A nominal algebraic data type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataInfo {
    /// Number of type parameters.
    pub params: u32,
    /// Every constructor, in declaration order. This is the sibling set used
    /// for exhaustiveness.
    pub constructors: Vec<DeclId>,
    /// The type applied to its own parameters: `Con(m, n, [Param(0)..])`.
    pub ty: TypeId,
}

/// A data constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtorInfo {
    pub data: DeclId,
    /// Position among the siblings.
    pub index: u32,
    /// Type parameters of the owning data type.
    pub params: u32,
    /// Field types over the owner's parameters.
    pub fields: Vec<TypeId>,
    /// Field names, parallel to `fields`; empty for a positional constructor.
    pub labels: Vec<Name>,
    /// The owning data type applied to its parameters.
    pub result: TypeId,
}

impl CtorInfo {
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Position of the field called `label`.
    pub fn field_index(&self, label: Name) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    /// Type of the constructor used as a value: the data type itself for
    /// nullary constructors, otherwise a function from the fields.
    pub fn scheme(&self, types: &TypeInterner) -> TypeScheme {
        let ty = if self.fields.is_empty() {
            self.result
        } else {
            types.function(self.fields.iter().copied(), self.result)
        };
        TypeScheme {
            params: self.params,
            ty,
        }
    }
}

impl Declaration {
    pub fn as_data(&self) -> Option<&DataInfo> {
        match &self.kind {
            DeclKind::Data(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_ctor(&self) -> Option<&CtorInfo> {
        match &self.kind {
            DeclKind::Constructor(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self.kind, DeclKind::Value { .. })
    }
}
