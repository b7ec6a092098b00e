use mina_ir::Name;
use smallvec::SmallVec;

use crate::{TypeId, TypeVar};

/// Argument lists of type constructors, functions and tuples.
pub type TypeList = SmallVec<[TypeId; 4]>;

/// Structure of a type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Int,
    Float,
    Bool,
    Char,
    String,
    Unit,
    Error,

    /// Unbound unification variable.
    Var(TypeVar),

    /// Quantified parameter `i` of a [`TypeScheme`](crate::TypeScheme) or of
    /// a data declaration's constructor signatures.
    Param(u32),

    /// Nominal data type applied to arguments, e.g. `std.option.Option[Int]`.
    Con {
        /// Dotted path of the declaring module.
        module: Name,
        name: Name,
        args: TypeList,
    },

    Function {
        params: TypeList,
        ret: TypeId,
    },

    /// Tuple of two or more elements; the empty tuple is `Unit`.
    Tuple(TypeList),
}

impl TypeKind {
    /// Direct child types, in order.
    pub fn children(&self) -> impl Iterator<Item = TypeId> + '_ {
        let (list, ret): (&[TypeId], Option<TypeId>) = match self {
            TypeKind::Con { args, .. } => (args.as_slice(), None),
            TypeKind::Function { params, ret } => (params.as_slice(), Some(*ret)),
            TypeKind::Tuple(elems) => (elems.as_slice(), None),
            _ => (&[][..], None),
        };
        list.iter().copied().chain(ret)
    }
}
