use std::fmt;

/// Interned type handle.
///
/// Primitives occupy fixed indices below [`TypeId::FIRST_COMPOUND`]; every
/// other type is allocated on first use by the [`TypeInterner`](crate::TypeInterner).
/// Two structurally equal types always share one id.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const FLOAT: TypeId = TypeId(1);
    pub const BOOL: TypeId = TypeId(2);
    pub const CHAR: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);
    pub const UNIT: TypeId = TypeId(5);
    /// Placeholder for ill-typed or unresolved subtrees; unifies with anything.
    pub const ERROR: TypeId = TypeId(6);

    pub const FIRST_COMPOUND: u32 = 7;

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        TypeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_COMPOUND
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INT => write!(f, "Int"),
            Self::FLOAT => write!(f, "Float"),
            Self::BOOL => write!(f, "Bool"),
            Self::CHAR => write!(f, "Char"),
            Self::STRING => write!(f, "String"),
            Self::UNIT => write!(f, "Unit"),
            Self::ERROR => write!(f, "<error>"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}

/// Unification variable, unique within one [`Unifier`](crate::Unifier).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TypeVar(pub u32);

impl fmt::Debug for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}
