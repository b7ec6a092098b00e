//! Per-type properties cached at interning time.

use bitflags::bitflags;

bitflags! {
    /// Summary of what a type contains, computed once from its children.
    ///
    /// Lets substitution and the occurs check skip ground subtrees.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u8 {
        /// Contains a unification variable.
        const HAS_VAR = 1 << 0;
        /// Contains the error type.
        const HAS_ERROR = 1 << 1;
        /// Contains a quantified parameter.
        const HAS_PARAM = 1 << 2;
    }
}

impl TypeFlags {
    /// Flags carried by a node itself, before children are folded in.
    pub(crate) fn own(kind: &crate::TypeKind) -> Self {
        match kind {
            crate::TypeKind::Var(_) => TypeFlags::HAS_VAR,
            crate::TypeKind::Error => TypeFlags::HAS_ERROR,
            crate::TypeKind::Param(_) => TypeFlags::HAS_PARAM,
            _ => TypeFlags::empty(),
        }
    }
}
