use crate::{TypeId, TypeVar};

/// Why two types could not be unified.
///
/// Types are reported as they stood when the conflict was found; callers
/// apply the substitution before rendering them.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum UnifyError {
    #[error("type mismatch")]
    Mismatch { expected: TypeId, found: TypeId },

    /// Binding `var` to `ty` would make an infinite type.
    #[error("infinite type")]
    InfiniteType { var: TypeVar, ty: TypeId },

    /// Function parameter lists or tuples of different lengths.
    #[error("expected {expected} elements, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}
