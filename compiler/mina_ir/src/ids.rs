//! Stable node indices into an [`AstArena`](crate::AstArena).
//!
//! Later passes key their side tables by these ids; the tree itself is never
//! annotated in place.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

macro_rules! define_range {
    ($(#[$meta:meta])* $name:ident => $id:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) fn as_range(self) -> std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({}..+{})"), self.start, self.len)
            }
        }
    };
}

define_id!(
    /// Index of an expression node.
    ExprId
);
define_id!(
    /// Index of a pattern node.
    PatternId
);
define_id!(
    /// Index of a case clause.
    CaseId
);
define_id!(
    /// Index of a type expression.
    TypeExprId
);
define_id!(
    /// Index of a qualified identifier occurrence.
    IdentId
);
define_id!(
    /// Index of a lambda parameter or `let` binder.
    BinderId
);

define_range!(
    /// Consecutive expression ids in the arena's expression list storage.
    ExprRange => ExprId
);
define_range!(PatternRange => PatternId);
define_range!(CaseRange => CaseId);
define_range!(TypeExprRange => TypeExprId);
define_range!(BinderRange => BinderId);
define_range!(
    /// Consecutive field patterns of one `Ctor { .. }` pattern.
    FieldPatternRange => FieldPattern
);
