//! Types for the Mina analysis core.
//!
//! - [`TypeInterner`]: session-wide, thread-safe hash-consing of types
//! - [`Unifier`] and [`Substitution`]: per-unit Hindley-Milner solving
//! - [`TypeScheme`]: let-polymorphism via instantiate/generalize

mod display;
mod flags;
mod interner;
mod kind;
mod scheme;
mod subst;
mod type_id;
mod unify;

pub use display::TypeDisplay;
pub use flags::TypeFlags;
pub use interner::TypeInterner;
pub use kind::{TypeKind, TypeList};
pub use scheme::{free_vars, TypeScheme};
pub use subst::Substitution;
pub use type_id::{TypeId, TypeVar};
pub use unify::{Unifier, UnifyError};
