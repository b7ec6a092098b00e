//! Type inference.
//!
//! Assigns every expression and pattern of a resolved compilation unit a
//! type, using the [`Unifier`](mina_types::Unifier) for constraint solving
//! and [`TypeScheme`](mina_types::TypeScheme)s for let-polymorphism.
//! Unannotated top-level values get their schemes inferred here; the driver
//! writes them back into the symbol table.

mod checker;
mod table;

pub use checker::{check_unit, CheckContext, TypeCheckResult};
pub use table::TypeTable;
