//! Name resolution.
//!
//! Binds every identifier of a compilation unit either to a local variable
//! or to a declaration in the [`SymbolTable`](mina_symbols::SymbolTable).
//! Results are side tables keyed by node id; the tree itself is untouched.

mod resolution;
mod resolver;
mod scope;

pub use resolution::{LocalId, LocalInfo, Resolution, Resolutions};
pub use resolver::{resolve_unit, ResolveContext};
