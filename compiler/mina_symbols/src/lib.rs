//! Symbol table and module graph.
//!
//! Every module of a session lives in one [`SymbolTable`] with three
//! namespaces per module: values, types and constructors. Data types record
//! their full constructor set, which the match analyzer uses as the sibling
//! set for exhaustiveness.
//!
//! The table is shared through a [`SymbolTableHandle`]: concurrent readers
//! work on snapshots, writers are serialized.

mod collect;
mod decl;
mod error;
mod handle;
mod ids;
mod table;

pub use collect::{declare_unit, lower_unit, register_unit, RegisteredUnit, UnitSymbols};
pub use decl::{CtorInfo, DataInfo, DeclKind, Declaration};
pub use error::LookupError;
pub use handle::SymbolTableHandle;
pub use ids::{DeclId, ModuleId};
pub use table::{ImportScope, LookupScope, ModuleEntry, Namespace, SavedModule, SymbolTable};
