//! Syntax tree model for the Mina analysis core.
//!
//! The tree is produced once by an upstream parser (or by [`AstBuilder`]) and
//! stays immutable afterwards. Nodes live in an [`AstArena`] and are referred
//! to by stable ids; resolution and typing results are stored in side tables
//! keyed by those ids.

mod arena;
pub mod ast;
mod builder;
mod cancel;
mod ids;
mod interner;
mod span;
mod unit;

pub use arena::AstArena;
pub use ast::{ModulePath, QualifiedIdent};
pub use builder::{module_path, AstBuilder};
pub use cancel::{CancellationToken, Cancelled};
pub use ids::{
    BinderId, BinderRange, CaseId, CaseRange, ExprId, ExprRange, FieldPatternRange, IdentId,
    PatternId, PatternRange, TypeExprId, TypeExprRange,
};
pub use interner::{Name, StringInterner};
pub use span::Span;
pub use unit::CompilationUnit;
