use crate::ast::{Decl, Import, ModulePath};
use crate::AstArena;

/// A parsed module handed to the analysis core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilationUnit {
    pub module: ModulePath,
    pub imports: Vec<Import>,
    /// Declarations in source order.
    pub decls: Vec<Decl>,
    pub arena: AstArena,
}
