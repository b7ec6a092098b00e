use std::fmt;

/// Index of a module in the [`SymbolTable`](crate::SymbolTable).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ModuleId(u32);

/// Index of a declaration in the [`SymbolTable`](crate::SymbolTable).
///
/// Re-declaring a module hands its previous ids out again, in allocation
/// order, so an unchanged module keeps its ids.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclId(u32);

impl ModuleId {
    pub(crate) fn from_index(index: usize) -> Self {
        ModuleId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl DeclId {
    pub(crate) fn from_index(index: usize) -> Self {
        DeclId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}
