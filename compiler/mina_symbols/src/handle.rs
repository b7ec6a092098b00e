//! Shared access to the session's symbol table.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::SymbolTable;

/// Copy-on-write handle to the session's [`SymbolTable`].
///
/// Readers take an `Arc` snapshot and never block writers for longer than
/// the pointer copy. Writers are serialized by the lock; if snapshots are
/// still alive, the first write clones the table so readers keep seeing a
/// consistent version.
#[derive(Debug)]
pub struct SymbolTableHandle {
    current: RwLock<Arc<SymbolTable>>,
}

impl SymbolTableHandle {
    pub fn new(table: SymbolTable) -> Self {
        SymbolTableHandle {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// Consistent, read-only view of the current table.
    pub fn snapshot(&self) -> Arc<SymbolTable> {
        Arc::clone(&self.current.read())
    }

    /// Apply one serialized modification.
    pub fn update<R>(&self, f: impl FnOnce(&mut SymbolTable) -> R) -> R {
        let mut guard = self.current.write();
        f(Arc::make_mut(&mut guard))
    }
}

#[cfg(test)]
mod tests;
