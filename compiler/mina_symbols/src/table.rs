//! The session-wide registry of modules and declarations.

use std::sync::Arc;

use mina_ir::{ModulePath, Name, QualifiedIdent, Span, StringInterner};
use mina_types::{TypeId, TypeScheme};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{DeclId, DeclKind, Declaration, LookupError, ModuleId};

/// Which kind of entity a name refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Namespace {
    /// Values. Constructors are visible here too, as constructor functions.
    Value,
    Type,
    Constructor,
}

impl Namespace {
    pub fn describe(self) -> &'static str {
        match self {
            Namespace::Value => "value",
            Namespace::Type => "type",
            Namespace::Constructor => "constructor",
        }
    }
}

/// Declarations of one module, split by namespace.
#[derive(Clone, Debug)]
pub struct ModuleEntry {
    pub path: ModulePath,
    /// Dotted path, used as the nominal identity of the module's types.
    pub qualified: Name,
    values: FxHashMap<Name, DeclId>,
    types: FxHashMap<Name, DeclId>,
    ctors: FxHashMap<Name, DeclId>,
    /// Declarations allocated for the current contents, in order.
    owned: Vec<DeclId>,
    /// Ids of earlier contents, highest first, handed out before new ones.
    recycled: Vec<DeclId>,
    /// Cleared when a first declaration of the module is rolled back.
    live: bool,
}

impl ModuleEntry {
    fn new(path: ModulePath, qualified: Name) -> Self {
        ModuleEntry {
            path,
            qualified,
            values: FxHashMap::default(),
            types: FxHashMap::default(),
            ctors: FxHashMap::default(),
            owned: Vec::new(),
            recycled: Vec::new(),
            live: true,
        }
    }

    /// Empty entry for `path` that takes over every id `self` holds.
    fn cleared(&mut self, path: ModulePath, qualified: Name) -> Self {
        let mut recycled = std::mem::take(&mut self.owned);
        recycled.append(&mut self.recycled);
        recycled.sort_unstable_by(|a, b| b.cmp(a));
        ModuleEntry {
            recycled,
            ..ModuleEntry::new(path, qualified)
        }
    }

    fn space(&self, ns: Namespace) -> &FxHashMap<Name, DeclId> {
        match ns {
            Namespace::Value => &self.values,
            Namespace::Type => &self.types,
            Namespace::Constructor => &self.ctors,
        }
    }

    fn space_mut(&mut self, ns: Namespace) -> &mut FxHashMap<Name, DeclId> {
        match ns {
            Namespace::Value => &mut self.values,
            Namespace::Type => &mut self.types,
            Namespace::Constructor => &mut self.ctors,
        }
    }

    /// Look up `name`; the value namespace falls back to constructors.
    pub fn get(&self, ns: Namespace, name: Name) -> Option<DeclId> {
        let found = self.space(ns).get(&name).copied();
        match (found, ns) {
            (None, Namespace::Value) => self.ctors.get(&name).copied(),
            _ => found,
        }
    }

    /// Whether `name` is declared in any namespace.
    pub fn declares(&self, name: Name) -> bool {
        self.values.contains_key(&name)
            || self.types.contains_key(&name)
            || self.ctors.contains_key(&name)
    }
}

/// An import as seen by lookup: the module and, for selective imports, the
/// names it exposes.
#[derive(Clone, Debug)]
pub struct ImportScope {
    pub module: ModuleId,
    pub only: Option<FxHashSet<Name>>,
}

impl ImportScope {
    fn exposes(&self, name: Name) -> bool {
        self.only.as_ref().map_or(true, |names| names.contains(&name))
    }
}

/// A module's entry and declarations as they were before it was declared
/// again. See [`SymbolTable::save_module`].
#[derive(Clone, Debug)]
pub struct SavedModule {
    path: ModulePath,
    /// `None` if the module was not declared yet.
    saved: Option<(ModuleEntry, Vec<Arc<Declaration>>)>,
}

/// Everything an unqualified lookup consults, besides local scopes.
#[derive(Clone, Debug)]
pub struct LookupScope {
    pub module: ModuleId,
    pub imports: Vec<ImportScope>,
}

/// Modules and declarations of a session.
///
/// Read-only while a unit is resolved and checked; extended or patched only
/// through [`SymbolTableHandle::update`](crate::SymbolTableHandle::update).
#[derive(Clone, Debug)]
pub struct SymbolTable {
    modules: Vec<ModuleEntry>,
    by_path: FxHashMap<ModulePath, ModuleId>,
    decls: Vec<Arc<Declaration>>,
    prelude: ModuleId,
}

/// Built-in types visible from every module.
const PRELUDE_TYPES: [(&str, TypeId); 6] = [
    ("Int", TypeId::INT),
    ("Float", TypeId::FLOAT),
    ("Bool", TypeId::BOOL),
    ("Char", TypeId::CHAR),
    ("String", TypeId::STRING),
    ("Unit", TypeId::UNIT),
];

impl SymbolTable {
    /// Table containing only the prelude module.
    pub fn new(interner: &StringInterner) -> Self {
        let mut table = SymbolTable {
            modules: Vec::new(),
            by_path: FxHashMap::default(),
            decls: Vec::new(),
            prelude: ModuleId::from_index(0),
        };
        let prelude =
            table.begin_module(ModulePath::new(vec![interner.intern("prelude")]), interner);
        for (name, ty) in PRELUDE_TYPES {
            let name = interner.intern(name);
            let decl = table.add_decl(Declaration {
                name,
                module: prelude,
                span: Span::DUMMY,
                kind: DeclKind::Primitive(ty),
            });
            let _ = table.define(prelude, Namespace::Type, name, decl);
        }
        table.prelude = prelude;
        table
    }

    pub fn prelude(&self) -> ModuleId {
        self.prelude
    }

    /// Create `path`, or clear its namespaces if it already exists so that
    /// its declarations can be registered afresh. The old declarations'
    /// ids are reused by the new ones.
    pub fn begin_module(&mut self, path: ModulePath, interner: &StringInterner) -> ModuleId {
        let qualified = interner.intern(&interner.join(path.segments()));
        if let Some(&id) = self.by_path.get(&path) {
            let entry = &mut self.modules[id.index()];
            *entry = entry.cleared(path, qualified);
            return id;
        }
        let id = ModuleId::from_index(self.modules.len());
        self.modules.push(ModuleEntry::new(path.clone(), qualified));
        self.by_path.insert(path, id);
        id
    }

    /// Record `path` as it is now, so that a declaration of it that does not
    /// complete can be undone with [`restore_module`](Self::restore_module).
    pub fn save_module(&self, path: &ModulePath) -> SavedModule {
        let saved = self.module_id(path).map(|id| {
            let entry = self.module(id).clone();
            let decls = entry
                .owned
                .iter()
                .map(|decl| Arc::clone(&self.decls[decl.index()]))
                .collect();
            (entry, decls)
        });
        SavedModule {
            path: path.clone(),
            saved,
        }
    }

    /// Put a module back the way [`save_module`](Self::save_module) found
    /// it. A module that did not exist then is hidden from lookup again.
    pub fn restore_module(&mut self, saved: SavedModule) {
        let Some(&id) = self.by_path.get(&saved.path) else {
            return;
        };
        let entry = &mut self.modules[id.index()];
        let qualified = entry.qualified;
        let mut cleared = entry.cleared(saved.path, qualified);
        match saved.saved {
            Some((mut old, decls)) => {
                cleared.recycled.retain(|decl| !old.owned.contains(decl));
                old.recycled = cleared.recycled;
                for (&decl, arc) in old.owned.iter().zip(decls) {
                    self.decls[decl.index()] = arc;
                }
                self.modules[id.index()] = old;
            }
            None => {
                cleared.live = false;
                self.modules[id.index()] = cleared;
            }
        }
    }

    pub fn module_id(&self, path: &ModulePath) -> Option<ModuleId> {
        self.by_path
            .get(path)
            .copied()
            .filter(|id| self.modules[id.index()].live)
    }

    fn module_by_segments(&self, segments: &[Name]) -> Option<ModuleId> {
        self.module_id(&ModulePath::new(segments.to_vec()))
    }

    pub fn module(&self, id: ModuleId) -> &ModuleEntry {
        &self.modules[id.index()]
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Allocate `decl`, reusing an id its module held before it was last
    /// cleared if one is left.
    pub fn add_decl(&mut self, decl: Declaration) -> DeclId {
        let entry = &mut self.modules[decl.module.index()];
        let id = match entry.recycled.pop() {
            Some(id) => {
                self.decls[id.index()] = Arc::new(decl);
                id
            }
            None => {
                let id = DeclId::from_index(self.decls.len());
                self.decls.push(Arc::new(decl));
                id
            }
        };
        entry.owned.push(id);
        id
    }

    /// Number of declaration slots ever allocated, live or recycled.
    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub(crate) fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        Arc::make_mut(&mut self.decls[id.index()])
    }

    /// Bind `name` to `decl` in a module namespace. On a clash the existing
    /// declaration is returned and nothing changes.
    pub fn define(
        &mut self,
        module: ModuleId,
        ns: Namespace,
        name: Name,
        decl: DeclId,
    ) -> Result<(), DeclId> {
        let space = self.modules[module.index()].space_mut(ns);
        if let Some(&existing) = space.get(&name) {
            return Err(existing);
        }
        space.insert(name, decl);
        Ok(())
    }

    /// Record the inferred scheme of a value declaration.
    pub fn set_value_scheme(&mut self, decl: DeclId, new_scheme: TypeScheme) {
        match &mut self.decl_mut(decl).kind {
            DeclKind::Value { scheme } => *scheme = Some(new_scheme),
            other => tracing::error!(?decl, ?other, "scheme patch on a non-value declaration"),
        }
    }

    /// Resolve `ident` in namespace `ns` from within `scope`.
    ///
    /// Qualified names go straight to the named module. Bare names are
    /// searched in the current module, then the imports in order, then the
    /// prelude. Local scopes are the resolver's business.
    pub fn lookup(
        &self,
        scope: &LookupScope,
        ident: &QualifiedIdent,
        ns: Namespace,
    ) -> Result<DeclId, LookupError> {
        if ident.is_qualified() {
            let module = self
                .module_by_segments(&ident.segments)
                .ok_or(LookupError::UnknownPackage)?;
            let entry = self.module(module);
            if let Some(decl) = entry.get(ns, ident.name) {
                return Ok(decl);
            }
            if ns == Namespace::Constructor {
                if let Some(decl) = entry.get(Namespace::Value, ident.name) {
                    return Err(LookupError::NotAConstructor(decl));
                }
            }
            return Err(LookupError::UnknownMember { module });
        }

        if let Some(decl) = self.lookup_unqualified(scope, ident.name, ns) {
            return Ok(decl);
        }
        if ns == Namespace::Constructor {
            if let Some(decl) = self.lookup_unqualified(scope, ident.name, Namespace::Value) {
                return Err(LookupError::NotAConstructor(decl));
            }
        }
        Err(LookupError::UnknownName)
    }

    fn lookup_unqualified(
        &self,
        scope: &LookupScope,
        name: Name,
        ns: Namespace,
    ) -> Option<DeclId> {
        self.module(scope.module)
            .get(ns, name)
            .or_else(|| {
                scope
                    .imports
                    .iter()
                    .filter(|import| import.exposes(name))
                    .find_map(|import| self.module(import.module).get(ns, name))
            })
            .or_else(|| self.module(self.prelude).get(ns, name))
    }

    /// Constructors of `data`, in declaration order.
    pub fn constructors(&self, data: DeclId) -> &[DeclId] {
        self.decl(data)
            .as_data()
            .map_or(&[][..], |info| info.constructors.as_slice())
    }
}

#[cfg(test)]
mod tests;
