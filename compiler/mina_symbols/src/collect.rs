//! Declaration collection for one compilation unit.
//!
//! Collection runs in two steps so that a batch of units can register all
//! their names before any unit resolves its imports:
//!
//! 1. [`register_unit`] creates the module and binds every top-level name.
//! 2. [`lower_unit`] resolves imports and lowers the type expressions in
//!    declaration headers (constructor fields, value annotations).
//!
//! [`declare_unit`] runs both for a single unit.

use mina_diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use mina_ir::ast::{DataDef, DeclKind as AstDeclKind, ImportItems, TypeExprKind, VariantDef};
use mina_ir::{CompilationUnit, IdentId, Name, Span, StringInterner, TypeExprId};
use mina_types::{TypeId, TypeInterner, TypeScheme};
use rustc_hash::FxHashMap;

use crate::{
    CtorInfo, DataInfo, DeclId, DeclKind, Declaration, ImportScope, LookupScope, ModuleId,
    Namespace, SymbolTable,
};

/// Result of [`register_unit`].
#[derive(Clone, Debug)]
pub struct RegisteredUnit {
    pub module: ModuleId,
    /// One entry per `unit.decls`, in order. Data declarations map to the
    /// data type's declaration.
    pub decls: Vec<DeclId>,
}

/// What later passes need to know about a declared unit.
#[derive(Clone, Debug)]
pub struct UnitSymbols {
    pub module: ModuleId,
    pub scope: LookupScope,
    pub decls: Vec<DeclId>,
    /// Type names resolved while lowering declaration headers.
    pub type_idents: FxHashMap<IdentId, DeclId>,
}

pub fn declare_unit(
    table: &mut SymbolTable,
    unit: &CompilationUnit,
    interner: &StringInterner,
    types: &TypeInterner,
    sink: &mut DiagnosticSink,
) -> UnitSymbols {
    let registered = register_unit(table, unit, interner, types, sink);
    lower_unit(table, unit, &registered, interner, types, sink)
}

/// Bind the unit's top-level names, reporting duplicates.
pub fn register_unit(
    table: &mut SymbolTable,
    unit: &CompilationUnit,
    interner: &StringInterner,
    types: &TypeInterner,
    sink: &mut DiagnosticSink,
) -> RegisteredUnit {
    let module = table.begin_module(unit.module.clone(), interner);
    let qualified = table.module(module).qualified;
    let mut decls = Vec::with_capacity(unit.decls.len());

    for decl in &unit.decls {
        match &decl.kind {
            AstDeclKind::Value(def) => {
                let id = table.add_decl(Declaration {
                    name: def.name,
                    module,
                    span: decl.span,
                    kind: DeclKind::Value { scheme: None },
                });
                define_reporting(
                    table,
                    module,
                    Namespace::Value,
                    def.name,
                    id,
                    decl.span,
                    interner,
                    sink,
                );
                decls.push(id);
            }
            AstDeclKind::Data(def) => {
                let params = u32::try_from(def.params.len()).unwrap_or(u32::MAX);
                let ty = types.con(qualified, def.name, (0..params).map(|i| types.param(i)));
                let data = table.add_decl(Declaration {
                    name: def.name,
                    module,
                    span: decl.span,
                    kind: DeclKind::Data(DataInfo {
                        params,
                        constructors: Vec::new(),
                        ty,
                    }),
                });
                define_reporting(
                    table,
                    module,
                    Namespace::Type,
                    def.name,
                    data,
                    decl.span,
                    interner,
                    sink,
                );
                report_repeated_params(def, decl.span, interner, sink);

                let mut ctors = Vec::with_capacity(def.variants.len());
                for (index, variant) in (0u32..).zip(&def.variants) {
                    report_repeated_labels(variant, interner, sink);
                    let ctor = table.add_decl(Declaration {
                        name: variant.name,
                        module,
                        span: variant.span,
                        kind: DeclKind::Constructor(CtorInfo {
                            data,
                            index,
                            params,
                            fields: Vec::new(),
                            labels: variant.labels.iter().map(|&(label, _)| label).collect(),
                            result: ty,
                        }),
                    });
                    define_reporting(
                        table,
                        module,
                        Namespace::Constructor,
                        variant.name,
                        ctor,
                        variant.span,
                        interner,
                        sink,
                    );
                    ctors.push(ctor);
                }
                if let DeclKind::Data(info) = &mut table.decl_mut(data).kind {
                    info.constructors = ctors;
                }
                decls.push(data);
            }
        }
    }

    tracing::debug!(
        module = interner.lookup(qualified),
        decls = decls.len(),
        "registered unit"
    );
    RegisteredUnit { module, decls }
}

#[expect(clippy::too_many_arguments, reason = "diagnostic context for one binding")]
fn define_reporting(
    table: &mut SymbolTable,
    module: ModuleId,
    ns: Namespace,
    name: Name,
    decl: DeclId,
    span: Span,
    interner: &StringInterner,
    sink: &mut DiagnosticSink,
) {
    if let Err(existing) = table.define(module, ns, name, decl) {
        let first = table.decl(existing).span;
        sink.push(
            Diagnostic::error(DiagnosticKind::DuplicateDeclaration)
                .with_message(format!(
                    "the {} `{}` is defined multiple times",
                    ns.describe(),
                    interner.lookup(name)
                ))
                .with_label(span, "redefined here")
                .with_secondary_label(first, "first defined here"),
        );
    }
}

/// `data T a a`: a type parameter may be declared only once.
fn report_repeated_params(
    def: &DataDef,
    span: Span,
    interner: &StringInterner,
    sink: &mut DiagnosticSink,
) {
    for (i, param) in def.params.iter().enumerate() {
        if def.params[..i].contains(param) {
            sink.push(
                Diagnostic::error(DiagnosticKind::DuplicateBinding)
                    .with_message(format!(
                        "type parameter `{}` is declared more than once in `{}`",
                        interner.lookup(*param),
                        interner.lookup(def.name)
                    ))
                    .with_label(span, "repeated type parameter"),
            );
        }
    }
}

fn report_repeated_labels(
    variant: &VariantDef,
    interner: &StringInterner,
    sink: &mut DiagnosticSink,
) {
    let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
    for &(label, span) in &variant.labels {
        if let Some(&first) = seen.get(&label) {
            sink.push(
                Diagnostic::error(DiagnosticKind::DuplicateDeclaration)
                    .with_message(format!(
                        "the field `{}` is defined multiple times in constructor `{}`",
                        interner.lookup(label),
                        interner.lookup(variant.name)
                    ))
                    .with_label(span, "redefined here")
                    .with_secondary_label(first, "first defined here"),
            );
        } else {
            seen.insert(label, span);
        }
    }
}

/// Resolve imports and lower declaration headers.
pub fn lower_unit(
    table: &mut SymbolTable,
    unit: &CompilationUnit,
    registered: &RegisteredUnit,
    interner: &StringInterner,
    types: &TypeInterner,
    sink: &mut DiagnosticSink,
) -> UnitSymbols {
    let scope = resolve_imports(table, unit, registered.module, interner, sink);
    let mut type_idents = FxHashMap::default();

    // Lowered first, written back afterwards: lowering reads the table.
    let mut ctor_fields: Vec<(DeclId, Vec<TypeId>)> = Vec::new();
    let mut annotations: Vec<(DeclId, TypeScheme)> = Vec::new();

    for (decl, &id) in unit.decls.iter().zip(&registered.decls) {
        match &decl.kind {
            AstDeclKind::Data(def) => {
                let ctors = table.constructors(id).to_vec();
                let mut lowering = TypeLowering {
                    table: &*table,
                    scope: &scope,
                    unit,
                    interner,
                    types,
                    params: def.params.clone(),
                    implicit: false,
                    type_idents: &mut type_idents,
                    sink: &mut *sink,
                };
                for (variant, ctor) in def.variants.iter().zip(ctors) {
                    let fields = variant.fields.iter().map(|f| lowering.lower(*f)).collect();
                    ctor_fields.push((ctor, fields));
                }
            }
            AstDeclKind::Value(def) => {
                let Some(ty) = def.ty else { continue };
                let mut lowering = TypeLowering {
                    table: &*table,
                    scope: &scope,
                    unit,
                    interner,
                    types,
                    params: Vec::new(),
                    implicit: true,
                    type_idents: &mut type_idents,
                    sink: &mut *sink,
                };
                let lowered = lowering.lower(ty);
                let params = u32::try_from(lowering.params.len()).unwrap_or(u32::MAX);
                annotations.push((id, TypeScheme { params, ty: lowered }));
            }
        }
    }

    for (ctor, fields) in ctor_fields {
        if let DeclKind::Constructor(info) = &mut table.decl_mut(ctor).kind {
            info.fields = fields;
        }
    }
    for (decl, scheme) in annotations {
        table.set_value_scheme(decl, scheme);
    }

    UnitSymbols {
        module: registered.module,
        scope,
        decls: registered.decls.clone(),
        type_idents,
    }
}

fn resolve_imports(
    table: &SymbolTable,
    unit: &CompilationUnit,
    module: ModuleId,
    interner: &StringInterner,
    sink: &mut DiagnosticSink,
) -> LookupScope {
    let mut imports = Vec::with_capacity(unit.imports.len());
    for import in &unit.imports {
        let Some(target) = table.module_id(&import.module) else {
            let path = interner.join(import.module.segments());
            sink.push(
                Diagnostic::error(DiagnosticKind::UnknownPackage)
                    .with_message(format!("unknown package `{path}`"))
                    .with_label(import.span, format!("no module named `{path}`")),
            );
            continue;
        };
        let only = match &import.items {
            ImportItems::All => None,
            ImportItems::Only(items) => {
                let entry = table.module(target);
                for (name, span) in items {
                    if !entry.declares(*name) {
                        sink.push(
                            Diagnostic::error(DiagnosticKind::UnknownMember)
                                .with_message(format!(
                                    "module `{}` has no member `{}`",
                                    interner.join(import.module.segments()),
                                    interner.lookup(*name)
                                ))
                                .with_label(*span, "not found in this module"),
                        );
                    }
                }
                Some(items.iter().map(|(name, _)| *name).collect())
            }
        };
        imports.push(ImportScope {
            module: target,
            only,
        });
    }
    LookupScope { module, imports }
}

/// Lowers header type expressions to interned types.
struct TypeLowering<'a> {
    table: &'a SymbolTable,
    scope: &'a LookupScope,
    unit: &'a CompilationUnit,
    interner: &'a StringInterner,
    types: &'a TypeInterner,
    /// Type variables in scope; a variable's position is its parameter index.
    params: Vec<Name>,
    /// Whether unknown variables become new parameters (value annotations)
    /// or errors (data declarations).
    implicit: bool,
    type_idents: &'a mut FxHashMap<IdentId, DeclId>,
    sink: &'a mut DiagnosticSink,
}

impl TypeLowering<'_> {
    fn lower(&mut self, id: TypeExprId) -> TypeId {
        let unit = self.unit;
        let arena = &unit.arena;
        let expr = arena.type_expr(id);
        match &expr.kind {
            TypeExprKind::Var(name) => {
                if let Some(i) = self.params.iter().position(|p| p == name) {
                    return self.types.param(u32::try_from(i).unwrap_or(u32::MAX));
                }
                if self.implicit {
                    self.params.push(*name);
                    let index = u32::try_from(self.params.len() - 1).unwrap_or(u32::MAX);
                    return self.types.param(index);
                }
                self.sink.push(
                    Diagnostic::error(DiagnosticKind::UnresolvedName)
                        .with_message(format!(
                            "cannot find type variable `{}`",
                            self.interner.lookup(*name)
                        ))
                        .with_label(expr.span, "not declared as a parameter"),
                );
                TypeId::ERROR
            }
            TypeExprKind::Function { params, ret } => {
                let params: Vec<TypeId> =
                    arena.type_expr_list(*params).iter().map(|p| self.lower(*p)).collect();
                let ret = self.lower(*ret);
                self.types.function(params, ret)
            }
            TypeExprKind::Tuple(elems) => {
                let elems: Vec<TypeId> =
                    arena.type_expr_list(*elems).iter().map(|e| self.lower(*e)).collect();
                self.types.tuple(elems)
            }
            TypeExprKind::Named { ident, args } => {
                let args: Vec<TypeId> =
                    arena.type_expr_list(*args).iter().map(|a| self.lower(*a)).collect();
                self.lower_named(*ident, &args, expr.span)
            }
        }
    }

    fn lower_named(&mut self, ident_id: IdentId, args: &[TypeId], span: Span) -> TypeId {
        let unit = self.unit;
        let ident = unit.arena.ident(ident_id);
        let decl = match self.table.lookup(self.scope, ident, Namespace::Type) {
            Ok(decl) => decl,
            Err(err) => {
                self.sink
                    .push(err.to_diagnostic(ident, Namespace::Type, self.interner));
                return TypeId::ERROR;
            }
        };
        self.type_idents.insert(ident_id, decl);

        let (expected, ty) = match &self.table.decl(decl).kind {
            DeclKind::Primitive(ty) => (0, *ty),
            DeclKind::Data(info) => (info.params as usize, info.ty),
            _ => return TypeId::ERROR,
        };
        if args.len() != expected {
            self.sink.push(
                Diagnostic::error(DiagnosticKind::TypeArity)
                    .with_message(format!(
                        "type `{}` expects {expected} argument(s), found {}",
                        self.interner.lookup(ident.name),
                        args.len()
                    ))
                    .with_label(span, "wrong number of type arguments"),
            );
            return TypeId::ERROR;
        }
        self.types.substitute_params(ty, args)
    }
}
