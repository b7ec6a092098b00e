//! The resolver walk.
//!
//! Declarations are resolved one at a time, each starting from an empty
//! local scope. Scopes are opened for lambda parameters, `let` bodies and
//! case clauses; a clause scope covers its pattern, guard and body.

use mina_diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use mina_ir::ast::{DeclKind as AstDeclKind, ExprKind, FieldPattern, PatternKind};
use mina_ir::{
    AstArena, BinderId, CancellationToken, Cancelled, CompilationUnit, ExprId, IdentId, Name,
    PatternId, Span, StringInterner,
};
use mina_stack::ensure_sufficient_stack;
use mina_symbols::{DeclId, Namespace, SymbolTable, UnitSymbols};
use rustc_hash::FxHashMap;

use crate::scope::Scopes;
use crate::{LocalId, Resolution, Resolutions};

/// Read-only inputs of a resolution pass.
#[derive(Copy, Clone)]
pub struct ResolveContext<'a> {
    pub table: &'a SymbolTable,
    pub unit: &'a CompilationUnit,
    pub symbols: &'a UnitSymbols,
    pub interner: &'a StringInterner,
}

/// Resolve every identifier of `cx.unit`.
///
/// Failures are reported to `sink`; the only early exit is cancellation.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve_unit(
    cx: &ResolveContext<'_>,
    sink: &mut DiagnosticSink,
    token: &CancellationToken,
) -> Result<Resolutions, Cancelled> {
    let mut resolver = Resolver {
        cx: *cx,
        sink,
        token,
        scopes: Scopes::new(),
        out: Resolutions::default(),
    };

    for (&ident, &decl) in &cx.symbols.type_idents {
        resolver.out.record_ident(ident, Resolution::Global(decl));
    }

    for decl in &cx.unit.decls {
        if let AstDeclKind::Value(def) = &decl.kind {
            resolver.resolve_expr(def.value)?;
            debug_assert!(resolver.scopes.is_balanced());
        }
    }

    tracing::debug!(
        resolved = resolver.out.resolved_count(),
        locals = resolver.out.local_count(),
        "resolution finished"
    );
    Ok(resolver.out)
}

/// Names bound so far by one pattern or parameter list.
type BoundNames = FxHashMap<Name, Span>;

/// Where a group of simultaneous bindings comes from, for messages.
#[derive(Copy, Clone)]
enum BindingSite {
    Pattern,
    Parameters,
}

struct Resolver<'a, 'cx> {
    cx: ResolveContext<'a>,
    sink: &'cx mut DiagnosticSink,
    token: &'cx CancellationToken,
    scopes: Scopes,
    out: Resolutions,
}

impl<'a> Resolver<'a, '_> {
    fn arena(&self) -> &'a AstArena {
        &self.cx.unit.arena
    }

    fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scopes.push();
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn resolve_expr(&mut self, id: ExprId) -> Result<(), Cancelled> {
        self.token.check()?;
        ensure_sufficient_stack(|| self.resolve_expr_inner(id))
    }

    fn resolve_expr_inner(&mut self, id: ExprId) -> Result<(), Cancelled> {
        let arena = self.arena();
        let expr = arena.expr(id);
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::Error => {}
            ExprKind::Ident(ident) => self.resolve_value_ident(*ident),
            ExprKind::Apply { func, args } => {
                self.resolve_expr(*func)?;
                for &arg in arena.expr_list(*args) {
                    self.resolve_expr(arg)?;
                }
            }
            ExprKind::Lambda { params, body } => {
                let (params, body) = (arena.binder_list(*params), *body);
                self.with_scope(|this| {
                    let mut bound = BoundNames::default();
                    for &param in params {
                        this.bind_binder(param, &mut bound, BindingSite::Parameters);
                    }
                    this.resolve_expr(body)
                })?;
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(*cond)?;
                self.resolve_expr(*then_branch)?;
                self.resolve_expr(*else_branch)?;
            }
            ExprKind::Let {
                binder,
                value,
                body,
            } => {
                let (binder, body) = (*binder, *body);
                self.resolve_expr(*value)?;
                self.with_scope(|this| {
                    this.bind_binder(binder, &mut BoundNames::default(), BindingSite::Parameters);
                    this.resolve_expr(body)
                })?;
            }
            ExprKind::Tuple(elems) => {
                for &elem in arena.expr_list(*elems) {
                    self.resolve_expr(elem)?;
                }
            }
            ExprKind::Match { scrutinee, cases } => {
                self.resolve_expr(*scrutinee)?;
                let cases = arena.case_list(*cases);
                if cases.is_empty() {
                    self.sink.internal("match expression has no cases", expr.span);
                }
                for &case in cases {
                    let clause = arena.case(case);
                    let (pattern, guard, body) = (clause.pattern, clause.guard, clause.body);
                    self.with_scope(|this| {
                        this.resolve_pattern(pattern, &mut BoundNames::default())?;
                        if let Some(guard) = guard {
                            this.resolve_expr(guard)?;
                        }
                        this.resolve_expr(body)
                    })?;
                }
            }
        }
        Ok(())
    }

    fn resolve_value_ident(&mut self, id: IdentId) {
        let ident = self.arena().ident(id);
        if !ident.is_qualified() {
            if let Some(local) = self.scopes.lookup(ident.name) {
                self.out.record_ident(id, Resolution::Local(local));
                return;
            }
        }
        match self
            .cx
            .table
            .lookup(&self.cx.symbols.scope, ident, Namespace::Value)
        {
            Ok(decl) => self.out.record_ident(id, Resolution::Global(decl)),
            Err(err) => {
                self.sink
                    .push(err.to_diagnostic(ident, Namespace::Value, self.cx.interner));
            }
        }
    }

    fn resolve_pattern(&mut self, id: PatternId, bound: &mut BoundNames) -> Result<(), Cancelled> {
        self.token.check()?;
        ensure_sufficient_stack(|| self.resolve_pattern_inner(id, bound))
    }

    fn resolve_pattern_inner(
        &mut self,
        id: PatternId,
        bound: &mut BoundNames,
    ) -> Result<(), Cancelled> {
        let arena = self.arena();
        let pattern = arena.pattern(id);
        match &pattern.kind {
            PatternKind::Wildcard | PatternKind::Literal(_) => {}
            PatternKind::Binding(name) => {
                let local = self.bind(*name, pattern.span, bound, BindingSite::Pattern);
                self.out.record_pattern(id, local);
            }
            PatternKind::As { name, pattern: inner } => {
                let local = self.bind(*name, pattern.span, bound, BindingSite::Pattern);
                self.out.record_pattern(id, local);
                self.resolve_pattern(*inner, bound)?;
            }
            PatternKind::Constructor { ctor, args } => {
                let args = arena.pattern_list(*args);
                if let Some(decl) = self.resolve_ctor(*ctor) {
                    self.check_ctor_arity(decl, *ctor, args.len(), pattern.span);
                }
                for &arg in args {
                    self.resolve_pattern(arg, bound)?;
                }
            }
            PatternKind::Fields { ctor, fields } => {
                let fields = arena.field_pattern_list(*fields);
                if let Some(decl) = self.resolve_ctor(*ctor) {
                    self.check_field_names(decl, fields);
                }
                for field in fields {
                    self.resolve_pattern(field.pattern, bound)?;
                }
            }
            PatternKind::Tuple(elems) => {
                for &elem in arena.pattern_list(*elems) {
                    self.resolve_pattern(elem, bound)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve the constructor head of a pattern.
    fn resolve_ctor(&mut self, id: IdentId) -> Option<DeclId> {
        let ident = self.arena().ident(id);
        match self
            .cx
            .table
            .lookup(&self.cx.symbols.scope, ident, Namespace::Constructor)
        {
            Ok(decl) => {
                self.out.record_ident(id, Resolution::Global(decl));
                Some(decl)
            }
            Err(err) => {
                self.sink
                    .push(err.to_diagnostic(ident, Namespace::Constructor, self.cx.interner));
                None
            }
        }
    }

    fn check_ctor_arity(&mut self, decl: DeclId, id: IdentId, found: usize, span: Span) {
        let Some(info) = self.cx.table.decl(decl).as_ctor() else {
            return;
        };
        let expected = info.arity();
        if expected != found {
            let name = self.cx.interner.lookup(self.arena().ident(id).name);
            let fields = plural(expected);
            self.sink.push(
                Diagnostic::error(DiagnosticKind::ConstructorArity)
                    .with_message(format!(
                        "constructor `{name}` has {expected} field{fields}, but the pattern has \
                         {found}"
                    ))
                    .with_label(span, format!("expected {expected} sub-pattern{fields}")),
            );
        }
    }

    /// Every named field must exist and be matched at most once.
    fn check_field_names(&mut self, decl: DeclId, fields: &[FieldPattern]) {
        let ctor = self.cx.table.decl(decl);
        let Some(info) = ctor.as_ctor() else {
            return;
        };
        let interner = self.cx.interner;
        let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
        for field in fields {
            let text = interner.lookup(field.field);
            if info.field_index(field.field).is_none() {
                self.sink.push(
                    Diagnostic::error(DiagnosticKind::UnknownField)
                        .with_message(format!(
                            "constructor `{}` has no field `{text}`",
                            interner.lookup(ctor.name)
                        ))
                        .with_label(field.span, "unknown field"),
                );
            } else if let Some(&first) = seen.get(&field.field) {
                self.sink.push(
                    Diagnostic::error(DiagnosticKind::DuplicateBinding)
                        .with_message(format!("field `{text}` is matched more than once"))
                        .with_label(field.span, "matched again here")
                        .with_secondary_label(first, "first matched here"),
                );
            } else {
                seen.insert(field.field, field.span);
            }
        }
    }

    fn bind_binder(&mut self, id: BinderId, bound: &mut BoundNames, site: BindingSite) {
        let binder = self.arena().binder(id);
        let local = self.bind(binder.name, binder.span, bound, site);
        self.out.record_binder(id, local);
    }

    /// Introduce a local in the current scope, reporting a name already
    /// bound by the same pattern or parameter list.
    fn bind(
        &mut self,
        name: Name,
        span: Span,
        bound: &mut BoundNames,
        site: BindingSite,
    ) -> LocalId {
        if let Some(&first) = bound.get(&name) {
            let text = self.cx.interner.lookup(name);
            let place = match site {
                BindingSite::Pattern => "pattern",
                BindingSite::Parameters => "parameter list",
            };
            self.sink.push(
                Diagnostic::error(DiagnosticKind::DuplicateBinding)
                    .with_message(format!("`{text}` is bound more than once in the same {place}"))
                    .with_label(span, "bound again here")
                    .with_secondary_label(first, "first bound here"),
            );
        } else {
            bound.insert(name, span);
        }
        let local = self.out.new_local(name, span);
        self.scopes.define(name, local);
        local
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
