//! The inference walk.
//!
//! # Module Structure
//!
//! - `expr`: expression rules
//! - `pattern`: checking patterns against an expected type
//!
//! Top-level values are checked in declaration order. Annotated values are
//! checked against a fresh instance of their annotation. An unannotated
//! value referenced before its own body was checked is seen through a
//! placeholder variable; once checked, it is generalized and later
//! references instantiate the scheme.

mod expr;
mod pattern;

use mina_diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, ErrorGuaranteed};
use mina_ir::ast::DeclKind as AstDeclKind;
use mina_ir::{AstArena, CancellationToken, Cancelled, CompilationUnit, Span, StringInterner};
use mina_resolve::{LocalId, Resolutions};
use mina_symbols::{DeclId, DeclKind, SymbolTable, UnitSymbols};
use mina_types::{free_vars, TypeId, TypeInterner, TypeScheme, TypeVar, Unifier, UnifyError};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::TypeTable;

/// Read-only inputs of an inference pass.
#[derive(Copy, Clone)]
pub struct CheckContext<'a> {
    pub table: &'a SymbolTable,
    pub unit: &'a CompilationUnit,
    pub symbols: &'a UnitSymbols,
    pub resolutions: &'a Resolutions,
    pub interner: &'a StringInterner,
    pub types: &'a TypeInterner,
}

#[derive(Clone, Debug)]
pub struct TypeCheckResult {
    pub types: TypeTable,
    /// Inferred schemes of the unit's unannotated top-level values, in
    /// declaration order.
    pub schemes: Vec<(DeclId, TypeScheme)>,
}

/// Infer types for `cx.unit`.
///
/// Type errors are reported to `sink` and typed as [`TypeId::ERROR`];
/// the only early exit is cancellation.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_unit(
    cx: &CheckContext<'_>,
    sink: &mut DiagnosticSink,
    token: &CancellationToken,
) -> Result<TypeCheckResult, Cancelled> {
    let arena = &cx.unit.arena;
    let mut checker = TypeChecker {
        cx: *cx,
        sink,
        token,
        unifier: Unifier::new(cx.types),
        expr_types: vec![TypeId::ERROR; arena.expr_count()],
        pattern_types: vec![TypeId::ERROR; arena.pattern_count()],
        locals: vec![TypeScheme::mono(TypeId::ERROR); cx.resolutions.local_count()],
        in_scope: Vec::new(),
        pending: FxHashMap::default(),
        inferred: FxHashMap::default(),
    };

    let values: Vec<(DeclId, &mina_ir::ast::ValueDef)> = cx
        .unit
        .decls
        .iter()
        .zip(&cx.symbols.decls)
        .filter_map(|(decl, &id)| match &decl.kind {
            AstDeclKind::Value(def) => Some((id, def)),
            AstDeclKind::Data(_) => None,
        })
        .collect();

    for &(id, _) in &values {
        if checker.annotation(id).is_none() {
            let var = checker.unifier.fresh_var();
            checker.pending.insert(id, var);
        }
    }

    let mut schemes = Vec::new();
    for (id, def) in values {
        let found = checker.infer_expr(def.value)?;
        let span = cx.unit.arena.expr(def.value).span;
        if let Some(annotation) = checker.annotation(id) {
            let expected = annotation.instantiate(&mut checker.unifier);
            let _ = checker.unify_or_report(
                expected,
                found,
                DiagnosticKind::TypeMismatch,
                span,
                "value does not match its annotation",
            );
        } else if let Some(placeholder) = checker.pending.remove(&id) {
            let _ = checker.unify_or_report(
                placeholder,
                found,
                DiagnosticKind::TypeMismatch,
                span,
                "value is used at a different type earlier in this module",
            );
            let env = checker.env_free_vars();
            let scheme = TypeScheme::generalize(&checker.unifier, placeholder, &env);
            checker.inferred.insert(id, scheme);
            schemes.push((id, scheme));
        }
    }

    // Later values may have solved variables of earlier schemes, and a
    // scheme may still mention the placeholder of a value checked after
    // it. Published schemes must be closed: unit variables mean nothing to
    // other units.
    let settled = FxHashSet::default();
    let schemes = schemes
        .into_iter()
        .map(|(id, scheme)| {
            let ty = scheme.instantiate(&mut checker.unifier);
            (id, TypeScheme::generalize(&checker.unifier, ty, &settled))
        })
        .collect::<Vec<_>>();

    let types = checker.finish();
    tracing::debug!(inferred = schemes.len(), "inference finished");
    Ok(TypeCheckResult { types, schemes })
}

pub(crate) struct TypeChecker<'a, 'cx> {
    cx: CheckContext<'a>,
    sink: &'cx mut DiagnosticSink,
    token: &'cx CancellationToken,
    unifier: Unifier<'a>,
    expr_types: Vec<TypeId>,
    pattern_types: Vec<TypeId>,
    /// Scheme of every local, indexed by [`LocalId`].
    locals: Vec<TypeScheme>,
    /// Monomorphic types of the locals currently in scope; their free
    /// variables must not be generalized.
    in_scope: Vec<TypeId>,
    /// Placeholders for unannotated values not yet checked.
    pending: FxHashMap<DeclId, TypeId>,
    /// Schemes of unannotated values already checked.
    inferred: FxHashMap<DeclId, TypeScheme>,
}

impl<'a> TypeChecker<'a, '_> {
    fn arena(&self) -> &'a AstArena {
        &self.cx.unit.arena
    }

    fn annotation(&self, decl: DeclId) -> Option<TypeScheme> {
        match &self.cx.table.decl(decl).kind {
            DeclKind::Value { scheme } => *scheme,
            _ => None,
        }
    }

    /// Run `f` with extra locals in scope.
    fn with_locals<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let depth = self.in_scope.len();
        let result = f(self);
        self.in_scope.truncate(depth);
        result
    }

    fn bind_local(&mut self, local: LocalId, scheme: TypeScheme) {
        if let Some(slot) = self.locals.get_mut(local.index()) {
            *slot = scheme;
        }
        self.in_scope.push(scheme.ty);
    }

    /// Free variables of the environment: in-scope locals plus the
    /// placeholders of values still being inferred.
    fn env_free_vars(&self) -> FxHashSet<TypeVar> {
        let mut vars = Vec::new();
        let types = self.unifier.types();
        for &ty in self.in_scope.iter().chain(self.pending.values()) {
            free_vars(types, self.unifier.apply(ty), &mut vars);
        }
        vars.into_iter().collect()
    }

    /// Unify, turning a failure into a diagnostic of `kind` at `span`.
    ///
    /// Occurs-check failures are always reported as
    /// [`DiagnosticKind::InfiniteType`].
    pub(crate) fn unify_or_report(
        &mut self,
        expected: TypeId,
        found: TypeId,
        kind: DiagnosticKind,
        span: Span,
        label: &str,
    ) -> Result<(), ErrorGuaranteed> {
        match self.unifier.unify(expected, found) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.report_unify(&err, expected, found, kind, span, label)),
        }
    }

    fn report_unify(
        &mut self,
        err: &UnifyError,
        expected: TypeId,
        found: TypeId,
        kind: DiagnosticKind,
        span: Span,
        label: &str,
    ) -> ErrorGuaranteed {
        let diag = match *err {
            UnifyError::InfiniteType { var, ty } => {
                let var = self.cx.types.var(var);
                Diagnostic::error(DiagnosticKind::InfiniteType)
                    .with_message(format!(
                        "cannot construct the infinite type `{}` = `{}`",
                        self.show(var),
                        self.show(ty)
                    ))
                    .with_label(span, label)
            }
            UnifyError::Mismatch { .. } => Diagnostic::error(kind)
                .with_message(format!(
                    "expected `{}`, found `{}`",
                    self.show(expected),
                    self.show(found)
                ))
                .with_label(span, label),
            UnifyError::ArityMismatch {
                expected: want,
                found: got,
            } => Diagnostic::error(kind)
                .with_message(format!(
                    "expected `{}`, found `{}`",
                    self.show(expected),
                    self.show(found)
                ))
                .with_label(span, label)
                .with_note(format!("expected {want} elements, found {got}")),
        };
        self.sink.error(diag)
    }

    /// Render `ty` under the current substitution.
    fn show(&self, ty: TypeId) -> String {
        let ty = self.unifier.apply(ty);
        self.cx.types.display(ty, self.cx.interner).to_string()
    }

    fn finish(self) -> TypeTable {
        let unifier = &self.unifier;
        let apply = |tys: Vec<TypeId>| -> Vec<TypeId> {
            tys.into_iter().map(|ty| unifier.apply(ty)).collect()
        };
        TypeTable::new(apply(self.expr_types), apply(self.pattern_types))
    }
}
