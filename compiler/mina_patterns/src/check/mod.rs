//! Running the analysis over every `match` of a unit.

use mina_diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, Witness};
use mina_ir::ast::ExprKind;
use mina_ir::{
    CancellationToken, Cancelled, CaseRange, CompilationUnit, ExprId, Span, StringInterner,
};
use mina_resolve::Resolutions;
use mina_symbols::SymbolTable;
use mina_typeck::TypeTable;
use mina_types::{TypeFlags, TypeInterner};

use crate::flat::flatten;
use crate::usefulness::{Row, Signatures};

/// Knobs of the match analysis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    /// Report cases that can never be reached.
    pub check_redundancy: bool,
    /// Witnesses listed per non-exhaustive match; at least one is always
    /// reported.
    pub max_witnesses: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            check_redundancy: true,
            max_witnesses: 3,
        }
    }
}

/// Read-only inputs of the match analysis.
#[derive(Copy, Clone)]
pub struct MatchContext<'a> {
    pub table: &'a SymbolTable,
    pub unit: &'a CompilationUnit,
    pub resolutions: &'a Resolutions,
    pub type_table: &'a TypeTable,
    pub types: &'a TypeInterner,
    pub interner: &'a StringInterner,
}

/// Check every `match` of `cx.unit` for exhaustiveness and redundancy.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_matches(
    cx: &MatchContext<'_>,
    config: &MatchConfig,
    sink: &mut DiagnosticSink,
    token: &CancellationToken,
) -> Result<(), Cancelled> {
    let sigs = Signatures {
        table: cx.table,
        interner: cx.interner,
    };
    let mut checked = 0usize;
    for (id, expr) in cx.unit.arena.exprs() {
        if let ExprKind::Match { scrutinee, cases } = &expr.kind {
            token.check()?;
            check_match(cx, sigs, config, sink, id, *scrutinee, *cases, expr.span);
            checked += 1;
        }
    }
    tracing::debug!(matches = checked, "match analysis finished");
    Ok(())
}

struct CaseRow {
    row: Row,
    guarded: bool,
    span: Span,
}

#[expect(clippy::too_many_arguments, reason = "one call site, all inputs distinct")]
fn check_match(
    cx: &MatchContext<'_>,
    sigs: Signatures<'_>,
    config: &MatchConfig,
    sink: &mut DiagnosticSink,
    id: ExprId,
    scrutinee: ExprId,
    cases: CaseRange,
    span: Span,
) {
    let arena = &cx.unit.arena;
    let cases = arena.case_list(cases);
    if cases.is_empty() {
        // Reported by the resolver as an internal failure.
        return;
    }
    let scrutinee_ty = cx.type_table.expr_type(scrutinee);
    if cx.types.flags(scrutinee_ty).contains(TypeFlags::HAS_ERROR) {
        tracing::debug!(?id, "skipping match on an ill-typed scrutinee");
        return;
    }

    let mut rows = Vec::with_capacity(cases.len());
    for &case in cases {
        let clause = arena.case(case);
        let Some(pattern) = flatten(cx, clause.pattern) else {
            tracing::debug!(?id, "skipping match with an erroneous pattern");
            return;
        };
        rows.push(CaseRow {
            row: vec![pattern],
            guarded: clause.guard.is_some(),
            span: clause.span,
        });
    }

    if config.check_redundancy {
        let mut covering: Vec<Row> = Vec::new();
        for (i, case) in rows.iter().enumerate() {
            if i > 0 && !sigs.is_useful(&covering, &case.row) {
                sink.push(
                    Diagnostic::warning(DiagnosticKind::UnreachableCase)
                        .with_message("unreachable case")
                        .with_label(case.span, "this case is covered by the cases above it"),
                );
            }
            if !case.guarded {
                covering.push(case.row.clone());
            }
        }
    }

    let unguarded: Vec<Row> = rows
        .iter()
        .filter(|case| !case.guarded)
        .map(|case| case.row.clone())
        .collect();
    let witnesses: Vec<Witness> = sigs
        .missing(&unguarded, 1, config.max_witnesses.max(1))
        .into_iter()
        .filter_map(|mut values| values.pop())
        .collect();
    if witnesses.is_empty() {
        return;
    }

    let listed = witnesses
        .iter()
        .map(|w| format!("`{w}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut diag = Diagnostic::error(DiagnosticKind::NonExhaustiveMatch)
        .with_message(format!("non-exhaustive match: {listed} not covered"))
        .with_label(span, "not all values are covered");
    if witnesses.iter().all(|w| *w == Witness::Wildcard) {
        diag = diag.with_note("add a wildcard case to cover the remaining values");
    }
    if unguarded.len() < rows.len() {
        diag = diag.with_note("guarded cases do not count toward exhaustiveness");
    }
    sink.push(diag.with_witnesses(witnesses));
}

#[cfg(test)]
mod tests;
