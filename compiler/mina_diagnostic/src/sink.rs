//! Per-unit diagnostic collection.
//!
//! A [`DiagnosticSink`] is append-only while a unit is analysed. Passes never
//! stop on the first problem; they push a diagnostic and continue with a
//! fallback. [`DiagnosticSink::finish`] freezes the sink into [`Diagnostics`],
//! ordered by source position.

use crate::{Diagnostic, DiagnosticKind, Severity};

/// Proof that an error diagnostic was reported.
///
/// Only [`DiagnosticSink::error`] creates one, so code that substitutes the
/// error type for a failed sub-result can demand it as evidence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    internal: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic of any severity.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind.is_internal() {
            self.internal.push(diagnostic);
            return;
        }
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Record an error, returning proof of it.
    pub fn error(&mut self, diagnostic: Diagnostic) -> ErrorGuaranteed {
        self.push(diagnostic.with_severity(Severity::Error));
        ErrorGuaranteed(())
    }

    /// Record an internal invariant failure.
    pub fn internal(&mut self, message: impl Into<String>, span: mina_ir::Span) {
        let message = message.into();
        tracing::error!(%message, ?span, "internal invariant violated");
        self.internal.push(
            Diagnostic::error(DiagnosticKind::AnalysisCrash)
                .with_message(message)
                .with_label(span, "malformed input tree"),
        );
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Freeze, ordering by primary span start. Ties keep emission order.
    pub fn finish(self) -> Diagnostics {
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|d| d.primary_span().map_or(u32::MAX, |s| s.start));
        Diagnostics {
            diagnostics,
            internal: self.internal,
        }
    }
}

/// Frozen, position-ordered diagnostics of one compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    internal: Vec<Diagnostic>,
}

impl Diagnostics {
    /// User-facing diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Internal invariant failures, kept apart from user diagnostics.
    pub fn internal(&self) -> &[Diagnostic] {
        &self.internal
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.iter().map(|d| d.kind).collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests;
