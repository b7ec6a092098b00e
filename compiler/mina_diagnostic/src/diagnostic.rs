//! Diagnostic values and their builder.

use mina_ir::Span;
use std::fmt;

use crate::DiagnosticKind;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A highlighted source range with an explanation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A value shape that no case of a match covers.
///
/// Rendered like a source pattern, e.g. `Some(_)` or `(true, None)`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Witness {
    /// Any value; for infinite domains this stands for "not all values".
    Wildcard,
    Constructor { name: String, args: Vec<Witness> },
    Tuple(Vec<Witness>),
    Literal(String),
}

impl fmt::Display for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Witness::Wildcard => f.write_str("_"),
            Witness::Literal(text) => f.write_str(text),
            Witness::Constructor { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    write_list(f, args)?;
                }
                Ok(())
            }
            Witness::Tuple(elems) => write_list(f, elems),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Witness]) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

/// One reported problem.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be pushed into a sink, not dropped"]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    /// Missing patterns for [`DiagnosticKind::NonExhaustiveMatch`].
    pub witnesses: Vec<Witness>,
}

impl Diagnostic {
    /// Diagnostic of `kind` with that kind's default severity.
    #[cold]
    pub fn new(kind: DiagnosticKind) -> Self {
        Diagnostic {
            kind,
            severity: kind.default_severity(),
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            witnesses: Vec::new(),
        }
    }

    #[cold]
    pub fn error(kind: DiagnosticKind) -> Self {
        Self::new(kind).with_severity(Severity::Error)
    }

    #[cold]
    pub fn warning(kind: DiagnosticKind) -> Self {
        Self::new(kind).with_severity(Severity::Warning)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_witnesses(mut self, witnesses: Vec<Witness>) -> Self {
        self.witnesses = witnesses;
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code(), self.message)?;
        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {marker} {:?}: {}", label.span, label.message)?;
        }
        if !self.witnesses.is_empty() {
            f.write_str("\n  = missing: ")?;
            for (i, witness) in self.witnesses.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{witness}")?;
            }
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
