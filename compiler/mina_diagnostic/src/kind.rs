//! Error-kind tags with stable codes.
//!
//! Codes are grouped by the pass that reports them:
//! - E2xxx: name resolution and declarations
//! - E3xxx: types
//! - E4xxx: pattern matching
//! - E9xxx: internal invariant failures

use std::fmt;

use crate::Severity;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum DiagnosticKind {
    /// No binding for a bare or qualified name.
    UnresolvedName,
    /// The package part of a qualified name names no module.
    UnknownPackage,
    /// The module exists but has no such member.
    UnknownMember,
    /// A constructor pattern names an ordinary value.
    NotAConstructor,
    /// Sub-pattern count differs from the constructor's arity.
    ConstructorArity,
    /// A field pattern names a field the constructor does not have.
    UnknownField,
    /// The same name is bound twice in one pattern or parameter list.
    DuplicateBinding,
    /// Two top-level declarations share a name in one namespace.
    DuplicateDeclaration,
    /// A type constructor is applied to the wrong number of arguments.
    TypeArity,
    /// Modules importing each other.
    ImportCycle,
    TypeMismatch,
    /// Occurs-check failure.
    InfiniteType,
    PatternTypeMismatch,
    BranchTypeMismatch,
    NonExhaustiveMatch,
    UnreachableCase,
    /// Malformed input tree. Never mixed with user-facing diagnostics.
    AnalysisCrash,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedName => "E2001",
            DiagnosticKind::UnknownPackage => "E2002",
            DiagnosticKind::UnknownMember => "E2003",
            DiagnosticKind::NotAConstructor => "E2004",
            DiagnosticKind::ConstructorArity => "E2005",
            DiagnosticKind::DuplicateBinding => "E2006",
            DiagnosticKind::DuplicateDeclaration => "E2007",
            DiagnosticKind::ImportCycle => "E2008",
            DiagnosticKind::UnknownField => "E2009",
            DiagnosticKind::TypeMismatch => "E3001",
            DiagnosticKind::InfiniteType => "E3002",
            DiagnosticKind::TypeArity => "E3003",
            DiagnosticKind::PatternTypeMismatch => "E3004",
            DiagnosticKind::BranchTypeMismatch => "E3005",
            DiagnosticKind::NonExhaustiveMatch => "E4001",
            DiagnosticKind::UnreachableCase => "E4002",
            DiagnosticKind::AnalysisCrash => "E9001",
        }
    }

    /// Severity used when a pass reports this kind.
    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticKind::UnreachableCase => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_internal(self) -> bool {
        matches!(self, DiagnosticKind::AnalysisCrash)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests;
