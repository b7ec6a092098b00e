use mina_diagnostic::{Diagnostic, DiagnosticKind};
use mina_ir::{QualifiedIdent, StringInterner};

use crate::{DeclId, ModuleId, Namespace};

/// Failed lookup of a qualified identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("name not found")]
    UnknownName,
    #[error("package not found")]
    UnknownPackage,
    #[error("module has no such member")]
    UnknownMember { module: ModuleId },
    /// Constructor position named an ordinary value.
    #[error("not a constructor")]
    NotAConstructor(DeclId),
}

impl LookupError {
    /// User-facing diagnostic for this failure at `ident`.
    pub fn to_diagnostic(
        self,
        ident: &QualifiedIdent,
        ns: Namespace,
        interner: &StringInterner,
    ) -> Diagnostic {
        let name = interner.lookup(ident.name);
        let what = ns.describe();
        match self {
            LookupError::UnknownName => Diagnostic::error(DiagnosticKind::UnresolvedName)
                .with_message(format!("cannot find {what} `{name}`"))
                .with_label(ident.span, "not found in this scope"),
            LookupError::UnknownPackage => {
                let path = interner.join(&ident.segments);
                Diagnostic::error(DiagnosticKind::UnknownPackage)
                    .with_message(format!("unknown package `{path}`"))
                    .with_label(ident.span, format!("no module named `{path}`"))
            }
            LookupError::UnknownMember { .. } => {
                let path = interner.join(&ident.segments);
                Diagnostic::error(DiagnosticKind::UnknownMember)
                    .with_message(format!("module `{path}` has no {what} `{name}`"))
                    .with_label(ident.span, "not found in this module")
            }
            LookupError::NotAConstructor(_) => Diagnostic::error(DiagnosticKind::NotAConstructor)
                .with_message(format!("`{name}` is a value, not a constructor"))
                .with_label(ident.span, "expected a data constructor")
                .with_note("only data constructors can be matched against"),
        }
    }
}
