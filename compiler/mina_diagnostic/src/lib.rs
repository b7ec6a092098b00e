//! Diagnostics for the Mina analysis core.
//!
//! Every user-facing problem found by resolution, inference or match
//! analysis becomes a [`Diagnostic`] carrying a [`DiagnosticKind`] tag, a
//! severity, a message and labelled spans. Non-exhaustive matches also carry
//! structured [`Witness`] values.

mod diagnostic;
mod kind;
mod sink;

pub use diagnostic::{Diagnostic, Label, Severity, Witness};
pub use kind::DiagnosticKind;
pub use sink::{DiagnosticSink, Diagnostics, ErrorGuaranteed};
