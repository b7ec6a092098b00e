//! Control-flow failures of an analysis run.
//!
//! Problems in the analysed code are diagnostics, never errors. These
//! variants only say why a run produced no result at all.

use mina_ir::Cancelled;

use crate::DocumentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// A newer version of the document was submitted while this one was
    /// being analysed.
    #[error("version {version} of document {document} is stale (latest is {latest})")]
    StaleVersion {
        document: DocumentId,
        version: i32,
        latest: i32,
    },

    /// The document is not (or no longer) tracked.
    #[error("document {0} is not open")]
    UnknownUnit(DocumentId),
}
