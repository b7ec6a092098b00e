//! Edit-version tracking for interactive analysis.
//!
//! Each open document has a latest version and the cancellation token of the
//! analysis run for that version. Submitting a newer version cancels the
//! in-flight run so fresher diagnostics are not held up by stale work.

use std::fmt;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mina_ir::CancellationToken;

use crate::AnalysisError;

/// Identity of an editor document.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u32);

impl DocumentId {
    pub const fn new(raw: u32) -> Self {
        DocumentId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Tracked {
    version: i32,
    token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct DocumentTracker {
    documents: DashMap<DocumentId, Tracked>,
}

impl DocumentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start analysing `version` of `document`.
    ///
    /// Cancels the run of any earlier version (or an earlier run of the same
    /// version) and returns the token for the new run. A version older than
    /// the latest one is rejected.
    pub fn begin(
        &self,
        document: DocumentId,
        version: i32,
    ) -> Result<CancellationToken, AnalysisError> {
        let token = CancellationToken::new();
        match self.documents.entry(document) {
            Entry::Occupied(mut entry) => {
                let latest = entry.get().version;
                if version < latest {
                    return Err(AnalysisError::StaleVersion {
                        document,
                        version,
                        latest,
                    });
                }
                tracing::debug!(
                    %document,
                    superseded = latest,
                    version,
                    "cancelling stale analysis"
                );
                let previous = entry.insert(Tracked {
                    version,
                    token: token.clone(),
                });
                previous.token.cancel();
            }
            Entry::Vacant(entry) => {
                entry.insert(Tracked {
                    version,
                    token: token.clone(),
                });
            }
        }
        Ok(token)
    }

    /// `Ok` if `version` is still the latest version of `document`.
    pub fn ensure_current(&self, document: DocumentId, version: i32) -> Result<(), AnalysisError> {
        let latest = self
            .latest(document)
            .ok_or(AnalysisError::UnknownUnit(document))?;
        if latest == version {
            Ok(())
        } else {
            Err(AnalysisError::StaleVersion {
                document,
                version,
                latest,
            })
        }
    }

    pub fn latest(&self, document: DocumentId) -> Option<i32> {
        self.documents.get(&document).map(|tracked| tracked.version)
    }

    /// Stop tracking `document`, cancelling its in-flight run.
    pub fn close(&self, document: DocumentId) {
        if let Some((_, tracked)) = self.documents.remove(&document) {
            tracked.token.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
