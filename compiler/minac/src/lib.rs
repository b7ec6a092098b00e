//! Analysis driver for the Mina analysis core.
//!
//! A [`Session`] owns the state shared by every unit it analyses: the string
//! and type interners and the symbol table. Each unit runs through the same
//! pipeline:
//!
//! ```text
//! CompilationUnit
//!     │
//!     ▼
//! declare ──► SymbolTable (serialized write)
//!     │
//!     ▼
//! resolve ──► Resolutions
//!     │
//!     ▼
//! infer ──► TypeTable + schemes
//!     │
//!     ▼
//! match analysis
//!     │
//!     ▼
//! publish schemes ──► SymbolTable (serialized write)
//! ```
//!
//! Batches are ordered by their imports; units of one dependency level run
//! concurrently against the same table snapshot. In an editor, a
//! [`DocumentTracker`] cancels analysis of superseded document versions.

mod config;
mod document;
mod error;
mod graph;
mod session;

use std::sync::Once;

pub use config::{AnalysisConfig, MAX_WITNESSES_VAR, NO_REDUNDANCY_VAR, SEQUENTIAL_VAR};
pub use document::{DocumentId, DocumentTracker};
pub use error::AnalysisError;
pub use session::{AnalysisResult, Session};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber writing to stderr.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=mina_typeck=trace`.
/// Safe to call more than once; an already installed global subscriber is
/// kept.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var_os("RUST_LOG").is_some() {
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .try_init();
            if installed.is_err() {
                tracing::debug!("global subscriber already installed");
            }
        }
    });
}
