//! Errors of the document widget's public API.

use thiserror::Error;

/// Malformed markup or stylesheets are never errors; they produce
/// diagnostics. These are the operations that can fail outright.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("node is not part of the current tree")]
    StaleNode,

    #[error("no layout tree has been constructed")]
    NoLayoutTree,
}
