//! Shared error taxonomy for ingestion and answering.

use thiserror::Error;

/// Errors surfaced by the ingestion pipeline and the answer orchestrator.
///
/// During ingestion, every variant aborts the attempt for that locator and
/// leaves it unrecorded in the ledger, so the attempt stays retryable.
#[derive(Debug, Error)]
pub enum QaError {
    /// Network, timeout, or non-success status while probing or fetching.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The locator string could not be parsed as a URL.
    #[error("invalid document locator: {0}")]
    InvalidLocator(String),

    /// The resolved format suffix has no extraction handler.
    #[error("unsupported document format '{0}'")]
    UnsupportedFormat(String),

    /// A format-specific decoder rejected the document bytes.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The store-and-search collaborator failed an upsert or search call.
    #[error("vector store request failed: {0}")]
    Store(String),

    /// The completion collaborator failed to produce an answer.
    #[error("answer generation failed: {0}")]
    Generation(String),

    /// A trivia side-channel endpoint was unreachable or missing a field.
    #[error("side-channel lookup failed: {0}")]
    SideChannel(String),

    /// The persisted ingestion ledger could not be read or written.
    #[error("ledger failure: {0}")]
    Ledger(String),

    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for QaError {
    fn from(err: reqwest::Error) -> Self {
        QaError::Transport(err.to_string())
    }
}
