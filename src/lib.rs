//! Retrieval-augmented question answering over remote documents.
//!
//! ```text
//! DocumentLocator ──► ingestion::resolver ──► format suffix + basename
//!                            │
//!                            ▼
//!           ingestion::fetch ──► scoped temp file
//!                            │
//!                            ▼
//!         ingestion::extract ──► flat text │ metadata stub
//!                            │
//!                            ▼
//!           ingestion::chunk ──► token windows
//!                            │
//!                            ▼
//!          ingestion::upsert ──► stores::VectorStore
//!
//! question batch ──► qa::answer_questions ─┬─► qa::sidechannel (trivia routing)
//!                                          └─► qa::retrieval ──► generation::CompletionClient
//! ```
//!
//! The ledger in [`ingestion::ledger`] gates the pipeline so each locator is
//! processed once per successful run; the [`context::AppContext`] carries
//! every collaborator handle explicitly.

pub mod config;
pub mod context;
pub mod generation;
pub mod ingestion;
pub mod qa;
pub mod stores;
pub mod types;

pub use config::Settings;
pub use context::AppContext;
pub use qa::answer_questions;
pub use types::QaError;
