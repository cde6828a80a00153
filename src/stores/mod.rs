//! Store-and-search collaborator interface.
//!
//! The [`VectorStore`] trait abstracts the opaque storage service the
//! pipeline upserts into and the retriever searches against. The service is
//! eventually consistent; callers must not assume read-after-write.

pub mod pinecone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::QaError;

pub use pinecone::PineconeStore;

/// A chunk record enriched with its owning document, as submitted for upsert.
///
/// `doc_url` is the retrieval-filterable attribute scoping every search back
/// to one document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpsertRecord {
    pub id: String,
    pub text: String,
    pub doc_url: String,
}

/// Similarity query, optionally scoped to one document.
#[derive(Clone, Debug, Default)]
pub struct SearchRequest {
    pub text: String,
    pub top_k: usize,
    /// Exact-match filter on the owning document locator.
    pub doc_url: Option<String>,
}

/// One ranked hit with its stored fields.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: f32,
    #[serde(default)]
    pub fields: serde_json::Value,
}

/// Opaque store-and-search service.
///
/// Upserts preserve record order within a call; search returns hits in rank
/// order. Neither operation is retried at this layer.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert_records(
        &self,
        namespace: &str,
        records: &[UpsertRecord],
    ) -> Result<(), QaError>;

    async fn search(
        &self,
        namespace: &str,
        query: &SearchRequest,
        fields: &[&str],
    ) -> Result<Vec<SearchHit>, QaError>;
}
