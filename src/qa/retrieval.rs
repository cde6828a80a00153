//! Per-question snippet retrieval scoped to one document.

use crate::stores::{SearchHit, SearchRequest, VectorStore};
use crate::types::QaError;

/// Stored fields requested for each hit.
const SNIPPET_FIELDS: [&str; 2] = ["text", "doc_url"];

/// Runs a similarity search filtered to `locator` and extracts snippet text
/// in rank order. No hits is an empty list, not an error; nothing is cached
/// across calls.
pub async fn search_snippets(
    store: &dyn VectorStore,
    namespace: &str,
    question: &str,
    locator: &str,
    top_k: usize,
) -> Result<Vec<String>, QaError> {
    let query = SearchRequest {
        text: question.to_string(),
        top_k,
        doc_url: (!locator.is_empty()).then(|| locator.to_string()),
    };
    let hits = store.search(namespace, &query, &SNIPPET_FIELDS).await?;
    Ok(hits.iter().filter_map(snippet_text).collect())
}

/// Stored snippet text, tolerating both field-name conventions for the same
/// logical attribute.
fn snippet_text(hit: &SearchHit) -> Option<String> {
    let fields = hit.fields.as_object()?;
    fields
        .get("text")
        .or_else(|| fields.get("chunk_text"))
        .and_then(|value| value.as_str())
        .map(str::to_string)
}
