//! HTTP client for a serverless records API with integrated embedding:
//! NDJSON upserts and JSON search with stored-field projection.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{SearchHit, SearchRequest, UpsertRecord, VectorStore};
use crate::types::QaError;

#[derive(Clone)]
pub struct PineconeStore {
    http: Client,
    host: String,
    api_key: String,
}

impl PineconeStore {
    pub fn new(http: Client, host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            host: host.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn records_url(&self, namespace: &str, action: &str) -> String {
        format!("{}/records/namespaces/{namespace}/{action}", self.host)
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert_records(
        &self,
        namespace: &str,
        records: &[UpsertRecord],
    ) -> Result<(), QaError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|err| QaError::Store(format!("record serialization failed: {err}")))?;
            body.push_str(&line);
            body.push('\n');
        }

        let response = self
            .http
            .post(self.records_url(namespace, "upsert"))
            .header("Api-Key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|err| QaError::Store(err.to_string()))?;

        if !response.status().is_success() {
            return Err(QaError::Store(format!(
                "upsert returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn search(
        &self,
        namespace: &str,
        query: &SearchRequest,
        fields: &[&str],
    ) -> Result<Vec<SearchHit>, QaError> {
        let mut inner = json!({
            "inputs": { "text": query.text },
            "top_k": query.top_k,
        });
        if let Some(doc_url) = &query.doc_url {
            inner["filter"] = json!({ "doc_url": doc_url });
        }
        let payload = json!({ "query": inner, "fields": fields });

        let response = self
            .http
            .post(self.records_url(namespace, "search"))
            .header("Api-Key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| QaError::Store(err.to_string()))?;

        if !response.status().is_success() {
            return Err(QaError::Store(format!(
                "search returned {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|err| QaError::Store(err.to_string()))?;
        Ok(parsed.result.hits)
    }
}
