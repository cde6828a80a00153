//! Shared fixtures for integration tests: collaborator doubles and settings.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use askdoc::Settings;
use askdoc::generation::{CompletionClient, ContextDocument};
use askdoc::stores::{SearchHit, SearchRequest, UpsertRecord, VectorStore};
use askdoc::types::QaError;

/// Installs a fmt subscriber once so `RUST_LOG` works under `cargo test`.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

pub fn test_settings(ledger_path: PathBuf) -> Settings {
    Settings {
        store_host: "http://store.invalid".to_string(),
        store_api_key: "test-key".to_string(),
        store_namespace: "test".to_string(),
        completion_api_key: "test-key".to_string(),
        completion_model: "test-model".to_string(),
        ledger_path,
        top_k: 10,
        fetch_timeout: Duration::from_secs(5),
        favourite_city_url: "http://sidechannel.invalid/city".to_string(),
        flights_base_url: "http://sidechannel.invalid/flights".to_string(),
    }
}

/// Store double recording every upsert batch and search, serving canned hits.
#[derive(Default)]
pub struct RecordingStore {
    pub upserts: Mutex<Vec<(String, Vec<UpsertRecord>)>>,
    pub searches: Mutex<Vec<SearchRequest>>,
    pub hits: Mutex<Vec<SearchHit>>,
    pub fail_upserts: AtomicBool,
}

impl RecordingStore {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits: Mutex::new(hits),
            ..Default::default()
        }
    }

    pub fn upsert_batches(&self) -> Vec<Vec<UpsertRecord>> {
        self.upserts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, batch)| batch.clone())
            .collect()
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    async fn upsert_records(
        &self,
        namespace: &str,
        records: &[UpsertRecord],
    ) -> Result<(), QaError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(QaError::Store("injected upsert failure".into()));
        }
        self.upserts
            .lock()
            .unwrap()
            .push((namespace.to_string(), records.to_vec()));
        Ok(())
    }

    async fn search(
        &self,
        _namespace: &str,
        query: &SearchRequest,
        _fields: &[&str],
    ) -> Result<Vec<SearchHit>, QaError> {
        self.searches.lock().unwrap().push(query.clone());
        Ok(self.hits.lock().unwrap().clone())
    }
}

pub enum ScriptedAnswer {
    Reply { text: String, delay: Duration },
    Fail(String),
}

/// Completion double answering each question from a script, with optional
/// per-question delays to permute completion order.
#[derive(Default)]
pub struct ScriptedCompletion {
    script: HashMap<String, ScriptedAnswer>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, question: &str, text: &str, delay: Duration) -> Self {
        self.script.insert(
            question.to_string(),
            ScriptedAnswer::Reply {
                text: text.to_string(),
                delay,
            },
        );
        self
    }

    pub fn fail(mut self, question: &str, message: &str) -> Self {
        self.script
            .insert(question.to_string(), ScriptedAnswer::Fail(message.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn generate(
        &self,
        question: &str,
        context: &[ContextDocument],
    ) -> Result<String, QaError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), context.len()));
        match self.script.get(question) {
            Some(ScriptedAnswer::Reply { text, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(text.clone())
            }
            Some(ScriptedAnswer::Fail(message)) => Err(QaError::Generation(message.clone())),
            None => Ok(String::new()),
        }
    }
}
