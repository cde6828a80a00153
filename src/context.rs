//! Process-lifecycle context owning every external collaborator handle.

use std::sync::Arc;

use reqwest::Client;

use crate::config::Settings;
use crate::generation::{CompletionClient, GeminiCompletion};
use crate::ingestion::chunk::TokenChunker;
use crate::ingestion::ledger::IngestLedger;
use crate::stores::{PineconeStore, VectorStore};
use crate::types::QaError;

/// Explicitly constructed dependency container.
///
/// Every component that talks to a collaborator receives this context;
/// nothing reads ambient global state. Construct once per process with
/// [`AppContext::init`]; dropping it releases the handles.
pub struct AppContext {
    pub settings: Settings,
    pub http: Client,
    pub store: Arc<dyn VectorStore>,
    pub completion: Arc<dyn CompletionClient>,
    pub ledger: IngestLedger,
    pub chunker: TokenChunker,
}

impl AppContext {
    /// Builds the production wiring and loads the ledger.
    pub async fn init(settings: Settings) -> Result<Self, QaError> {
        let http = Client::builder()
            .user_agent(concat!("askdoc/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()
            .map_err(|err| QaError::Config(format!("http client: {err}")))?;

        let store = Arc::new(PineconeStore::new(
            http.clone(),
            settings.store_host.clone(),
            settings.store_api_key.clone(),
        ));
        let completion = Arc::new(GeminiCompletion::new(
            http.clone(),
            settings.completion_api_key.clone(),
            settings.completion_model.clone(),
        ));

        Self::with_parts(settings, http, store, completion).await
    }

    /// Assembles a context from pre-built collaborators (tests inject their
    /// doubles here) and loads the ledger.
    pub async fn with_parts(
        settings: Settings,
        http: Client,
        store: Arc<dyn VectorStore>,
        completion: Arc<dyn CompletionClient>,
    ) -> Result<Self, QaError> {
        let ledger = IngestLedger::new(&settings.ledger_path);
        ledger.load().await?;
        let chunker = TokenChunker::new()?;
        Ok(Self {
            settings,
            http,
            store,
            completion,
            ledger,
            chunker,
        })
    }
}
