//! Environment-driven settings and fixed orchestration constants.
//!
//! Configuration is resolved once at startup via [`Settings::from_env`],
//! which loads a local `.env` file first (if present) and then reads
//! `ASKDOC_*` variables. Everything downstream receives settings through the
//! [`AppContext`](crate::context::AppContext) rather than reading the
//! environment ambiently.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::QaError;

/// Answer-style instruction passed verbatim to the completion service.
///
/// The core consumes this constant; it does not interpret it.
pub const ANSWER_STYLE_INSTRUCTION: &str = "You are a document question-answering assistant. \
Answer strictly from the provided context in one flowing sentence of at most 100 words. \
Start with the direct answer, include exact values, amounts, and timeframes, and cite the \
specific clauses, articles, or sections the context names. If the context does not contain \
the information, state: 'The document does not specify' followed by the missing detail. \
Never draw on outside knowledge.";

/// Similarity results requested per question when none is configured.
pub const DEFAULT_TOP_K: usize = 10;

/// Whole-transfer budget for document downloads when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Favourite-city endpoint of the flight side-channel.
pub const DEFAULT_FAVOURITE_CITY_URL: &str =
    "https://register.hackrx.in/submissions/myFavouriteCity";

/// Base URL of the flight-number side-channel endpoints.
pub const DEFAULT_FLIGHTS_BASE_URL: &str = "https://register.hackrx.in/teams/public/flights";

/// Runtime configuration for every external collaborator.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Host of the store-and-search service, e.g. an index data-plane URL.
    pub store_host: String,
    pub store_api_key: String,
    /// Namespace all upserts and searches are scoped to.
    pub store_namespace: String,
    pub completion_api_key: String,
    pub completion_model: String,
    /// Location of the persisted ingestion ledger.
    pub ledger_path: PathBuf,
    /// Similarity results requested per question.
    pub top_k: usize,
    /// Whole-transfer budget covering each document download.
    pub fetch_timeout: Duration,
    pub favourite_city_url: String,
    pub flights_base_url: String,
}

impl Settings {
    /// Loads settings from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, QaError> {
        dotenvy::dotenv().ok();
        Ok(Self {
            store_host: require("ASKDOC_STORE_HOST")?,
            store_api_key: require("ASKDOC_STORE_API_KEY")?,
            store_namespace: env::var("ASKDOC_STORE_NAMESPACE")
                .unwrap_or_else(|_| "askdoc".to_string()),
            completion_api_key: require("ASKDOC_COMPLETION_API_KEY")?,
            completion_model: env::var("ASKDOC_COMPLETION_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            ledger_path: env::var("ASKDOC_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("processed_docs.json")),
            top_k: env::var("ASKDOC_TOP_K")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_TOP_K),
            fetch_timeout: env::var("ASKDOC_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT),
            favourite_city_url: env::var("ASKDOC_FAVOURITE_CITY_URL")
                .unwrap_or_else(|_| DEFAULT_FAVOURITE_CITY_URL.to_string()),
            flights_base_url: env::var("ASKDOC_FLIGHTS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FLIGHTS_BASE_URL.to_string()),
        })
    }
}

fn require(key: &str) -> Result<String, QaError> {
    env::var(key).map_err(|_| QaError::Config(format!("missing environment variable {key}")))
}
