//! Completion client for a `generateContent`-style JSON API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, ContextDocument};
use crate::config::ANSWER_STYLE_INSTRUCTION;
use crate::types::QaError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEMPERATURE: f32 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 4500;

pub struct GeminiCompletion {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiCompletion {
    pub fn new(http: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL, api_key, model)
    }

    /// Overridable endpoint base; tests point this at a local server.
    pub fn with_base_url(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, question: &str, context: &[ContextDocument]) -> GenerateRequest {
        let mut prompt = String::from("Context:\n");
        for document in context {
            prompt.push_str(&document.text);
            prompt.push_str("\n\n");
        }
        prompt.push_str("Question: ");
        prompt.push_str(question);

        GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: ANSWER_STYLE_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[async_trait]
impl CompletionClient for GeminiCompletion {
    async fn generate(
        &self,
        question: &str,
        context: &[ContextDocument],
    ) -> Result<String, QaError> {
        let request = self.build_request(question, context);
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| QaError::Generation(err.to_string()))?;

        if !response.status().is_success() {
            return Err(QaError::Generation(format!(
                "completion returned {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|err| QaError::Generation(err.to_string()))?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| QaError::Generation("completion returned no candidates".to_string()))?;
        Ok(candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    #[tokio::test]
    async fn sends_context_and_question_and_reads_the_first_candidate() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/models/gemini-2.5-flash:generateContent")
                .query_param("key", "secret")
                .body_contains("grace period of thirty days")
                .body_contains("Question: What is the grace period?");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "The grace period is thirty days." }] }
                }]
            }));
        });

        let client =
            GeminiCompletion::with_base_url(Client::new(), server.base_url(), "secret", "gemini-2.5-flash");
        let context = vec![ContextDocument::new(
            "A grace period of thirty days is provided after the due date.",
        )];
        let answer = client
            .generate("What is the grace period?", &context)
            .await
            .unwrap();
        assert_eq!(answer, "The grace period is thirty days.");
        mock.assert();
    }

    #[tokio::test]
    async fn missing_candidates_surface_as_generation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/models/m:generateContent");
            then.status(200).json_body(json!({"candidates": []}));
        });

        let client = GeminiCompletion::with_base_url(Client::new(), server.base_url(), "k", "m");
        let err = client.generate("q", &[]).await.unwrap_err();
        assert!(matches!(err, QaError::Generation(_)));
    }

    #[tokio::test]
    async fn non_success_status_surfaces_as_generation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/models/m:generateContent");
            then.status(429);
        });

        let client = GeminiCompletion::with_base_url(Client::new(), server.base_url(), "k", "m");
        let err = client.generate("q", &[]).await.unwrap_err();
        assert!(matches!(err, QaError::Generation(_)));
    }
}
