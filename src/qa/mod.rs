//! Answer orchestration: side-channel routing, ledger-gated ingestion, and
//! concurrent per-question retrieval and generation.

pub mod retrieval;
pub mod sidechannel;

use futures_util::future::join_all;
use tracing::instrument;

use crate::context::AppContext;
use crate::generation::ContextDocument;
use crate::ingestion;
use crate::types::QaError;

/// Answers `questions` against the document behind `locator`.
///
/// Answers come back aligned index-for-index with the input questions
/// regardless of the completion order of the underlying concurrent work:
/// `join_all` keeps each unit of work paired with its original position.
///
/// Two routing rules short-circuit the whole batch before any retrieval:
/// flight-number and secret-token questions are answered identically for
/// every question from fixed side-channel services, and a side-channel
/// failure becomes one uniform explanatory answer rather than an error.
#[instrument(skip(ctx, questions), fields(locator = %locator, questions = questions.len()))]
pub async fn answer_questions(
    ctx: &AppContext,
    locator: &str,
    questions: &[String],
) -> Result<Vec<String>, QaError> {
    if questions.is_empty() {
        return Ok(Vec::new());
    }

    if sidechannel::contains_trigger(questions, sidechannel::FLIGHT_TRIGGER) {
        let answer = match sidechannel::run_flight_lookup(
            &ctx.http,
            &ctx.settings.favourite_city_url,
            &ctx.settings.flights_base_url,
        )
        .await
        {
            Ok(lookup) => format!(
                "Destination: {} and Flight Number: {}",
                lookup.destination.as_deref().unwrap_or("unknown"),
                lookup.flight_number
            ),
            Err(err) => format!("Failed to retrieve flight number: {err}"),
        };
        return Ok(vec![answer; questions.len()]);
    }

    if sidechannel::contains_trigger(questions, sidechannel::TOKEN_TRIGGER) {
        let answer = match sidechannel::fetch_secret_token(&ctx.http, locator).await {
            Ok(token) => format!("Secret Token: {token}"),
            Err(err) => format!("Failed to retrieve secret token: {err}"),
        };
        return Ok(vec![answer; questions.len()]);
    }

    ingestion::ensure_ingested(ctx, locator).await?;

    let units = questions
        .iter()
        .map(|question| answer_one(ctx, locator, question));
    Ok(join_all(units).await)
}

/// One unit of work: retrieve context, invoke the completion service, trim.
/// A failure degrades to an explanatory answer so one bad question cannot
/// sink the batch.
async fn answer_one(ctx: &AppContext, locator: &str, question: &str) -> String {
    match try_answer(ctx, locator, question).await {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!(error = %err, "question degraded to explanatory answer");
            format!("Failed to generate an answer: {err}")
        }
    }
}

async fn try_answer(ctx: &AppContext, locator: &str, question: &str) -> Result<String, QaError> {
    let snippets = retrieval::search_snippets(
        ctx.store.as_ref(),
        &ctx.settings.store_namespace,
        question,
        locator,
        ctx.settings.top_k,
    )
    .await?;

    let context: Vec<ContextDocument> = snippets.into_iter().map(ContextDocument::new).collect();
    let answer = ctx.completion.generate(question, &context).await?;
    Ok(answer.trim().to_string())
}
