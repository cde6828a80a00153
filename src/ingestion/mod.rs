//! Ingestion pipeline: normalize one remote document into token-bounded
//! chunks inside the vector store, exactly once per successful run.
//!
//! * [`resolver`] — format suffix and identifier base from transport metadata.
//! * [`fetch`] — bounded download into scoped temporary storage.
//! * [`format`] / [`extract`] — closed format dispatch to text or stubs.
//! * [`chunk`] — overlapping token windows with deterministic ids.
//! * [`upsert`] — bounded-batch submission to the vector store.
//! * [`ledger`] — persisted idempotency gate over completed locators.

pub mod chunk;
pub mod extract;
pub mod fetch;
pub mod format;
pub mod ledger;
pub mod resolver;
pub mod upsert;

use tracing::instrument;

use crate::context::AppContext;
use crate::types::QaError;
use extract::Extracted;
use format::FormatKind;

/// Runs the full pipeline for `locator` unless the ledger already records
/// it, and records the locator only after every stage succeeded. A failure
/// mid-pipeline leaves the ledger untouched, so the next call retries
/// naturally.
pub async fn ensure_ingested(ctx: &AppContext, locator: &str) -> Result<(), QaError> {
    if ctx.ledger.contains(locator).await {
        tracing::debug!(locator = %locator, "already ingested, skipping pipeline");
        return Ok(());
    }
    ingest_document(ctx, locator).await?;
    ctx.ledger.record(locator).await
}

/// Resolves, fetches, extracts, chunks, and upserts one document.
#[instrument(skip(ctx, locator), fields(locator = %locator))]
pub async fn ingest_document(ctx: &AppContext, locator: &str) -> Result<(), QaError> {
    let resolved = resolver::resolve_document(&ctx.http, locator).await?;
    let Some(kind) = FormatKind::from_suffix(&resolved.suffix) else {
        return Err(QaError::UnsupportedFormat(resolved.suffix));
    };

    let extracted = if kind.requires_fetch() {
        let temp = fetch::fetch_to_temp(
            &ctx.http,
            locator,
            &resolved.suffix,
            ctx.settings.fetch_timeout,
        )
        .await?;
        // the temp file lives exactly as long as extraction needs it
        extract::extract(kind, temp.path(), &resolved.basename, &resolved.suffix).await?
    } else {
        extract::binary_stub(&resolved.basename, &resolved.suffix)
    };

    let pieces = match extracted {
        Extracted::Text(text) => ctx.chunker.chunk(&text, &resolved.basename)?,
        Extracted::Stub(text) => vec![chunk::metadata_piece(&resolved.basename, text)],
    };

    tracing::info!(
        locator = %locator,
        chunks = pieces.len(),
        "document extracted and chunked"
    );
    upsert::upsert_pieces(
        ctx.store.as_ref(),
        &ctx.settings.store_namespace,
        pieces,
        locator,
    )
    .await
}
