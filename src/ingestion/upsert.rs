//! Batched submission of chunk records to the vector store.

use crate::ingestion::chunk::ChunkPiece;
use crate::stores::{UpsertRecord, VectorStore};
use crate::types::QaError;

/// Upper bound on records per upsert call.
pub const MAX_UPSERT_BATCH: usize = 96;

/// Enriches each piece with the owning locator and submits the records in
/// order, at most [`MAX_UPSERT_BATCH`] per call, sequentially.
///
/// A failing batch aborts the remainder and propagates; earlier batches are
/// not rolled back. Partial ingestion is tolerable because the ledger only
/// records the locator after the whole pipeline succeeds.
pub async fn upsert_pieces(
    store: &dyn VectorStore,
    namespace: &str,
    pieces: Vec<ChunkPiece>,
    locator: &str,
) -> Result<(), QaError> {
    let records: Vec<UpsertRecord> = pieces
        .into_iter()
        .map(|piece| UpsertRecord {
            id: piece.id,
            text: piece.text,
            doc_url: locator.to_string(),
        })
        .collect();

    for batch in records.chunks(MAX_UPSERT_BATCH) {
        store.upsert_records(namespace, batch).await?;
    }
    Ok(())
}
