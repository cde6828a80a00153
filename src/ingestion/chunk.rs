//! Token-window chunking over normalized document text.

use tiktoken_rs::CoreBPE;

use crate::types::QaError;

/// Window size in tokens.
pub const CHUNK_TOKENS: usize = 2000;
/// Overlap carried between consecutive windows.
pub const CHUNK_OVERLAP: usize = CHUNK_TOKENS / 10;

/// One chunk of document text, keyed for idempotent upserts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkPiece {
    pub id: String,
    pub text: String,
}

/// The single descriptive record emitted instead of content chunks.
pub fn metadata_piece(basename: &str, text: String) -> ChunkPiece {
    ChunkPiece {
        id: format!("{basename}::metadata"),
        text,
    }
}

/// Splits normalized text into fixed-size overlapping token windows with
/// deterministic offset-based identifiers.
///
/// The vocabulary is the embedding model's tokenizer (`cl100k_base`), so
/// window boundaries line up with what the store embeds downstream.
pub struct TokenChunker {
    bpe: CoreBPE,
    window: usize,
    overlap: usize,
}

impl TokenChunker {
    pub fn new() -> Result<Self, QaError> {
        Self::with_window(CHUNK_TOKENS, CHUNK_OVERLAP)
    }

    /// Chunker with a custom window geometry; `overlap` must stay below
    /// `window` so each step makes progress.
    pub fn with_window(window: usize, overlap: usize) -> Result<Self, QaError> {
        debug_assert!(overlap < window);
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|err| QaError::Config(format!("tokenizer unavailable: {err}")))?;
        Ok(Self {
            bpe,
            window,
            overlap,
        })
    }

    /// Chunks `text` under the identifier base `basename`.
    ///
    /// Whitespace runs collapse to single spaces before tokenizing. Each
    /// window of at most `window` tokens starts `window - overlap` tokens
    /// after the previous one, decodes back to text, and gets the id
    /// `"<basename>::chunk_<startOffset>"`. Empty text yields no chunks.
    pub fn chunk(&self, text: &str, basename: &str) -> Result<Vec<ChunkPiece>, QaError> {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let tokens = self.bpe.encode_ordinary(&normalized);

        let mut pieces = Vec::new();
        for (start, end) in window_spans(tokens.len(), self.window, self.window - self.overlap) {
            let decoded = self.bpe.decode(tokens[start..end].to_vec()).map_err(|err| {
                QaError::Extraction(format!("token window at offset {start} failed to decode: {err}"))
            })?;
            pieces.push(ChunkPiece {
                id: format!("{basename}::chunk_{start}"),
                text: decoded,
            });
        }
        Ok(pieces)
    }
}

/// Half-open `(start, end)` spans advancing by `step`, the last clamped to
/// `total`. Spans cover every index when `step <= window`.
fn window_spans(total: usize, window: usize, step: usize) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    while start < total {
        spans.push((start, usize::min(start + window, total)));
        start += step;
    }
    spans
}
