//! Closed set of recognized document formats.

/// Handler class for a resolved format suffix.
///
/// The mapping from suffix to handler is total over the recognized set;
/// anything else is rejected before a download happens. Adding or removing a
/// format is a one-place change here, enforced by exhaustive matches in the
/// extraction layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatKind {
    /// Unspecified binary; described without fetching.
    Binary,
    /// Archive; entry names are listed, contents are not extracted.
    Archive,
    /// Raster image routed through optical character recognition.
    Image,
    Spreadsheet,
    SlideDeck,
    Pdf,
    WordDocument,
    PlainText,
    Email,
}

impl FormatKind {
    /// Maps a lower-cased dotted suffix (e.g. `".pdf"`) to its handler class.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            ".bin" => Some(Self::Binary),
            ".zip" => Some(Self::Archive),
            ".png" | ".jpeg" | ".jpg" | ".bmp" | ".gif" => Some(Self::Image),
            ".xlsx" => Some(Self::Spreadsheet),
            ".pptx" => Some(Self::SlideDeck),
            ".pdf" => Some(Self::Pdf),
            ".docx" => Some(Self::WordDocument),
            ".txt" => Some(Self::PlainText),
            ".eml" => Some(Self::Email),
            _ => None,
        }
    }

    /// Whether the document bytes are needed at all. Unknown binaries get a
    /// descriptive stub without a download.
    pub fn requires_fetch(self) -> bool {
        !matches!(self, Self::Binary)
    }
}
