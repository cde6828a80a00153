//! Locator probing: format suffix and identifier base name resolution.

use std::path::Path;
use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::Client;
use url::Url;

use crate::types::QaError;

static FILENAME_HINT: OnceLock<Regex> = OnceLock::new();

fn filename_hint() -> &'static Regex {
    FILENAME_HINT
        .get_or_init(|| Regex::new(r#"filename="?([^";]+)"?"#).expect("filename hint pattern"))
}

/// Resolved identity of a remote document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDocument {
    /// Lower-cased dotted extension; empty when nothing recognizable was found.
    pub suffix: String,
    /// Percent-decoded file stem of the locator path, the base for chunk ids.
    pub basename: String,
}

/// Probes `locator` with a single GET and inspects the `Content-Disposition`
/// filename hint; when present, the hint's extension wins even if empty,
/// otherwise the locator path supplies it. Transport failures propagate
/// without retry.
pub async fn resolve_document(client: &Client, locator: &str) -> Result<ResolvedDocument, QaError> {
    let url = Url::parse(locator)
        .map_err(|err| QaError::InvalidLocator(format!("{locator}: {err}")))?;

    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let hinted = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| filename_hint().captures(value))
        .map(|caps| caps[1].trim().to_string());

    let suffix = match hinted {
        Some(name) => suffix_of(&name),
        None => suffix_of(url.path()),
    };

    Ok(ResolvedDocument {
        suffix,
        basename: basename_of(&url),
    })
}

fn suffix_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

fn basename_of(url: &Url) -> String {
    let stem = Path::new(url.path())
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let decoded = percent_decode_str(stem).decode_utf8_lossy();
    if decoded.is_empty() {
        "document".to_string()
    } else {
        decoded.into_owned()
    }
}
