//! Format-specific extraction of document content.
//!
//! Heterogeneous inputs normalize to flat text as early as possible so the
//! chunker stays format-agnostic. Metadata-bearing formats (archives, failed
//! OCR, unknown binaries) instead emit a single descriptive stub, preserving
//! at least one retrievable fact about every ingested locator.

use std::io::Read;
use std::path::Path;

use calamine::Reader;
use tokio::process::Command;

use crate::ingestion::format::FormatKind;
use crate::types::QaError;

/// Output of a format handler: chunkable text or a single metadata stub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Stub(String),
}

/// Stub for formats whose bytes are never fetched.
pub fn binary_stub(basename: &str, suffix: &str) -> Extracted {
    Extracted::Stub(format!(
        "Binary file {basename}{suffix}; content not extractable."
    ))
}

/// Stub emitted when optical character recognition finds nothing.
pub fn empty_ocr_stub(basename: &str, suffix: &str) -> Extracted {
    Extracted::Stub(format!(
        "Image file {basename}{suffix}, OCR returned no useful text."
    ))
}

/// Dispatches on the resolved format; one handler per class.
pub async fn extract(
    kind: FormatKind,
    path: &Path,
    basename: &str,
    suffix: &str,
) -> Result<Extracted, QaError> {
    match kind {
        FormatKind::Binary => Ok(binary_stub(basename, suffix)),
        FormatKind::Image => image_ocr(path, basename, suffix).await,
        FormatKind::Archive => archive_summary(&read_bytes(path).await?),
        FormatKind::Spreadsheet => spreadsheet_text(&read_bytes(path).await?).map(Extracted::Text),
        FormatKind::SlideDeck => slide_text(&read_bytes(path).await?).map(Extracted::Text),
        FormatKind::Pdf => pdf_text(&read_bytes(path).await?).map(Extracted::Text),
        FormatKind::WordDocument => word_text(&read_bytes(path).await?).map(Extracted::Text),
        FormatKind::PlainText => Ok(Extracted::Text(
            String::from_utf8_lossy(&read_bytes(path).await?).into_owned(),
        )),
        FormatKind::Email => email_text(&read_bytes(path).await?).map(Extracted::Text),
    }
}

async fn read_bytes(path: &Path) -> Result<Vec<u8>, QaError> {
    Ok(tokio::fs::read(path).await?)
}

/// Lists archive entry names without extracting anything.
fn archive_summary(bytes: &[u8]) -> Result<Extracted, QaError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|err| QaError::Extraction(format!("unreadable archive: {err}")))?;
    // by_index keeps central-directory order; file_names() does not
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(|err| {
            QaError::Extraction(format!("unreadable archive entry {index}: {err}"))
        })?;
        entries.push(entry.name().to_string());
    }
    Ok(Extracted::Stub(format!(
        "Archive contains {} files: {}",
        entries.len(),
        entries.join(", ")
    )))
}

/// Runs optical character recognition over the whole image.
async fn image_ocr(path: &Path, basename: &str, suffix: &str) -> Result<Extracted, QaError> {
    let output = Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .args(["-l", "eng"])
        .output()
        .await
        .map_err(|err| {
            QaError::Extraction(format!(
                "failed to run tesseract (is tesseract-ocr installed?): {err}"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(QaError::Extraction(format!(
            "tesseract failed: {}",
            stderr.trim()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        Ok(empty_ocr_stub(basename, suffix))
    } else {
        Ok(Extracted::Text(text))
    }
}

/// Every sheet: cells joined with single spaces, rows with newlines, a
/// `Sheet <name>:` header per sheet, sheets separated by a blank line.
fn spreadsheet_text(bytes: &[u8]) -> Result<String, QaError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|err| QaError::Extraction(format!("unreadable spreadsheet: {err}")))?;

    let mut sheets = Vec::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let range = workbook.worksheet_range(&sheet_name).map_err(|err| {
            QaError::Extraction(format!("unreadable sheet '{sheet_name}': {err}"))
        })?;
        let rows: Vec<String> = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(cell_text)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        sheets.push(format!("Sheet {sheet_name}:\n{}", rows.join("\n")));
    }
    Ok(sheets.join("\n\n"))
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        calamine::Data::DateTime(dt) => dt.to_string(),
        _ => String::new(),
    }
}

/// One line per slide, 1-based index prefix, text runs joined with spaces.
fn slide_text(bytes: &[u8]) -> Result<String, QaError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|err| QaError::Extraction(format!("unreadable slide deck: {err}")))?;

    let mut slide_names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    slide_names.sort_by_key(|name| slide_ordinal(name));

    let mut slides = Vec::new();
    for (idx, name) in slide_names.iter().enumerate() {
        let mut xml = String::new();
        archive
            .by_name(name)
            .map_err(|err| QaError::Extraction(format!("unreadable slide '{name}': {err}")))?
            .read_to_string(&mut xml)
            .map_err(|err| QaError::Extraction(format!("unreadable slide '{name}': {err}")))?;
        slides.push(format!("Slide {}: {}", idx + 1, slide_runs(&xml).join(" ")));
    }
    Ok(slides.join("\n"))
}

fn slide_ordinal(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

/// Collects the text runs (`<a:t>` elements) of one slide's XML.
fn slide_runs(xml: &str) -> Vec<String> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut runs = Vec::new();
    let mut in_run = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run = true,
            Ok(Event::Text(e)) if in_run => {
                if let Ok(text) = e.unescape() {
                    runs.push(text.into_owned());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => in_run = false,
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    runs
}

fn pdf_text(bytes: &[u8]) -> Result<String, QaError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|err| QaError::Extraction(format!("unreadable pdf: {err}")))
}

/// Paragraph run text, paragraphs joined with newlines.
fn word_text(bytes: &[u8]) -> Result<String, QaError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|err| QaError::Extraction(format!("unreadable word document: {err}")))?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(text) = child {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }
    Ok(paragraphs.join("\n"))
}

/// Only the text/plain body part(s), multipart or singular, joined with
/// newlines.
fn email_text(bytes: &[u8]) -> Result<String, QaError> {
    let message = mail_parser::MessageParser::default()
        .parse(bytes)
        .ok_or_else(|| QaError::Extraction("unreadable email message".to_string()))?;

    let parts: Vec<String> = message
        .text_bodies()
        .filter_map(|part| part.text_contents().map(str::to_string))
        .collect();
    Ok(parts.join("\n"))
}
