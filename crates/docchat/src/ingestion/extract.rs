//! Per-format text extraction with extension dispatch

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Document;

/// Recognized file formats.
///
/// Anything not listed here falls back to [`FileKind::Text`]; binary files
/// that are not valid UTF-8 then fail and are reported as load warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Text,
}

impl FileKind {
    /// Dispatch by file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "docx" | "doc" => Self::Docx,
            _ => Self::Text,
        }
    }
}

/// Extract the text of one file as a sequence of documents in reading order
pub fn extract(path: &Path) -> Result<Vec<Document>> {
    let source = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| Error::load(&source, e.to_string()))?;

    match FileKind::from_path(path) {
        FileKind::Pdf => extract_pdf(&source, &data),
        FileKind::Docx => extract_docx(&source, &data),
        FileKind::Text => extract_text(&source, data),
    }
}

/// Extract PDF text, one document per page.
///
/// `pdf-extract` separates pages with form feeds; splitting on them recovers
/// per-page documents. Page count from `lopdf` is used as a sanity check.
fn extract_pdf(source: &str, data: &[u8]) -> Result<Vec<Document>> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::load(source, format!("PDF extraction failed: {e}")))?;

    let declared_pages = lopdf::Document::load_mem(data)
        .map(|doc| doc.get_pages().len())
        .unwrap_or(0);

    let mut documents = Vec::new();
    for (i, page_text) in text.split('\u{c}').enumerate() {
        let cleaned = normalize_extracted_text(page_text);
        if !cleaned.is_empty() {
            documents.push(Document::with_page(source, cleaned, i as u32 + 1));
        }
    }

    if documents.is_empty() {
        return Err(Error::load(
            source,
            "no text content could be extracted from PDF (it may be image-based)",
        ));
    }

    if declared_pages > 0 && documents.len() != declared_pages {
        tracing::debug!(
            source,
            extracted = documents.len(),
            declared = declared_pages,
            "page count mismatch after PDF extraction"
        );
    }

    Ok(documents)
}

/// Extract Word document text by walking paragraph runs
fn extract_docx(source: &str, data: &[u8]) -> Result<Vec<Document>> {
    let docx = docx_rs::read_docx(data).map_err(|e| Error::load(source, e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    let text = text.trim_end().to_string();
    if text.is_empty() {
        return Err(Error::load(source, "no text content found in document"));
    }

    Ok(vec![Document::new(source, text)])
}

/// Strict UTF-8 text decode; invalid encodings become load warnings upstream
fn extract_text(source: &str, data: Vec<u8>) -> Result<Vec<Document>> {
    let text = String::from_utf8(data)
        .map_err(|_| Error::load(source, "file is not valid UTF-8 text"))?;
    Ok(vec![Document::new(source, text)])
}

/// Collapse extraction artifacts: null bytes, glyph leftovers, blank lines
fn normalize_extracted_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00a0}', " ")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
