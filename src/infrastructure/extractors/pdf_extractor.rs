use std::collections::BTreeMap;
use std::sync::Arc;

use lopdf::{Document as PdfDocument, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use regex::Regex;

use crate::application::ports::document_extractor::{ExtractedDocument, ExtractionError};
use crate::application::ports::object_storage::ObjectStorage;
use crate::application::ports::ocr_engine::{OcrEngine, OcrPage};
use crate::domain::entities::Document;
use crate::domain::value_objects::{DocumentMetadata, StoragePath};

/// Soft length target for re-assembled paragraphs.
const PARAGRAPH_TARGET_CHARS: usize = 200;

/// When one extraction's length is at least this fraction of the other's,
/// it wins the page outright; otherwise both texts are kept.
const MERGE_PREFERENCE_RATIO: f64 = 0.8;

/// PDF text extraction that merges the structured text layer with an OCR
/// pass per page. Digitally authored pages keep their text layer; scanned
/// pages fall through to OCR; ambiguous pages keep both and rely on
/// chunking to tolerate the redundancy.
pub struct PdfOcrExtractor {
    ocr_engine: Arc<dyn OcrEngine>,
    object_storage: Arc<dyn ObjectStorage>,
    letter_digit: Regex,
    digit_letter: Regex,
    sentence_capital: Regex,
}

impl PdfOcrExtractor {
    pub fn new(
        ocr_engine: Arc<dyn OcrEngine>,
        object_storage: Arc<dyn ObjectStorage>,
    ) -> Result<Self, ExtractionError> {
        Ok(Self {
            ocr_engine,
            object_storage,
            letter_digit: Regex::new(r"([A-Za-z])(\d)")?,
            digit_letter: Regex::new(r"(\d)([A-Za-z])")?,
            sentence_capital: Regex::new(r"([.!?])([A-Z])")?,
        })
    }

    pub async fn extract(
        &self,
        document: &Document,
        bytes: &[u8],
    ) -> Result<ExtractedDocument, ExtractionError> {
        let pdf = load_pdf(bytes)?;
        let text_pages = extract_text_layer(&pdf);
        let mut metadata = extract_pdf_metadata(&pdf);

        let ocr_pages = self.run_ocr_pass(document, bytes).await;

        let artifacts = StoragePath::new(document.workspace_id(), document.id());
        let mut page_numbers: Vec<u32> = text_pages.keys().copied().collect();
        for number in ocr_pages.keys() {
            if !text_pages.contains_key(number) {
                page_numbers.push(*number);
            }
        }
        page_numbers.sort_unstable();

        let mut merged_pages = Vec::new();
        for number in &page_numbers {
            let text_layer = text_pages.get(number).map(String::as_str).unwrap_or("");
            let ocr = ocr_pages.get(number);
            let ocr_text = ocr.map(|p| p.text.as_str()).unwrap_or("");

            let merged = merge_page_text(text_layer, ocr_text);
            if !merged.is_empty() {
                self.store_artifact(&artifacts.page_text(*number), merged.as_bytes())
                    .await;
            }
            if let Some(image) = ocr.and_then(|p| p.image_png.as_deref()) {
                self.store_artifact(&artifacts.page_image(*number), image).await;
            }
            merged_pages.push(merged);
        }

        let raw_text = merged_pages
            .iter()
            .filter(|page| !page.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        if raw_text.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let formatted = self.reformat(&raw_text);
        self.store_artifact(&artifacts.formatted_text(), formatted.as_bytes())
            .await;

        metadata.page_count = Some(page_numbers.len() as i32);

        Ok(ExtractedDocument {
            text: formatted,
            metadata: Some(metadata),
            page_count: Some(page_numbers.len() as i32),
        })
    }

    /// Lease the OCR engine for this document and recognize every page.
    /// The lease is permit-backed and released when the scanner drops,
    /// on every exit path. OCR trouble degrades to an empty pass; the
    /// text layer may still carry the document.
    async fn run_ocr_pass(&self, document: &Document, bytes: &[u8]) -> BTreeMap<u32, OcrPage> {
        let scanner = match self.ocr_engine.lease().await {
            Ok(scanner) => scanner,
            Err(error) => {
                tracing::warn!(document = %document.id(), error = %error, "ocr engine unavailable");
                return BTreeMap::new();
            }
        };

        match scanner.recognize(bytes).await {
            Ok(pages) => pages.into_iter().map(|page| (page.number, page)).collect(),
            Err(error) => {
                tracing::warn!(document = %document.id(), error = %error, "ocr pass failed");
                BTreeMap::new()
            }
        }
    }

    async fn store_artifact(&self, path: &str, bytes: &[u8]) {
        if let Err(error) = self.object_storage.put(path, bytes).await {
            tracing::warn!(path, error = %error, "failed to store processing artifact");
        }
    }

    /// Repair common OCR artifacts, then rebuild paragraph structure by
    /// accumulating sentences up to the soft length target.
    fn reformat(&self, text: &str) -> String {
        let repaired = self.repair_ocr_artifacts(text);
        reflow_paragraphs(&repaired, PARAGRAPH_TARGET_CHARS)
    }

    fn repair_ocr_artifacts(&self, text: &str) -> String {
        let step = self.letter_digit.replace_all(text, "$1 $2");
        let step = self.digit_letter.replace_all(&step, "$1 $2");
        self.sentence_capital.replace_all(&step, "$1 $2").into_owned()
    }
}

fn load_pdf(bytes: &[u8]) -> Result<PdfDocument, ExtractionError> {
    let mut pdf =
        PdfDocument::load_mem(bytes).map_err(|e| ExtractionError::CorruptedFile(e.to_string()))?;

    if pdf.is_encrypted() {
        pdf.decrypt("").map_err(|_| {
            ExtractionError::ExtractionFailed("failed to decrypt password-protected pdf".to_string())
        })?;
    }

    Ok(pdf)
}

/// Structured text layer, one entry per page that yielded any text.
/// Fast and faithful for digitally authored PDFs, empty for scans.
fn extract_text_layer(pdf: &PdfDocument) -> BTreeMap<u32, String> {
    let page_numbers: Vec<u32> = pdf.get_pages().keys().copied().collect();

    page_numbers
        .into_par_iter()
        .filter_map(|number| {
            let text = pdf.extract_text(&[number]).ok()?;
            let trimmed = text.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some((number, trimmed))
            }
        })
        .collect()
}

fn extract_pdf_metadata(pdf: &PdfDocument) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();

    let Ok(info) = pdf.trailer.get(b"Info") else {
        return metadata;
    };
    let info_dict = match info {
        Object::Reference(id) => pdf.get_object(*id).and_then(|object| object.as_dict()),
        other => other.as_dict(),
    };
    let Ok(info_dict) = info_dict else {
        return metadata;
    };

    metadata.title = read_info_string(info_dict, b"Title");
    metadata.author = read_info_string(info_dict, b"Author");
    metadata.subject = read_info_string(info_dict, b"Subject");
    metadata.created = read_info_string(info_dict, b"CreationDate");
    metadata
}

fn read_info_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    let value = dict.get(key).ok()?;
    let raw = value.as_str().ok()?;
    let text = String::from_utf8_lossy(raw).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Per-page merge of the two extractions by relative length: a clearly
/// longer (or comparable) text layer wins, a clearly longer OCR result
/// wins, and the ambiguous middle keeps both. Duplication is accepted;
/// chunking downstream tolerates redundancy.
pub fn merge_page_text(text_layer: &str, ocr_text: &str) -> String {
    let text_layer = text_layer.trim();
    let ocr_text = ocr_text.trim();
    let text_len = text_layer.chars().count() as f64;
    let ocr_len = ocr_text.chars().count() as f64;

    if text_len >= MERGE_PREFERENCE_RATIO * ocr_len {
        text_layer.to_string()
    } else if ocr_len >= MERGE_PREFERENCE_RATIO * text_len {
        ocr_text.to_string()
    } else {
        format!("{}\n{}", text_layer, ocr_text)
    }
}

/// Accumulate sentences into paragraphs, emitting a break once a
/// paragraph exceeds `target` characters.
pub fn reflow_paragraphs(text: &str, target: usize) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if current.is_empty() {
            current = sentence;
        } else {
            current.push(' ');
            current.push_str(&sentence);
        }
        if current.chars().count() > target {
            paragraphs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs.join("\n\n")
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_whitespace() && current.is_empty() {
            continue;
        }
        current.push(if ch == '\n' { ' ' } else { ch });
        if matches!(ch, '.' | '!' | '?') {
            sentences.push(std::mem::take(&mut current).trim().to_string());
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}
