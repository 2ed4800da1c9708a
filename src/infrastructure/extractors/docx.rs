use std::io::Read;

use crate::application::ports::document_extractor::ExtractionError;

/// Largest decompressed payload accepted for `word/document.xml`.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Pull the text runs (`<w:t>`) out of a DOCX archive, inserting a
/// paragraph break at each closing `<w:p>` so document structure
/// survives into chunking.
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractionError::CorruptedFile(e.to_string()))?;

    let mut document_xml = Vec::new();
    {
        let entry = archive
            .by_name("word/document.xml")
            .map_err(|e| ExtractionError::CorruptedFile(e.to_string()))?;
        entry
            .take(MAX_XML_ENTRY_BYTES)
            .read_to_end(&mut document_xml)
            .map_err(|e| ExtractionError::ExtractionFailed(e.to_string()))?;
        if document_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
            return Err(ExtractionError::ExtractionFailed(
                "word/document.xml exceeds size limit".to_string(),
            ));
        }
    }

    extract_text_runs(&document_xml)
}

fn extract_text_runs(xml: &[u8]) -> Result<String, ExtractionError> {
    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(quick_xml::events::Event::Text(text)) if in_text_run => {
                out.push_str(text.unescape().unwrap_or_default().as_ref());
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if !out.ends_with("\n\n") && !out.is_empty() {
                        out.push_str("\n\n");
                    }
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(ExtractionError::ExtractionFailed(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(out.trim().to_string())
}
