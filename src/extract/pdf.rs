use crate::{Error, Result};
use lopdf::Document;
use tracing::debug;

/// Extracts text page by page. Pages whose text cannot be decoded are skipped; only a
/// document that fails to load is an error.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String> {
    let document = Document::load_mem(bytes).map_err(Error::extraction)?;
    let pages = document.get_pages();

    let mut texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => texts.push(text),
            Err(e) => debug!("Skipping text of PDF page {}: {}", page_number, e),
        }
    }

    debug!(
        "Extracted text from {} of {} PDF pages",
        texts.len(),
        pages.len()
    );

    Ok(texts.join("\n"))
}
