//! Plain-text extraction from uploaded files.
//!
//! Every supported format is a [`FileKind`] variant bound to one parsing routine. Parsers
//! return [`Error::Extraction`] for malformed input; the dispatcher adds the empty-content
//! guard so an upload that yields nothing never reaches the completion service.

mod docx;
mod pdf;
mod tabular;

use crate::{Error, Result};
use std::fmt;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Txt,
    Csv,
    Json,
    Md,
    Pdf,
    Docx,
    Xlsx,
}

impl FileKind {
    /// Resolves a file extension, ignoring case. Unknown extensions are rejected with the
    /// extension exactly as the caller supplied it.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "md" => Ok(Self::Md),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(Error::UnsupportedFileType(extension.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Md => "md",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts the textual content of `bytes`, interpreting them according to `extension`.
pub fn extract(bytes: &[u8], extension: &str) -> Result<String> {
    let kind = FileKind::from_extension(extension)?;
    debug!("Extracting {} content from {} bytes", kind, bytes.len());

    let content = match kind {
        FileKind::Txt | FileKind::Json | FileKind::Md => decode_utf8(bytes)?,
        FileKind::Csv => tabular::csv_to_text(bytes)?,
        FileKind::Xlsx => tabular::xlsx_to_text(bytes)?,
        FileKind::Pdf => pdf::extract_text(bytes)?,
        FileKind::Docx => docx::extract_text(bytes)?,
    };

    if content.trim().is_empty() {
        error!("No content extracted from {} file", kind);
        return Err(Error::EmptyContent);
    }

    debug!("Extracted {} characters from {} file", content.len(), kind);
    Ok(content)
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(Error::extraction)
}
