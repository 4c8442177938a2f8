use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Kind of material the caller uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Brd,
    Audio,
    Video,
}

impl InputType {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "BRD" => Ok(Self::Brd),
            "Audio" => Ok(Self::Audio),
            "Video" => Ok(Self::Video),
            _ => Err(Error::InvalidInputType),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brd => "BRD",
            Self::Audio => "Audio",
            Self::Video => "Video",
        }
    }
}

/// The fields of an analyze request as received, before validation. Multipart and JSON
/// submissions both decode into this shape.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UploadForm {
    pub input_type: Option<String>,
    pub source_system: Option<String>,
    pub destination_system: Option<String>,
    pub file_bytes: Option<Vec<u8>>,
    pub file_extension: Option<String>,
}

/// A validated analyze request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub input_type: InputType,
    pub source_system: String,
    pub destination_system: String,
    pub file_bytes: Vec<u8>,
    pub file_extension: String,
}

impl UploadForm {
    /// Requires all five fields to be present and non-empty, then resolves the input type.
    pub fn validate(self) -> Result<UploadRequest> {
        let text = |value: Option<String>| value.filter(|v| !v.is_empty());

        let (
            Some(input_type),
            Some(source_system),
            Some(destination_system),
            Some(file_bytes),
            Some(file_extension),
        ) = (
            text(self.input_type),
            text(self.source_system),
            text(self.destination_system),
            self.file_bytes.filter(|b| !b.is_empty()),
            text(self.file_extension),
        )
        else {
            return Err(Error::MissingFields);
        };

        Ok(UploadRequest {
            input_type: InputType::parse(&input_type)?,
            source_system,
            destination_system,
            file_bytes,
            file_extension,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
