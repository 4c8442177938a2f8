use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use crate::server::ErrorResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No file or JSON data provided")]
    NoInput,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid input type")]
    InvalidInputType,

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("File exceeds the maximum upload size")]
    PayloadTooLarge,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("No content could be extracted from the file")]
    EmptyContent,

    #[error("Error processing file: {0}")]
    Extraction(String),

    #[error("Failed to process video frames")]
    FrameExtraction,

    #[error("Video error: {0}")]
    Video(String),

    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn extraction(msg: impl ToString) -> Self {
        Self::Extraction(msg.to_string())
    }

    pub fn video(msg: impl Into<String>) -> Self {
        Self::Video(msg.into())
    }

    pub fn analysis(msg: impl ToString) -> Self {
        Self::Analysis(msg.to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status reported to the caller when this error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoInput
            | Self::MissingFields
            | Self::InvalidInputType
            | Self::InvalidPayload(_)
            | Self::EmptyContent => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
