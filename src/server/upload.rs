use super::types::UploadForm;
use crate::{Error, Result};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::debug;

/// JSON submission: the file travels base64-encoded next to its extension.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonUpload {
    input_type: Option<String>,
    source_system: Option<String>,
    destination_system: Option<String>,
    file_data: Option<String>,
    file_ext: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        debug!(
            "Received {} analyze request",
            if is_multipart { "multipart" } else { "JSON" }
        );

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            UploadForm::from_multipart(multipart).await
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            UploadForm::from_json(&body)
        }
    }
}

impl UploadForm {
    /// Reads the `file`, `inputType`, `sourceSystem` and `destinationSystem` parts. The file
    /// extension is whatever follows the last `.` of the uploaded file name.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = UploadForm::default();
        let mut has_file = false;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    has_file = true;
                    form.file_extension = field
                        .file_name()
                        .and_then(|file_name| file_name.rsplit('.').next())
                        .map(str::to_string);
                    let data = field.bytes().await.map_err(multipart_error)?;
                    debug!(
                        "Received file with extension {:?}, size: {} bytes",
                        form.file_extension,
                        data.len()
                    );
                    form.file_bytes = Some(data.to_vec());
                }
                "inputType" => form.input_type = Some(field.text().await.map_err(multipart_error)?),
                "sourceSystem" => {
                    form.source_system = Some(field.text().await.map_err(multipart_error)?)
                }
                "destinationSystem" => {
                    form.destination_system = Some(field.text().await.map_err(multipart_error)?)
                }
                other => debug!("Ignoring multipart field '{}'", other),
            }
        }

        if !has_file {
            return Err(Error::NoInput);
        }

        Ok(form)
    }

    /// Decodes a JSON body. An empty body or an empty object counts as no input at all.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::NoInput);
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| Error::InvalidPayload(format!("malformed JSON body: {e}")))?;
        if value.as_object().is_none_or(|object| object.is_empty()) {
            return Err(Error::NoInput);
        }

        let upload: JsonUpload = serde_json::from_value(value)
            .map_err(|e| Error::InvalidPayload(format!("unexpected JSON fields: {e}")))?;

        let file_bytes = upload
            .file_data
            .as_deref()
            .map(|data| STANDARD.decode(data.trim()))
            .transpose()
            .map_err(|e| Error::InvalidPayload(format!("fileData is not valid base64: {e}")))?;

        debug!(
            "Received JSON data with file type: {:?}, size: {} bytes",
            upload.file_ext,
            file_bytes.as_ref().map_or(0, Vec::len)
        );

        Ok(UploadForm {
            input_type: upload.input_type,
            source_system: upload.source_system,
            destination_system: upload.destination_system,
            file_bytes,
            file_extension: upload.file_ext,
        })
    }
}

fn multipart_error(e: MultipartError) -> Error {
    rejection(e.status(), e.body_text())
}

fn rejection(status: StatusCode, text: String) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge
    } else {
        Error::InvalidPayload(text)
    }
}
