use super::{
    lifecycle::{RequestEvent, RequestLifecycle},
    types::{AnalyzeResponse, UploadForm, UploadRequest},
};
use crate::{
    Error, Result,
    analysis::Analyzer,
    config::{AnalysisConfig, Config},
    extract,
    llm::LlmClient,
    prompt::{self, AnalysisPrompt, PromptKind},
    video::{FrameSampler, FrameSet},
};
use axum::{extract::State, response::Json};
use std::{io::Write, sync::Arc};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub sampler: FrameSampler,
    pub analysis: Arc<AnalysisConfig>,
}

impl AppState {
    pub fn new(config: &Config, llm_client: Arc<dyn LlmClient>) -> Self {
        Self::with_sampler(config, llm_client, FrameSampler::new(&config.analysis))
    }

    pub fn with_sampler(
        config: &Config,
        llm_client: Arc<dyn LlmClient>,
        sampler: FrameSampler,
    ) -> Self {
        Self {
            analyzer: Analyzer::new(llm_client),
            sampler,
            analysis: Arc::new(config.analysis.clone()),
        }
    }
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn analyze(
    State(state): State<AppState>,
    form: UploadForm,
) -> Result<Json<AnalyzeResponse>> {
    let mut lifecycle = RequestLifecycle::new();

    match process(&state, form, &mut lifecycle).await {
        Ok(result) => {
            lifecycle.transition(RequestEvent::Complete)?;
            info!("Analysis returned {} characters", result.len());
            Ok(Json(AnalyzeResponse { result }))
        }
        Err(e) => {
            error!(
                "Analyze request failed in {:?}: {}",
                lifecycle.current_state(),
                e
            );
            let _ = lifecycle.transition(RequestEvent::Fail);
            Err(e)
        }
    }
}

async fn process(
    state: &AppState,
    form: UploadForm,
    lifecycle: &mut RequestLifecycle,
) -> Result<String> {
    let request = form.validate()?;
    lifecycle.transition(RequestEvent::Validate)?;

    info!(
        "Analyzing {} upload ({} bytes, .{}) for {} -> {}",
        request.input_type.as_str(),
        request.file_bytes.len(),
        request.file_extension,
        request.source_system,
        request.destination_system
    );

    lifecycle.transition(RequestEvent::BeginExtraction)?;
    let prompt = match PromptKind::from(request.input_type) {
        PromptKind::Text => text_prompt(request, &state.analysis).await?,
        PromptKind::Video => video_prompt(request, &state.sampler, &state.analysis).await?,
    };

    lifecycle.transition(RequestEvent::BeginAnalysis)?;
    state.analyzer.complete(&prompt).await
}

async fn text_prompt(request: UploadRequest, analysis: &AnalysisConfig) -> Result<AnalysisPrompt> {
    let UploadRequest {
        input_type,
        source_system,
        destination_system,
        file_bytes,
        file_extension,
    } = request;

    let content =
        tokio::task::spawn_blocking(move || extract::extract(&file_bytes, &file_extension))
            .await
            .map_err(|e| Error::internal(format!("Extraction task failed: {e}")))??;

    Ok(prompt::compose_text(
        &content,
        input_type,
        &source_system,
        &destination_system,
        analysis.text_temperature,
    ))
}

async fn video_prompt(
    request: UploadRequest,
    sampler: &FrameSampler,
    analysis: &AnalysisConfig,
) -> Result<AnalysisPrompt> {
    let frames = sample_upload(sampler.clone(), request.file_bytes, &request.file_extension).await?;
    if frames.is_empty() {
        return Err(Error::FrameExtraction);
    }

    Ok(prompt::compose_video(
        &frames,
        &request.source_system,
        &request.destination_system,
        analysis.frame_preview_chars,
        analysis.video_temperature,
    ))
}

/// Spools the upload to a temporary file for the decoder. The file is removed when the
/// blocking task finishes, whether sampling succeeded or not.
async fn sample_upload(sampler: FrameSampler, bytes: Vec<u8>, extension: &str) -> Result<FrameSet> {
    let suffix: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let suffix = format!(".{suffix}");

    tokio::task::spawn_blocking(move || -> Result<FrameSet> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;

        Ok(sampler.sample(file.path()))
    })
    .await
    .map_err(|e| Error::internal(format!("Frame sampling task failed: {e}")))?
}
