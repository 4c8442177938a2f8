use crate::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient},
    prompt::AnalysisPrompt,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Sends composed prompts to the completion service, one call per request.
#[derive(Clone)]
pub struct Analyzer {
    llm_client: Arc<dyn LlmClient>,
}

impl Analyzer {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    /// Returns the generated analysis. Transport, authentication and response failures are
    /// reported as [`Error::Analysis`] and never passed off as analysis text.
    pub async fn complete(&self, prompt: &AnalysisPrompt) -> Result<String> {
        debug!(
            "Requesting {:?} analysis (system prompt: {} chars, temperature {})",
            prompt.kind,
            prompt.system.len(),
            prompt.temperature
        );

        let request = ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(prompt.system.clone()),
                ChatMessage::user(prompt.user.clone()),
            ],
            temperature: prompt.temperature,
        };

        let response = self
            .llm_client
            .create_chat_completion(request)
            .await
            .map_err(|e| {
                error!("Completion request failed: {}", e);
                match e {
                    Error::Analysis(_) => e,
                    other => Error::analysis(other),
                }
            })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::analysis("completion returned no choices"))?;

        if let Some(usage) = &response.usage {
            info!(
                "Analysis completed: {} prompt tokens, {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(choice.message.content)
    }
}
