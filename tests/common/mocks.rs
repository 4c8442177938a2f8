use async_trait::async_trait;
use fitgap_analyzer::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, LlmClient, Usage},
    video::{FrameSource, SourceOpener},
};
use image::RgbImage;
use std::{
    ops::ControlFlow,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Mock LLM client for testing
#[derive(Debug, Default)]
pub struct MockLlmClient {
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    reply: String,
    error: Option<String>,
}

impl MockLlmClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::internal(error.clone()));
        }

        Ok(ChatCompletionResponse {
            id: "chatcmpl-test".to_string(),
            model: "gpt-4".to_string(),
            choices: vec![Choice {
                index: 0,
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: self.reply.clone(),
                },
                finish_reason: Some("Stop".to_string()),
            }],
            usage: Some(Usage {
                prompt_tokens: 120,
                completion_tokens: 40,
                total_tokens: 160,
            }),
        })
    }
}

/// In-memory video of solid-colour frames.
pub struct StubVideo {
    pub frames: u64,
}

impl FrameSource for StubVideo {
    fn total_frames(&self) -> u64 {
        self.frames
    }

    fn decode(
        &mut self,
        stride: u64,
        sink: &mut dyn FnMut(u64, RgbImage) -> ControlFlow<()>,
    ) -> Result<()> {
        for index in (0..self.frames).step_by(stride as usize) {
            let frame = RgbImage::from_pixel(4, 4, image::Rgb([index as u8, 90, 200]));
            if sink(index, frame).is_break() {
                break;
            }
        }
        Ok(())
    }
}

pub fn four_frame_video(_: &Path) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(StubVideo { frames: 4 }))
}

pub fn unreadable_video(path: &Path) -> Result<Box<dyn FrameSource>> {
    Err(Error::video(format!("cannot open {}", path.display())))
}

/// Opener that remembers every path it is handed, then behaves like [`four_frame_video`] or
/// [`unreadable_video`].
pub fn recording_opener(seen: Arc<Mutex<Vec<PathBuf>>>, readable: bool) -> SourceOpener {
    Arc::new(move |path: &Path| -> Result<Box<dyn FrameSource>> {
        seen.lock().unwrap().push(path.to_path_buf());
        if readable {
            four_frame_video(path)
        } else {
            unreadable_video(path)
        }
    })
}
