//! Prompt templates for the requirements analysis.

mod templates;

use crate::server::InputType;

pub use templates::{TEXT_USER_INSTRUCTION, VIDEO_USER_INSTRUCTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Text,
    Video,
}

impl From<InputType> for PromptKind {
    fn from(input_type: InputType) -> Self {
        match input_type {
            InputType::Brd | InputType::Audio => Self::Text,
            InputType::Video => Self::Video,
        }
    }
}

/// A fully rendered request for the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPrompt {
    pub kind: PromptKind,
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Renders the text-analysis template around the extracted content.
pub fn compose_text(
    content: &str,
    input_type: InputType,
    source_system: &str,
    destination_system: &str,
    temperature: f32,
) -> AnalysisPrompt {
    AnalysisPrompt {
        kind: PromptKind::Text,
        system: templates::text_analysis(
            content,
            input_type.as_str(),
            source_system,
            destination_system,
        ),
        user: TEXT_USER_INSTRUCTION.to_string(),
        temperature,
    }
}

/// Renders the video-analysis template. Frames are quoted only by their first
/// `preview_chars` characters.
pub fn compose_video(
    frames: &[String],
    source_system: &str,
    destination_system: &str,
    preview_chars: usize,
    temperature: f32,
) -> AnalysisPrompt {
    AnalysisPrompt {
        kind: PromptKind::Video,
        system: templates::video_analysis(
            &frame_previews(frames, preview_chars),
            source_system,
            destination_system,
        ),
        user: VIDEO_USER_INSTRUCTION.to_string(),
        temperature,
    }
}

fn frame_previews(frames: &[String], preview_chars: usize) -> String {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let prefix: String = frame.chars().take(preview_chars).collect();
            format!("Frame {}: {}...", i + 1, prefix)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
