//! Even subsampling of video frames into base64 JPEG stills.

#[cfg(feature = "ffmpeg")]
mod decoder;

#[cfg(feature = "ffmpeg")]
pub use decoder::FfmpegSource;

use crate::{Error, Result, config::AnalysisConfig};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{RgbImage, codecs::jpeg::JpegEncoder};
use std::{ops::ControlFlow, path::Path, sync::Arc};
use tracing::{debug, warn};

/// Encoded stills in decode order.
pub type FrameSet = Vec<String>;

/// Opens a video file for decoding.
pub type SourceOpener = Arc<dyn Fn(&Path) -> Result<Box<dyn FrameSource>> + Send + Sync>;

/// A decodable video stream.
pub trait FrameSource {
    /// Frame count advertised by the container, 0 when unknown.
    fn total_frames(&self) -> u64;

    /// Decodes every frame in order and hands each one whose zero-based index is a multiple
    /// of `stride` to `sink`. Decoding stops as soon as `sink` breaks.
    fn decode(
        &mut self,
        stride: u64,
        sink: &mut dyn FnMut(u64, RgbImage) -> ControlFlow<()>,
    ) -> Result<()>;
}

/// Distance between sampled frames. Short videos keep every frame; longer ones are strided
/// so that at most `max_frames` evenly spaced frames span the whole clip. `max_frames` is at
/// least 1.
fn sampling_rate(total_frames: u64, max_frames: usize) -> u64 {
    let max_frames = max_frames as u64;
    if total_frames > max_frames {
        total_frames.div_ceil(max_frames)
    } else {
        1
    }
}

#[derive(Clone)]
pub struct FrameSampler {
    max_frames: usize,
    jpeg_quality: u8,
    opener: SourceOpener,
}

impl FrameSampler {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self::with_opener(config, Arc::new(open_source))
    }

    pub fn with_opener(config: &AnalysisConfig, opener: SourceOpener) -> Self {
        Self {
            max_frames: config.max_frames.max(1),
            jpeg_quality: config.jpeg_quality,
            opener,
        }
    }

    /// Samples the video at `path`. An unreadable video yields an empty set.
    pub fn sample(&self, path: &Path) -> FrameSet {
        let mut source = match (self.opener)(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Could not open video {}: {}", path.display(), e);
                return FrameSet::new();
            }
        };

        let quality = self.jpeg_quality;
        let frames = collect_frames(source.as_mut(), self.max_frames, |index, image| {
            match encode_frame(&image, quality) {
                Ok(encoded) => Some(encoded),
                Err(e) => {
                    warn!("Dropping frame {}: {}", index, e);
                    None
                }
            }
        });

        debug!("Sampled {} frames from {}", frames.len(), path.display());
        frames
    }
}

fn collect_frames<S, E>(source: &mut S, max_frames: usize, mut encode: E) -> FrameSet
where
    S: FrameSource + ?Sized,
    E: FnMut(u64, RgbImage) -> Option<String>,
{
    let total = source.total_frames();
    let stride = sampling_rate(total, max_frames);
    debug!(
        "Sampling video with {} frames at stride {} (limit {})",
        total, stride, max_frames
    );

    let mut frames = FrameSet::with_capacity(max_frames.min(total.max(1) as usize));
    let outcome = source.decode(stride, &mut |index: u64, image: RgbImage| {
        if let Some(encoded) = encode(index, image) {
            frames.push(encoded);
        }
        // Bounds sources with an unknown or under-reported frame count.
        if frames.len() >= max_frames {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    if let Err(e) = outcome {
        warn!("Video decoding stopped after {} frames: {}", frames.len(), e);
    }

    frames
}

fn encode_frame(image: &RgbImage, quality: u8) -> Result<String> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(image)
        .map_err(|e| Error::video(format!("JPEG encoding failed: {e}")))?;
    Ok(STANDARD.encode(jpeg))
}

#[cfg(feature = "ffmpeg")]
fn open_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(FfmpegSource::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn open_source(path: &Path) -> Result<Box<dyn FrameSource>> {
    Err(Error::video(format!(
        "cannot decode {}: built without the `ffmpeg` feature",
        path.display()
    )))
}
