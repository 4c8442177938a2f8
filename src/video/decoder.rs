use super::FrameSource;
use crate::{Error, Result};
use ffmpeg_next as ffmpeg;
use ffmpeg::{
    format::{Pixel, context::Input},
    software::scaling,
    util::frame::video::Video,
};
use image::RgbImage;
use std::{ops::ControlFlow, path::Path, sync::OnceLock};
use tracing::debug;

fn init_ffmpeg() -> Result<()> {
    static INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    INIT.get_or_init(|| {
        ffmpeg::init().map_err(|e| format!("Failed to initialize FFmpeg: {e}"))?;
        ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Error);
        Ok(())
    })
    .clone()
    .map_err(Error::Video)
}

/// Video stream decoded with the system FFmpeg libraries; frames are converted to RGB24.
///
/// The demuxer, decoder and scaler are released when the source is dropped.
pub struct FfmpegSource {
    input: Input,
    stream_index: usize,
    decoder: ffmpeg::decoder::Video,
    scaler: scaling::Context,
    total_frames: u64,
}

impl FfmpegSource {
    pub fn open(path: &Path) -> Result<Self> {
        init_ffmpeg()?;

        let input = ffmpeg::format::input(&path)
            .map_err(|e| Error::video(format!("Failed to open {}: {e}", path.display())))?;

        let (stream_index, total_frames, decoder) = {
            let stream = input
                .streams()
                .best(ffmpeg::media::Type::Video)
                .ok_or_else(|| Error::video("No video stream found"))?;

            let decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
                .map_err(|e| Error::video(format!("Failed to create codec context: {e}")))?
                .decoder()
                .video()
                .map_err(|e| Error::video(format!("Failed to create decoder: {e}")))?;

            (stream.index(), frame_count(&input, &stream), decoder)
        };

        let scaler = scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            scaling::Flags::BILINEAR,
        )
        .map_err(|e| Error::video(format!("Failed to create scaler: {e}")))?;

        debug!(
            "Opened {} ({}x{}, {} frames)",
            path.display(),
            decoder.width(),
            decoder.height(),
            total_frames
        );

        Ok(Self {
            input,
            stream_index,
            decoder,
            scaler,
            total_frames,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn decode(
        &mut self,
        stride: u64,
        sink: &mut dyn FnMut(u64, RgbImage) -> ControlFlow<()>,
    ) -> Result<()> {
        let stride = stride.max(1);
        let mut index = 0u64;
        let mut decoded = Video::empty();

        for (stream, packet) in self.input.packets() {
            if stream.index() != self.stream_index {
                continue;
            }
            self.decoder
                .send_packet(&packet)
                .map_err(|e| Error::video(format!("Failed to decode packet: {e}")))?;

            let flow = drain(
                &mut self.decoder,
                &mut self.scaler,
                &mut decoded,
                &mut index,
                stride,
                sink,
            )?;
            if flow.is_break() {
                return Ok(());
            }
        }

        self.decoder
            .send_eof()
            .map_err(|e| Error::video(format!("Failed to flush decoder: {e}")))?;
        drain(
            &mut self.decoder,
            &mut self.scaler,
            &mut decoded,
            &mut index,
            stride,
            sink,
        )?;

        Ok(())
    }
}

fn drain(
    decoder: &mut ffmpeg::decoder::Video,
    scaler: &mut scaling::Context,
    decoded: &mut Video,
    index: &mut u64,
    stride: u64,
    sink: &mut dyn FnMut(u64, RgbImage) -> ControlFlow<()>,
) -> Result<ControlFlow<()>> {
    while decoder.receive_frame(decoded).is_ok() {
        let current = *index;
        *index += 1;
        if current % stride != 0 {
            continue;
        }

        let mut rgb = Video::empty();
        scaler
            .run(decoded, &mut rgb)
            .map_err(|e| Error::video(format!("Failed to convert frame: {e}")))?;

        if sink(current, to_rgb_image(&rgb)?).is_break() {
            return Ok(ControlFlow::Break(()));
        }
    }
    Ok(ControlFlow::Continue(()))
}

/// Copies the packed RGB24 plane row by row, dropping the line padding FFmpeg adds.
fn to_rgb_image(frame: &Video) -> Result<RgbImage> {
    let (width, height) = (frame.width(), frame.height());
    let line_size = frame.stride(0);
    let row_len = width as usize * 3;
    let data = frame.data(0);

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let start = row * line_size;
        let line = data
            .get(start..start + row_len)
            .ok_or_else(|| Error::video("Frame buffer shorter than its dimensions"))?;
        pixels.extend_from_slice(line);
    }

    RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| Error::video("Frame buffer does not match its dimensions"))
}

/// Frames advertised by the stream, falling back to duration x average frame rate.
fn frame_count(input: &Input, stream: &ffmpeg::format::stream::Stream) -> u64 {
    let frames = stream.frames();
    if frames > 0 {
        return frames as u64;
    }

    let rate = stream.avg_frame_rate();
    let fps = if rate.1 > 0 {
        f64::from(rate.0) / f64::from(rate.1)
    } else {
        0.0
    };
    let seconds = input.duration() as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE);

    if fps > 0.0 && seconds > 0.0 {
        (fps * seconds).round() as u64
    } else {
        0
    }
}
