use crate::{
    core::{FrameIndex, FrameRange},
    encode_ffmpeg::{EncodeConfig, FfmpegEncoder},
    error::SwapmotionResult,
    eval::Evaluator,
    render_cpu::CpuRasterizer,
    stage::Stage,
};

/// One rendered frame. `data` is row-major RGBA8, premultiplied.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Evaluate + rasterize a single frame.
pub fn render_frame(
    stage: &Stage,
    rasterizer: &mut CpuRasterizer,
    frame: FrameIndex,
) -> SwapmotionResult<FrameRGBA> {
    let eval = Evaluator::eval_frame(stage, frame)?;
    rasterizer.render_frame(&eval)
}

/// Render a range of frames (inclusive start, exclusive end).
pub fn render_frames(
    stage: &Stage,
    rasterizer: &mut CpuRasterizer,
    range: FrameRange,
) -> SwapmotionResult<Vec<FrameRGBA>> {
    let mut out = Vec::with_capacity(range.len_frames() as usize);
    for f in range.start.0..range.end.0 {
        out.push(render_frame(stage, rasterizer, FrameIndex(f))?);
    }
    Ok(out)
}

/// Render the whole stage and stream it into the ffmpeg encoder. Frames
/// are produced and consumed one at a time; nothing is buffered.
#[tracing::instrument(skip(stage, rasterizer))]
pub fn render_to_mp4(
    stage: &Stage,
    rasterizer: &mut CpuRasterizer,
    cfg: EncodeConfig,
) -> SwapmotionResult<()> {
    let range = stage.frames();
    let mut encoder = FfmpegEncoder::new(cfg, stage.background)?;
    for f in range.start.0..range.end.0 {
        let frame = render_frame(stage, rasterizer, FrameIndex(f))?;
        encoder.encode_frame(&frame)?;
    }
    encoder.finish()
}
