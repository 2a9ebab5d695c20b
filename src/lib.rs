//! Swapmotion renders one fixed, scripted animation: two variables, `a = 10`
//! and `b = 20`, swapping their values on screen.
//!
//! # Pipeline overview
//!
//! 1. **Script**: [`choreography::swap_demo`] resolves the visual objects and
//!    the literal timeline (steps, waits, easings).
//! 2. **Replay**: [`Sequencer`] interprets the timeline, in strict declared
//!    order, against a [`SceneRenderer`] capability.
//! 3. **Compile**: [`StageRenderer`] turns the replayed calls into keyframe
//!    tracks on a frame clock ([`Stage`]).
//! 4. **Evaluate**: [`Evaluator`] samples the stage at a frame, yielding the
//!    visible glyph runs in painter's order.
//! 5. **Rasterize**: [`CpuRasterizer`] produces premultiplied RGBA8 pixels.
//! 6. **Encode** (optional): frames stream to the system `ffmpeg` binary.
//!
//! Evaluation and compilation are pure; replaying the identical script
//! produces identical frames for a given renderer version.

#![forbid(unsafe_code)]

pub mod choreography;
pub mod core;
pub mod ease;
pub mod encode_ffmpeg;
pub mod error;
pub mod eval;
pub mod render;
pub mod render_cpu;
pub mod scene;
pub mod sequencer;
pub mod stage;
pub mod text;
pub mod timeline;
pub mod track;

pub use choreography::{Choreography, swap_demo};
pub use crate::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rgba8, Vec2};
pub use ease::Ease;
pub use encode_ffmpeg::{EncodeConfig, FfmpegEncoder, default_mp4_config, is_ffmpeg_on_path};
pub use error::{SwapmotionError, SwapmotionResult};
pub use eval::{EvaluatedFrame, EvaluatedGlyph, Evaluator};
pub use render::{FrameRGBA, render_frame, render_frames, render_to_mp4};
pub use render_cpu::CpuRasterizer;
pub use scene::{ApproxMeasurer, Placement, SceneBuilder, TextMeasurer, VisualObject};
pub use sequencer::{RecordingRenderer, RenderEvent, SceneRenderer, Sequencer};
pub use stage::{GlyphTrack, Stage, StageRenderer};
pub use text::{TextLayoutEngine, find_system_font};
pub use timeline::{Action, Entry, Step, Timeline, Transformation};
pub use track::{InterpMode, Keyframe, Lerp, Track};
