use crate::{
    core::{FrameIndex, Point, Rgba8},
    error::{SwapmotionError, SwapmotionResult},
    stage::Stage,
};

#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedFrame {
    pub frame: FrameIndex,
    /// Visible glyph runs in painter's order.
    pub glyphs: Vec<EvaluatedGlyph>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedGlyph {
    pub id: String,
    pub text: String,
    pub size_px: f64,
    pub color: Rgba8,
    pub pos: Point,
    pub opacity: f64, // 0..1, never 0 (fully transparent glyphs are dropped)
    pub z: i32,
}

pub struct Evaluator;

impl Evaluator {
    #[tracing::instrument(skip(stage))]
    pub fn eval_frame(stage: &Stage, frame: FrameIndex) -> SwapmotionResult<EvaluatedFrame> {
        if frame.0 >= stage.duration.0 {
            return Err(SwapmotionError::evaluation("frame is out of bounds"));
        }

        let mut glyphs_with_key: Vec<((i32, usize), EvaluatedGlyph)> = Vec::new();

        for (spawn_order, track) in stage.glyphs.iter().enumerate() {
            let opacity = track.opacity.sample(frame)?.clamp(0.0, 1.0);
            if opacity <= 0.0 {
                continue;
            }
            let pos = track.pos.sample(frame)?;
            glyphs_with_key.push(((track.object.z, spawn_order), EvaluatedGlyph {
                id: track.object.id.clone(),
                text: track.object.text.clone(),
                size_px: track.object.size_px,
                color: track.object.color,
                pos,
                opacity,
                z: track.object.z,
            }));
        }

        glyphs_with_key.sort_by(|a, b| a.0.cmp(&b.0));
        let glyphs = glyphs_with_key.into_iter().map(|(_, g)| g).collect();

        Ok(EvaluatedFrame { frame, glyphs })
    }
}
