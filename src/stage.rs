use std::collections::BTreeMap;

use crate::{
    core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rgba8, Vec2},
    ease::Ease,
    error::{SwapmotionError, SwapmotionResult},
    scene::VisualObject,
    sequencer::SceneRenderer,
    timeline::{Step, Transformation},
    track::Track,
};

/// One object's compiled property tracks.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlyphTrack {
    pub object: VisualObject,
    pub pos: Track<Point>,
    pub opacity: Track<f64>,
}

/// The evaluable document: everything the rasterizer needs, on a frame
/// clock. Produced by replaying a timeline through [`StageRenderer`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Stage {
    pub canvas: Canvas,
    pub background: Rgba8,
    pub fps: Fps,
    pub duration: FrameIndex, // total frames
    pub glyphs: Vec<GlyphTrack>,
}

impl Stage {
    pub fn frames(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: self.duration,
        }
    }
}

struct Slot {
    object: VisualObject,
    pos: Track<Point>,
    opacity: Track<f64>,
    shown: bool,
}

/// Compiles replayed `spawn`/`play`/`wait` calls into keyframe tracks.
///
/// Each `play` is a barrier: every action keys the same start and end
/// frame, computed once from the logical clock, and the clock advances by
/// the step duration before the next call is interpreted.
pub struct StageRenderer {
    canvas: Canvas,
    background: Rgba8,
    fps: Fps,
    clock_units: f64,
    slots: Vec<Slot>,
    index: BTreeMap<String, usize>,
}

impl StageRenderer {
    pub fn new(canvas: Canvas, background: Rgba8, fps: Fps) -> Self {
        Self {
            canvas,
            background,
            fps,
            clock_units: 0.0,
            slots: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Seal the stage. Total duration is the clock position rounded to the
    /// frame grid, so the declared unit total maps exactly onto frames.
    pub fn finish(self) -> SwapmotionResult<Stage> {
        let duration = FrameIndex(self.fps.secs_to_frame_round(self.clock_units).0.max(1));

        let mut glyphs = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            slot.pos.validate()?;
            slot.opacity.validate()?;
            glyphs.push(GlyphTrack {
                object: slot.object,
                pos: slot.pos,
                opacity: slot.opacity,
            });
        }

        Ok(Stage {
            canvas: self.canvas,
            background: self.background,
            fps: self.fps,
            duration,
            glyphs,
        })
    }

    fn frame_now(&self) -> FrameIndex {
        self.fps.secs_to_frame_round(self.clock_units)
    }

    fn slot_mut(&mut self, id: &str) -> SwapmotionResult<&mut Slot> {
        let idx = *self.index.get(id).ok_or_else(|| {
            SwapmotionError::choreography(format!(
                "object '{id}' referenced before it was spawned"
            ))
        })?;
        Ok(&mut self.slots[idx])
    }
}

/// Re-key the current value at `frame` so the span since the previous key
/// stays constant and a change starting here becomes a step, not a
/// retroactive ramp.
fn pin_current<T: crate::track::Lerp + Clone>(
    track: &mut Track<T>,
    frame: FrameIndex,
) -> SwapmotionResult<()> {
    let current = track.last_value()?;
    track.push_key(frame, current, Ease::Linear)
}

impl SceneRenderer for StageRenderer {
    fn spawn(&mut self, object: &VisualObject) -> SwapmotionResult<()> {
        if self.index.contains_key(&object.id) {
            return Err(SwapmotionError::validation(format!(
                "duplicate object id '{}'",
                object.id
            )));
        }
        let frame = self.frame_now();
        self.index.insert(object.id.clone(), self.slots.len());
        self.slots.push(Slot {
            pos: Track::constant(frame, object.pos),
            opacity: Track::constant(frame, 0.0),
            object: object.clone(),
            shown: false,
        });
        Ok(())
    }

    fn play(&mut self, step: &Step) -> SwapmotionResult<()> {
        if !step.duration_units.is_finite() || step.duration_units < 0.0 {
            return Err(SwapmotionError::validation(
                "step duration must be finite and >= 0",
            ));
        }

        let start = self.frame_now();
        let end = self
            .fps
            .secs_to_frame_round(self.clock_units + step.duration_units);
        let ease = step.ease;

        for action in &step.actions {
            let slot = self.slot_mut(&action.object)?;
            match &action.transformation {
                Transformation::Reveal => {
                    pin_current(&mut slot.opacity, start)?;
                    slot.opacity.push_key(start, 1.0, Ease::Linear)?;
                    slot.shown = true;
                }
                Transformation::FadeIn => {
                    pin_current(&mut slot.opacity, start)?;
                    slot.opacity.push_key(start, 0.0, ease)?;
                    slot.opacity.push_key(end, 1.0, Ease::Linear)?;
                    slot.shown = true;
                }
                Transformation::FadeOut { shift } => {
                    let from = slot.opacity.last_value()?;
                    slot.opacity.push_key(start, from, ease)?;
                    slot.opacity.push_key(end, 0.0, Ease::Linear)?;
                    if *shift != Vec2::ZERO {
                        let from = slot.pos.last_value()?;
                        slot.pos.push_key(start, from, ease)?;
                        slot.pos.push_key(end, from + *shift, Ease::Linear)?;
                    }
                }
                Transformation::MoveTo { to } => {
                    let from = slot.pos.last_value()?;
                    slot.pos.push_key(start, from, ease)?;
                    slot.pos.push_key(end, *to, Ease::Linear)?;
                    // Latent objects enter the scene with their first
                    // animation, at full opacity.
                    if !slot.shown {
                        pin_current(&mut slot.opacity, start)?;
                        slot.opacity.push_key(start, 1.0, Ease::Linear)?;
                        slot.shown = true;
                    }
                }
            }
        }

        self.clock_units += step.duration_units;
        Ok(())
    }

    fn wait(&mut self, units: f64) -> SwapmotionResult<()> {
        if !units.is_finite() || units < 0.0 {
            return Err(SwapmotionError::validation(
                "wait duration must be finite and >= 0",
            ));
        }
        self.clock_units += units;
        Ok(())
    }
}
