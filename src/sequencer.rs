use crate::{
    choreography::Choreography,
    error::SwapmotionResult,
    scene::VisualObject,
    timeline::{Entry, Step},
};

/// The capability a timeline replays against. `play` blocks until every
/// action in the step has completed; `wait` advances the clock with no
/// visual change. Implementations: [`crate::stage::StageRenderer`] (frame
/// tracks), [`RecordingRenderer`] (call log).
pub trait SceneRenderer {
    fn spawn(&mut self, object: &VisualObject) -> SwapmotionResult<()>;
    fn play(&mut self, step: &Step) -> SwapmotionResult<()>;
    fn wait(&mut self, units: f64) -> SwapmotionResult<()>;
}

/// Replays a choreography, entry by entry, in declared order. The renderer
/// owns the clock; ordering is the single correctness-critical guarantee
/// here, so the interpreter is nothing more than a strict walk.
pub struct Sequencer;

impl Sequencer {
    #[tracing::instrument(skip(choreography, renderer))]
    pub fn run(
        choreography: &Choreography,
        renderer: &mut dyn SceneRenderer,
    ) -> SwapmotionResult<()> {
        choreography.validate()?;

        for entry in &choreography.timeline.entries {
            match entry {
                Entry::Spawn(objects) => {
                    for object in objects {
                        renderer.spawn(object)?;
                    }
                }
                Entry::Play(step) => renderer.play(step)?,
                Entry::Wait(units) => renderer.wait(*units)?,
            }
        }

        Ok(())
    }
}

/// One recorded renderer call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum RenderEvent {
    Spawn(String),
    Play {
        objects: Vec<String>,
        duration_units: f64,
    },
    Wait(f64),
}

/// A renderer that records calls instead of producing pixels. Substitutes
/// for the rasterizing pipeline in tests and golden inspections.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneRenderer for RecordingRenderer {
    fn spawn(&mut self, object: &VisualObject) -> SwapmotionResult<()> {
        self.events.push(RenderEvent::Spawn(object.id.clone()));
        Ok(())
    }

    fn play(&mut self, step: &Step) -> SwapmotionResult<()> {
        self.events.push(RenderEvent::Play {
            objects: step.actions.iter().map(|a| a.object.clone()).collect(),
            duration_units: step.duration_units,
        });
        Ok(())
    }

    fn wait(&mut self, units: f64) -> SwapmotionResult<()> {
        self.events.push(RenderEvent::Wait(units));
        Ok(())
    }
}
