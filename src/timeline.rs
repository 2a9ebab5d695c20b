use std::collections::BTreeSet;

use crate::{
    core::{Point, Vec2},
    ease::Ease,
    error::{SwapmotionError, SwapmotionResult},
    scene::VisualObject,
};

/// One property change applied to one object over a step's duration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Transformation {
    /// Make the object fully visible at the step's start frame.
    Reveal,
    /// Opacity 0 -> 1 over the step duration.
    FadeIn,
    /// Opacity -> 0 over the step duration, with an optional positional
    /// drift applied while vanishing. Recorded anchors are unaffected.
    FadeOut { shift: Vec2 },
    /// Glide to an absolute destination. An object that has never been
    /// shown becomes visible at the step's start frame.
    MoveTo { to: Point },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Action {
    pub object: String,
    pub transformation: Transformation,
}

/// A synchronization barrier: every action starts at the step's start frame
/// and ends exactly `duration_units` later. The next entry is not
/// interpreted until all actions have completed.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Step {
    pub actions: Vec<Action>,
    pub duration_units: f64,
    pub ease: Ease,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Entry {
    /// Construct objects. Spawned objects are latent (fully transparent)
    /// until a step shows them.
    Spawn(Vec<VisualObject>),
    Play(Step),
    /// Pure clock advance, no visual change.
    Wait(f64),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub entries: Vec<Entry>,
}

impl Timeline {
    /// Walk the entries in declared order, tracking the spawned id set.
    /// Referencing an object before its `Spawn` is the one modeled error
    /// class and aborts the whole render.
    pub fn validate(&self) -> SwapmotionResult<()> {
        let mut spawned = BTreeSet::<&str>::new();

        for entry in &self.entries {
            match entry {
                Entry::Spawn(objects) => {
                    for obj in objects {
                        if obj.id.trim().is_empty() {
                            return Err(SwapmotionError::validation(
                                "object id must be non-empty",
                            ));
                        }
                        if !obj.size_px.is_finite() || obj.size_px <= 0.0 {
                            return Err(SwapmotionError::validation(format!(
                                "object '{}' has invalid size_px",
                                obj.id
                            )));
                        }
                        if !spawned.insert(obj.id.as_str()) {
                            return Err(SwapmotionError::validation(format!(
                                "duplicate object id '{}'",
                                obj.id
                            )));
                        }
                    }
                }
                Entry::Play(step) => {
                    if step.actions.is_empty() {
                        return Err(SwapmotionError::validation(
                            "step must have at least one action",
                        ));
                    }
                    if !step.duration_units.is_finite() || step.duration_units < 0.0 {
                        return Err(SwapmotionError::validation(
                            "step duration must be finite and >= 0",
                        ));
                    }
                    for action in &step.actions {
                        if !spawned.contains(action.object.as_str()) {
                            return Err(SwapmotionError::choreography(format!(
                                "object '{}' referenced before it was spawned",
                                action.object
                            )));
                        }
                    }
                }
                Entry::Wait(units) => {
                    if !units.is_finite() || *units < 0.0 {
                        return Err(SwapmotionError::validation(
                            "wait duration must be finite and >= 0",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Sum of all declared step durations and waits, in time units.
    pub fn total_units(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| match e {
                Entry::Spawn(_) => 0.0,
                Entry::Play(step) => step.duration_units,
                Entry::Wait(units) => *units,
            })
            .sum()
    }
}
