//! The fixed swap-demonstration script.
//!
//! Shows `a = 10` and `b = 20`, the code line `a, b = b, a`, then swaps the
//! two values visually: the originals are taken from their slots, copies
//! glide across, and the final values settle in the success color.

use crate::{
    core::{Canvas, Point, Rgba8, Vec2},
    ease::Ease,
    error::SwapmotionResult,
    scene::{Placement, SceneBuilder, TextMeasurer, VisualObject},
    timeline::{Action, Entry, Step, Timeline, Transformation},
};

pub const CANVAS: Canvas = Canvas {
    width: 1920,
    height: 1080,
};
pub const BACKGROUND: Rgba8 = Rgba8::opaque(0, 0, 0);

pub const COLOR_LABEL: Rgba8 = Rgba8::opaque(0xff, 0xff, 0xff);
pub const COLOR_VALUE_A: Rgba8 = Rgba8::opaque(0x58, 0xc4, 0xdd);
pub const COLOR_VALUE_B: Rgba8 = Rgba8::opaque(0x9a, 0x72, 0xac);
pub const COLOR_CODE: Rgba8 = Rgba8::opaque(0xff, 0xff, 0x00);
pub const COLOR_SUCCESS: Rgba8 = Rgba8::opaque(0x83, 0xc1, 0x67);

pub const FONT_SIZE_VALUE: f64 = 60.0;
pub const FONT_SIZE_CODE: f64 = 48.0;

// Layout module: an 8-row grid on the 1080 px frame.
const GRID_PX: f64 = 135.0;
const CORNER_MARGIN: Vec2 = Vec2::new(GRID_PX * 0.5, GRID_PX * 0.5);
const VALUE_GAP: f64 = GRID_PX * 0.2;
const ROW_GAP: f64 = GRID_PX;
const TOP_MARGIN: f64 = GRID_PX * 0.5;
const FADE_SHIFT: Vec2 = Vec2::new(-GRID_PX * 0.5, 0.0);

const FADE_OUT_UNITS: f64 = 0.8;
const MOVE_UNITS: f64 = 1.8;
const CROSSFADE_UNITS: f64 = 1.0;

const REVEAL_HOLD: f64 = 1.0;
const CODE_HOLD: f64 = 1.5;
const FADE_OUT_HOLD: f64 = 0.5;
const MOVE_HOLD: f64 = 0.8;
const FINAL_HOLD: f64 = 2.0;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Choreography {
    pub canvas: Canvas,
    pub background: Rgba8,
    pub timeline: Timeline,
}

impl Choreography {
    pub fn validate(&self) -> SwapmotionResult<()> {
        self.timeline.validate()
    }

    /// Look up a spawned object by id.
    pub fn object(&self, id: &str) -> Option<&VisualObject> {
        self.timeline.entries.iter().find_map(|e| match e {
            Entry::Spawn(objects) => objects.iter().find(|o| o.id == id),
            _ => None,
        })
    }
}

/// Build the swap script against measured text extents. Positions are
/// resolved here, once; every later reference to "a's slot" or "b's slot"
/// uses the anchors captured from this resolution.
pub fn swap_demo(measurer: &mut dyn TextMeasurer) -> SwapmotionResult<Choreography> {
    let mut builder = SceneBuilder::new(CANVAS, measurer);

    builder.text(
        "a_label",
        "a =",
        FONT_SIZE_VALUE,
        COLOR_LABEL,
        0,
        Placement::TopLeftCorner {
            margin: CORNER_MARGIN,
        },
    )?;
    let a_anchor = builder.text(
        "a_value",
        "10",
        FONT_SIZE_VALUE,
        COLOR_VALUE_A,
        0,
        Placement::RightOf {
            anchor: "a_label".to_string(),
            gap: VALUE_GAP,
        },
    )?;
    builder.text(
        "b_label",
        "b =",
        FONT_SIZE_VALUE,
        COLOR_LABEL,
        0,
        Placement::Below {
            anchor: "a_label".to_string(),
            gap: ROW_GAP,
        },
    )?;
    let b_anchor = builder.text(
        "b_value",
        "20",
        FONT_SIZE_VALUE,
        COLOR_VALUE_B,
        0,
        Placement::RightOf {
            anchor: "b_label".to_string(),
            gap: VALUE_GAP,
        },
    )?;
    builder.text(
        "swap_code",
        "a, b = b, a",
        FONT_SIZE_CODE,
        COLOR_CODE,
        0,
        Placement::TopEdge { margin: TOP_MARGIN },
    )?;

    let mut objects = builder.into_objects();
    let code_line = objects.split_off(4).remove(0);
    let initial = objects; // a_label, a_value, b_label, b_value
    let a_value = initial[1].clone();
    let b_value = initial[3].clone();

    // Copies that visually carry the values across; the originals' resolved
    // positions stay recorded in `a_anchor` / `b_anchor`.
    let a_copy = VisualObject {
        id: "a_value_copy".to_string(),
        z: 1,
        ..a_value.clone()
    };
    let b_copy = VisualObject {
        id: "b_value_copy".to_string(),
        z: 1,
        ..b_value.clone()
    };

    let a_final = VisualObject {
        id: "a_value_final".to_string(),
        text: "20".to_string(),
        size_px: FONT_SIZE_VALUE,
        color: COLOR_SUCCESS,
        pos: a_anchor,
        z: 1,
    };
    let b_final = VisualObject {
        id: "b_value_final".to_string(),
        text: "10".to_string(),
        size_px: FONT_SIZE_VALUE,
        color: COLOR_SUCCESS,
        pos: b_anchor,
        z: 1,
    };

    let entries = vec![
        Entry::Spawn(initial),
        Entry::Play(Step {
            actions: vec![
                reveal("a_label"),
                reveal("a_value"),
                reveal("b_label"),
                reveal("b_value"),
            ],
            duration_units: 0.0,
            ease: Ease::Linear,
        }),
        Entry::Wait(REVEAL_HOLD),
        Entry::Spawn(vec![code_line]),
        Entry::Play(Step {
            actions: vec![reveal("swap_code")],
            duration_units: 0.0,
            ease: Ease::Linear,
        }),
        Entry::Wait(CODE_HOLD),
        Entry::Spawn(vec![a_copy, b_copy]),
        Entry::Play(Step {
            actions: vec![
                fade_out("a_value", FADE_SHIFT),
                fade_out("b_value", FADE_SHIFT),
            ],
            duration_units: FADE_OUT_UNITS,
            ease: Ease::Smooth,
        }),
        Entry::Wait(FADE_OUT_HOLD),
        Entry::Play(Step {
            actions: vec![
                move_to("a_value_copy", b_anchor),
                move_to("b_value_copy", a_anchor),
            ],
            duration_units: MOVE_UNITS,
            ease: Ease::Smooth,
        }),
        Entry::Wait(MOVE_HOLD),
        Entry::Spawn(vec![a_final, b_final]),
        Entry::Play(Step {
            actions: vec![
                // The vanishing copies have already arrived; only opacity
                // animates here.
                fade_out("a_value_copy", Vec2::ZERO),
                fade_out("b_value_copy", Vec2::ZERO),
                fade_in("a_value_final"),
                fade_in("b_value_final"),
            ],
            duration_units: CROSSFADE_UNITS,
            ease: Ease::Smooth,
        }),
        Entry::Wait(FINAL_HOLD),
    ];

    let choreography = Choreography {
        canvas: CANVAS,
        background: BACKGROUND,
        timeline: Timeline { entries },
    };
    choreography.validate()?;
    Ok(choreography)
}

fn reveal(id: &str) -> Action {
    Action {
        object: id.to_string(),
        transformation: Transformation::Reveal,
    }
}

fn fade_in(id: &str) -> Action {
    Action {
        object: id.to_string(),
        transformation: Transformation::FadeIn,
    }
}

fn fade_out(id: &str, shift: Vec2) -> Action {
    Action {
        object: id.to_string(),
        transformation: Transformation::FadeOut { shift },
    }
}

fn move_to(id: &str, to: Point) -> Action {
    Action {
        object: id.to_string(),
        transformation: Transformation::MoveTo { to },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ApproxMeasurer;

    fn demo() -> Choreography {
        swap_demo(&mut ApproxMeasurer).unwrap()
    }

    #[test]
    fn total_declared_duration_is_nine_point_four_units() {
        assert!((demo().timeline.total_units() - 9.4).abs() < 1e-12);
    }

    #[test]
    fn copies_are_distinct_objects_at_original_positions() {
        let c = demo();
        let a_value = c.object("a_value").unwrap();
        let a_copy = c.object("a_value_copy").unwrap();
        assert_ne!(a_value.id, a_copy.id);
        assert_eq!(a_value.pos, a_copy.pos);
        assert_eq!(a_value.text, a_copy.text);
        assert_eq!(a_value.color, a_copy.color);
    }

    #[test]
    fn final_values_sit_on_the_original_slots_in_success_color() {
        let c = demo();
        let a_anchor = c.object("a_value").unwrap().pos;
        let b_anchor = c.object("b_value").unwrap().pos;

        let a_final = c.object("a_value_final").unwrap();
        let b_final = c.object("b_value_final").unwrap();
        assert_eq!(a_final.text, "20");
        assert_eq!(a_final.pos, a_anchor);
        assert_eq!(a_final.color, COLOR_SUCCESS);
        assert_eq!(b_final.text, "10");
        assert_eq!(b_final.pos, b_anchor);
        assert_eq!(b_final.color, COLOR_SUCCESS);
    }

    #[test]
    fn copies_cross_to_each_others_slots() {
        let c = demo();
        let a_anchor = c.object("a_value").unwrap().pos;
        let b_anchor = c.object("b_value").unwrap().pos;

        let move_step = c
            .timeline
            .entries
            .iter()
            .find_map(|e| match e {
                Entry::Play(s) if s.duration_units == MOVE_UNITS => Some(s),
                _ => None,
            })
            .unwrap();
        for action in &move_step.actions {
            match (&action.object[..], &action.transformation) {
                ("a_value_copy", Transformation::MoveTo { to }) => assert_eq!(*to, b_anchor),
                ("b_value_copy", Transformation::MoveTo { to }) => assert_eq!(*to, a_anchor),
                other => panic!("unexpected move action: {other:?}"),
            }
        }
    }

    #[test]
    fn script_passes_validation() {
        demo().validate().unwrap();
    }
}
