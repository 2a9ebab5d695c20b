use std::collections::BTreeMap;

use crate::{
    core::{Canvas, Point, Rgba8, Vec2},
    error::{SwapmotionError, SwapmotionResult},
};

/// One renderable text glyph-run with a fully resolved position.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VisualObject {
    pub id: String,
    pub text: String,
    pub size_px: f64,
    pub color: Rgba8,
    /// Top-left of the laid-out glyph run, in canvas pixels.
    pub pos: Point,
    pub z: i32,
}

/// Text extent capability used to resolve relative placements. The real
/// implementation lays text out with Parley; tests and font-less timeline
/// dumps use [`ApproxMeasurer`].
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, size_px: f64) -> SwapmotionResult<(f64, f64)>;
}

/// Deterministic em-based estimate: advance 0.6 em per char, height 1.2 em.
#[derive(Clone, Copy, Debug)]
pub struct ApproxMeasurer;

impl TextMeasurer for ApproxMeasurer {
    fn measure(&mut self, text: &str, size_px: f64) -> SwapmotionResult<(f64, f64)> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SwapmotionError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let chars = text.chars().count() as f64;
        Ok((chars * size_px * 0.6, size_px * 1.2))
    }
}

/// Declarative position of an object, resolved once at scene build.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Placement {
    /// Fixed distance from the top-left corner of the frame.
    TopLeftCorner { margin: Vec2 },
    /// To the right of `anchor`, vertically centered against it.
    RightOf { anchor: String, gap: f64 },
    /// Under `anchor`, left edges aligned.
    Below { anchor: String, gap: f64 },
    /// Horizontally centered at the top edge of the frame.
    TopEdge { margin: f64 },
    /// Absolute position.
    At(Point),
}

/// Resolves declarative placements into [`VisualObject`]s with absolute
/// positions, measuring text extents through the injected capability.
pub struct SceneBuilder<'m> {
    canvas: Canvas,
    measurer: &'m mut dyn TextMeasurer,
    objects: Vec<VisualObject>,
    extents: BTreeMap<String, (f64, f64)>,
}

impl<'m> SceneBuilder<'m> {
    pub fn new(canvas: Canvas, measurer: &'m mut dyn TextMeasurer) -> Self {
        Self {
            canvas,
            measurer,
            objects: Vec::new(),
            extents: BTreeMap::new(),
        }
    }

    /// Resolve `placement` and record the object. Returns the resolved
    /// position so callers can capture it as an anchor.
    pub fn text(
        &mut self,
        id: impl Into<String>,
        text: impl Into<String>,
        size_px: f64,
        color: Rgba8,
        z: i32,
        placement: Placement,
    ) -> SwapmotionResult<Point> {
        let id = id.into();
        let text = text.into();
        if self.extents.contains_key(&id) {
            return Err(SwapmotionError::validation(format!(
                "duplicate object id '{id}'"
            )));
        }

        let (w, h) = self.measurer.measure(&text, size_px)?;
        let pos = self.resolve(&placement, w, h)?;

        self.extents.insert(id.clone(), (w, h));
        self.objects.push(VisualObject {
            id,
            text,
            size_px,
            color,
            pos,
            z,
        });
        Ok(pos)
    }

    pub fn position_of(&self, id: &str) -> SwapmotionResult<Point> {
        self.objects
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.pos)
            .ok_or_else(|| {
                SwapmotionError::choreography(format!("unknown anchor object '{id}'"))
            })
    }

    pub fn into_objects(self) -> Vec<VisualObject> {
        self.objects
    }

    fn resolve(&self, placement: &Placement, w: f64, h: f64) -> SwapmotionResult<Point> {
        match placement {
            Placement::TopLeftCorner { margin } => Ok(Point::new(margin.x, margin.y)),
            Placement::RightOf { anchor, gap } => {
                let (aw, ah) = self.extent_of(anchor)?;
                let apos = self.position_of(anchor)?;
                Ok(Point::new(
                    apos.x + aw + gap,
                    apos.y + (ah - h) / 2.0,
                ))
            }
            Placement::Below { anchor, gap } => {
                let (_, ah) = self.extent_of(anchor)?;
                let apos = self.position_of(anchor)?;
                Ok(Point::new(apos.x, apos.y + ah + gap))
            }
            Placement::TopEdge { margin } => Ok(Point::new(
                (f64::from(self.canvas.width) - w) / 2.0,
                *margin,
            )),
            Placement::At(p) => Ok(*p),
        }
    }

    fn extent_of(&self, id: &str) -> SwapmotionResult<(f64, f64)> {
        self.extents.get(id).copied().ok_or_else(|| {
            SwapmotionError::choreography(format!("unknown anchor object '{id}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas {
            width: 1000,
            height: 500,
        }
    }

    #[test]
    fn right_of_offsets_by_measured_width() {
        let mut m = ApproxMeasurer;
        let mut b = SceneBuilder::new(canvas(), &mut m);
        let label = b
            .text(
                "label",
                "a =",
                60.0,
                Rgba8::opaque(255, 255, 255),
                0,
                Placement::TopLeftCorner {
                    margin: Vec2::new(10.0, 20.0),
                },
            )
            .unwrap();
        assert_eq!(label, Point::new(10.0, 20.0));

        // "a =" is 3 chars at 0.6 em advance: width 108.
        let value = b
            .text(
                "value",
                "10",
                60.0,
                Rgba8::opaque(0, 0, 255),
                0,
                Placement::RightOf {
                    anchor: "label".to_string(),
                    gap: 12.0,
                },
            )
            .unwrap();
        assert_eq!(value.x, 10.0 + 108.0 + 12.0);
        assert_eq!(value.y, 20.0); // same height, centering is a no-op
    }

    #[test]
    fn below_aligns_left_edges() {
        let mut m = ApproxMeasurer;
        let mut b = SceneBuilder::new(canvas(), &mut m);
        b.text(
            "top",
            "a =",
            60.0,
            Rgba8::opaque(255, 255, 255),
            0,
            Placement::TopLeftCorner {
                margin: Vec2::new(10.0, 20.0),
            },
        )
        .unwrap();
        let below = b
            .text(
                "bottom",
                "b =",
                60.0,
                Rgba8::opaque(255, 255, 255),
                0,
                Placement::Below {
                    anchor: "top".to_string(),
                    gap: 30.0,
                },
            )
            .unwrap();
        assert_eq!(below, Point::new(10.0, 20.0 + 72.0 + 30.0));
    }

    #[test]
    fn top_edge_centers_horizontally() {
        let mut m = ApproxMeasurer;
        let mut b = SceneBuilder::new(canvas(), &mut m);
        // 10 chars at 48 px: width 288.
        let p = b
            .text(
                "code",
                "a, b = b,a",
                48.0,
                Rgba8::opaque(255, 255, 0),
                0,
                Placement::TopEdge { margin: 40.0 },
            )
            .unwrap();
        assert_eq!(p, Point::new((1000.0 - 288.0) / 2.0, 40.0));
    }

    #[test]
    fn unknown_anchor_is_a_choreography_error() {
        let mut m = ApproxMeasurer;
        let mut b = SceneBuilder::new(canvas(), &mut m);
        let err = b
            .text(
                "x",
                "10",
                60.0,
                Rgba8::opaque(0, 0, 0),
                0,
                Placement::RightOf {
                    anchor: "nope".to_string(),
                    gap: 1.0,
                },
            )
            .unwrap_err();
        assert!(matches!(err, SwapmotionError::Choreography(_)));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut m = ApproxMeasurer;
        let mut b = SceneBuilder::new(canvas(), &mut m);
        b.text(
            "x",
            "10",
            60.0,
            Rgba8::opaque(0, 0, 0),
            0,
            Placement::At(Point::ZERO),
        )
        .unwrap();
        assert!(
            b.text(
                "x",
                "20",
                60.0,
                Rgba8::opaque(0, 0, 0),
                0,
                Placement::At(Point::ZERO),
            )
            .is_err()
        );
    }
}
