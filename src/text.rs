use std::path::PathBuf;

use crate::{
    error::{SwapmotionError, SwapmotionResult},
    scene::TextMeasurer,
};

/// RGBA8 brush color carried through Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Stateful helper for building Parley text layouts from one font, loaded
/// from raw bytes at construction. Also the real [`TextMeasurer`]: scene
/// placement and rasterization share the same metrics.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_bytes: Vec<u8>,
}

impl TextLayoutEngine {
    pub fn new(font_bytes: Vec<u8>) -> SwapmotionResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SwapmotionError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SwapmotionError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_bytes,
        })
    }

    /// Raw bytes of the registered font (the rasterizer builds its glyph
    /// source from these).
    pub fn font_bytes(&self) -> &[u8] {
        &self.font_bytes
    }

    /// Shape and lay out a single-line glyph run.
    pub fn layout(
        &mut self,
        text: &str,
        size_px: f64,
        brush: TextBrushRgba8,
    ) -> SwapmotionResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SwapmotionError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasurer for TextLayoutEngine {
    fn measure(&mut self, text: &str, size_px: f64) -> SwapmotionResult<(f64, f64)> {
        let layout = self.layout(text, size_px, TextBrushRgba8::default())?;
        Ok((f64::from(layout.width()), f64::from(layout.height())))
    }
}

/// Locate a usable font without configuration: the `SWAPMOTION_FONT`
/// environment variable, then a handful of conventional system paths.
/// Used by the CLI default and the raster smoke tests.
pub fn find_system_font() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SWAPMOTION_FONT") {
        let p = PathBuf::from(path);
        if p.is_file() {
            return Some(p);
        }
    }

    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}
