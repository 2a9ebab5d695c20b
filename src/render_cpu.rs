use std::{collections::HashMap, sync::Arc};

use crate::{
    core::{Canvas, Rgba8},
    error::{SwapmotionError, SwapmotionResult},
    eval::EvaluatedFrame,
    render::FrameRGBA,
    text::{TextBrushRgba8, TextLayoutEngine},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    text: String,
    size_bits: u64,
    color: [u8; 4],
}

/// CPU rasterizer: evaluated glyph runs in, premultiplied RGBA8 out, via
/// `vello_cpu`. The scene is a fixed handful of strings, so shaped layouts
/// are cached by content.
pub struct CpuRasterizer {
    canvas: Canvas,
    background: Rgba8,
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    ctx: Option<vello_cpu::RenderContext>,
    layout_cache: HashMap<LayoutKey, Arc<parley::Layout<TextBrushRgba8>>>,
}

impl std::fmt::Debug for CpuRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRasterizer")
            .field("canvas", &self.canvas)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

impl CpuRasterizer {
    pub fn new(canvas: Canvas, background: Rgba8, font_bytes: Vec<u8>) -> SwapmotionResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(SwapmotionError::validation(
                "canvas width/height must be > 0",
            ));
        }
        if canvas.width > u32::from(u16::MAX) || canvas.height > u32::from(u16::MAX) {
            return Err(SwapmotionError::validation(
                "canvas dimensions exceed the CPU raster surface limit",
            ));
        }

        let engine = TextLayoutEngine::new(font_bytes)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(engine.font_bytes().to_vec()),
            0,
        );

        Ok(Self {
            canvas,
            background,
            engine,
            font,
            ctx: None,
            layout_cache: HashMap::new(),
        })
    }

    /// The layout engine doubles as the scene's text measurer, so placement
    /// and rasterization agree on metrics.
    pub fn engine_mut(&mut self) -> &mut TextLayoutEngine {
        &mut self.engine
    }

    #[tracing::instrument(skip(self, eval))]
    pub fn render_frame(&mut self, eval: &EvaluatedFrame) -> SwapmotionResult<FrameRGBA> {
        let w: u16 = self.canvas.width.try_into().unwrap_or(u16::MAX);
        let h: u16 = self.canvas.height.try_into().unwrap_or(u16::MAX);

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            self.background.r,
            self.background.g,
            self.background.b,
            self.background.a,
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));

        for glyph in &eval.glyphs {
            let layout = self.layout_for(&glyph.text, glyph.size_px, glyph.color)?;

            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                glyph.pos.x,
                glyph.pos.y,
            )));
            let opacity = glyph.opacity.clamp(0.0, 1.0) as f32;
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }

            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        let data = pixmap.data_as_u8_slice().to_vec();
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }

    fn layout_for(
        &mut self,
        text: &str,
        size_px: f64,
        color: Rgba8,
    ) -> SwapmotionResult<Arc<parley::Layout<TextBrushRgba8>>> {
        let key = LayoutKey {
            text: text.to_string(),
            size_bits: size_px.to_bits(),
            color: [color.r, color.g, color.b, color.a],
        };
        if let Some(layout) = self.layout_cache.get(&key) {
            return Ok(layout.clone());
        }

        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = Arc::new(self.engine.layout(text, size_px, brush)?);
        self.layout_cache.insert(key, layout.clone());
        Ok(layout)
    }
}
