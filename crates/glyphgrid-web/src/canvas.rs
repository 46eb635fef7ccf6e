#![forbid(unsafe_code)]

//! [`Surface`] over an HTML canvas 2D context.

use glyphgrid_core::geometry::{GridGeometry, PixelRect};
use glyphgrid_render::cell::PackedRgba;
use glyphgrid_render::painter::{GlyphDraw, Surface, SurfaceError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::style::{css_color, font_string, glyph_origin};

fn backend(err: JsValue) -> SurfaceError {
    SurfaceError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Paints fills and glyphs with `fillRect` / `fillText`.
///
/// The last fill style and font are cached so runs of same-coloured cells
/// do not re-set context state.
#[derive(Debug)]
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    fill_style: Option<PackedRgba>,
    font: Option<(u32, String)>,
}

impl CanvasSurface {
    /// Wrap an existing 2D context.
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        Self {
            ctx,
            fill_style: None,
            font: None,
        }
    }

    /// Size `canvas` for `geometry` and take its 2D context.
    pub fn from_canvas(canvas: &HtmlCanvasElement, geometry: &GridGeometry) -> Result<Self, SurfaceError> {
        let (w, h) = geometry.pixel_size();
        canvas.set_width(w);
        canvas.set_height(h);
        let ctx = canvas
            .get_context("2d")
            .map_err(backend)?
            .ok_or(SurfaceError::ContextLost)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Backend("2d context has unexpected type".into()))?;
        Ok(Self::new(ctx))
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Forget cached context state, e.g. after the host touched the context.
    pub fn reset_cache(&mut self) {
        self.fill_style = None;
        self.font = None;
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
    }

    fn set_fill(&mut self, color: PackedRgba) {
        if self.fill_style != Some(color) {
            self.ctx.set_fill_style_str(&css_color(color));
            self.fill_style = Some(color);
        }
    }

    fn set_font(&mut self, px: f32, family: &str) {
        let key = px.to_bits();
        let same = matches!(&self.font, Some((k, f)) if *k == key && f == family);
        if !same {
            self.ctx.set_font(&font_string(px, family));
            self.font = Some((key, family.to_owned()));
        }
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) -> Result<(), SurfaceError> {
        self.set_fill(color);
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &GlyphDraw<'_>) -> Result<(), SurfaceError> {
        self.set_font(glyph.font_px, glyph.font_family);
        self.set_fill(glyph.color);
        let (x, y) = glyph_origin(glyph.rect);
        let mut buf = [0u8; 4];
        self.ctx
            .fill_text(glyph.glyph.encode_utf8(&mut buf), x, y)
            .map_err(backend)
    }
}
