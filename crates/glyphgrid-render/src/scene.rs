#![forbid(unsafe_code)]

//! Scene: layer stack plus the drawing facade.
//!
//! Draw calls take [`ColorRef`]s and option structs, resolve every colour
//! once at call entry, then route into the active layer. An unknown colour
//! or a missing active layer therefore fails before any cell is touched.
//!
//! A new scene starts with one layer, [`Scene::BASE_LAYER`], selected.

use glyphgrid_core::geometry::{GridGeometry, Rect, Size};

use crate::buffer::Buffer;
use crate::cell::{Cell, PackedRgba};
use crate::color::{ColorRef, resolve_opt};
use crate::drawing::{Align, BorderStyle, Draw};
use crate::error::RenderError;
use crate::layer::{Layer, LayerError, LayerStack};

/// Foreground/background pair as written by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Colors {
    pub fg: Option<ColorRef>,
    pub bg: Option<ColorRef>,
}

impl Colors {
    pub fn new(fg: Option<ColorRef>, bg: Option<ColorRef>) -> Self {
        Self { fg, bg }
    }

    pub fn fg(fg: impl Into<ColorRef>) -> Self {
        Self {
            fg: Some(fg.into()),
            bg: None,
        }
    }

    #[must_use]
    pub fn with_bg(mut self, bg: impl Into<ColorRef>) -> Self {
        self.bg = Some(bg.into());
        self
    }

    /// Fail with [`ColorError::UnknownColor`](crate::color::ColorError) if
    /// either colour does not resolve. Composite draws call this for every
    /// pair they will use before touching the scene.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.resolve().map(|_| ())
    }

    fn resolve(&self) -> Result<(Option<PackedRgba>, Option<PackedRgba>), RenderError> {
        Ok((resolve_opt(self.fg.as_ref())?, resolve_opt(self.bg.as_ref())?))
    }

    /// A template cell carrying the resolved colours.
    fn cell(&self, glyph: char) -> Result<Cell, RenderError> {
        let (fg, bg) = self.resolve()?;
        Ok(Cell::new(glyph, fg, bg))
    }
}

/// Options for [`Scene::line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOptions {
    /// Default `'*'`.
    pub glyph: char,
    pub colors: Colors,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            glyph: '*',
            colors: Colors::default(),
        }
    }
}

/// Options for [`Scene::fill`] and box interiors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Default `' '`.
    pub glyph: char,
    pub colors: Colors,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            glyph: ' ',
            colors: Colors::default(),
        }
    }
}

/// Options for [`Scene::draw_box`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxOptions {
    /// Default single-line.
    pub style: BorderStyle,
    /// Border colours.
    pub colors: Colors,
    /// Interior fill; `None` leaves the interior untouched.
    pub fill: Option<FillOptions>,
    pub title: Option<String>,
    /// Default centred.
    pub title_align: Align,
    /// Title colours; `None` reuses the border colours.
    pub title_colors: Option<Colors>,
}

impl BoxOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Grid state an application draws into.
#[derive(Debug, Clone)]
pub struct Scene {
    geometry: GridGeometry,
    layers: LayerStack,
}

impl Scene {
    /// Layer created and selected by [`Scene::new`].
    pub const BASE_LAYER: &'static str = "base";

    /// # Panics
    ///
    /// Panics if either grid dimension is 0.
    pub fn new(geometry: GridGeometry) -> Self {
        let mut layers = LayerStack::new(geometry.grid);
        layers.select(Self::BASE_LAYER);
        Self { geometry, layers }
    }

    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.geometry.grid
    }

    #[inline]
    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    #[inline]
    pub fn layers_mut(&mut self) -> &mut LayerStack {
        &mut self.layers
    }

    // --- layers ---

    /// Select (creating on top if needed) the layer that receives draws.
    pub fn layer(&mut self, name: &str) -> &mut Self {
        self.layers.select(name);
        self
    }

    pub fn remove_layer(&mut self, name: &str) -> Result<(), RenderError> {
        self.layers.remove(name)?;
        Ok(())
    }

    pub fn set_layer_visible(&mut self, name: &str, visible: bool) -> Result<(), RenderError> {
        Ok(self.layers.set_visible(name, visible)?)
    }

    /// Layer names bottom → top.
    pub fn layer_order(&self) -> Vec<&str> {
        self.layers.order().collect()
    }

    pub fn active_layer(&self) -> Result<&Layer, LayerError> {
        self.layers.active()
    }

    fn target(&mut self) -> Result<&mut Buffer, RenderError> {
        Ok(self.layers.active_buffer_mut()?)
    }

    /// Clear the active layer.
    pub fn clear(&mut self) -> Result<(), RenderError> {
        self.target()?.clear();
        Ok(())
    }

    /// Clear every layer.
    pub fn clear_all(&mut self) {
        self.layers.clear_all();
    }

    // --- reads ---

    /// Cell of the active layer.
    pub fn cell(&self, x: i32, y: i32) -> Result<Option<Cell>, LayerError> {
        Ok(self.layers.active()?.buffer().get(x, y).copied())
    }

    /// Anchor covering `(x, y)` in the active layer.
    pub fn anchor_of(&self, x: i32, y: i32) -> Result<Option<(u16, u16)>, LayerError> {
        Ok(self.layers.active()?.buffer().anchor_of(x, y))
    }

    // --- cells ---

    pub fn set_cell(&mut self, x: i32, y: i32, glyph: char, colors: &Colors) -> Result<(), RenderError> {
        let cell = colors.cell(glyph)?;
        self.target()?.set(x, y, cell);
        Ok(())
    }

    pub fn set_cell_scaled(
        &mut self,
        x: i32,
        y: i32,
        scale: u8,
        glyph: char,
        colors: &Colors,
    ) -> Result<(), RenderError> {
        let cell = colors.cell(glyph)?;
        self.target()?.set_scaled(x, y, scale, cell);
        Ok(())
    }

    // --- primitives ---

    /// Fill a rectangle, clipped to the grid.
    pub fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, opts: &FillOptions) -> Result<(), RenderError> {
        let cell = opts.colors.cell(opts.glyph)?;
        self.target()?.draw_rect_filled(Rect::new(x, y, w, h), cell);
        Ok(())
    }

    /// Bresenham line; a no-op unless both endpoints are in the grid.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, opts: &LineOptions) -> Result<(), RenderError> {
        let cell = opts.colors.cell(opts.glyph)?;
        self.target()?.draw_line(x1, y1, x2, y2, cell);
        Ok(())
    }

    /// Bordered box with optional fill and title.
    ///
    /// Zero or negative sizes and boxes not fully inside the grid draw
    /// nothing.
    pub fn draw_box(&mut self, x: i32, y: i32, w: i32, h: i32, opts: &BoxOptions) -> Result<(), RenderError> {
        let border = opts.colors.cell(' ')?;
        let fill = opts
            .fill
            .as_ref()
            .map(|f| f.colors.cell(f.glyph))
            .transpose()?;
        let title_cell = match &opts.title_colors {
            Some(c) => c.cell(' ')?,
            None => border,
        };

        let rect = Rect::new(x, y, w, h);
        let target = self.target()?;
        target.draw_box(rect, opts.style.chars(), border, fill);
        if let Some(title) = &opts.title {
            target.draw_title(rect, title, opts.title_align, title_cell);
        }
        Ok(())
    }

    /// Text left to right, clipped per character.
    pub fn text(&mut self, x: i32, y: i32, text: &str, colors: &Colors) -> Result<(), RenderError> {
        let cell = colors.cell(' ')?;
        self.target()?.print_text(x, y, text, cell);
        Ok(())
    }

    /// Text centred horizontally on row `y`.
    pub fn center_text(&mut self, y: i32, text: &str, colors: &Colors) -> Result<(), RenderError> {
        let cell = colors.cell(' ')?;
        self.target()?.print_centered(y, text, cell);
        Ok(())
    }

    /// One glyph covering a `scale × scale` block.
    pub fn scaled_char(
        &mut self,
        x: i32,
        y: i32,
        scale: u8,
        glyph: char,
        colors: &Colors,
    ) -> Result<(), RenderError> {
        self.set_cell_scaled(x, y, scale, glyph, colors)
    }

    /// Text with every glyph scaled; the cursor advances `scale` per glyph.
    pub fn scaled_text(
        &mut self,
        x: i32,
        y: i32,
        scale: u8,
        text: &str,
        colors: &Colors,
    ) -> Result<(), RenderError> {
        let cell = colors.cell(' ')?;
        self.target()?.print_scaled(x, y, scale, text, cell);
        Ok(())
    }

    /// Recolour an area without changing glyphs.
    pub fn paint(&mut self, x: i32, y: i32, w: i32, h: i32, colors: &Colors) -> Result<(), RenderError> {
        let (fg, bg) = colors.resolve()?;
        self.target()?.paint_area(Rect::new(x, y, w, h), fg, bg);
        Ok(())
    }
}
