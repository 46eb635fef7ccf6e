#![forbid(unsafe_code)]

//! Canvas painter.
//!
//! Turns the dirty cells of a resolved grid into pixel-rect fills and glyph
//! draws on a [`Surface`]. For each dirty coordinate:
//!
//! 1. Occupied markers are skipped; their anchor paints the whole block.
//! 2. The cell's pixel rect (`scale × scale` cells for anchors) is filled
//!    with the cell background, or the default background.
//! 3. Unless the glyph is blank, it is drawn in the cell foreground (or the
//!    default foreground) with the font size multiplied by the scale.

use std::fmt;

use glyphgrid_core::geometry::{GridGeometry, PixelRect};

use crate::buffer::Buffer;
use crate::cell::{CellContent, PackedRgba};
use crate::diff::BufferDiff;

/// Painter output failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The drawing context is gone (canvas detached, context lost).
    ContextLost,
    /// Backend-specific failure.
    Backend(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextLost => write!(f, "surface context lost"),
            Self::Backend(msg) => write!(f, "surface error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// One glyph draw request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphDraw<'a> {
    pub glyph: char,
    /// Pixel rect the glyph should cover.
    pub rect: PixelRect,
    pub font_family: &'a str,
    /// Font size in pixels, already multiplied by the cell scale.
    pub font_px: f32,
    pub color: PackedRgba,
}

/// Pixel output target.
pub trait Surface {
    /// Fill a pixel rectangle with a solid colour.
    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) -> Result<(), SurfaceError>;

    /// Draw one glyph inside its rect.
    fn draw_glyph(&mut self, glyph: &GlyphDraw<'_>) -> Result<(), SurfaceError>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) -> Result<(), SurfaceError> {
        (**self).fill_rect(rect, color)
    }

    fn draw_glyph(&mut self, glyph: &GlyphDraw<'_>) -> Result<(), SurfaceError> {
        (**self).draw_glyph(glyph)
    }
}

/// Counts from one paint pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Dirty cells that produced a background fill.
    pub cells_painted: u32,
    pub glyphs_drawn: u32,
    /// Dirty markers skipped in favour of their anchor.
    pub markers_skipped: u32,
}

/// Paints dirty cells with fixed defaults and font.
#[derive(Debug, Clone)]
pub struct CanvasPainter {
    geometry: GridGeometry,
    default_fg: PackedRgba,
    default_bg: PackedRgba,
    font_family: String,
    font_px: f32,
}

impl CanvasPainter {
    pub fn new(
        geometry: GridGeometry,
        default_fg: PackedRgba,
        default_bg: PackedRgba,
        font_family: impl Into<String>,
        font_px: f32,
    ) -> Self {
        Self {
            geometry,
            default_fg,
            default_bg,
            font_family: font_family.into(),
            font_px,
        }
    }

    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    #[inline]
    pub fn default_fg(&self) -> PackedRgba {
        self.default_fg
    }

    #[inline]
    pub fn default_bg(&self) -> PackedRgba {
        self.default_bg
    }

    /// Paint every dirty cell of `grid`.
    ///
    /// Stops at the first surface error.
    pub fn paint<S: Surface + ?Sized>(
        &self,
        grid: &Buffer,
        diff: &BufferDiff,
        surface: &mut S,
    ) -> Result<PaintStats, SurfaceError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("paint", dirty = diff.len());
        #[cfg(feature = "tracing")]
        let _guard = _span.enter();

        let mut stats = PaintStats::default();
        for (x, y) in diff.iter() {
            let cell = grid.get_unchecked(x, y);
            let glyph = match cell.content {
                CellContent::Occupied { .. } => {
                    stats.markers_skipped += 1;
                    continue;
                }
                CellContent::Glyph(c) => c,
            };

            let scale = cell.scale.max(1);
            let rect = self.geometry.cell_rect(x, y, scale);
            surface.fill_rect(rect, cell.bg.unwrap_or(self.default_bg))?;
            stats.cells_painted += 1;

            if glyph == ' ' {
                continue;
            }
            surface.draw_glyph(&GlyphDraw {
                glyph,
                rect,
                font_family: &self.font_family,
                font_px: self.font_px * f32::from(scale),
                color: cell.fg.unwrap_or(self.default_fg),
            })?;
            stats.glyphs_drawn += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            painted = stats.cells_painted,
            glyphs = stats.glyphs_drawn,
            "paint complete"
        );

        Ok(stats)
    }
}

/// In-memory RGBA framebuffer.
///
/// Glyphs are painted as a solid ink box covering the middle half of their
/// rect, which is enough to assert on colours and placement in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl PixelSurface {
    /// A transparent framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PackedRgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Framebuffer sized for a grid.
    pub fn for_geometry(geometry: GridGeometry) -> Self {
        let (w, h) = geometry.pixel_size();
        Self::new(w, h)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PackedRgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Blend `color` over the pixels of `rect`, clipped to the framebuffer.
    fn blend(&mut self, rect: PixelRect, color: PackedRgba) {
        let x1 = rect.x.saturating_add(rect.width).min(self.width);
        let y1 = rect.y.saturating_add(rect.height).min(self.height);
        for y in rect.y..y1 {
            let row = y as usize * self.width as usize;
            for x in rect.x..x1 {
                let p = &mut self.pixels[row + x as usize];
                *p = color.over(*p);
            }
        }
    }
}

impl Surface for PixelSurface {
    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) -> Result<(), SurfaceError> {
        // Cell backgrounds replace what was there; blending happens only for ink.
        let x1 = rect.x.saturating_add(rect.width).min(self.width);
        let y1 = rect.y.saturating_add(rect.height).min(self.height);
        for y in rect.y..y1 {
            let row = y as usize * self.width as usize;
            self.pixels[row + rect.x.min(x1) as usize..row + x1 as usize].fill(color);
        }
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &GlyphDraw<'_>) -> Result<(), SurfaceError> {
        let r = glyph.rect;
        let ink = PixelRect::new(r.x + r.width / 4, r.y + r.height / 4, r.width / 2, r.height / 2);
        self.blend(ink, glyph.color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::headless::{DrawOp, RecordingSurface};
    use glyphgrid_core::geometry::Size;

    const FG: PackedRgba = PackedRgba::WHITE;
    const BG: PackedRgba = PackedRgba::BLACK;
    const RED: PackedRgba = PackedRgba::rgb(205, 0, 0);

    fn painter(w: u16, h: u16) -> CanvasPainter {
        CanvasPainter::new(GridGeometry::new(Size::new(w, h), 10, 20), FG, BG, "monospace", 16.0)
    }

    #[test]
    fn fills_then_draws_glyph_with_defaults() {
        let mut grid = Buffer::new(4, 2);
        grid.set(1, 1, Cell::from_char('x'));
        let diff = BufferDiff::compute(&Buffer::new(4, 2), &grid);

        let mut surface = RecordingSurface::new();
        let stats = painter(4, 2).paint(&grid, &diff, &mut surface).unwrap();

        assert_eq!(
            surface.ops(),
            &[
                DrawOp::FillRect {
                    rect: PixelRect::new(10, 20, 10, 20),
                    color: BG
                },
                DrawOp::Glyph {
                    glyph: 'x',
                    rect: PixelRect::new(10, 20, 10, 20),
                    font_px: 16.0,
                    color: FG
                },
            ]
        );
        assert_eq!(stats.cells_painted, 1);
        assert_eq!(stats.glyphs_drawn, 1);
    }

    #[test]
    fn blank_glyph_only_fills() {
        let mut grid = Buffer::new(2, 1);
        grid.set(0, 0, Cell::new(' ', None, Some(RED)));
        let diff = BufferDiff::compute(&Buffer::new(2, 1), &grid);

        let mut surface = RecordingSurface::new();
        painter(2, 1).paint(&grid, &diff, &mut surface).unwrap();
        assert_eq!(
            surface.ops(),
            &[DrawOp::FillRect {
                rect: PixelRect::new(0, 0, 10, 20),
                color: RED
            }]
        );
    }

    #[test]
    fn scaled_anchor_paints_once_and_markers_skip() {
        let mut grid = Buffer::new(4, 4);
        grid.set_scaled(0, 0, 2, Cell::new('@', Some(RED), None));
        let diff = BufferDiff::compute(&Buffer::new(4, 4), &grid);
        assert_eq!(diff.len(), 4);

        let mut surface = RecordingSurface::new();
        let stats = painter(4, 4).paint(&grid, &diff, &mut surface).unwrap();
        assert_eq!(stats.markers_skipped, 3);
        assert_eq!(
            surface.ops(),
            &[
                DrawOp::FillRect {
                    rect: PixelRect::new(0, 0, 20, 40),
                    color: BG
                },
                DrawOp::Glyph {
                    glyph: '@',
                    rect: PixelRect::new(0, 0, 20, 40),
                    font_px: 32.0,
                    color: RED
                },
            ]
        );
    }

    #[test]
    fn surface_error_propagates() {
        let mut grid = Buffer::new(2, 1);
        grid.set(0, 0, Cell::from_char('a'));
        grid.set(1, 0, Cell::from_char('b'));
        let diff = BufferDiff::compute(&Buffer::new(2, 1), &grid);

        let mut surface = RecordingSurface::new();
        surface.fail_after(1);
        let err = painter(2, 1).paint(&grid, &diff, &mut surface).unwrap_err();
        assert!(matches!(err, SurfaceError::Backend(_)));
        assert_eq!(surface.ops().len(), 1);
    }

    #[test]
    fn pixel_surface_paints_background_and_ink() {
        let geometry = GridGeometry::new(Size::new(2, 1), 8, 8);
        let p = CanvasPainter::new(geometry, FG, BG, "monospace", 8.0);
        let mut grid = Buffer::new(2, 1);
        grid.set(0, 0, Cell::new('#', Some(RED), None));
        let diff = BufferDiff::full(2, 1);

        let mut surface = PixelSurface::for_geometry(geometry);
        p.paint(&grid, &diff, &mut surface).unwrap();

        assert_eq!(surface.pixel(0, 0), Some(BG));
        assert_eq!(surface.pixel(4, 4), Some(RED));
        assert_eq!(surface.pixel(12, 4), Some(BG));
        assert_eq!(surface.pixel(16, 0), None);
    }

    #[test]
    fn pixel_surface_clips_rects() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_rect(PixelRect::new(2, 2, 10, 10), RED).unwrap();
        assert_eq!(s.pixel(3, 3), Some(RED));
        assert_eq!(s.pixel(1, 1), Some(PackedRgba::TRANSPARENT));
        s.fill_rect(PixelRect::new(10, 10, 2, 2), RED).unwrap();
    }

    #[test]
    fn surface_error_display() {
        assert_eq!(SurfaceError::ContextLost.to_string(), "surface context lost");
        assert_eq!(
            SurfaceError::Backend("boom".into()).to_string(),
            "surface error: boom"
        );
    }
}
