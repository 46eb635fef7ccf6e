#![forbid(unsafe_code)]

//! Frame driver.
//!
//! [`Renderer`] owns a [`Scene`] and runs one frame per [`render`] call:
//!
//! ```text
//! layers ─► Compositor ─► resolved grid ─► DiffEngine ─► dirty cells ─► CanvasPainter ─► Surface
//! ```
//!
//! Only dirty cells reach the surface. The first frame, and the frame after
//! [`invalidate`] or a surface failure, repaints the whole grid.
//!
//! [`render`]: Renderer::render
//! [`invalidate`]: Renderer::invalidate
//!
//! # Example
//!
//! ```
//! use glyphgrid_render::config::RendererConfig;
//! use glyphgrid_render::headless::RecordingSurface;
//! use glyphgrid_render::renderer::Renderer;
//! use glyphgrid_render::scene::Colors;
//!
//! let mut config = RendererConfig::default();
//! config.grid.width = 20;
//! config.grid.height = 4;
//! let mut renderer = Renderer::new(config, RecordingSurface::new()).unwrap();
//!
//! renderer.scene_mut().text(0, 0, "hello", &Colors::fg("yellow")).unwrap();
//! let stats = renderer.render().unwrap();
//! assert!(stats.full_repaint);
//! assert_eq!(stats.glyphs_drawn, 5);
//!
//! // Nothing changed: nothing is painted.
//! let stats = renderer.render().unwrap();
//! assert_eq!(stats.dirty_cells, 0);
//! ```

use glyphgrid_core::geometry::GridGeometry;

use crate::buffer::Buffer;
use crate::compositor::Compositor;
use crate::config::RendererConfig;
use crate::diff::{BufferDiff, DiffEngine};
use crate::error::RenderError;
use crate::painter::{CanvasPainter, PaintStats, Surface};
use crate::scene::Scene;

/// Counts from one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Committed frames so far, including this one.
    pub frame: u64,
    pub dirty_cells: usize,
    /// Horizontal runs of dirty cells.
    pub runs: usize,
    pub cells_painted: u32,
    pub glyphs_drawn: u32,
    /// Cells demoted by the compositor's consistency pass.
    pub demoted: usize,
    /// Every cell was dirty because there was no previous grid.
    pub full_repaint: bool,
}

/// Owns the scene and the per-frame pipeline for one surface.
#[derive(Debug)]
pub struct Renderer<S: Surface> {
    config: RendererConfig,
    scene: Scene,
    compositor: Compositor,
    diff: DiffEngine,
    painter: CanvasPainter,
    surface: S,
    frame: u64,
}

impl<S: Surface> Renderer<S> {
    /// Validate `config` and allocate the pipeline for its grid.
    pub fn new(config: RendererConfig, surface: S) -> Result<Self, RenderError> {
        config.validate()?;
        let (fg, bg) = config.default_colors()?;
        let geometry = config.geometry();
        let size = geometry.grid;

        glyphgrid_core::debug!(
            width = size.width,
            height = size.height,
            cell_width = geometry.cell_width,
            cell_height = geometry.cell_height,
            "renderer created"
        );

        Ok(Self {
            scene: Scene::new(geometry),
            compositor: Compositor::new(size.width, size.height),
            diff: DiffEngine::new(size.width, size.height),
            painter: CanvasPainter::new(geometry, fg, bg, config.font.family.clone(), config.font.size),
            surface,
            config,
            frame: 0,
        })
    }

    /// Composite, diff and paint one frame.
    ///
    /// On a surface error the diff state is invalidated so the next frame
    /// repaints everything, layers are left as they were, and the error is
    /// returned.
    pub fn render(&mut self) -> Result<FrameStats, RenderError> {
        let (mut stats, full) = self.advance();
        let painted = self
            .painter
            .paint(self.compositor.resolved(), self.diff.last(), &mut self.surface);

        match painted {
            Ok(PaintStats {
                cells_painted,
                glyphs_drawn,
                ..
            }) => {
                stats.cells_painted = cells_painted;
                stats.glyphs_drawn = glyphs_drawn;
                stats.full_repaint = full;
                Ok(self.commit(stats))
            }
            Err(err) => {
                glyphgrid_core::warn!(error = %err, "surface failed; next frame repaints everything");
                self.diff.invalidate();
                Err(err.into())
            }
        }
    }

    /// Composite and diff without painting.
    ///
    /// The diff state advances as if the frame had been painted.
    pub fn compose(&mut self) -> FrameStats {
        let (mut stats, full) = self.advance();
        stats.full_repaint = full;
        self.commit(stats)
    }

    fn advance(&mut self) -> (FrameStats, bool) {
        let full = self.diff.is_invalidated();
        let resolved = self.compositor.compose(self.scene.layers());
        let diff = self.diff.diff(resolved);
        let stats = FrameStats {
            dirty_cells: diff.len(),
            runs: diff.runs().len(),
            demoted: self.compositor.demoted(),
            ..FrameStats::default()
        };
        (stats, full)
    }

    fn commit(&mut self, mut stats: FrameStats) -> FrameStats {
        self.frame += 1;
        stats.frame = self.frame;
        if self.config.auto_clear {
            self.scene.clear_all();
        }
        glyphgrid_core::trace!(
            frame = stats.frame,
            dirty = stats.dirty_cells,
            glyphs = stats.glyphs_drawn,
            "frame committed"
        );
        stats
    }

    /// Force a full repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.diff.invalidate();
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.scene.geometry()
    }

    #[inline]
    pub fn painter(&self) -> &CanvasPainter {
        &self.painter
    }

    /// Resolved grid of the last frame.
    #[inline]
    pub fn resolved(&self) -> &Buffer {
        self.compositor.resolved()
    }

    /// Dirty cells of the last frame.
    #[inline]
    pub fn last_diff(&self) -> &BufferDiff {
        self.diff.last()
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::PackedRgba;
    use crate::headless::{DrawOp, RecordingSurface};
    use crate::painter::PixelSurface;
    use crate::scene::{Colors, LineOptions};
    use glyphgrid_core::geometry::PixelRect;

    fn config(w: u16, h: u16) -> RendererConfig {
        let mut cfg = RendererConfig::default();
        cfg.grid.width = w;
        cfg.grid.height = h;
        cfg
    }

    fn renderer(w: u16, h: u16) -> Renderer<RecordingSurface> {
        Renderer::new(config(w, h), RecordingSurface::new()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = config(4, 4);
        cfg.colors.fg = "blurple".into();
        let err = Renderer::new(cfg, RecordingSurface::new()).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));

        let err = Renderer::new(config(0, 4), RecordingSurface::new()).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn first_frame_paints_every_cell() {
        let mut r = renderer(3, 2);
        let stats = r.render().unwrap();
        assert!(stats.full_repaint);
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.dirty_cells, 6);
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.cells_painted, 6);
        assert_eq!(stats.glyphs_drawn, 0);
        assert_eq!(
            r.surface().ops()[0],
            DrawOp::FillRect {
                rect: PixelRect::new(0, 0, 10, 20),
                color: PackedRgba::BLACK,
            }
        );
    }

    #[test]
    fn unchanged_frame_draws_nothing() {
        let mut r = renderer(4, 4);
        r.scene_mut().text(0, 0, "ab", &Colors::default()).unwrap();
        r.render().unwrap();
        r.surface_mut().clear();

        let stats = r.render().unwrap();
        assert_eq!(stats.dirty_cells, 0);
        assert!(!stats.full_repaint);
        assert!(r.surface().ops().is_empty());
    }

    #[test]
    fn single_change_paints_one_cell() {
        let mut r = renderer(4, 4);
        r.scene_mut().text(1, 1, "x", &Colors::fg("white")).unwrap();
        r.render().unwrap();
        r.surface_mut().clear();

        r.scene_mut().text(1, 1, "x", &Colors::fg("red")).unwrap();
        let stats = r.render().unwrap();
        assert_eq!(stats.dirty_cells, 1);
        assert_eq!(r.last_diff().changes(), &[(1, 1)]);
        assert_eq!(
            r.surface().ops(),
            &[
                DrawOp::FillRect {
                    rect: PixelRect::new(10, 20, 10, 20),
                    color: PackedRgba::BLACK,
                },
                DrawOp::Glyph {
                    glyph: 'x',
                    rect: PixelRect::new(10, 20, 10, 20),
                    font_px: 16.0,
                    color: PackedRgba::rgb(205, 0, 0),
                },
            ]
        );
    }

    #[test]
    fn compose_advances_without_painting() {
        let mut r = renderer(4, 1);
        r.scene_mut().text(0, 0, "abcd", &Colors::default()).unwrap();
        let stats = r.compose();
        assert_eq!(stats.dirty_cells, 4);
        assert_eq!(stats.cells_painted, 0);
        assert!(r.surface().ops().is_empty());

        let stats = r.render().unwrap();
        assert_eq!(stats.dirty_cells, 0);
        assert_eq!(r.frame_count(), 2);
    }

    #[test]
    fn auto_clear_blanks_layers_after_commit() {
        let mut cfg = config(4, 1);
        cfg.auto_clear = true;
        let mut r = Renderer::new(cfg, RecordingSurface::new()).unwrap();

        r.scene_mut().text(0, 0, "hi", &Colors::default()).unwrap();
        let stats = r.render().unwrap();
        assert_eq!(stats.glyphs_drawn, 2);
        assert!(r.scene().layers().get("base").unwrap().buffer().is_blank());

        // Not redrawn: the next frame erases the text.
        r.surface_mut().clear();
        let stats = r.render().unwrap();
        assert_eq!(stats.dirty_cells, 2);
        assert_eq!(stats.glyphs_drawn, 0);
        assert!(r.resolved().is_blank());
    }

    #[test]
    fn surface_error_invalidates_and_keeps_layers() {
        let mut r = renderer(4, 2);
        r.render().unwrap();

        r.scene_mut().text(0, 0, "ab", &Colors::default()).unwrap();
        r.surface_mut().fail_after(1);
        let err = r.render().unwrap_err();
        assert!(matches!(err, RenderError::Surface(_)));
        assert_eq!(r.frame_count(), 1);
        assert!(r.scene().cell(0, 0).unwrap().unwrap().glyph() == Some('a'));

        r.surface_mut().recover();
        r.surface_mut().clear();
        let stats = r.render().unwrap();
        assert!(stats.full_repaint);
        assert_eq!(stats.dirty_cells, 8);
        assert_eq!(r.surface().glyphs(), "ab");
    }

    #[test]
    fn invalidate_forces_full_repaint() {
        let mut r = renderer(2, 2);
        r.render().unwrap();
        r.invalidate();
        let stats = r.render().unwrap();
        assert!(stats.full_repaint);
        assert_eq!(stats.dirty_cells, 4);
    }

    #[test]
    fn scaled_glyph_paints_one_block() {
        let mut r = renderer(4, 4);
        r.scene_mut().scaled_char(0, 0, 2, 'A', &Colors::default()).unwrap();
        let stats = r.render().unwrap();
        assert_eq!(stats.glyphs_drawn, 1);
        assert_eq!(stats.cells_painted, 16 - 3);
        let glyph = r
            .surface()
            .ops()
            .iter()
            .find(|op| matches!(op, DrawOp::Glyph { .. }))
            .cloned();
        assert_eq!(
            glyph,
            Some(DrawOp::Glyph {
                glyph: 'A',
                rect: PixelRect::new(0, 0, 20, 40),
                font_px: 32.0,
                color: PackedRgba::rgb(229, 229, 229),
            })
        );
    }

    #[test]
    fn out_of_grid_line_changes_nothing() {
        let mut r = renderer(5, 5);
        r.render().unwrap();
        r.scene_mut().line(-1, 0, 3, 3, &LineOptions::default()).unwrap();
        let stats = r.render().unwrap();
        assert_eq!(stats.dirty_cells, 0);
    }

    #[test]
    fn pixel_surface_receives_backgrounds() {
        let cfg = config(2, 1);
        let surface = PixelSurface::for_geometry(cfg.geometry());
        let mut r = Renderer::new(cfg, surface).unwrap();
        r.scene_mut()
            .paint(1, 0, 1, 1, &Colors::new(None, Some("#ff0000".into())))
            .unwrap();
        r.render().unwrap();
        assert_eq!(r.surface().pixel(0, 0), Some(PackedRgba::BLACK));
        assert_eq!(r.surface().pixel(15, 5), Some(PackedRgba::rgb(255, 0, 0)));
    }
}
