#![forbid(unsafe_code)]

//! Headless surface that records draw operations.
//!
//! Used for testing the render pipeline without a canvas, and for snapshot
//! style assertions on exactly what the painter emitted.

use glyphgrid_core::geometry::PixelRect;

use crate::cell::PackedRgba;
use crate::painter::{GlyphDraw, Surface, SurfaceError};

/// A recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: PixelRect,
        color: PackedRgba,
    },
    Glyph {
        glyph: char,
        rect: PixelRect,
        font_px: f32,
        color: PackedRgba,
    },
}

/// Surface that appends every operation to a list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    font_family: Option<String>,
    /// Operations left before injected failure.
    fail_in: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain recorded operations.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Number of glyph draws recorded.
    pub fn glyph_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Glyph { .. }))
            .count()
    }

    /// Glyphs drawn, in order.
    pub fn glyphs(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Glyph { glyph, .. } => Some(*glyph),
                DrawOp::FillRect { .. } => None,
            })
            .collect()
    }

    /// Font family of the last glyph draw.
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    /// Succeed for `n` more operations, then fail every operation until
    /// [`recover`](Self::recover) is called.
    pub fn fail_after(&mut self, n: usize) {
        self.fail_in = Some(n);
    }

    /// Stop injecting failures.
    pub fn recover(&mut self) {
        self.fail_in = None;
    }

    fn check(&mut self) -> Result<(), SurfaceError> {
        match self.fail_in.as_mut() {
            Some(0) => Err(SurfaceError::Backend("injected failure".into())),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) -> Result<(), SurfaceError> {
        self.check()?;
        self.ops.push(DrawOp::FillRect { rect, color });
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &GlyphDraw<'_>) -> Result<(), SurfaceError> {
        self.check()?;
        if self.font_family.as_deref() != Some(glyph.font_family) {
            self.font_family = Some(glyph.font_family.to_owned());
        }
        self.ops.push(DrawOp::Glyph {
            glyph: glyph.glyph,
            rect: glyph.rect,
            font_px: glyph.font_px,
            color: glyph.color,
        });
        Ok(())
    }
}
