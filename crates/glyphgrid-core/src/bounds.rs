#![forbid(unsafe_code)]

//! Bounds validation for draw calls.
//!
//! Every drawing primitive asks a [`Bounds`] whether the cells it is about
//! to touch lie inside `[0, width) × [0, height)` before mutating anything.
//! A failed check is never an error: the primitive silently skips the write,
//! so one stray draw in a large batch cannot abort the frame.

use crate::geometry::{Rect, Size};

/// Grid extent used to validate shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    width: i32,
    height: i32,
}

impl Bounds {
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
        }
    }

    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// The whole grid as a rect.
    #[inline]
    pub const fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// `0 ≤ x < width` and `0 ≤ y < height`.
    #[inline]
    pub const fn cell(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Both corners `(x, y)` and `(x+w-1, y+h-1)` are inside.
    ///
    /// Non-positive sizes are not rejected here; callers treat them as an
    /// empty draw before asking.
    #[inline]
    pub const fn rect_fits(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        self.cell(x, y)
            && self.cell(
                x.saturating_add(w).saturating_sub(1),
                y.saturating_add(h).saturating_sub(1),
            )
    }

    /// A run of `len` cells starting at `(x, y)` on one row.
    ///
    /// An empty run degrades to a single-cell check at the start position.
    #[inline]
    pub const fn text(&self, x: i32, y: i32, len: usize) -> bool {
        if len == 0 {
            return self.cell(x, y);
        }
        let last = x.saturating_add(len as i32).saturating_sub(1);
        self.cell(x, y) && self.cell(last, y)
    }

    /// A run of `glyphs` scaled glyphs, each `scale × scale`, anchored at
    /// `(x, y)`. The span is scaled before validating.
    #[inline]
    pub const fn scaled(&self, x: i32, y: i32, scale: u8, glyphs: usize) -> bool {
        let s = if scale == 0 { 1 } else { scale as i32 };
        let n = if glyphs == 0 { 1 } else { glyphs as i32 };
        self.rect_fits(x, y, n.saturating_mul(s), s)
    }

    /// Line endpoints only.
    ///
    /// Bresenham steps move monotonically on each axis between the two
    /// endpoints, so every intermediate cell lies in the endpoints' bounding
    /// box and is in bounds whenever both endpoints are.
    #[inline]
    pub const fn line(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        self.cell(x1, y1) && self.cell(x2, y2)
    }

    /// In-bounds subset of a rect, `None` when nothing overlaps.
    #[inline]
    pub fn clip(&self, rect: Rect) -> Option<Rect> {
        rect.intersection_opt(&self.rect())
    }

    /// Convert a validated coordinate to unsigned grid indices.
    #[inline]
    pub fn to_grid(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if self.cell(x, y) {
            Some((x as u16, y as u16))
        } else {
            None
        }
    }
}
