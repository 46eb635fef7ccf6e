#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Grid space uses signed integer cell coordinates so draw calls may start
//! off-grid (scrolling a viewport past the edge is routine). Grid *sizes*
//! are unsigned and never change after construction. Pixel space is only
//! used at the painter boundary.

/// A cell coordinate in grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle in grid space.
///
/// Position and extent are signed: a rect may hang off any edge of the grid,
/// and a non-positive width or height describes an empty rect rather than an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect anchored at the origin covering a whole grid.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Area in cells (zero for empty rects).
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by the given sides. Never produces negative extents.
    pub fn inner(&self, margin: Sides) -> Rect {
        let x = self.x.saturating_add(margin.left);
        let y = self.y.saturating_add(margin.top);
        let width = self
            .width
            .saturating_sub(margin.left)
            .saturating_sub(margin.right)
            .max(0);
        let height = self
            .height
            .saturating_sub(margin.top)
            .saturating_sub(margin.bottom)
            .max(0);
        Rect::new(x, y, width, height)
    }

    /// Intersection with another rectangle, `None` if they do not overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Intersection with another rectangle; empty default on no overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Same amount on every side.
    #[inline]
    pub const fn all(n: i32) -> Self {
        Self {
            top: n,
            right: n,
            bottom: n,
            left: n,
        }
    }
}

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Immutable mapping between grid space and pixel space.
///
/// Fixed for a renderer's lifetime; resizing means building a new renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridGeometry {
    /// Grid size in cells.
    pub grid: Size,
    /// Cell width in pixels.
    pub cell_width: u16,
    /// Cell height in pixels.
    pub cell_height: u16,
}

impl GridGeometry {
    #[inline]
    pub const fn new(grid: Size, cell_width: u16, cell_height: u16) -> Self {
        Self {
            grid,
            cell_width,
            cell_height,
        }
    }

    /// Pixel dimensions a surface needs to show the whole grid.
    #[inline]
    pub const fn pixel_size(&self) -> (u32, u32) {
        (
            self.grid.width as u32 * self.cell_width as u32,
            self.grid.height as u32 * self.cell_height as u32,
        )
    }

    /// Pixel rect covered by a `scale × scale` block anchored at `(x, y)`.
    ///
    /// Coordinates are assumed in bounds; the painter only asks about cells
    /// the diff produced.
    #[inline]
    pub const fn cell_rect(&self, x: u16, y: u16, scale: u8) -> PixelRect {
        let s = if scale == 0 { 1 } else { scale as u32 };
        let cw = self.cell_width as u32;
        let ch = self.cell_height as u32;
        PixelRect::new(x as u32 * cw, y as u32 * ch, cw * s, ch * s)
    }

    /// Translate a surface pixel position into the grid cell under it.
    ///
    /// Used by input collaborators; returns `None` outside the grid.
    pub fn pixel_to_grid(&self, px: f64, py: f64) -> Option<GridPoint> {
        if self.cell_width == 0 || self.cell_height == 0 || px < 0.0 || py < 0.0 {
            return None;
        }
        let x = (px / f64::from(self.cell_width)).floor();
        let y = (py / f64::from(self.cell_height)).floor();
        if x >= f64::from(self.grid.width) || y >= f64::from(self.grid.height) {
            return None;
        }
        Some(GridPoint::new(x as i32, y as i32))
    }
}
