#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a dense 2D grid of [`Cell`]s owned by one layer (or by
//! the compositor as the resolved grid).
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. Every [`Occupied`](CellContent::Occupied) marker points at an anchor
//!    whose `scale × scale` block covers the marker
//! 4. Writing any cell of a scaled glyph removes the whole glyph first
//!
//! Coordinates are signed; anything outside the grid is silently ignored.

use glyphgrid_core::bounds::Bounds;
use glyphgrid_core::geometry::{Rect, Size};

use crate::cell::{Cell, CellContent};

/// A 2D grid of cells.
///
/// # Example
///
/// ```
/// use glyphgrid_render::buffer::Buffer;
/// use glyphgrid_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 25);
/// buffer.set(0, 0, Cell::from_char('H'));
/// buffer.set(1, 0, Cell::from_char('i'));
/// buffer.set(-1, 0, Cell::from_char('!')); // ignored
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer of empty cells.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Validator for this buffer's extent.
    #[inline]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get the cell at `(x, y)`, `None` out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a cell by unsigned coordinates known to be in bounds.
    #[inline]
    pub(crate) fn get_unchecked(&self, x: u16, y: u16) -> &Cell {
        debug_assert!(x < self.width && y < self.height);
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Anchor of the scaled glyph covering `(x, y)`.
    ///
    /// Returns the marker's anchor for occupied cells, `(x, y)` itself for an
    /// anchor with `scale > 1`, and `None` for ordinary cells or out of
    /// bounds.
    pub fn anchor_of(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let cell = self.get(x, y)?;
        match cell.content {
            CellContent::Occupied { dx, dy } => {
                let ax = x - dx as i32;
                let ay = y - dy as i32;
                self.index(ax, ay).map(|_| (ax as u16, ay as u16))
            }
            CellContent::Glyph(_) if cell.scale > 1 => Some((x as u16, y as u16)),
            CellContent::Glyph(_) => None,
        }
    }

    /// Reset the whole scaled glyph covering `(x, y)` to empty.
    ///
    /// No-op for ordinary cells. A marker whose anchor no longer owns it is
    /// reset on its own.
    fn remove_glyph_at(&mut self, x: i32, y: i32) {
        let Some((ax, ay)) = self.anchor_of(x, y) else {
            return;
        };
        let (ax, ay) = (ax as i32, ay as i32);
        let target = self.cells[y as usize * self.width as usize + x as usize];
        let scale = match self.get(ax, ay) {
            Some(a) if a.is_anchor() => a.scale as i32,
            _ => 1,
        };
        let covers = x - ax < scale && y - ay < scale;
        if !covers {
            if target.is_occupied()
                && let Some(i) = self.index(x, y)
            {
                self.cells[i] = Cell::EMPTY;
            }
            return;
        }

        for by in ay..ay + scale {
            for bx in ax..ax + scale {
                let Some(i) = self.index(bx, by) else {
                    continue;
                };
                let owned = match self.cells[i].content {
                    CellContent::Occupied { dx, dy } => {
                        bx - dx as i32 == ax && by - dy as i32 == ay
                    }
                    CellContent::Glyph(_) => bx == ax && by == ay,
                };
                if owned {
                    self.cells[i] = Cell::EMPTY;
                }
            }
        }
    }

    /// Set the cell at `(x, y)`.
    ///
    /// - Does nothing out of bounds
    /// - A cell with `scale > 1` is written as a scaled glyph
    /// - Occupied markers cannot be written directly and are ignored
    /// - Overwriting any part of a scaled glyph removes that glyph first
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if cell.is_occupied() {
            return;
        }
        if cell.scale > 1 {
            self.set_scaled(x, y, cell.scale, cell);
            return;
        }
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if self.cells[idx].is_occupied() || self.cells[idx].is_anchor() {
            self.remove_glyph_at(x, y);
        }
        self.cells[idx] = cell;
    }

    /// Write a glyph covering a `scale × scale` block anchored at `(x, y)`.
    ///
    /// Atomic: when any cell of the block is out of bounds nothing is
    /// written. Any scaled glyph overlapping the block is removed first.
    pub fn set_scaled(&mut self, x: i32, y: i32, scale: u8, cell: Cell) {
        if cell.is_occupied() {
            return;
        }
        let scale = scale.max(1);
        if scale == 1 {
            self.set(x, y, cell.with_scale(1));
            return;
        }
        if !self.bounds().scaled(x, y, scale, 1) {
            return;
        }

        let s = scale as i32;
        for by in y..y + s {
            for bx in x..x + s {
                self.remove_glyph_at(bx, by);
            }
        }

        let w = self.width as usize;
        for dy in 0..scale {
            for dx in 0..scale {
                let i = (y as usize + dy as usize) * w + x as usize + dx as usize;
                self.cells[i] = if dx == 0 && dy == 0 {
                    cell.with_scale(scale)
                } else {
                    Cell::occupied(dx, dy, cell.fg, cell.bg)
                };
            }
        }
    }

    /// Fill a rectangle, clipped to the in-bounds subset.
    ///
    /// The cell is written at scale 1 everywhere.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        if cell.is_occupied() {
            return;
        }
        let Some(clipped) = self.bounds().clip(rect) else {
            return;
        };
        let cell = cell.with_scale(1);
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// True when every cell is the canonical empty cell.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Raw access to the cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Cells of one row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        assert!(y < self.height, "row index out of bounds");
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Overwrite this buffer's contents with another of the same size.
    ///
    /// Reuses the existing allocation.
    pub fn copy_from(&mut self, src: &Buffer) {
        debug_assert_eq!(self.size(), src.size(), "buffer sizes must match");
        if self.cells.len() == src.cells.len() {
            self.cells.copy_from_slice(&src.cells);
        } else {
            self.width = src.width;
            self.height = src.height;
            self.cells.clone_from(&src.cells);
        }
    }

    /// Render glyphs as text rows, markers shown as `·`. Test helper.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for y in 0..self.height {
            for cell in self.row_cells(y) {
                out.push(cell.glyph().unwrap_or('·'));
            }
            out.push('\n');
        }
        out
    }
}
