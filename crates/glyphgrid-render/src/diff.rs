#![forbid(unsafe_code)]

//! Diff computation between resolved grids.
//!
//! [`BufferDiff`] holds the row-major list of coordinates whose resolved cell
//! changed. [`DiffEngine`] owns the previously painted grid and produces one
//! diff per frame.
//!
//! # Algorithm
//!
//! 1. Row-major scan comparing every field (glyph, colours, scale, occupancy)
//! 2. A dirty occupied marker pulls its anchor into the dirty set, since the
//!    painter only draws scaled glyphs from their anchor
//! 3. The new grid becomes "previous" unconditionally
//!
//! With no previous grid (first frame, or after
//! [`invalidate`](DiffEngine::invalidate)) every coordinate is dirty.
//!
//! ```
//! use glyphgrid_render::buffer::Buffer;
//! use glyphgrid_render::cell::Cell;
//! use glyphgrid_render::diff::BufferDiff;
//!
//! let old = Buffer::new(80, 25);
//! let mut new = Buffer::new(80, 25);
//! new.set(5, 5, Cell::from_char('X'));
//! new.set(6, 5, Cell::from_char('Y'));
//!
//! let diff = BufferDiff::compute(&old, &new);
//! assert_eq!(diff.len(), 2);
//! assert_eq!(diff.runs().len(), 1);
//! ```

use crate::buffer::Buffer;
use crate::cell::CellContent;

/// A contiguous run of changed cells on a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    /// Row index.
    pub y: u16,
    /// Start column (inclusive).
    pub x0: u16,
    /// End column (inclusive).
    pub x1: u16,
}

impl ChangeRun {
    #[inline]
    pub const fn new(y: u16, x0: u16, x1: u16) -> Self {
        debug_assert!(x0 <= x1);
        Self { y, x0, x1 }
    }

    /// Number of cells in this run.
    #[inline]
    pub const fn len(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0
    }
}

/// Changed positions `(x, y)` in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDiff {
    changes: Vec<(u16, u16)>,
}

impl BufferDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every coordinate of a `width × height` grid.
    pub fn full(width: u16, height: u16) -> Self {
        let mut diff = Self::new();
        diff.fill_full(width, height);
        diff
    }

    /// Compare two grids of identical size.
    pub fn compute(old: &Buffer, new: &Buffer) -> Self {
        let mut diff = Self::new();
        let mut mark = Vec::new();
        diff.compute_into(old, new, &mut mark);
        diff
    }

    fn fill_full(&mut self, width: u16, height: u16) {
        self.changes.clear();
        self.changes.reserve(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                self.changes.push((x, y));
            }
        }
    }

    /// Recompute in place, reusing both the change list and `mark` scratch.
    fn compute_into(&mut self, old: &Buffer, new: &Buffer, mark: &mut Vec<bool>) {
        debug_assert_eq!(old.size(), new.size(), "buffer sizes must match");

        let width = new.width() as usize;
        mark.clear();
        mark.resize(new.len(), false);

        let mut any = false;
        for (i, (a, b)) in old.cells().iter().zip(new.cells()).enumerate() {
            if a != b {
                mark[i] = true;
                any = true;
            }
        }

        self.changes.clear();
        if !any {
            return;
        }

        for i in 0..mark.len() {
            if !mark[i] {
                continue;
            }
            if let CellContent::Occupied { dx, dy } = new.cells()[i].content {
                let (x, y) = (i % width, i / width);
                if let (Some(ax), Some(ay)) = (x.checked_sub(dx as usize), y.checked_sub(dy as usize))
                {
                    mark[ay * width + ax] = true;
                }
            }
        }

        for (i, dirty) in mark.iter().enumerate() {
            if *dirty {
                self.changes.push(((i % width) as u16, (i / width) as u16));
            }
        }
    }

    /// Number of changed cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[inline]
    pub fn changes(&self) -> &[(u16, u16)] {
        &self.changes
    }

    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.changes.binary_search_by(|&(cx, cy)| (cy, cx).cmp(&(y, x))).is_ok()
    }

    /// Coalesce consecutive columns on the same row into runs.
    pub fn runs(&self) -> Vec<ChangeRun> {
        let mut runs = Vec::new();
        let mut i = 0;
        let changes = &self.changes;

        while i < changes.len() {
            let (x0, y) = changes[i];
            let mut x1 = x0;
            i += 1;
            while i < changes.len() {
                let (x, yy) = changes[i];
                if yy != y || x != x1 + 1 {
                    break;
                }
                x1 = x;
                i += 1;
            }
            runs.push(ChangeRun::new(y, x0, x1));
        }

        runs
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.changes.iter().copied()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

/// Per-frame diffing against the last resolved grid.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    previous: Buffer,
    has_previous: bool,
    diff: BufferDiff,
    mark: Vec<bool>,
}

impl DiffEngine {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            previous: Buffer::new(width, height),
            has_previous: false,
            diff: BufferDiff::new(),
            mark: Vec::new(),
        }
    }

    /// Diff `next` against the previous grid, then store `next` as previous.
    pub fn diff(&mut self, next: &Buffer) -> &BufferDiff {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "diff",
            width = next.width(),
            height = next.height(),
            full = !self.has_previous
        );
        #[cfg(feature = "tracing")]
        let _guard = _span.enter();

        if self.has_previous {
            self.diff.compute_into(&self.previous, next, &mut self.mark);
        } else {
            self.diff.fill_full(next.width(), next.height());
        }
        self.previous.copy_from(next);
        self.has_previous = true;

        #[cfg(feature = "tracing")]
        tracing::trace!(dirty = self.diff.len(), "diff computed");

        &self.diff
    }

    /// The diff produced by the last call to [`diff`](Self::diff).
    #[inline]
    pub fn last(&self) -> &BufferDiff {
        &self.diff
    }

    /// Forget the previous grid; the next diff marks everything dirty.
    pub fn invalidate(&mut self) {
        self.has_previous = false;
    }

    #[inline]
    pub fn is_invalidated(&self) -> bool {
        !self.has_previous
    }

    /// Last grid handed to [`diff`](Self::diff).
    #[inline]
    pub fn previous(&self) -> Option<&Buffer> {
        self.has_previous.then_some(&self.previous)
    }
}
