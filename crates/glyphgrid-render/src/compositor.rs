#![forbid(unsafe_code)]

//! Layer compositing.
//!
//! Flattens the visible layers of a [`LayerStack`] into one resolved grid.
//! Per coordinate the topmost non-empty cell wins; empty cells are
//! transparent. The resolved buffer and a per-cell winner array are
//! allocated once and reused every frame.
//!
//! # Scaled glyphs across layers
//!
//! A scaled glyph only survives compositing intact when its layer wins every
//! cell of its block. After the precedence pass:
//!
//! 1. An anchor whose block is partly covered by a higher layer is demoted
//!    to a scale-1 glyph.
//! 2. A marker whose anchor did not survive as an anchor of the same layer
//!    is demoted to a background-only cell (anchor background, blank glyph).

use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent};
use crate::layer::LayerStack;

/// Sentinel in the winner array for "no layer painted this cell".
const NO_WINNER: u16 = u16::MAX;

/// Reusable compositing state for one grid size.
#[derive(Debug, Clone)]
pub struct Compositor {
    resolved: Buffer,
    winner: Vec<u16>,
    demoted: usize,
}

impl Compositor {
    /// Allocate scratch for a `width × height` grid.
    pub fn new(width: u16, height: u16) -> Self {
        let resolved = Buffer::new(width, height);
        let winner = vec![NO_WINNER; resolved.len()];
        Self {
            resolved,
            winner,
            demoted: 0,
        }
    }

    /// The grid produced by the last [`compose`](Self::compose).
    #[inline]
    pub fn resolved(&self) -> &Buffer {
        &self.resolved
    }

    /// Cells demoted by the consistency pass of the last compose.
    #[inline]
    pub fn demoted(&self) -> usize {
        self.demoted
    }

    /// Flatten the visible layers bottom → top.
    pub fn compose(&mut self, stack: &LayerStack) -> &Buffer {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "compose",
            layers = stack.len(),
            width = self.resolved.width(),
            height = self.resolved.height()
        );
        #[cfg(feature = "tracing")]
        let _guard = _span.enter();

        debug_assert_eq!(stack.size(), self.resolved.size(), "grid sizes must match");

        self.resolved.clear();
        self.winner.fill(NO_WINNER);

        let out = self.resolved.cells_mut();
        for (z, layer) in stack.layers().iter().enumerate() {
            if !layer.is_visible() {
                continue;
            }
            let z = z.min(NO_WINNER as usize - 1) as u16;
            for (i, cell) in layer.buffer().cells().iter().enumerate() {
                if !cell.is_empty() {
                    out[i] = *cell;
                    self.winner[i] = z;
                }
            }
        }

        self.demoted = self.demote_broken_glyphs();

        #[cfg(feature = "tracing")]
        if self.demoted > 0 {
            tracing::warn!(demoted = self.demoted, "scaled glyphs split across layers");
        }

        &self.resolved
    }

    fn demote_broken_glyphs(&mut self) -> usize {
        let w = self.resolved.width() as usize;
        let h = self.resolved.height() as usize;
        let mut demoted = 0;

        // Pass 1: anchors that lost part of their block.
        for i in 0..self.resolved.len() {
            let cell = self.resolved.cells()[i];
            if !cell.is_anchor() {
                continue;
            }
            let (ax, ay) = (i % w, i / w);
            let s = cell.scale as usize;
            let z = self.winner[i];
            let intact = ax + s <= w
                && ay + s <= h
                && (0..s).all(|dy| {
                    (0..s).all(|dx| {
                        if dx == 0 && dy == 0 {
                            return true;
                        }
                        let j = (ay + dy) * w + ax + dx;
                        self.winner[j] == z
                            && self.resolved.cells()[j].content
                                == CellContent::Occupied {
                                    dx: dx as u8,
                                    dy: dy as u8,
                                }
                    })
                });
            if !intact {
                self.resolved.cells_mut()[i].scale = 1;
                demoted += 1;
            }
        }

        // Pass 2: markers whose anchor is gone or was demoted.
        for i in 0..self.resolved.len() {
            let cell = self.resolved.cells()[i];
            let CellContent::Occupied { dx, dy } = cell.content else {
                continue;
            };
            let (x, y) = (i % w, i / w);
            let owner = x
                .checked_sub(dx as usize)
                .zip(y.checked_sub(dy as usize))
                .map(|(ax, ay)| ay * w + ax);
            let intact = owner.is_some_and(|j| {
                let anchor = self.resolved.cells()[j];
                self.winner[j] == self.winner[i]
                    && anchor.is_anchor()
                    && (dx as usize) < anchor.scale as usize
                    && (dy as usize) < anchor.scale as usize
            });
            if !intact {
                self.resolved.cells_mut()[i] = Cell {
                    content: CellContent::Glyph(' '),
                    fg: None,
                    bg: cell.bg,
                    scale: 1,
                };
                demoted += 1;
            }
        }

        demoted
    }
}
