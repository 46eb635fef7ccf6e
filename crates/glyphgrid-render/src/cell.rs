#![forbid(unsafe_code)]

//! Cell types and invariants.
//!
//! A [`Cell`] is one grid position's renderable state: a glyph, optional
//! foreground/background colours and a scale. Cells are plain `Copy` values
//! stored densely in a [`Buffer`](crate::buffer::Buffer).
//!
//! # Scaled glyphs
//!
//! A glyph drawn at `scale = N` occupies an `N × N` block. The top-left cell
//! is the *anchor* and carries the glyph with `scale = N`; every other cell
//! of the block holds [`CellContent::Occupied`] with the offset back to the
//! anchor. Markers carry the anchor's colours so the compositor can demote
//! them to background-only cells when the anchor loses to a higher layer.
//!
//! # Empty
//!
//! The canonical empty cell is `' '` with no colours and scale 1. Empty cells
//! are transparent to the compositor.

/// A compact RGBA color.
///
/// Layout: `0xRRGGBBAA` (R in bits 31..24, A in bits 7..0), straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    const fn div_round_u8(numer: u64, denom: u64) -> u8 {
        let v = (numer + (denom / 2)) / denom;
        if v > 255 { 255 } else { v as u8 }
    }

    /// Porter-Duff SourceOver: `src over dst`.
    ///
    /// Computed in exact rational form and rounded once at the end.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let s_a = self.a() as u64;
        if s_a == 255 {
            return self;
        }
        if s_a == 0 {
            return dst;
        }

        let d_a = dst.a() as u64;
        let inv_s_a = 255 - s_a;
        let numer_a = 255 * s_a + d_a * inv_s_a;
        let out_a = Self::div_round_u8(numer_a, 255);

        let channel = |s: u8, d: u8| {
            Self::div_round_u8(
                (s as u64) * s_a * 255 + (d as u64) * d_a * inv_s_a,
                numer_a,
            )
        };
        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            out_a,
        )
    }

    /// `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    pub fn to_hex(self) -> String {
        if self.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            format!("#{:08x}", self.0)
        }
    }
}

/// What a cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellContent {
    /// A single glyph; `' '` is blank.
    Glyph(char),
    /// Part of a scaled glyph's block; the anchor sits `dx` columns left
    /// and `dy` rows up.
    Occupied { dx: u8, dy: u8 },
}

impl CellContent {
    /// The glyph, if this is not an occupied marker.
    #[inline]
    pub const fn glyph(self) -> Option<char> {
        match self {
            Self::Glyph(c) => Some(c),
            Self::Occupied { .. } => None,
        }
    }

    #[inline]
    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Occupied { .. })
    }
}

impl Default for CellContent {
    fn default() -> Self {
        Self::Glyph(' ')
    }
}

/// One grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub content: CellContent,
    /// Foreground; `None` means the painter's default.
    pub fg: Option<PackedRgba>,
    /// Background; `None` means the painter's default.
    pub bg: Option<PackedRgba>,
    /// Block size for anchors, 1 for ordinary cells and markers.
    pub scale: u8,
}

impl Cell {
    /// The canonical empty cell.
    pub const EMPTY: Self = Self {
        content: CellContent::Glyph(' '),
        fg: None,
        bg: None,
        scale: 1,
    };

    /// A scale-1 glyph with no colours.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self {
            content: CellContent::Glyph(c),
            fg: None,
            bg: None,
            scale: 1,
        }
    }

    /// A glyph with colours.
    #[inline]
    pub const fn new(c: char, fg: Option<PackedRgba>, bg: Option<PackedRgba>) -> Self {
        Self {
            content: CellContent::Glyph(c),
            fg,
            bg,
            scale: 1,
        }
    }

    /// Marker pointing `(dx, dy)` back to an anchor, carrying its colours.
    #[inline]
    pub const fn occupied(dx: u8, dy: u8, fg: Option<PackedRgba>, bg: Option<PackedRgba>) -> Self {
        Self {
            content: CellContent::Occupied { dx, dy },
            fg,
            bg,
            scale: 1,
        }
    }

    #[inline]
    pub const fn with_fg(mut self, fg: Option<PackedRgba>) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: Option<PackedRgba>) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    pub const fn with_scale(mut self, scale: u8) -> Self {
        self.scale = if scale == 0 { 1 } else { scale };
        self
    }

    /// Transparent to the compositor.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.content.is_occupied()
    }

    /// Anchor of a block wider than one cell.
    #[inline]
    pub const fn is_anchor(&self) -> bool {
        self.scale > 1 && !self.content.is_occupied()
    }

    /// The glyph, or `None` for markers.
    #[inline]
    pub const fn glyph(&self) -> Option<char> {
        self.content.glyph()
    }

    /// Same cell with foreground and background swapped.
    #[inline]
    pub const fn inverted(mut self) -> Self {
        let fg = self.fg;
        self.fg = self.bg;
        self.bg = fg;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
