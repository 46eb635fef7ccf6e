#![forbid(unsafe_code)]

//! Drawing primitives for the buffer.
//!
//! Helpers on top of [`Buffer::set`] so scenes and widgets can draw borders,
//! lines, text and filled regions without duplicating cell loops. Every
//! primitive consults the buffer's [`Bounds`](glyphgrid_core::bounds::Bounds)
//! first and silently does nothing (or clips) when the shape leaves the grid:
//!
//! | primitive | policy |
//! |---|---|
//! | line | both endpoints must be in bounds, else no-op |
//! | box | both corners must be in bounds, else no-op |
//! | text | clipped per character |
//! | fill | clipped to the in-bounds subset |
//! | scaled text | each glyph's block checked; misfits skipped |

use glyphgrid_core::geometry::Rect;

use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent};

/// Characters used to draw a border around a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderChars {
    /// Simple box-drawing characters (U+250x).
    pub const SINGLE: Self = Self {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    };

    /// Rounded corners.
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        horizontal: '─',
        vertical: '│',
    };

    /// Double-line border.
    pub const DOUBLE: Self = Self {
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
    };

    /// Heavy (thick) border.
    pub const HEAVY: Self = Self {
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        horizontal: '━',
        vertical: '┃',
    };

    /// ASCII-only border.
    pub const ASCII: Self = Self {
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
    };
}

/// Named border presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    Single,
    Double,
    Rounded,
    Heavy,
    Ascii,
}

impl BorderStyle {
    #[must_use]
    pub const fn chars(self) -> BorderChars {
        match self {
            Self::Single => BorderChars::SINGLE,
            Self::Double => BorderChars::DOUBLE,
            Self::Rounded => BorderChars::ROUNDED,
            Self::Heavy => BorderChars::HEAVY,
            Self::Ascii => BorderChars::ASCII,
        }
    }

    /// Look up a preset by name (`"single"`, `"double"`, ...), ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let style = match name.to_ascii_lowercase().as_str() {
            "single" | "square" => Self::Single,
            "double" => Self::Double,
            "rounded" => Self::Rounded,
            "heavy" | "thick" => Self::Heavy,
            "ascii" => Self::Ascii,
            _ => return None,
        };
        Some(style)
    }
}

/// Horizontal placement within an available span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    /// Offset of a run of `len` cells inside `avail` cells.
    ///
    /// Runs longer than the span start at 0.
    #[inline]
    pub const fn offset(self, avail: i32, len: i32) -> i32 {
        let slack = if avail > len { avail - len } else { 0 };
        match self {
            Self::Left => 0,
            Self::Center => slack / 2,
            Self::Right => slack,
        }
    }
}

/// Number of cells a string occupies: one per `char`.
#[inline]
pub fn text_len(text: &str) -> i32 {
    text.chars().count().min(i32::MAX as usize) as i32
}

/// `base` with its glyph replaced.
#[inline]
fn glyph_cell(c: char, base: Cell) -> Cell {
    Cell {
        content: CellContent::Glyph(c),
        scale: 1,
        ..base
    }
}

/// Extension trait for drawing on a Buffer.
pub trait Draw {
    /// Rasterize a line between two grid points (Bresenham).
    ///
    /// Both endpoints must be in bounds; otherwise nothing is drawn.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, cell: Cell);

    /// Fill a rectangle, clipped to the grid.
    fn draw_rect_filled(&mut self, rect: Rect, cell: Cell);

    /// Draw a border inside `rect`; the cell's colours apply to every glyph.
    ///
    /// Empty rects and rects not fully inside the grid are ignored.
    fn draw_border(&mut self, rect: Rect, chars: BorderChars, base_cell: Cell);

    /// Border plus optional interior fill.
    fn draw_box(&mut self, rect: Rect, chars: BorderChars, border_cell: Cell, fill: Option<Cell>);

    /// Embed a title in the top border of `rect`.
    ///
    /// Truncated to the `width - 2` cells between the corners.
    fn draw_title(&mut self, rect: Rect, title: &str, align: Align, base_cell: Cell);

    /// Print text left to right, one char per cell, clipping per character.
    ///
    /// Returns the x position after the last character.
    fn print_text(&mut self, x: i32, y: i32, text: &str, base_cell: Cell) -> i32;

    /// Print text horizontally centred on row `y`.
    ///
    /// `x = floor((width - len) / 2)`; overlong text starts left of the grid
    /// and is clipped.
    fn print_centered(&mut self, y: i32, text: &str, base_cell: Cell) -> i32;

    /// Print text with each glyph as a `scale × scale` block.
    ///
    /// The cursor advances `scale` columns per glyph whether or not the glyph
    /// fit. Returns the x position after the last glyph.
    fn print_scaled(&mut self, x: i32, y: i32, scale: u8, text: &str, base_cell: Cell) -> i32;

    /// Set fg/bg over an area without touching glyphs.
    fn paint_area(
        &mut self,
        rect: Rect,
        fg: Option<crate::cell::PackedRgba>,
        bg: Option<crate::cell::PackedRgba>,
    );
}

impl Draw for Buffer {
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, cell: Cell) {
        if !self.bounds().line(x1, y1, x2, y2) {
            return;
        }
        let cell = cell.with_scale(1);

        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            self.set(x, y, cell);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_rect_filled(&mut self, rect: Rect, cell: Cell) {
        self.fill(rect, cell);
    }

    fn draw_border(&mut self, rect: Rect, chars: BorderChars, base_cell: Cell) {
        if rect.is_empty() || !self.bounds().rect_fits(rect.x, rect.y, rect.width, rect.height) {
            return;
        }

        let h_cell = glyph_cell(chars.horizontal, base_cell);
        let v_cell = glyph_cell(chars.vertical, base_cell);
        let (left, top) = (rect.left(), rect.top());
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);

        for x in left..=right {
            self.set(x, top, h_cell);
            if bottom > top {
                self.set(x, bottom, h_cell);
            }
        }
        for y in (top + 1)..bottom {
            self.set(left, y, v_cell);
            if right > left {
                self.set(right, y, v_cell);
            }
        }

        // Corners last so they win over edge glyphs.
        self.set(left, top, glyph_cell(chars.top_left, base_cell));
        if right > left {
            self.set(right, top, glyph_cell(chars.top_right, base_cell));
        }
        if bottom > top {
            self.set(left, bottom, glyph_cell(chars.bottom_left, base_cell));
        }
        if right > left && bottom > top {
            self.set(right, bottom, glyph_cell(chars.bottom_right, base_cell));
        }
    }

    fn draw_box(&mut self, rect: Rect, chars: BorderChars, border_cell: Cell, fill: Option<Cell>) {
        if rect.is_empty() || !self.bounds().rect_fits(rect.x, rect.y, rect.width, rect.height) {
            return;
        }
        if let Some(fill) = fill
            && rect.width > 2
            && rect.height > 2
        {
            let inner = Rect::new(rect.x + 1, rect.y + 1, rect.width - 2, rect.height - 2);
            self.fill(inner, fill);
        }
        self.draw_border(rect, chars, border_cell);
    }

    fn draw_title(&mut self, rect: Rect, title: &str, align: Align, base_cell: Cell) {
        if title.is_empty()
            || rect.is_empty()
            || !self.bounds().rect_fits(rect.x, rect.y, rect.width, rect.height)
        {
            return;
        }
        let avail = rect.width - 2;
        if avail <= 0 {
            return;
        }
        let shown = text_len(title).min(avail);
        let x = rect.x + 1 + align.offset(avail, shown);
        for (i, c) in title.chars().take(shown as usize).enumerate() {
            self.set(x + i as i32, rect.y, glyph_cell(c, base_cell));
        }
    }

    fn print_text(&mut self, x: i32, y: i32, text: &str, base_cell: Cell) -> i32 {
        let mut cx = x;
        for c in text.chars() {
            // `set` drops out-of-bounds cells individually.
            self.set(cx, y, glyph_cell(c, base_cell));
            cx = cx.saturating_add(1);
        }
        cx
    }

    fn print_centered(&mut self, y: i32, text: &str, base_cell: Cell) -> i32 {
        let x = (self.width() as i32 - text_len(text)).div_euclid(2);
        self.print_text(x, y, text, base_cell)
    }

    fn print_scaled(&mut self, x: i32, y: i32, scale: u8, text: &str, base_cell: Cell) -> i32 {
        let scale = scale.max(1);
        let bounds = self.bounds();
        let mut cx = x;
        for c in text.chars() {
            if bounds.scaled(cx, y, scale, 1) {
                self.set_scaled(cx, y, scale, glyph_cell(c, base_cell));
            }
            cx = cx.saturating_add(scale as i32);
        }
        cx
    }

    fn paint_area(
        &mut self,
        rect: Rect,
        fg: Option<crate::cell::PackedRgba>,
        bg: Option<crate::cell::PackedRgba>,
    ) {
        let Some(clipped) = self.bounds().clip(rect) else {
            return;
        };
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                let Some(&cell) = self.get(x, y) else {
                    continue;
                };
                if cell.is_occupied() {
                    continue;
                }
                let painted = cell.with_fg(fg.or(cell.fg)).with_bg(bg.or(cell.bg));
                if cell.is_anchor() {
                    self.set_scaled(x, y, cell.scale, painted);
                } else {
                    self.set(x, y, painted);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::PackedRgba;

    fn char_at(buf: &Buffer, x: i32, y: i32) -> Option<char> {
        buf.get(x, y).and_then(|c| if c.is_empty() { None } else { c.glyph() })
    }

    fn row(buf: &Buffer, y: u16) -> String {
        buf.row_cells(y).iter().map(|c| c.glyph().unwrap_or('·')).collect()
    }

    // --- Line ---

    #[test]
    fn horizontal_line() {
        let mut buf = Buffer::new(10, 1);
        buf.draw_line(2, 0, 6, 0, Cell::from_char('-'));
        assert_eq!(row(&buf, 0), "  -----   ");
    }

    #[test]
    fn vertical_line_reversed_endpoints() {
        let mut buf = Buffer::new(1, 5);
        buf.draw_line(0, 3, 0, 1, Cell::from_char('|'));
        assert_eq!(char_at(&buf, 0, 0), None);
        assert_eq!(char_at(&buf, 0, 1), Some('|'));
        assert_eq!(char_at(&buf, 0, 3), Some('|'));
        assert_eq!(char_at(&buf, 0, 4), None);
    }

    #[test]
    fn diagonal_line_steps_both_axes() {
        let mut buf = Buffer::new(4, 4);
        buf.draw_line(0, 0, 3, 3, Cell::from_char('\\'));
        for i in 0..4 {
            assert_eq!(char_at(&buf, i, i), Some('\\'));
        }
    }

    #[test]
    fn shallow_line_is_connected() {
        let mut buf = Buffer::new(10, 3);
        buf.draw_line(0, 0, 9, 2, Cell::from_char('*'));
        for x in 0..10 {
            let hits = (0..3).filter(|&y| char_at(&buf, x, y).is_some()).count();
            assert_eq!(hits, 1, "column {x}");
        }
        assert_eq!(char_at(&buf, 0, 0), Some('*'));
        assert_eq!(char_at(&buf, 9, 2), Some('*'));
    }

    #[test]
    fn single_point_line() {
        let mut buf = Buffer::new(3, 3);
        buf.draw_line(1, 1, 1, 1, Cell::from_char('o'));
        assert_eq!(char_at(&buf, 1, 1), Some('o'));
    }

    #[test]
    fn line_with_out_of_grid_endpoint_is_noop() {
        let mut buf = Buffer::new(10, 10);
        buf.draw_line(-5, -5, 2, 2, Cell::from_char('x'));
        buf.draw_line(0, 0, 10, 0, Cell::from_char('x'));
        assert!(buf.is_blank());
    }

    // --- Box ---

    #[test]
    fn box_with_centered_title() {
        let mut buf = Buffer::new(10, 3);
        let rect = Rect::new(0, 0, 10, 3);
        buf.draw_box(rect, BorderChars::SINGLE, Cell::EMPTY, None);
        buf.draw_title(rect, "AB", Align::Center, Cell::EMPTY);

        assert_eq!(row(&buf, 0), "┌───AB───┐");
        assert_eq!(row(&buf, 1), "│        │");
        assert_eq!(row(&buf, 2), "└────────┘");
    }

    #[test]
    fn title_alignment_left_and_right() {
        let rect = Rect::new(0, 0, 8, 3);
        let mut buf = Buffer::new(8, 3);
        buf.draw_border(rect, BorderChars::ASCII, Cell::EMPTY);
        buf.draw_title(rect, "Hi", Align::Left, Cell::EMPTY);
        assert_eq!(row(&buf, 0), "+Hi----+");

        let mut buf = Buffer::new(8, 3);
        buf.draw_border(rect, BorderChars::ASCII, Cell::EMPTY);
        buf.draw_title(rect, "Hi", Align::Right, Cell::EMPTY);
        assert_eq!(row(&buf, 0), "+----Hi+");
    }

    #[test]
    fn long_title_is_truncated_between_corners() {
        let rect = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::new(6, 2);
        buf.draw_border(rect, BorderChars::ASCII, Cell::EMPTY);
        buf.draw_title(rect, "ABCDEFGH", Align::Center, Cell::EMPTY);
        assert_eq!(row(&buf, 0), "+ABCD+");
    }

    #[test]
    fn narrow_box_has_no_title_room() {
        let rect = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::new(2, 2);
        buf.draw_border(rect, BorderChars::ASCII, Cell::EMPTY);
        buf.draw_title(rect, "X", Align::Left, Cell::EMPTY);
        assert_eq!(row(&buf, 0), "++");
    }

    #[test]
    fn box_fill_only_inside_border() {
        let mut buf = Buffer::new(5, 4);
        buf.draw_box(
            Rect::new(0, 0, 5, 4),
            BorderChars::DOUBLE,
            Cell::EMPTY,
            Some(Cell::from_char('.')),
        );
        assert_eq!(row(&buf, 0), "╔═══╗");
        assert_eq!(row(&buf, 1), "║...║");
        assert_eq!(row(&buf, 2), "║...║");
        assert_eq!(row(&buf, 3), "╚═══╝");
    }

    #[test]
    fn partial_box_is_rejected() {
        let mut buf = Buffer::new(5, 5);
        buf.draw_box(Rect::new(2, 2, 5, 5), BorderChars::SINGLE, Cell::EMPTY, None);
        buf.draw_box(Rect::new(-1, 0, 3, 3), BorderChars::SINGLE, Cell::EMPTY, None);
        assert!(buf.is_blank());
    }

    #[test]
    fn degenerate_boxes_are_noops() {
        let mut buf = Buffer::new(5, 5);
        buf.draw_box(Rect::new(0, 0, 0, 3), BorderChars::SINGLE, Cell::EMPTY, None);
        buf.draw_box(Rect::new(0, 0, 3, -1), BorderChars::SINGLE, Cell::EMPTY, None);
        assert!(buf.is_blank());
    }

    #[test]
    fn one_by_one_box_is_a_corner() {
        let mut buf = Buffer::new(3, 3);
        buf.draw_border(Rect::new(1, 1, 1, 1), BorderChars::ROUNDED, Cell::EMPTY);
        assert_eq!(char_at(&buf, 1, 1), Some('╭'));
    }

    #[test]
    fn border_colours_apply() {
        let mut buf = Buffer::new(3, 3);
        let red = Some(PackedRgba::rgb(255, 0, 0));
        buf.draw_border(Rect::new(0, 0, 3, 3), BorderChars::HEAVY, Cell::EMPTY.with_fg(red));
        assert_eq!(buf.get(1, 0).and_then(|c| c.fg), red);
        assert!(buf.get(1, 1).is_some_and(Cell::is_empty));
    }

    #[test]
    fn border_style_names() {
        assert_eq!(BorderStyle::from_name("Rounded"), Some(BorderStyle::Rounded));
        assert_eq!(BorderStyle::from_name("ascii").map(BorderStyle::chars), Some(BorderChars::ASCII));
        assert_eq!(BorderStyle::from_name("wavy"), None);
    }

    // --- Text ---

    #[test]
    fn text_clips_per_character() {
        let mut buf = Buffer::new(5, 1);
        let end = buf.print_text(3, 0, "hello", Cell::EMPTY);
        assert_eq!(row(&buf, 0), "   he");
        assert_eq!(end, 8);

        let mut buf = Buffer::new(5, 1);
        buf.print_text(-2, 0, "hello", Cell::EMPTY);
        assert_eq!(row(&buf, 0), "llo  ");
    }

    #[test]
    fn empty_text_is_noop() {
        let mut buf = Buffer::new(5, 1);
        assert_eq!(buf.print_text(1, 0, "", Cell::EMPTY), 1);
        assert!(buf.is_blank());
    }

    #[test]
    fn text_on_missing_row_is_noop() {
        let mut buf = Buffer::new(5, 2);
        buf.print_text(0, 2, "hey", Cell::EMPTY);
        buf.print_text(0, -1, "hey", Cell::EMPTY);
        assert!(buf.is_blank());
    }

    #[test]
    fn centered_text_floors() {
        let mut buf = Buffer::new(10, 1);
        buf.print_centered(0, "abc", Cell::EMPTY);
        assert_eq!(row(&buf, 0), "   abc    ");
    }

    #[test]
    fn centered_overlong_text_is_clipped() {
        let mut buf = Buffer::new(4, 1);
        // floor((4 - 7) / 2) = -2
        buf.print_centered(0, "abcdefg", Cell::EMPTY);
        assert_eq!(row(&buf, 0), "cdef");
    }

    // --- Scaled ---

    #[test]
    fn scaled_text_advances_by_scale() {
        let mut buf = Buffer::new(8, 2);
        let end = buf.print_scaled(0, 0, 2, "ab", Cell::EMPTY);
        assert_eq!(end, 4);
        assert_eq!(buf.anchor_of(1, 1), Some((0, 0)));
        assert_eq!(buf.anchor_of(3, 1), Some((2, 0)));
        assert_eq!(row(&buf, 0), "a·b·    ");
    }

    #[test]
    fn scaled_glyphs_that_do_not_fit_are_skipped() {
        let mut buf = Buffer::new(5, 2);
        buf.print_scaled(0, 0, 2, "abc", Cell::EMPTY);
        // 'c' would need columns 4..6.
        assert_eq!(row(&buf, 0), "a·b· ");
    }

    #[test]
    fn paint_area_keeps_glyphs() {
        let mut buf = Buffer::new(4, 1);
        buf.print_text(0, 0, "ab", Cell::EMPTY);
        let bg = Some(PackedRgba::rgb(0, 0, 255));
        buf.paint_area(Rect::new(0, 0, 4, 1), None, bg);
        assert_eq!(row(&buf, 0), "ab  ");
        assert!(buf.row_cells(0).iter().all(|c| c.bg == bg));
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn line_cells_stay_in_endpoint_box(
                x1 in 0i32..20, y1 in 0i32..20, x2 in 0i32..20, y2 in 0i32..20,
            ) {
                let mut buf = Buffer::new(20, 20);
                buf.draw_line(x1, y1, x2, y2, Cell::from_char('#'));
                let bbox = Rect::new(
                    x1.min(x2), y1.min(y2),
                    (x1 - x2).abs() + 1, (y1 - y2).abs() + 1,
                );
                for y in 0..20 {
                    for x in 0..20 {
                        if char_at(&buf, x, y).is_some() {
                            prop_assert!(bbox.contains(x, y));
                        }
                    }
                }
                prop_assert_eq!(char_at(&buf, x1, y1), Some('#'));
                prop_assert_eq!(char_at(&buf, x2, y2), Some('#'));
            }

            #[test]
            fn out_of_grid_lines_never_paint(
                x1 in -30i32..30, y1 in -30i32..30, x2 in -30i32..30, y2 in -30i32..30,
            ) {
                let mut buf = Buffer::new(10, 10);
                prop_assume!(!buf.bounds().line(x1, y1, x2, y2));
                buf.draw_line(x1, y1, x2, y2, Cell::from_char('#'));
                prop_assert!(buf.is_blank());
            }

            #[test]
            fn text_only_touches_its_row(
                x in -10i32..20, y in 0i32..4, s in "[a-z]{0,12}",
            ) {
                let mut buf = Buffer::new(10, 4);
                buf.print_text(x, y, &s, Cell::EMPTY);
                for ry in 0..4 {
                    if ry != y {
                        prop_assert!(buf.row_cells(ry as u16).iter().all(Cell::is_empty));
                    }
                }
            }
        }
    }
}
