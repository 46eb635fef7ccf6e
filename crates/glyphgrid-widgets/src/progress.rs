#![forbid(unsafe_code)]

//! Progress bar widget.

use glyphgrid_core::geometry::Rect;
use glyphgrid_render::color::ColorRef;
use glyphgrid_render::error::RenderError;
use glyphgrid_render::scene::{Colors, FillOptions, Scene};

use crate::{Widget, truncate};

/// Number of filled cells for `ratio` of `width`.
///
/// The ratio is clamped to `0.0..=1.0` (NaN counts as 0) and the product is
/// rounded half away from zero, so a width of 10 fills 3 cells at both
/// `0.33` and `0.25`.
pub fn filled_cells(width: i32, ratio: f64) -> i32 {
    if width <= 0 {
        return 0;
    }
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    (f64::from(width) * ratio).round() as i32
}

/// Where the label sits on the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPosition {
    Left,
    #[default]
    Center,
    Right,
}

/// Every option a progress bar recognises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBarOptions {
    /// Default `'█'`.
    pub filled_glyph: char,
    /// Default `'░'`.
    pub empty_glyph: char,
    /// Default fg `green`.
    pub filled_colors: Colors,
    /// Default fg `bright-black`.
    pub empty_colors: Colors,
    pub label: Option<String>,
    pub label_position: LabelPosition,
    /// Default fg `white`; a missing bg takes the bar's bg under each char.
    pub label_colors: Colors,
    /// Append `NN%` to the label (or show it alone).
    pub show_percentage: bool,
}

impl Default for ProgressBarOptions {
    fn default() -> Self {
        Self {
            filled_glyph: '█',
            empty_glyph: '░',
            filled_colors: Colors::fg("green"),
            empty_colors: Colors::fg("bright-black"),
            label: None,
            label_position: LabelPosition::Center,
            label_colors: Colors::fg("white"),
            show_percentage: false,
        }
    }
}

/// A horizontal bar filled proportionally to a ratio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressBar {
    ratio: f64,
    options: ProgressBarOptions,
}

impl ProgressBar {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio,
            options: ProgressBarOptions::default(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: ProgressBarOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn label_position(mut self, position: LabelPosition) -> Self {
        self.options.label_position = position;
        self
    }

    #[must_use]
    pub fn show_percentage(mut self, show: bool) -> Self {
        self.options.show_percentage = show;
        self
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Rounded percentage, `0..=100`.
    pub fn percentage(&self) -> u32 {
        filled_cells(100, self.ratio) as u32
    }

    /// Label text as drawn, before clipping to the bar.
    pub fn label_text(&self) -> Option<String> {
        let pct = self.options.show_percentage.then(|| format!("{}%", self.percentage()));
        match (&self.options.label, pct) {
            (Some(label), Some(pct)) => Some(format!("{label} {pct}")),
            (Some(label), None) => Some(label.clone()),
            (None, pct) => pct,
        }
    }

    fn label_bg(&self, x: i32, fill_end: i32) -> Option<ColorRef> {
        let run = if x < fill_end {
            &self.options.filled_colors
        } else {
            &self.options.empty_colors
        };
        self.options.label_colors.bg.clone().or_else(|| run.bg.clone())
    }
}

impl Widget for ProgressBar {
    fn render(&self, area: Rect, scene: &mut Scene) -> Result<(), RenderError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "ProgressBar",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        let opts = &self.options;
        for colors in [&opts.filled_colors, &opts.empty_colors, &opts.label_colors] {
            colors.validate()?;
        }
        if area.is_empty() {
            return Ok(());
        }
        let filled = filled_cells(area.width, self.ratio);

        if filled > 0 {
            scene.fill(area.x, area.y, filled, area.height, &FillOptions {
                glyph: opts.filled_glyph,
                colors: opts.filled_colors.clone(),
            })?;
        }
        if filled < area.width {
            scene.fill(area.x + filled, area.y, area.width - filled, area.height, &FillOptions {
                glyph: opts.empty_glyph,
                colors: opts.empty_colors.clone(),
            })?;
        }

        let Some(text) = self.label_text() else {
            return Ok(());
        };
        let text = truncate(&text, area.width);
        let len = text.chars().count() as i32;
        let x0 = match opts.label_position {
            LabelPosition::Left => area.x,
            LabelPosition::Center => area.x + (area.width - len) / 2,
            LabelPosition::Right => area.right() - len,
        };
        let y = area.y + area.height / 2;
        let fill_end = area.x + filled;
        for (i, ch) in text.chars().enumerate() {
            let x = x0 + i as i32;
            let colors = Colors::new(opts.label_colors.fg.clone(), self.label_bg(x, fill_end));
            scene.set_cell(x, y, ch, &colors)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphgrid_core::geometry::{GridGeometry, Size};
    use glyphgrid_render::cell::PackedRgba;

    fn scene(w: u16, h: u16) -> Scene {
        Scene::new(GridGeometry::new(Size::new(w, h), 10, 20))
    }

    fn row(scene: &Scene, y: u16) -> String {
        scene
            .active_layer()
            .unwrap()
            .buffer()
            .row_cells(y)
            .iter()
            .map(|c| c.glyph().unwrap_or('·'))
            .collect()
    }

    fn ascii(bar: ProgressBar) -> ProgressBar {
        let opts = ProgressBarOptions {
            filled_glyph: '#',
            empty_glyph: '-',
            ..bar.options.clone()
        };
        bar.options(opts)
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(filled_cells(10, 0.33), 3);
        assert_eq!(filled_cells(10, 0.25), 3);
        assert_eq!(filled_cells(10, 0.35), 4);
        assert_eq!(filled_cells(10, 0.249), 2);
        assert_eq!(filled_cells(4, 0.125), 1);
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(filled_cells(10, -0.5), 0);
        assert_eq!(filled_cells(10, 1.7), 10);
        assert_eq!(filled_cells(10, f64::NAN), 0);
        assert_eq!(filled_cells(0, 0.5), 0);
        assert_eq!(filled_cells(-4, 0.5), 0);
    }

    #[test]
    fn bar_draws_filled_then_empty_runs() {
        let mut s = scene(12, 1);
        ascii(ProgressBar::new(0.33))
            .render(Rect::new(1, 0, 10, 1), &mut s)
            .unwrap();
        assert_eq!(row(&s, 0), " ###------- ");
        let cell = s.cell(1, 0).unwrap().unwrap();
        assert_eq!(cell.fg, Some(PackedRgba::rgb(0, 205, 0)));
    }

    #[test]
    fn tie_fills_three_of_ten() {
        let mut s = scene(10, 1);
        ascii(ProgressBar::new(0.25))
            .render(Rect::new(0, 0, 10, 1), &mut s)
            .unwrap();
        assert_eq!(row(&s, 0), "###-------");
    }

    #[test]
    fn label_positions() {
        for (pos, expected) in [
            (LabelPosition::Left, "ab########"),
            (LabelPosition::Center, "####ab####"),
            (LabelPosition::Right, "########ab"),
        ] {
            let mut s = scene(10, 1);
            ascii(ProgressBar::new(1.0).label("ab").label_position(pos))
                .render(Rect::new(0, 0, 10, 1), &mut s)
                .unwrap();
            assert_eq!(row(&s, 0), expected, "{pos:?}");
        }
    }

    #[test]
    fn percentage_text() {
        let bar = ProgressBar::new(0.505).show_percentage(true);
        assert_eq!(bar.percentage(), 51);
        assert_eq!(bar.label_text().as_deref(), Some("51%"));
        let bar = bar.label("HP");
        assert_eq!(bar.label_text().as_deref(), Some("HP 51%"));
        assert_eq!(ProgressBar::new(0.5).label_text(), None);
    }

    #[test]
    fn label_takes_run_background() {
        let mut s = scene(4, 1);
        let opts = ProgressBarOptions {
            filled_colors: Colors::fg("green").with_bg("blue"),
            empty_colors: Colors::fg("white").with_bg("red"),
            label: Some("abcd".into()),
            ..ProgressBarOptions::default()
        };
        ProgressBar::new(0.5)
            .options(opts)
            .render(Rect::new(0, 0, 4, 1), &mut s)
            .unwrap();
        assert_eq!(s.cell(1, 0).unwrap().unwrap().bg, Some(PackedRgba::rgb(0, 0, 238)));
        assert_eq!(s.cell(2, 0).unwrap().unwrap().bg, Some(PackedRgba::rgb(205, 0, 0)));
        assert_eq!(row(&s, 0), "abcd");
    }

    #[test]
    fn long_label_is_clipped_to_bar() {
        let mut s = scene(8, 1);
        ascii(ProgressBar::new(0.0).label("abcdefgh"))
            .render(Rect::new(2, 0, 4, 1), &mut s)
            .unwrap();
        assert_eq!(row(&s, 0), "  abcd  ");
    }

    #[test]
    fn label_on_middle_row() {
        let mut s = scene(4, 3);
        ascii(ProgressBar::new(0.0).label("x"))
            .render(Rect::new(0, 0, 4, 3), &mut s)
            .unwrap();
        assert_eq!(row(&s, 0), "----");
        assert_eq!(row(&s, 1), "-x--");
        assert_eq!(row(&s, 2), "----");
    }

    #[test]
    fn empty_area_is_noop() {
        let mut s = scene(4, 1);
        ProgressBar::new(0.5).render(Rect::new(0, 0, 0, 1), &mut s).unwrap();
        assert!(s.active_layer().unwrap().buffer().is_blank());
    }

    #[test]
    fn any_unknown_colour_leaves_scene_untouched() {
        let bad = || Colors::fg("nope");
        let cases = [
            ProgressBarOptions {
                filled_colors: bad(),
                ..ProgressBarOptions::default()
            },
            ProgressBarOptions {
                empty_colors: bad(),
                ..ProgressBarOptions::default()
            },
            ProgressBarOptions {
                label: Some("hp".into()),
                label_colors: Colors::fg("white").with_bg("nope"),
                ..ProgressBarOptions::default()
            },
        ];
        for opts in cases {
            let mut s = scene(6, 1);
            let err = ProgressBar::new(0.5)
                .options(opts.clone())
                .render(Rect::new(0, 0, 6, 1), &mut s)
                .unwrap_err();
            assert_eq!(err.unknown_color(), Some("nope"), "{opts:?}");
            assert!(s.active_layer().unwrap().buffer().is_blank(), "{opts:?}");
        }
    }

    #[test]
    fn unused_label_colours_are_still_checked() {
        let mut s = scene(4, 1);
        let opts = ProgressBarOptions {
            label_colors: Colors::fg("nope"),
            ..ProgressBarOptions::default()
        };
        let result = ProgressBar::new(1.0).options(opts).render(Rect::new(0, 0, 4, 1), &mut s);
        assert!(result.is_err());
        assert!(s.active_layer().unwrap().buffer().is_blank());
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn filled_is_within_width(width in 0i32..500, ratio in -2.0f64..3.0) {
                let n = filled_cells(width, ratio);
                prop_assert!((0..=width).contains(&n));
            }

            #[test]
            fn filled_is_monotonic_in_ratio(width in 1i32..200, a in 0.0f64..1.0, b in 0.0f64..1.0) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(filled_cells(width, lo) <= filled_cells(width, hi));
            }
        }
    }
}
