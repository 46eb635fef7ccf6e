#![forbid(unsafe_code)]

//! Bordered panel with a title and text content.

use glyphgrid_core::bounds::Bounds;
use glyphgrid_core::geometry::{Rect, Sides};
use glyphgrid_render::drawing::{Align, BorderStyle};
use glyphgrid_render::error::RenderError;
use glyphgrid_render::scene::{BoxOptions, Colors, FillOptions, Scene};

use crate::{Widget, truncate};

/// Every option a panel recognises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelOptions {
    /// Default single-line.
    pub border: BorderStyle,
    /// Border colours.
    pub colors: Colors,
    pub title: Option<String>,
    /// Default centred.
    pub title_align: Align,
    pub title_colors: Option<Colors>,
    /// Interior fill; default blank so old content does not show through.
    pub fill: Option<FillOptions>,
    /// Space between border and content. Default one column each side.
    pub padding: Sides,
    pub content_colors: Colors,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            border: BorderStyle::Single,
            colors: Colors::default(),
            title: None,
            title_align: Align::Center,
            title_colors: None,
            fill: Some(FillOptions::default()),
            padding: Sides {
                top: 0,
                right: 1,
                bottom: 0,
                left: 1,
            },
            content_colors: Colors::default(),
        }
    }
}

/// Box + title + content lines clipped to the padded interior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    lines: Vec<String>,
    options: PanelOptions,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn options(mut self, options: PanelOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn lines<I, T>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Content area of a panel drawn at `area`.
    pub fn inner(&self, area: Rect) -> Rect {
        area.inner(Sides::all(1)).inner(self.options.padding)
    }
}

impl Widget for Panel {
    fn render(&self, area: Rect, scene: &mut Scene) -> Result<(), RenderError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Panel",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        let opts = &self.options;
        opts.colors.validate()?;
        opts.content_colors.validate()?;
        if let Some(colors) = &opts.title_colors {
            colors.validate()?;
        }
        if let Some(fill) = &opts.fill {
            fill.colors.validate()?;
        }

        // Same rule as boxes: a panel is drawn whole or not at all.
        if !Bounds::from_size(scene.size()).rect_fits(area.x, area.y, area.width, area.height) {
            return Ok(());
        }

        scene.draw_box(area.x, area.y, area.width, area.height, &BoxOptions {
            style: opts.border,
            colors: opts.colors.clone(),
            fill: opts.fill.clone(),
            title: opts.title.clone(),
            title_align: opts.title_align,
            title_colors: opts.title_colors.clone(),
        })?;

        let inner = self.inner(area);
        if inner.is_empty() {
            return Ok(());
        }
        for (row, line) in self.lines.iter().take(inner.height as usize).enumerate() {
            let text = truncate(line, inner.width);
            scene.text(inner.x, inner.y + row as i32, text, &opts.content_colors)?;
        }
        Ok(())
    }
}
