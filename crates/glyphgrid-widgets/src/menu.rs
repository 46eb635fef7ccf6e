#![forbid(unsafe_code)]

//! Vertical menu with a caller-owned selection.

use glyphgrid_core::geometry::Rect;
use glyphgrid_render::error::RenderError;
use glyphgrid_render::scene::{Colors, Scene};

use crate::{StatefulWidget, truncate};

/// How the selected row stands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuHighlight {
    /// Swap fg and bg across the whole row.
    #[default]
    Inverted,
    /// Prefix the row with the indicator glyph; other rows get blanks.
    Indicator,
}

/// Every option a menu recognises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOptions {
    /// Default fg `white`, bg `black`.
    pub colors: Colors,
    pub highlight: MenuHighlight,
    /// Default `'>'`; used by [`MenuHighlight::Indicator`].
    pub indicator: char,
    /// Colours of the selected row in indicator mode; `None` reuses `colors`.
    pub selected_colors: Option<Colors>,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            colors: Colors::fg("white").with_bg("black"),
            highlight: MenuHighlight::Inverted,
            indicator: '>',
            selected_colors: None,
        }
    }
}

/// Selection and scroll offset, owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub selected: Option<usize>,
    /// First visible item.
    pub offset: usize,
}

impl MenuState {
    pub fn with_selected(index: usize) -> Self {
        Self {
            selected: Some(index),
            offset: 0,
        }
    }

    /// Set the selected item index, or `None` to deselect.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
        if index.is_none() {
            self.offset = 0;
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Move to the next item, clamping at the last. Selects the first item
    /// when nothing is selected.
    pub fn select_next(&mut self, item_count: usize) {
        if item_count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(item_count - 1),
            None => 0,
        });
    }

    /// Move to the previous item, clamping at 0.
    pub fn select_previous(&mut self) {
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }
}

/// One row per item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<String>,
    options: MenuOptions,
}

impl Menu {
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            options: MenuOptions::default(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: MenuOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn highlight(mut self, highlight: MenuHighlight) -> Self {
        self.options.highlight = highlight;
        self
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn row_colors(&self, selected: bool) -> Colors {
        let base = &self.options.colors;
        match (selected, self.options.highlight) {
            (false, _) => base.clone(),
            (true, MenuHighlight::Inverted) => Colors::new(base.bg.clone(), base.fg.clone()),
            (true, MenuHighlight::Indicator) => {
                self.options.selected_colors.clone().unwrap_or_else(|| base.clone())
            }
        }
    }

    fn row_text(&self, item: &str, selected: bool, width: i32) -> String {
        let mut text = String::with_capacity(width.max(0) as usize);
        if self.options.highlight == MenuHighlight::Indicator {
            text.push(if selected { self.options.indicator } else { ' ' });
            text.push(' ');
        }
        text.push_str(item);
        let mut text = truncate(&text, width).to_owned();
        let pad = width - text.chars().count() as i32;
        text.extend(std::iter::repeat_n(' ', pad.max(0) as usize));
        text
    }
}

impl StatefulWidget for Menu {
    type State = MenuState;

    fn render(&self, area: Rect, scene: &mut Scene, state: &mut MenuState) -> Result<(), RenderError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Menu",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        self.options.colors.validate()?;
        if let Some(colors) = &self.options.selected_colors {
            colors.validate()?;
        }
        if self.items.is_empty() {
            state.selected = None;
            state.offset = 0;
            return Ok(());
        }
        if let Some(selected) = state.selected
            && selected >= self.items.len()
        {
            state.selected = Some(self.items.len() - 1);
        }
        if area.is_empty() {
            return Ok(());
        }

        // Keep the selection in view.
        let rows = area.height as usize;
        state.offset = state.offset.min(self.items.len() - 1);
        if let Some(selected) = state.selected {
            if selected < state.offset {
                state.offset = selected;
            } else if selected >= state.offset + rows {
                state.offset = selected + 1 - rows;
            }
        }

        for (row, (index, item)) in self
            .items
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(rows)
            .enumerate()
        {
            let selected = state.selected == Some(index);
            let text = self.row_text(item, selected, area.width);
            scene.text(area.x, area.y + row as i32, &text, &self.row_colors(selected))?;
        }
        Ok(())
    }
}
