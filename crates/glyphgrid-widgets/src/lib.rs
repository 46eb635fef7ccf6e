#![forbid(unsafe_code)]

//! Widgets built from scene primitives: progress bar, menu, and panel.
//!
//! Every widget takes an explicit options struct whose `Default` spells out
//! each recognised option, and renders into a [`Rect`] of the active layer.

pub mod menu;
pub mod panel;
pub mod progress;

pub use menu::{Menu, MenuHighlight, MenuOptions, MenuState};
pub use panel::{Panel, PanelOptions};
pub use progress::{LabelPosition, ProgressBar, ProgressBarOptions, filled_cells};

use glyphgrid_core::geometry::Rect;
use glyphgrid_render::error::RenderError;
use glyphgrid_render::scene::Scene;

/// A `Widget` renders itself into an area of the scene's active layer.
pub trait Widget {
    /// Draw into `area`; cells outside it are left alone.
    fn render(&self, area: Rect, scene: &mut Scene) -> Result<(), RenderError>;
}

/// A `StatefulWidget` renders from caller-owned state.
pub trait StatefulWidget {
    type State;

    fn render(&self, area: Rect, scene: &mut Scene, state: &mut Self::State) -> Result<(), RenderError>;
}

/// First `max` chars of `text`; empty when `max <= 0`.
pub(crate) fn truncate(text: &str, max: i32) -> &str {
    let max = usize::try_from(max).unwrap_or(0);
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
