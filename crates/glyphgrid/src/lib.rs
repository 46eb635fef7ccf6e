#![forbid(unsafe_code)]

//! glyphgrid public facade.
//!
//! Re-exports the stable surface of the internal crates and a prelude for
//! day-to-day use.
//!
//! ```
//! use glyphgrid::prelude::*;
//!
//! let config = RendererConfig::from_json(r#"{ "grid": { "width": 20, "height": 3 } }"#)?;
//! let mut renderer = Renderer::new(config, RecordingSurface::new())?;
//!
//! let scene = renderer.scene_mut();
//! scene.draw_box(0, 0, 20, 3, &BoxOptions::titled("score"))?;
//! scene.text(2, 1, "1200", &Colors::fg("yellow"))?;
//!
//! let stats = renderer.render()?;
//! // Top and bottom borders (title included), two side cells, the text.
//! assert_eq!(stats.glyphs_drawn, 20 * 2 + 2 + 4);
//! # Ok::<(), glyphgrid::Error>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use glyphgrid_core::bounds::Bounds;
pub use glyphgrid_core::event::{
    HandlerId, InputEvent, InputRegistry, KeyCode, KeyEvent, Modifiers, PointerButton,
    PointerEvent, PointerKind,
};
pub use glyphgrid_core::geometry::{GridGeometry, GridPoint, PixelRect, Rect, Sides, Size};

// --- Render re-exports -----------------------------------------------------

pub use glyphgrid_render::buffer::Buffer;
pub use glyphgrid_render::cell::{Cell, CellContent, PackedRgba};
pub use glyphgrid_render::color::{ColorError, ColorRef};
pub use glyphgrid_render::compositor::Compositor;
pub use glyphgrid_render::config::{ConfigError, RendererConfig};
pub use glyphgrid_render::diff::{BufferDiff, ChangeRun, DiffEngine};
pub use glyphgrid_render::drawing::{Align, BorderStyle, Draw};
pub use glyphgrid_render::headless::{DrawOp, RecordingSurface};
pub use glyphgrid_render::layer::{Layer, LayerError, LayerStack};
pub use glyphgrid_render::painter::{CanvasPainter, PixelSurface, Surface, SurfaceError};
pub use glyphgrid_render::renderer::{FrameStats, Renderer};
pub use glyphgrid_render::scene::{BoxOptions, Colors, FillOptions, LineOptions, Scene};

// --- Widget re-exports -----------------------------------------------------

#[cfg(feature = "widgets")]
pub use glyphgrid_widgets::{
    LabelPosition, Menu, MenuHighlight, MenuOptions, MenuState, Panel, PanelOptions,
    ProgressBar, ProgressBarOptions, StatefulWidget, Widget,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use glyphgrid_web::CanvasSurface;
#[cfg(feature = "web")]
pub use glyphgrid_web::{input as web_input, style as web_style};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for glyphgrid apps.
pub type Error = glyphgrid_render::error::RenderError;

/// Standard result type for glyphgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Align, BorderStyle, BoxOptions, Cell, ColorRef, Colors, Error, FillOptions, FrameStats,
        GridGeometry, InputEvent, InputRegistry, KeyCode, KeyEvent, LineOptions, PackedRgba,
        PointerEvent, RecordingSurface, Rect, Renderer, RendererConfig, Result, Scene, Size,
        Surface,
    };

    #[cfg(feature = "widgets")]
    pub use crate::{Menu, MenuState, Panel, ProgressBar, StatefulWidget, Widget};
}
