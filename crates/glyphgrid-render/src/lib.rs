#![forbid(unsafe_code)]

//! Render kernel: cells, layers, compositing, diffs, and painting.
//!
//! One frame flows through:
//!
//! 1. [`scene::Scene`] draw calls write into the active layer of a
//!    [`layer::LayerStack`].
//! 2. [`compositor::Compositor`] flattens visible layers into a resolved grid.
//! 3. [`diff::DiffEngine`] finds the cells that changed since the last frame.
//! 4. [`painter::CanvasPainter`] paints only those cells onto a
//!    [`painter::Surface`].
//!
//! [`renderer::Renderer`] ties the steps together.

pub mod buffer;
pub mod cell;
pub mod color;
pub mod compositor;
pub mod config;
pub mod diff;
pub mod drawing;
pub mod error;
pub mod headless;
pub mod layer;
pub mod painter;
pub mod renderer;
pub mod scene;

pub use error::RenderError;

/// Common imports for drawing and rendering.
pub mod prelude {
    pub use crate::buffer::Buffer;
    pub use crate::cell::{Cell, CellContent, PackedRgba};
    pub use crate::color::ColorRef;
    pub use crate::config::RendererConfig;
    pub use crate::drawing::{Align, BorderStyle, Draw};
    pub use crate::error::RenderError;
    pub use crate::painter::{Surface, SurfaceError};
    pub use crate::renderer::{FrameStats, Renderer};
    pub use crate::scene::{BoxOptions, Colors, FillOptions, LineOptions, Scene};
}
