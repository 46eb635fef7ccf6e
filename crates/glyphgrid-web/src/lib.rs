#![forbid(unsafe_code)]

//! Browser frontend for glyphgrid.
//!
//! - [`CanvasSurface`] paints through a `CanvasRenderingContext2d`
//!   (wasm32 only).
//! - [`style`] builds the CSS colour and font strings the canvas consumes.
//! - [`input`] turns DOM key and pointer data into grid-space events.
//!
//! Native builds compile the helpers only, so the workspace checks and tests
//! on non-wasm targets.

pub mod input;
pub mod style;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
