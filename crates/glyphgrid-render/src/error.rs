#![forbid(unsafe_code)]

//! Umbrella error for scene and renderer calls.
//!
//! Out-of-bounds drawing is never an error; it clips or no-ops. Everything
//! here signals a caller mistake or an output failure, and the failing call
//! leaves prior frame state intact.

use std::fmt;

use crate::color::ColorError;
use crate::config::ConfigError;
use crate::layer::LayerError;
use crate::painter::SurfaceError;

#[derive(Debug)]
pub enum RenderError {
    Color(ColorError),
    Layer(LayerError),
    Surface(SurfaceError),
    Config(ConfigError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(e) => fmt::Display::fmt(e, f),
            Self::Layer(e) => fmt::Display::fmt(e, f),
            Self::Surface(e) => fmt::Display::fmt(e, f),
            Self::Config(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Color(e) => Some(e),
            Self::Layer(e) => Some(e),
            Self::Surface(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ColorError> for RenderError {
    fn from(e: ColorError) -> Self {
        Self::Color(e)
    }
}

impl From<LayerError> for RenderError {
    fn from(e: LayerError) -> Self {
        Self::Layer(e)
    }
}

impl From<SurfaceError> for RenderError {
    fn from(e: SurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<ConfigError> for RenderError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl RenderError {
    /// The unknown colour name, if this is a colour failure.
    pub fn unknown_color(&self) -> Option<&str> {
        match self {
            Self::Color(ColorError::UnknownColor { name }) => Some(name),
            _ => None,
        }
    }

    pub fn is_layer_error(&self) -> bool {
        matches!(self, Self::Layer(_))
    }
}
