#![forbid(unsafe_code)]

//! Renderer configuration.
//!
//! Deserializable from JSON; every field has a default so partial documents
//! are accepted:
//!
//! ```
//! use glyphgrid_render::config::RendererConfig;
//!
//! let cfg = RendererConfig::from_json(r#"{ "grid": { "width": 40 }, "autoClear": true }"#).unwrap();
//! assert_eq!(cfg.grid.width, 40);
//! assert_eq!(cfg.grid.height, 25);
//! assert!(cfg.auto_clear);
//! ```

use std::fmt;

use glyphgrid_core::geometry::{GridGeometry, Size};
use serde::{Deserialize, Serialize};

use crate::cell::PackedRgba;
use crate::color::{ColorError, ColorRef, resolve};

/// Grid size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 25,
        }
    }
}

/// Cell size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    /// Size in pixels at scale 1.
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "monospace".to_owned(),
            size: 16.0,
        }
    }
}

/// Default colours for cells that leave fg/bg unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub fg: String,
    pub bg: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            fg: "white".to_owned(),
            bg: "black".to_owned(),
        }
    }
}

/// Top-level renderer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub grid: GridConfig,
    pub cell: CellConfig,
    pub font: FontConfig,
    pub colors: ColorsConfig,
    /// Clear every layer after each committed frame.
    #[serde(alias = "autoClear")]
    pub auto_clear: bool,
}

/// Invalid configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A size field is zero.
    ZeroSize { field: &'static str },
    /// Font size is not a positive finite number.
    InvalidFontSize(f32),
    /// A default colour does not resolve.
    Color {
        field: &'static str,
        source: ColorError,
    },
    /// JSON parse failure.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize { field } => write!(f, "config: {field} must be > 0"),
            Self::InvalidFontSize(size) => write!(f, "config: invalid font size {size}"),
            Self::Color { field, source } => write!(f, "config: {field}: {source}"),
            Self::Parse(err) => write!(f, "config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Color { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl RendererConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize back to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject zero sizes, bad font sizes and unknown default colours.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("grid.width", self.grid.width),
            ("grid.height", self.grid.height),
            ("cell.width", self.cell.width),
            ("cell.height", self.cell.height),
        ];
        if let Some((field, _)) = sizes.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroSize { field: *field });
        }
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(ConfigError::InvalidFontSize(self.font.size));
        }
        self.default_colors().map(|_| ())
    }

    /// Resolved `(fg, bg)` defaults.
    pub fn default_colors(&self) -> Result<(PackedRgba, PackedRgba), ConfigError> {
        let fg = resolve(&ColorRef::from(self.colors.fg.clone())).map_err(|source| {
            ConfigError::Color {
                field: "colors.fg",
                source,
            }
        })?;
        let bg = resolve(&ColorRef::from(self.colors.bg.clone())).map_err(|source| {
            ConfigError::Color {
                field: "colors.bg",
                source,
            }
        })?;
        Ok((fg, bg))
    }

    /// Grid and cell dimensions.
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(
            Size::new(self.grid.width, self.grid.height),
            self.cell.width,
            self.cell.height,
        )
    }
}
