#![forbid(unsafe_code)]

//! Named layers and the layer stack.
//!
//! Insertion order is z-order: the first layer created is the bottom of the
//! stack. Selecting a layer never reorders it. The stack tracks one *active*
//! layer that receives draw calls; removing it leaves no active layer until
//! another is selected.

use std::fmt;

use glyphgrid_core::geometry::Size;

use crate::buffer::Buffer;

/// Layer lookup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// The named layer does not exist (never created, or removed).
    InvalidLayer { name: String },
    /// No layer has been selected yet.
    NoActiveLayer,
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLayer { name } => write!(f, "invalid layer: {name:?}"),
            Self::NoActiveLayer => write!(f, "no active layer"),
        }
    }
}

impl std::error::Error for LayerError {}

/// One named cell buffer.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    buffer: Buffer,
    visible: bool,
}

impl Layer {
    fn new(name: &str, size: Size) -> Self {
        Self {
            name: name.to_owned(),
            buffer: Buffer::new(size.width, size.height),
            visible: true,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Clone)]
enum Active {
    /// Nothing selected yet.
    None,
    Index(usize),
    /// The active layer was removed; draws report this name.
    Removed(String),
}

/// Ordered set of layers, bottom first.
#[derive(Debug, Clone)]
pub struct LayerStack {
    size: Size,
    layers: Vec<Layer>,
    active: Active,
}

impl LayerStack {
    /// Empty stack whose layers will all be `size` cells.
    ///
    /// # Panics
    ///
    /// Creating a layer panics if either dimension is 0.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            layers: Vec::new(),
            active: Active::None,
        }
    }

    #[inline]
    pub const fn size(&self) -> Size {
        self.size
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// Make `name` the active layer, creating it on top if missing.
    pub fn select(&mut self, name: &str) -> &mut Layer {
        let idx = match self.position(name) {
            Some(idx) => idx,
            None => {
                self.layers.push(Layer::new(name, self.size));
                glyphgrid_core::debug!(layer = name, depth = self.layers.len(), "layer created");
                self.layers.len() - 1
            }
        };
        self.active = Active::Index(idx);
        &mut self.layers[idx]
    }

    /// Remove a layer and return it.
    pub fn remove(&mut self, name: &str) -> Result<Layer, LayerError> {
        let idx = self.position(name).ok_or_else(|| LayerError::InvalidLayer {
            name: name.to_owned(),
        })?;
        let layer = self.layers.remove(idx);
        self.active = match std::mem::replace(&mut self.active, Active::None) {
            Active::Index(a) if a == idx => Active::Removed(layer.name.clone()),
            Active::Index(a) if a > idx => Active::Index(a - 1),
            other => other,
        };
        glyphgrid_core::debug!(layer = name, "layer removed");
        Ok(layer)
    }

    /// Layer names bottom → top.
    pub fn order(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|l| l.name.as_str())
    }

    /// Layers bottom → top.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Show or hide a layer.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), LayerError> {
        let layer = self.get_mut(name).ok_or_else(|| LayerError::InvalidLayer {
            name: name.to_owned(),
        })?;
        layer.visible = visible;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }

    /// The layer receiving draw calls.
    pub fn active(&self) -> Result<&Layer, LayerError> {
        match &self.active {
            Active::Index(i) => Ok(&self.layers[*i]),
            Active::Removed(name) => Err(LayerError::InvalidLayer { name: name.clone() }),
            Active::None => Err(LayerError::NoActiveLayer),
        }
    }

    /// Buffer of the active layer, for drawing.
    pub fn active_buffer_mut(&mut self) -> Result<&mut Buffer, LayerError> {
        match &self.active {
            Active::Index(i) => Ok(&mut self.layers[*i].buffer),
            Active::Removed(name) => Err(LayerError::InvalidLayer { name: name.clone() }),
            Active::None => Err(LayerError::NoActiveLayer),
        }
    }

    /// Clear every layer's buffer. Layers themselves are kept.
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.buffer.clear();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
