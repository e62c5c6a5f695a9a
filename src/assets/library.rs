//! Named texture registry
//!
//! Entities receive textures through a [`TextureProvider`] passed in at
//! construction time rather than looking them up globally.

use std::path::Path;

use rustc_hash::FxHashMap;

use super::texture::{Texture, TextureError, TextureHandle};

/// Source of textures by name
pub trait TextureProvider {
    /// Look up a texture, `None` when nothing is registered under `name`
    fn texture(&self, name: &str) -> Option<TextureHandle>;
}

/// Texture storage keyed by name
#[derive(Debug, Default)]
pub struct TextureLibrary {
    by_name: FxHashMap<String, TextureHandle>,
}

impl TextureLibrary {
    /// Create an empty library
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture and return its handle.
    ///
    /// A texture already registered under the same name is kept and its
    /// handle returned instead.
    pub fn insert(&mut self, texture: Texture) -> TextureHandle {
        if let Some(existing) = self.by_name.get(texture.name()) {
            return existing.clone();
        }
        let name = texture.name().to_string();
        let handle = TextureHandle::new(texture);
        log::debug!(
            "Registered texture '{}' ({}x{})",
            name,
            handle.width(),
            handle.height()
        );
        self.by_name.insert(name, handle.clone());
        handle
    }

    /// Read an image file's dimensions and register it under `name`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as an image
    pub fn load(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, TextureError> {
        let name = name.into();
        if let Some(existing) = self.by_name.get(&name) {
            return Ok(existing.clone());
        }
        let texture = Texture::from_path(name, path)?;
        Ok(self.insert(texture))
    }

    /// Get a texture by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<TextureHandle> {
        self.by_name.get(name).cloned()
    }

    /// Check if a texture is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Remove a texture; entities already holding its handle keep it alive
    pub fn remove(&mut self, name: &str) -> Option<TextureHandle> {
        self.by_name.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterate over all registered handles
    pub fn iter(&self) -> impl Iterator<Item = &TextureHandle> {
        self.by_name.values()
    }
}

impl TextureProvider for TextureLibrary {
    fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.get(name)
    }
}
