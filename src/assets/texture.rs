//! Texture metadata and shared handles
//!
//! The simulation core only needs a texture's intrinsic size; pixel data is
//! the renderer's business.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::Vector2D;

/// Global counter for generating unique texture IDs
static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Named image dimensions used to size entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    name: String,
    width: u32,
    height: u32,
    path: Option<PathBuf>,
}

impl Texture {
    /// Describe a texture with known dimensions
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            path: None,
        }
    }

    /// Read the dimensions of an image file without decoding its pixels
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header is not a
    /// supported image format
    pub fn from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TextureError::IoError(format!(
                "{} does not exist",
                path.display()
            )));
        }
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| TextureError::DecodeError(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            width,
            height,
            path: Some(path.to_path_buf()),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Source file, when loaded from disk
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Intrinsic size in world units
    #[must_use]
    pub fn size(&self) -> Vector2D {
        Vector2D::new(self.width as f32, self.height as f32)
    }
}

/// Cheap, shareable reference to a [`Texture`].
///
/// Handles compare by id, so two handles are equal only when they came from
/// the same registration.
#[derive(Debug, Clone)]
pub struct TextureHandle {
    id: u64,
    inner: Arc<Texture>,
}

impl TextureHandle {
    /// Wrap a texture in a new handle with a fresh id
    #[must_use]
    pub fn new(texture: Texture) -> Self {
        Self {
            id: next_id(),
            inner: Arc::new(texture),
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Number of live handles to this texture
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TextureHandle {}

impl Hash for TextureHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Deref for TextureHandle {
    type Target = Texture;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Errors that can occur while reading texture metadata
#[derive(Debug, Clone)]
pub enum TextureError {
    /// File could not be read
    IoError(String),
    /// File is not a recognised image
    DecodeError(String),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for TextureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_size() {
        let texture = Texture::new("brick", 32, 16);
        assert_eq!(texture.size(), Vector2D::new(32.0, 16.0));
        assert_eq!(texture.name(), "brick");
        assert!(texture.path().is_none());
    }

    #[test]
    fn test_handle_identity() {
        let a = TextureHandle::new(Texture::new("a", 1, 1));
        let b = a.clone();
        let c = TextureHandle::new(Texture::new("a", 1, 1));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.strong_count(), 2);
        assert_eq!(b.width(), 1);
    }

    #[test]
    fn test_from_missing_path() {
        let result = Texture::from_path("ghost", "does/not/exist.png");
        assert!(matches!(result, Err(TextureError::IoError(_))));
    }

    #[test]
    fn test_from_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        image::RgbaImage::new(12, 7).save(&path).unwrap();

        let texture = Texture::from_path("sprite", &path).unwrap();
        assert_eq!((texture.width(), texture.height()), (12, 7));
        assert_eq!(texture.path(), Some(path.as_path()));
    }
}
