//! Texture metadata consumed by entity construction
//!
//! Provides texture handles and a name-based library implementing
//! [`TextureProvider`].

mod library;
mod texture;

pub use library::{TextureLibrary, TextureProvider};
pub use texture::{Texture, TextureError, TextureHandle};
