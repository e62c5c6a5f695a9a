//! A 2D sprite simulation core built in Rust
//!
//! This crate provides:
//! - Entities with position, rotation, scaling and a derived bounding box
//! - Composite entities whose parts follow the parent
//! - Rotated-rectangle collision detection with overlap regions
//! - A fixed-rate tick driver with input tracking and a debug overlay

pub mod assets;
pub mod collision;
pub mod core;
pub mod entity;
pub mod input;
pub mod math;

// Re-exports for convenience
pub use glam;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::assets::{Texture, TextureHandle, TextureLibrary, TextureProvider};
    pub use crate::collision::{BoundingBox, Collision, CollisionArea};
    pub use crate::core::{
        DebugInfo, DebugOverlay, Engine, EngineConfig, EngineContext, EngineError, Game,
        OverlayFrame, Time,
    };
    pub use crate::entity::{
        ComplexEntity, Entity, EntityBuilder, EntityId, EntityManager, EntityRef, GameObject,
        same_entity, shared,
    };
    pub use crate::input::Input;
    pub use crate::math::{Vector2D, rotate_about};
    pub use winit::keyboard::KeyCode;
}
