//! Collision detection
//!
//! Rotated bounding boxes, the overlap regions between them, and the
//! per-tick collision records produced by the entity manager.

mod area;
mod bounding_box;
mod record;

pub use area::CollisionArea;
pub use bounding_box::BoundingBox;
pub use record::Collision;
