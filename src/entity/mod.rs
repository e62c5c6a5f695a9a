//! Entity model
//!
//! Plain entities, composites built from offset parts, and the manager that
//! drives them each tick and collects their collisions.

mod complex;
#[allow(clippy::module_inception)]
mod entity;
mod manager;

pub use complex::{ComplexEntity, ComplexEntityBuilder, Part};
pub use entity::{Entity, EntityBuilder, EntityError, EntityId, GameObject};
pub use manager::{EntityManager, EntityRef, same_entity, shared};
