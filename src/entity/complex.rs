//! Composite entities built from offset parts
//!
//! Parts follow their parent by translation only: the parent's rotation and
//! scaling do not reach the parts' geometry.

use std::fmt;

use super::entity::{Entity, EntityBuilder, EntityError, GameObject};
use crate::math::Vector2D;

/// A child object placed at a fixed offset from its parent's location
pub struct Part {
    id: String,
    offset: Vector2D,
    object: Box<dyn GameObject>,
}

impl Part {
    /// Unique id within the parent
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Offset from the parent's location
    #[must_use]
    pub fn offset(&self) -> Vector2D {
        self.offset
    }

    /// The part itself
    #[must_use]
    pub fn object(&self) -> &dyn GameObject {
        self.object.as_ref()
    }

    /// The part itself, mutably
    pub fn object_mut(&mut self) -> &mut dyn GameObject {
        self.object.as_mut()
    }

    /// Shorthand for the part's entity
    #[must_use]
    pub fn entity(&self) -> &Entity {
        self.object.entity()
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("id", &self.id)
            .field("offset", &self.offset)
            .field("entity", &self.object.entity().id())
            .finish()
    }
}

/// An entity that drags a list of parts along with it.
///
/// Parts are never registered with the entity manager themselves; the parent's
/// `update` advances them and then snaps them back to `location + offset`.
#[derive(Debug)]
pub struct ComplexEntity {
    entity: Entity,
    parts: Vec<Part>,
}

impl ComplexEntity {
    /// Start building a composite from the parent's entity parameters
    #[must_use]
    pub fn builder(entity: EntityBuilder) -> ComplexEntityBuilder {
        ComplexEntityBuilder::new(entity)
    }

    /// Parts in insertion order
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Look up a part by id
    #[must_use]
    pub fn part(&self, id: &str) -> Option<&dyn GameObject> {
        self.parts
            .iter()
            .find(|part| part.id == id)
            .map(|part| part.object.as_ref())
    }

    pub fn part_mut(&mut self, id: &str) -> Option<&mut (dyn GameObject + 'static)> {
        self.parts
            .iter_mut()
            .find(|part| part.id == id)
            .map(|part| part.object.as_mut())
    }

    /// Append a part and place it at `location + offset`
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::DuplicatePart`] if the id is already taken
    pub fn add_part(
        &mut self,
        id: impl Into<String>,
        offset: Vector2D,
        object: impl GameObject + 'static,
    ) -> Result<(), EntityError> {
        let id = id.into();
        if self.parts.iter().any(|part| part.id == id) {
            return Err(EntityError::DuplicatePart(id));
        }
        let mut object: Box<dyn GameObject> = Box::new(object);
        object.teleport(self.entity.location() + offset);
        self.parts.push(Part { id, offset, object });
        Ok(())
    }

    /// Detach a part, `None` if there is no such id
    pub fn remove_part(&mut self, id: &str) -> Option<Box<dyn GameObject>> {
        let index = self.parts.iter().position(|part| part.id == id)?;
        Some(self.parts.remove(index).object)
    }

    /// Change a part's offset and re-place it. Returns `false` if absent.
    pub fn set_part_offset(&mut self, id: &str, offset: Vector2D) -> bool {
        let origin = self.entity.location();
        match self.parts.iter_mut().find(|part| part.id == id) {
            Some(part) => {
                part.offset = offset;
                part.object.teleport(origin + offset);
                true
            }
            None => false,
        }
    }

    fn place_parts(&mut self) {
        let origin = self.entity.location();
        for part in &mut self.parts {
            part.object.teleport(origin + part.offset);
        }
    }
}

impl GameObject for ComplexEntity {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    /// Update the parent, then each part in order: the part's own update runs
    /// first and sees its pre-teleport location, then it is snapped to the
    /// parent's new location plus its offset.
    fn update(&mut self, delta: f32) {
        self.entity.update(delta);
        let origin = self.entity.location();
        for part in &mut self.parts {
            part.object.update(delta);
            part.object.teleport(origin + part.offset);
        }
    }

    fn teleport(&mut self, location: Vector2D) {
        self.entity.teleport(location);
        self.place_parts();
    }
}

/// Builder for [`ComplexEntity`]
pub struct ComplexEntityBuilder {
    entity: EntityBuilder,
    parts: Vec<(String, Vector2D, Box<dyn GameObject>)>,
}

impl ComplexEntityBuilder {
    #[must_use]
    pub fn new(entity: EntityBuilder) -> Self {
        Self {
            entity,
            parts: Vec::new(),
        }
    }

    /// Add a part at `offset` from the parent's location
    #[must_use]
    pub fn with_part(
        mut self,
        id: impl Into<String>,
        offset: Vector2D,
        object: impl GameObject + 'static,
    ) -> Self {
        let object: Box<dyn GameObject> = Box::new(object);
        self.parts.push((id.into(), offset, object));
        self
    }

    /// Build the parent and place every part
    ///
    /// # Errors
    ///
    /// Returns an error if the parent fails to build or two parts share an id
    pub fn build(self) -> Result<ComplexEntity, EntityError> {
        let entity = self.entity.build()?;
        let mut parts: Vec<Part> = Vec::with_capacity(self.parts.len());
        for (id, offset, object) in self.parts {
            if parts.iter().any(|part| part.id == id) {
                return Err(EntityError::DuplicatePart(id));
            }
            parts.push(Part { id, offset, object });
        }

        let mut complex = ComplexEntity { entity, parts };
        complex.place_parts();
        Ok(complex)
    }
}
