//! Pairwise collision record

use std::fmt;

use super::area::CollisionArea;
use crate::entity::{EntityId, EntityRef, same_entity};

/// Two registered entities whose bounding boxes touched during a tick.
///
/// Records are rebuilt from scratch every tick and never mutated. The overlap
/// region is captured at detection time, so it stays valid even if the
/// entities move before the record is read.
#[derive(Clone)]
pub struct Collision {
    entity1: EntityRef,
    entity2: EntityRef,
    ids: (EntityId, EntityId),
    area: CollisionArea,
}

impl Collision {
    pub(crate) fn new(entity1: EntityRef, entity2: EntityRef, area: CollisionArea) -> Self {
        let ids = (entity1.borrow().entity().id(), entity2.borrow().entity().id());
        Self {
            entity1,
            entity2,
            ids,
            area,
        }
    }

    /// Earlier entity in registration order
    #[must_use]
    pub fn entity1(&self) -> &EntityRef {
        &self.entity1
    }

    /// Later entity in registration order
    #[must_use]
    pub fn entity2(&self) -> &EntityRef {
        &self.entity2
    }

    /// Ids of both participants, in registration order
    #[must_use]
    pub fn ids(&self) -> (EntityId, EntityId) {
        self.ids
    }

    /// Overlap region of the two boxes at detection time
    #[must_use]
    pub fn area(&self) -> &CollisionArea {
        &self.area
    }

    /// True when `entity` is one of the participants
    #[must_use]
    pub fn involves(&self, entity: &EntityRef) -> bool {
        same_entity(&self.entity1, entity) || same_entity(&self.entity2, entity)
    }

    /// True when both sides are the same entity (registered twice)
    #[must_use]
    pub fn is_self_collision(&self) -> bool {
        same_entity(&self.entity1, &self.entity2)
    }

    /// The participant that is not `entity`, if `entity` takes part
    #[must_use]
    pub fn other(&self, entity: &EntityRef) -> Option<&EntityRef> {
        if same_entity(&self.entity1, entity) {
            Some(&self.entity2)
        } else if same_entity(&self.entity2, entity) {
            Some(&self.entity1)
        } else {
            None
        }
    }
}

impl fmt::Debug for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collision")
            .field("entity1", &self.ids.0)
            .field("entity2", &self.ids.1)
            .field("area", &self.area)
            .finish()
    }
}
