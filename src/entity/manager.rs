//! Live entity set and per-tick collision pass

use std::cell::RefCell;
use std::rc::Rc;

use super::entity::GameObject;
use crate::collision::{BoundingBox, Collision};
use crate::math::Vector2D;

/// Shared handle to a registered object.
///
/// Identity is pointer identity: registering the same handle twice makes it
/// participate twice.
pub type EntityRef = Rc<RefCell<dyn GameObject>>;

/// Wrap an object in a handle suitable for [`EntityManager::register`]
pub fn shared<T: GameObject + 'static>(object: T) -> EntityRef {
    Rc::new(RefCell::new(object))
}

/// True when both handles point at the same object
#[must_use]
pub fn same_entity(a: &EntityRef, b: &EntityRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Above this population the pairwise pass is worth a warning
const PAIRWISE_WARN_THRESHOLD: usize = 512;

/// Owns the live entity set and the collisions found on the latest tick.
///
/// Collision detection compares every unordered pair of non-pass-through
/// entities, which is quadratic in the population. That is fine for tens to
/// low hundreds of entities.
#[derive(Default)]
pub struct EntityManager {
    entities: Vec<EntityRef>,
    collisions: Vec<Collision>,
    tick_count: u64,
    population_warned: bool,
}

impl EntityManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to the live set. Duplicates are not filtered.
    pub fn register(&mut self, entity: EntityRef) {
        {
            let object = entity.borrow();
            let inner = object.entity();
            log::debug!(
                "Registered entity {} ({})",
                inner.id(),
                inner.name().unwrap_or("unnamed")
            );
        }
        self.entities.push(entity);

        if self.entities.len() > PAIRWISE_WARN_THRESHOLD && !self.population_warned {
            log::warn!(
                "{} entities registered; pairwise collision checks grow quadratically",
                self.entities.len()
            );
            self.population_warned = true;
        }
    }

    /// Remove the first registration of `entity`. Returns `false` if it was
    /// not registered.
    pub fn unregister(&mut self, entity: &EntityRef) -> bool {
        match self.entities.iter().position(|e| same_entity(e, entity)) {
            Some(index) => {
                let removed = self.entities.remove(index);
                log::debug!("Unregistered entity {}", removed.borrow().entity().id());
                true
            }
            None => false,
        }
    }

    /// Advance every entity by `delta` milliseconds in registration order,
    /// then rebuild the collision list from scratch.
    pub fn update(&mut self, delta: f32) {
        for entity in &self.entities {
            entity.borrow_mut().update(delta);
        }
        self.tick_count += 1;
        self.collisions = self.detect_collisions();
        log::trace!(
            "Tick {}: {} entities, {} collisions",
            self.tick_count,
            self.entities.len(),
            self.collisions.len()
        );
    }

    fn detect_collisions(&self) -> Vec<Collision> {
        // Snapshot boxes once so each entity is borrowed a single time
        let boxes: Vec<Option<BoundingBox>> = self
            .entities
            .iter()
            .map(|entity| {
                let object = entity.borrow();
                let inner = object.entity();
                (!inner.pass_through()).then(|| *inner.bounding_box())
            })
            .collect();

        let mut collisions = Vec::new();
        for i in 0..boxes.len() {
            let Some(first) = &boxes[i] else {
                continue;
            };
            for j in (i + 1)..boxes.len() {
                let Some(second) = &boxes[j] else {
                    continue;
                };
                let area = first.intersect(second);
                if !area.is_empty() {
                    collisions.push(Collision::new(
                        Rc::clone(&self.entities[i]),
                        Rc::clone(&self.entities[j]),
                        area,
                    ));
                }
            }
        }
        collisions
    }

    /// Registered entities in registration order
    #[must_use]
    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    /// Collisions found by the latest update
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Latest collisions that include `entity`
    pub fn collisions_involving<'a>(
        &'a self,
        entity: &'a EntityRef,
    ) -> impl Iterator<Item = &'a Collision> + 'a {
        self.collisions.iter().filter(move |c| c.involves(entity))
    }

    /// Entities whose bounding box contains `point`, in registration order
    #[must_use]
    pub fn entities_at(&self, point: Vector2D) -> Vec<EntityRef> {
        self.entities
            .iter()
            .filter(|entity| entity.borrow().entity().contains_point(point))
            .cloned()
            .collect()
    }

    /// Whether `entity` is registered at least once
    #[must_use]
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.entities.iter().any(|e| same_entity(e, entity))
    }

    /// Number of registrations
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of completed updates
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Drop every entity and collision
    pub fn clear(&mut self) {
        self.entities.clear();
        self.collisions.clear();
    }
}
