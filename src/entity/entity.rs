//! Positioned, rotatable, scalable simulation objects
//!
//! An [`Entity`] owns its transform and a bounding box derived from it. All
//! transform fields are private: every mutator recomputes the box before it
//! returns, so a box read from an entity is never stale.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::assets::{TextureHandle, TextureProvider};
use crate::collision::BoundingBox;
use crate::math::{Vector2D, rotate_about};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything the entity manager can drive each tick.
///
/// Implemented by [`Entity`] itself, by composites, and by game types that
/// wrap an entity and add their own behaviour in `update`.
pub trait GameObject {
    /// The entity carrying this object's transform and bounding box
    fn entity(&self) -> &Entity;

    /// Mutable access to the underlying entity
    fn entity_mut(&mut self) -> &mut Entity;

    /// Advance by `delta` milliseconds. The bounding box must be current on return.
    fn update(&mut self, delta: f32) {
        self.entity_mut().update(delta);
    }

    /// Move instantly to `location`. The bounding box must be current on return.
    fn teleport(&mut self, location: Vector2D) {
        self.entity_mut().teleport(location);
    }
}

/// A simulation object with a transform and a derived bounding box
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: Option<String>,
    /// Top-left world anchor
    location: Vector2D,
    /// Degrees, clockwise-positive about `location + center_of_mass`
    rotation: f32,
    /// Rotation pivot, relative to `location`
    center_of_mass: Vector2D,
    scaling: Vector2D,
    is_static: bool,
    /// Total extra width and height added around the scaled sprite
    expansion: Vector2D,
    pass_through: bool,
    /// Units per second
    velocity: Vector2D,
    /// Degrees per second
    angular_velocity: f32,
    intrinsic_size: Vector2D,
    texture: Option<TextureHandle>,
    bounding_box: BoundingBox,
}

impl Entity {
    /// Start building an entity
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::new()
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    /// Process-unique id
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Optional debug name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Top-left world anchor
    #[must_use]
    #[inline]
    pub fn location(&self) -> Vector2D {
        self.location
    }

    /// Rotation in degrees, within `[0, 360)`
    #[must_use]
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotation pivot relative to the location
    #[must_use]
    #[inline]
    pub fn center_of_mass(&self) -> Vector2D {
        self.center_of_mass
    }

    /// Rotation pivot in world space
    #[must_use]
    pub fn world_center_of_mass(&self) -> Vector2D {
        self.location + self.center_of_mass
    }

    /// Scale factors applied to the intrinsic size
    #[must_use]
    #[inline]
    pub fn scaling(&self) -> Vector2D {
        self.scaling
    }

    /// Check if the entity ignores its own motion
    #[must_use]
    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Extra hitbox size around the scaled sprite
    #[must_use]
    #[inline]
    pub fn expansion(&self) -> Vector2D {
        self.expansion
    }

    /// Check if the entity is skipped by collision detection
    #[must_use]
    #[inline]
    pub fn pass_through(&self) -> bool {
        self.pass_through
    }

    /// Velocity in units per second
    #[must_use]
    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    /// Angular velocity in degrees per second
    #[must_use]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Unscaled size taken from the texture or given explicitly
    #[must_use]
    pub fn intrinsic_size(&self) -> Vector2D {
        self.intrinsic_size
    }

    /// Texture the intrinsic size came from, if any
    #[must_use]
    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    /// Current bounding box, always consistent with the transform
    #[must_use]
    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Pointer hit test against the bounding box
    #[must_use]
    pub fn contains_point(&self, point: Vector2D) -> bool {
        self.bounding_box.is_inside(point)
    }

    // -------------------------------------------------------------------------
    // Transform protocol
    // -------------------------------------------------------------------------

    /// Advance motion by `delta` milliseconds and refresh the bounding box.
    ///
    /// Static entities keep their transform.
    pub fn update(&mut self, delta: f32) {
        if !self.is_static {
            let seconds = delta / 1000.0;
            self.location += self.velocity * seconds;
            if self.angular_velocity != 0.0 {
                self.rotation = normalize_degrees(self.rotation + self.angular_velocity * seconds);
            }
        }
        self.refresh_bounding_box();
    }

    /// Overwrite the location
    pub fn teleport(&mut self, location: Vector2D) {
        self.location = location;
        self.refresh_bounding_box();
    }

    /// Move by an offset
    pub fn translate(&mut self, offset: Vector2D) {
        self.location += offset;
        self.refresh_bounding_box();
    }

    /// Set the rotation in degrees, wrapped into `[0, 360)`
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
        self.refresh_bounding_box();
    }

    /// Turn by `degrees`, clockwise-positive
    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(self.rotation + degrees);
        self.refresh_bounding_box();
    }

    /// Move the rotation pivot
    pub fn set_center_of_mass(&mut self, center_of_mass: Vector2D) {
        self.center_of_mass = center_of_mass;
        self.refresh_bounding_box();
    }

    /// Set the scale factors
    pub fn set_scaling(&mut self, scaling: Vector2D) {
        self.scaling = scaling;
        self.refresh_bounding_box();
    }

    /// Set the extra hitbox size
    pub fn set_expansion(&mut self, expansion: Vector2D) {
        self.expansion = expansion;
        self.refresh_bounding_box();
    }

    // Flags and motion do not touch the box until the next update

    /// Freeze or unfreeze motion
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    /// Include or exclude the entity from collision detection
    pub fn set_pass_through(&mut self, pass_through: bool) {
        self.pass_through = pass_through;
    }

    /// Set velocity in units per second
    pub fn set_velocity(&mut self, velocity: Vector2D) {
        self.velocity = velocity;
    }

    /// Set angular velocity in degrees per second
    pub fn set_angular_velocity(&mut self, degrees_per_second: f32) {
        self.angular_velocity = degrees_per_second;
    }

    /// Set the debug name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    fn refresh_bounding_box(&mut self) {
        self.bounding_box = compute_bounding_box(
            self.location,
            self.rotation,
            self.center_of_mass,
            self.scaling,
            self.expansion,
            self.intrinsic_size,
        );
    }
}

/// A clone is a new entity: it copies the transform but draws a fresh id.
impl Clone for Entity {
    fn clone(&self) -> Self {
        Self {
            id: EntityId::next(),
            name: self.name.clone(),
            location: self.location,
            rotation: normalize_degrees(self.rotation),
            center_of_mass: self.center_of_mass,
            scaling: self.scaling,
            is_static: self.is_static,
            expansion: self.expansion,
            pass_through: self.pass_through,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
            intrinsic_size: self.intrinsic_size,
            texture: self.texture.clone(),
            bounding_box: self.bounding_box,
        }
    }
}

impl GameObject for Entity {
    fn entity(&self) -> &Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut Entity {
        self
    }
}

/// Wrap an angle into `[0, 360)`
fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Derive the collision box from a transform.
///
/// The scaled sprite grows by `expansion` split evenly on both sides, then the
/// whole rectangle turns about the pivot. A rectangle rotated about an
/// arbitrary pivot is the same rectangle rotated about its own (moved) center,
/// which is the form [`BoundingBox`] stores.
fn compute_bounding_box(
    location: Vector2D,
    rotation: f32,
    center_of_mass: Vector2D,
    scaling: Vector2D,
    expansion: Vector2D,
    intrinsic_size: Vector2D,
) -> BoundingBox {
    let size = (intrinsic_size * scaling).abs() + expansion;
    let top_left = location - expansion * 0.5;
    let pivot = location + center_of_mass;
    let center = rotate_about(top_left + size * 0.5, pivot, rotation);
    BoundingBox::new(center - size * 0.5, size.x, size.y, rotation)
}

/// Errors raised while constructing entities
#[derive(Debug, Clone, PartialEq)]
pub enum EntityError {
    /// The texture provider has nothing under this name
    MissingTexture(String),
    /// Neither a texture nor an explicit size was given
    NoTexture,
    /// A transform parameter is NaN or infinite
    InvalidParameter(&'static str),
    /// Two parts of a composite share an id
    DuplicatePart(String),
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTexture(name) => write!(f, "Missing texture: {name}"),
            Self::NoTexture => write!(f, "Entity has neither a texture nor a size"),
            Self::InvalidParameter(field) => write!(f, "Invalid value for {field}"),
            Self::DuplicatePart(id) => write!(f, "Duplicate part id: {id}"),
        }
    }
}

impl std::error::Error for EntityError {}

/// Named-field constructor for [`Entity`]
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    name: Option<String>,
    location: Vector2D,
    rotation: f32,
    center_of_mass: Option<Vector2D>,
    scaling: Vector2D,
    is_static: bool,
    expansion: Vector2D,
    pass_through: bool,
    velocity: Vector2D,
    angular_velocity: f32,
    size: Option<Vector2D>,
    texture: Option<TextureHandle>,
}

impl Default for EntityBuilder {
    fn default() -> Self {
        Self {
            name: None,
            location: Vector2D::ZERO,
            rotation: 0.0,
            center_of_mass: None,
            scaling: Vector2D::ONE,
            is_static: false,
            expansion: Vector2D::ZERO,
            pass_through: false,
            velocity: Vector2D::ZERO,
            angular_velocity: 0.0,
            size: None,
            texture: None,
        }
    }
}

impl EntityBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Vector2D) -> Self {
        self.location = location;
        self
    }

    /// Shorthand for [`with_location`](Self::with_location)
    #[must_use]
    pub fn at(self, x: f32, y: f32) -> Self {
        self.with_location(Vector2D::new(x, y))
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Rotation pivot relative to the location. Defaults to the middle of the
    /// scaled sprite.
    #[must_use]
    pub fn with_center_of_mass(mut self, center_of_mass: Vector2D) -> Self {
        self.center_of_mass = Some(center_of_mass);
        self
    }

    #[must_use]
    pub fn with_scaling(mut self, scaling: Vector2D) -> Self {
        self.scaling = scaling;
        self
    }

    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    #[must_use]
    pub fn with_expansion(mut self, expansion: Vector2D) -> Self {
        self.expansion = expansion;
        self
    }

    #[must_use]
    pub fn with_pass_through(mut self, pass_through: bool) -> Self {
        self.pass_through = pass_through;
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_angular_velocity(mut self, degrees_per_second: f32) -> Self {
        self.angular_velocity = degrees_per_second;
        self
    }

    /// Intrinsic size for entities without a texture, e.g. trigger volumes
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Vector2D::new(width, height));
        self
    }

    #[must_use]
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Resolve a texture by name from `provider`
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::MissingTexture`] if the provider has no such texture
    pub fn with_texture_from(
        self,
        provider: &impl TextureProvider,
        name: &str,
    ) -> Result<Self, EntityError> {
        let texture = provider
            .texture(name)
            .ok_or_else(|| EntityError::MissingTexture(name.to_string()))?;
        Ok(self.with_texture(texture))
    }

    /// Validate the parameters and build the entity
    ///
    /// # Errors
    ///
    /// Returns an error if no size source was given or a parameter is not finite
    pub fn build(self) -> Result<Entity, EntityError> {
        let intrinsic_size = match (&self.texture, self.size) {
            (_, Some(size)) => size,
            (Some(texture), None) => texture.size(),
            (None, None) => return Err(EntityError::NoTexture),
        };

        let checks = [
            ("location", self.location.is_finite()),
            ("rotation", self.rotation.is_finite()),
            ("scaling", self.scaling.is_finite()),
            ("expansion", self.expansion.is_finite()),
            ("velocity", self.velocity.is_finite()),
            ("angular_velocity", self.angular_velocity.is_finite()),
            ("size", intrinsic_size.is_finite()),
            (
                "center_of_mass",
                self.center_of_mass.is_none_or(|c| c.is_finite()),
            ),
        ];
        if let Some(&(field, _)) = checks.iter().find(|(_, ok)| !*ok) {
            return Err(EntityError::InvalidParameter(field));
        }

        let center_of_mass = self
            .center_of_mass
            .unwrap_or_else(|| (intrinsic_size * self.scaling).abs() * 0.5);

        let mut entity = Entity {
            id: EntityId::next(),
            name: self.name,
            location: self.location,
            rotation: normalize_degrees(self.rotation),
            center_of_mass,
            scaling: self.scaling,
            is_static: self.is_static,
            expansion: self.expansion,
            pass_through: self.pass_through,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
            intrinsic_size,
            texture: self.texture,
            bounding_box: BoundingBox::axis_aligned(Vector2D::ZERO, 0.0, 0.0),
        };
        entity.refresh_bounding_box();
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Texture, TextureLibrary};
    use crate::math::approx_eq;

    fn square(x: f32, y: f32, size: f32) -> Entity {
        EntityBuilder::new()
            .at(x, y)
            .with_size(size, size)
            .build()
            .unwrap()
    }

    #[test]
    fn test_box_matches_unrotated_sprite() {
        let entity = square(5.0, 7.0, 10.0);
        let bbox = entity.bounding_box();
        assert_eq!(bbox.location(), Vector2D::new(5.0, 7.0));
        assert_eq!(bbox.size(), Vector2D::new(10.0, 10.0));
        assert_eq!(bbox.rotation(), 0.0);
        assert_eq!(entity.center_of_mass(), Vector2D::new(5.0, 5.0));
    }

    #[test]
    fn test_scaling_and_expansion() {
        let entity = EntityBuilder::new()
            .at(100.0, 100.0)
            .with_size(10.0, 20.0)
            .with_scaling(Vector2D::new(2.0, 0.5))
            .with_expansion(Vector2D::new(4.0, 2.0))
            .build()
            .unwrap();

        let bbox = entity.bounding_box();
        assert_eq!(bbox.size(), Vector2D::new(24.0, 12.0));
        assert_eq!(bbox.location(), Vector2D::new(98.0, 99.0));
    }

    #[test]
    fn test_rotation_about_off_center_pivot() {
        // 10x10 at origin turned 90 degrees about its top-left corner swings
        // into negative x.
        let entity = EntityBuilder::new()
            .with_size(10.0, 10.0)
            .with_center_of_mass(Vector2D::ZERO)
            .with_rotation(90.0)
            .build()
            .unwrap();

        let bbox = entity.bounding_box();
        assert!(approx_eq(bbox.center(), Vector2D::new(-5.0, 5.0)));
        assert!(bbox.is_inside(Vector2D::new(-9.0, 1.0)));
        assert!(!bbox.is_inside(Vector2D::new(9.0, 1.0)));
    }

    #[test]
    fn test_teleport_refreshes_box() {
        let mut entity = square(0.0, 0.0, 10.0);
        entity.teleport(Vector2D::new(50.0, -20.0));
        assert_eq!(entity.location(), Vector2D::new(50.0, -20.0));
        assert_eq!(entity.bounding_box().location(), Vector2D::new(50.0, -20.0));
    }

    #[test]
    fn test_mutators_refresh_box() {
        let mut entity = square(0.0, 0.0, 10.0);

        entity.set_scaling(Vector2D::splat(3.0));
        assert_eq!(entity.bounding_box().size(), Vector2D::splat(30.0));

        entity.set_expansion(Vector2D::new(2.0, 0.0));
        assert_eq!(entity.bounding_box().width(), 32.0);

        entity.set_rotation(45.0);
        assert_eq!(entity.bounding_box().rotation(), 45.0);

        entity.translate(Vector2D::new(1.0, 1.0));
        assert_eq!(entity.location(), Vector2D::new(1.0, 1.0));
    }

    #[test]
    fn test_update_integrates_velocity() {
        let mut entity = EntityBuilder::new()
            .with_size(4.0, 4.0)
            .with_velocity(Vector2D::new(100.0, -50.0))
            .with_angular_velocity(90.0)
            .build()
            .unwrap();

        entity.update(500.0);
        assert!(approx_eq(entity.location(), Vector2D::new(50.0, -25.0)));
        assert!((entity.rotation() - 45.0).abs() < 1e-4);
        assert!(approx_eq(
            entity.bounding_box().center(),
            Vector2D::new(52.0, -23.0)
        ));
    }

    #[test]
    fn test_static_entity_does_not_move() {
        let mut entity = EntityBuilder::new()
            .with_size(4.0, 4.0)
            .with_static(true)
            .with_velocity(Vector2D::new(100.0, 0.0))
            .build()
            .unwrap();

        entity.update(1000.0);
        assert_eq!(entity.location(), Vector2D::ZERO);
    }

    #[test]
    fn test_texture_sets_intrinsic_size() {
        let mut library = TextureLibrary::new();
        library.insert(Texture::new("portalPurpleClose", 24, 48));

        let entity = EntityBuilder::new()
            .with_texture_from(&library, "portalPurpleClose")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(entity.intrinsic_size(), Vector2D::new(24.0, 48.0));
        assert_eq!(entity.texture().map(|t| t.name()), Some("portalPurpleClose"));
    }

    #[test]
    fn test_construction_errors() {
        let library = TextureLibrary::new();
        let missing = EntityBuilder::new().with_texture_from(&library, "leftCornerBrick");
        assert_eq!(
            missing.unwrap_err(),
            EntityError::MissingTexture("leftCornerBrick".to_string())
        );

        assert_eq!(
            EntityBuilder::new().build().unwrap_err(),
            EntityError::NoTexture
        );

        let nan = EntityBuilder::new()
            .with_size(1.0, 1.0)
            .with_rotation(f32::NAN)
            .build();
        assert_eq!(nan.unwrap_err(), EntityError::InvalidParameter("rotation"));
    }

    #[test]
    fn test_zero_size_entity_is_degenerate() {
        let entity = square(0.0, 0.0, 0.0);
        assert!(entity.bounding_box().is_degenerate());
        assert!(!entity.contains_point(Vector2D::ZERO));
    }

    #[test]
    fn test_clone_draws_fresh_id() {
        let original = square(3.0, 4.0, 10.0);
        let copy = original.clone();
        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.location(), original.location());
        assert_eq!(copy.bounding_box(), original.bounding_box());
    }

    #[test]
    fn test_rotation_wraps_the_same_way_everywhere() {
        let mut set = square(0.0, 0.0, 10.0);
        set.set_rotation(-90.0);

        let mut turned = square(0.0, 0.0, 10.0);
        turned.rotate_by(-90.0);

        let mut spun = EntityBuilder::new()
            .with_size(10.0, 10.0)
            .with_angular_velocity(-90.0)
            .build()
            .unwrap();
        spun.update(1000.0);

        let built = EntityBuilder::new()
            .with_size(10.0, 10.0)
            .with_rotation(-90.0)
            .build()
            .unwrap();

        for entity in [&set, &turned, &spun, &built] {
            assert!((entity.rotation() - 270.0).abs() < 1e-4);
        }

        set.set_rotation(720.0);
        assert_eq!(set.rotation(), 0.0);
        turned.rotate_by(450.0);
        assert!((turned.rotation() - 0.0).abs() < 1e-4);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.0, 0.0, 1.0);
        assert_ne!(a.id(), b.id());
    }
}
