//! End-to-end tick scenarios

use std::rc::Rc;
use std::time::Duration;

use sprite2d::prelude::*;

fn square(x: f32, y: f32, size: f32) -> EntityBuilder {
    EntityBuilder::new().at(x, y).with_size(size, size)
}

fn close(a: Vector2D, b: Vector2D) -> bool {
    (a - b).abs().max_element() < 1e-3
}

#[test]
fn test_overlapping_squares_report_one_collision() {
    let mut manager = EntityManager::new();
    let a = shared(square(0.0, 0.0, 10.0).build().unwrap());
    let b = shared(square(5.0, 5.0, 10.0).build().unwrap());
    manager.register(Rc::clone(&a));
    manager.register(Rc::clone(&b));

    manager.update(16.0);

    assert_eq!(manager.collisions().len(), 1);
    let collision = &manager.collisions()[0];
    assert!(same_entity(collision.entity1(), &a));
    assert!(same_entity(collision.entity2(), &b));
    assert_eq!(collision.area().len(), 4);
    assert!((collision.area().area() - 25.0).abs() < 1e-2);
}

#[test]
fn test_composite_part_follows_parent() {
    let part = square(0.0, 0.0, 4.0).build().unwrap();
    let complex = ComplexEntity::builder(square(100.0, 100.0, 20.0))
        .with_part("arm", Vector2D::new(10.0, 0.0), part)
        .build()
        .unwrap();

    let mut manager = EntityManager::new();
    let handle = shared(complex);
    manager.register(Rc::clone(&handle));
    manager.update(16.0);

    // Parent and part overlap, but only the parent is registered
    assert!(manager.collisions().is_empty());

    handle.borrow_mut().teleport(Vector2D::new(200.0, 50.0));
    manager.update(16.0);
    let object = handle.borrow();
    assert!(close(object.entity().location(), Vector2D::new(200.0, 50.0)));
}

#[test]
fn test_composite_part_location_after_update() {
    let part = square(0.0, 0.0, 4.0).build().unwrap();
    let mut complex = ComplexEntity::builder(square(100.0, 100.0, 20.0))
        .with_part("arm", Vector2D::new(10.0, 0.0), part)
        .build()
        .unwrap();

    complex.update(16.0);

    let arm = complex.part("arm").unwrap();
    assert!(close(arm.entity().location(), Vector2D::new(110.0, 100.0)));
}

#[test]
fn test_duplicate_registration_collides_with_itself() {
    let mut manager = EntityManager::new();
    let handle = shared(square(0.0, 0.0, 10.0).build().unwrap());
    manager.register(Rc::clone(&handle));
    manager.register(Rc::clone(&handle));

    manager.update(0.0);

    assert_eq!(manager.collisions().len(), 1);
    assert!(manager.collisions()[0].is_self_collision());
    assert_eq!(manager.collisions()[0].area().len(), 4);
}

#[test]
fn test_zero_delta_is_idempotent() {
    let mut manager = EntityManager::new();
    manager.register(shared(
        square(0.0, 0.0, 10.0)
            .with_velocity(Vector2D::new(50.0, 20.0))
            .with_angular_velocity(45.0)
            .build()
            .unwrap(),
    ));
    manager.register(shared(square(8.0, 2.0, 10.0).with_rotation(15.0).build().unwrap()));

    manager.update(0.0);
    let before: Vec<BoundingBox> = manager
        .entities()
        .iter()
        .map(|e| *e.borrow().entity().bounding_box())
        .collect();
    let collisions_before = manager.collisions().len();

    manager.update(0.0);
    let after: Vec<BoundingBox> = manager
        .entities()
        .iter()
        .map(|e| *e.borrow().entity().bounding_box())
        .collect();

    assert_eq!(before, after);
    assert_eq!(manager.collisions().len(), collisions_before);
}

#[test]
fn test_static_entities_ignore_velocity() {
    let mut manager = EntityManager::new();
    let wall = shared(
        square(0.0, 0.0, 10.0)
            .with_static(true)
            .with_velocity(Vector2D::new(100.0, 0.0))
            .build()
            .unwrap(),
    );
    manager.register(Rc::clone(&wall));
    manager.update(1000.0);
    assert_eq!(wall.borrow().entity().location(), Vector2D::ZERO);
}

#[test]
fn test_vector_properties() {
    let v = Vector2D::new(12.5, -3.0);
    let w = Vector2D::new(0.25, 7.0);
    assert!(close((v + w) - w, v));
    assert!(close(v * 2.0, Vector2D::new(25.0, -6.0)));
    assert!(((v.normalize()).length() - 1.0).abs() < 1e-6);
    assert!(!Vector2D::ZERO.normalize().is_finite());
}

struct Dropper {
    ticks: u32,
}

impl Game for Dropper {
    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        ctx.textures.insert(Texture::new("ball", 8, 8));
        let ball = EntityBuilder::new()
            .with_name("ball")
            .at(0.0, 0.0)
            .with_velocity(Vector2D::new(0.0, 100.0))
            .with_texture_from(&ctx.textures, "ball")?
            .build()?;
        ctx.entities.register(shared(ball));
        let floor = square(0.0, 20.0, 40.0).with_static(true).build()?;
        ctx.entities.register(shared(floor));
        Ok(())
    }

    fn update(&mut self, _ctx: &mut EngineContext) {
        self.ticks += 1;
    }
}

#[test]
fn test_engine_steps_drive_collisions() {
    let mut engine = Engine::new(EngineConfig::default(), Dropper { ticks: 0 });
    engine.init().unwrap();

    // Ball spans 0..8 vertically and falls 1 unit per 10ms tick
    engine.step(Duration::from_millis(10));
    assert!(engine.context().entities.collisions().is_empty());

    for _ in 0..12 {
        engine.step(Duration::from_millis(10));
    }
    assert_eq!(engine.game().ticks, 13);
    assert_eq!(engine.context().entities.collisions().len(), 1);
}

#[test]
fn test_missing_texture_fails_init() {
    struct NeedsTexture;

    impl Game for NeedsTexture {
        fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
            EntityBuilder::new()
                .with_texture_from(&ctx.textures, "missing")?
                .build()?;
            Ok(())
        }

        fn update(&mut self, _ctx: &mut EngineContext) {}
    }

    let mut engine = Engine::new(EngineConfig::default(), NeedsTexture);
    assert!(matches!(engine.init(), Err(EngineError::Entity(_))));
}
