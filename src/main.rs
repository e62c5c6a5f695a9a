//! Headless demo: a crate falls onto a row of bricks while a cart rolls by

use std::rc::Rc;

use sprite2d::prelude::*;

/// Downward acceleration in units per second squared
const GRAVITY: f32 = 400.0;

/// An entity that accelerates downward until it is made static
struct FallingCrate {
    entity: Entity,
}

impl GameObject for FallingCrate {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn update(&mut self, delta: f32) {
        if !self.entity.is_static() {
            let velocity = self.entity.velocity() + Vector2D::new(0.0, GRAVITY * delta / 1000.0);
            self.entity.set_velocity(velocity);
        }
        self.entity.update(delta);
    }
}

/// Demo game with a falling crate, static bricks and a composite cart
#[derive(Default)]
struct DemoGame {
    falling: Option<EntityRef>,
    cart: Option<EntityRef>,
}

impl Game for DemoGame {
    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError> {
        log::info!("Initializing demo game");

        ctx.textures.insert(Texture::new("crate", 32, 32));
        ctx.textures.insert(Texture::new("brick", 64, 16));
        ctx.textures.insert(Texture::new("cart", 96, 24));
        ctx.textures.insert(Texture::new("wheel", 12, 12));

        let viewport = ctx.viewport();
        let floor = viewport.y - 40.0;

        // Row of bricks along the floor
        let brick_width = 64.0;
        let mut x = 0.0;
        while x < viewport.x {
            let brick = EntityBuilder::new()
                .with_name("brick")
                .with_location(Vector2D::new(x, floor))
                .with_static(true)
                .with_texture_from(&ctx.textures, "brick")?
                .build()?;
            ctx.entities.register(shared(brick));
            x += brick_width + 2.0;
        }

        let entity = EntityBuilder::new()
            .with_name("crate")
            .with_location(Vector2D::new(viewport.x * 0.5, 40.0))
            .with_angular_velocity(90.0)
            .with_texture_from(&ctx.textures, "crate")?
            .build()?;
        let falling = shared(FallingCrate { entity });
        ctx.entities.register(Rc::clone(&falling));
        self.falling = Some(falling);

        let wheel = |name: &str| {
            EntityBuilder::new()
                .with_name(name)
                .with_angular_velocity(360.0)
                .with_pass_through(true)
                .with_texture_from(&ctx.textures, "wheel")
                .and_then(EntityBuilder::build)
        };
        let cart = ComplexEntity::builder(
            EntityBuilder::new()
                .with_name("cart")
                .with_location(Vector2D::new(0.0, floor - 60.0))
                .with_velocity(Vector2D::new(120.0, 0.0))
                .with_texture_from(&ctx.textures, "cart")?,
        )
        .with_part("front wheel", Vector2D::new(72.0, 20.0), wheel("front wheel")?)
        .with_part("rear wheel", Vector2D::new(12.0, 20.0), wheel("rear wheel")?)
        .build()?;
        let cart = shared(cart);
        ctx.entities.register(Rc::clone(&cart));
        self.cart = Some(cart);

        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        if ctx.input.is_key_just_pressed(KeyCode::Escape) {
            ctx.quit();
            return;
        }

        for collision in ctx.entities.collisions() {
            let (first, second) = collision.ids();
            log::debug!(
                "Collision {first} / {second}: {} points, area {:.1}",
                collision.area().len(),
                collision.area().area()
            );
        }

        let landed = self.falling.as_ref().is_some_and(|falling| {
            ctx.entities.collisions_involving(falling).any(|collision| {
                collision
                    .other(falling)
                    .is_some_and(|other| other.borrow().entity().is_static())
            })
        });
        if let Some(falling) = self.falling.take_if(|_| landed) {
            let mut object = falling.borrow_mut();
            let entity = object.entity_mut();
            entity.set_velocity(Vector2D::ZERO);
            entity.set_angular_velocity(0.0);
            entity.set_static(true);
            log::info!(
                "Crate landed at {} after {} ticks",
                entity.location(),
                ctx.time.tick_count()
            );
        }

        // Wrap the cart around the viewport
        if let Some(cart) = &self.cart {
            let location = cart.borrow().entity().location();
            if location.x > ctx.viewport().x {
                cart.borrow_mut()
                    .teleport(Vector2D::new(-96.0, location.y));
            }
        }
    }

    fn render(&mut self, ctx: &mut EngineContext, frame_delta_ms: f32) {
        if !ctx.debug.enabled {
            return;
        }
        let frame = ctx.overlay().compose();
        log::trace!(
            "Frame after {frame_delta_ms:.1}ms: {} lines, {} shapes",
            frame.lines.len(),
            frame.shapes.len()
        );
    }

    fn shutdown(&mut self, ctx: &mut EngineContext) {
        log::info!(
            "Demo finished: {} entities, {} collisions on the last tick",
            ctx.entities.len(),
            ctx.entities.collisions().len()
        );
    }
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {path}: {e}");
                return;
            }
        },
        None => EngineConfig::default()
            .with_title("Sprite Demo")
            .with_max_ticks(300),
    };

    let engine = Engine::new(config, DemoGame::default());

    if let Err(e) = engine.run() {
        eprintln!("Engine error: {}", e);
    }
}
