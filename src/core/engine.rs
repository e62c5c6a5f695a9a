//! Core Engine struct and fixed-rate tick loop

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::config::{ConfigError, EngineConfig};
use super::debug::DebugInfo;
use super::overlay::DebugOverlay;
use super::time::Time;
use crate::assets::{TextureError, TextureLibrary};
use crate::entity::{EntityError, EntityManager};
use crate::input::Input;

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once before the first tick
    ///
    /// # Errors
    ///
    /// An error aborts startup and is returned from [`Engine::run`]
    fn init(&mut self, _engine: &mut EngineContext) -> Result<(), EngineError> {
        Ok(())
    }

    /// Called every tick after the entity pass
    fn update(&mut self, engine: &mut EngineContext);

    /// Called after a tick when a frame is due
    fn render(&mut self, _engine: &mut EngineContext, _frame_delta_ms: f32) {}

    /// Called once when the loop stops
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Context passed to game callbacks
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// Input state
    pub input: Input,
    /// Live entities and their latest collisions
    pub entities: EntityManager,
    /// Textures available to entity construction
    pub textures: TextureLibrary,
    /// Debug information and stats
    pub debug: DebugInfo,
    /// Viewport size in world units
    viewport: Vec2,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    fn new(config: &EngineConfig) -> Self {
        let mut debug = DebugInfo::new();
        debug.enabled = config.debug_overlay;
        Self {
            time: Time::new(),
            input: Input::new(),
            entities: EntityManager::new(),
            textures: TextureLibrary::new(),
            debug,
            viewport: config.viewport,
            should_quit: false,
        }
    }

    /// Viewport size in world units
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Overlay over the current state. Compose it from `render`.
    #[must_use]
    pub fn overlay(&self) -> DebugOverlay<'_> {
        DebugOverlay::new(&self.entities, &self.input, &self.debug, self.viewport)
    }

    /// Feed a window event from a hosting event loop into the input state.
    /// Returns `true` if the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(key_code) => self.input.process_keyboard(key_code, event.state),
                PhysicalKey::Unidentified(_) => false,
            },
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(*button, *state);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .process_mouse_motion(Vec2::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x as f32, pos.y as f32),
                };
                log::trace!("Ignoring scroll {scroll}");
                false
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                self.quit();
                true
            }
            _ => false,
        }
    }

    /// Request engine shutdown at the end of the current tick
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
    initialized: bool,
    since_frame: Duration,
}

impl<G: Game> Engine<G> {
    /// Create a new engine with the given game
    pub fn new(config: EngineConfig, game: G) -> Self {
        let context = EngineContext::new(&config);
        Self {
            config,
            game,
            context,
            initialized: false,
            since_frame: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    #[must_use]
    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Initialize the game once. Later calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns the error from [`Game::init`]
    pub fn init(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Ok(());
        }
        self.game.init(&mut self.context)?;
        self.initialized = true;
        log::info!(
            "Engine initialized: {} entities, {} textures",
            self.context.entities.len(),
            self.context.textures.len()
        );
        Ok(())
    }

    /// Run exactly one tick with a given delta, without touching the clock.
    ///
    /// Returns `false` once the engine should stop.
    pub fn step(&mut self, delta: Duration) -> bool {
        self.context.time.advance(delta);
        self.run_tick(delta)
    }

    fn run_tick(&mut self, delta: Duration) -> bool {
        let delta_ms = delta.as_secs_f32() * 1000.0;
        self.context.debug.record_tick(delta);
        self.context.entities.update(delta_ms);
        self.game.update(&mut self.context);

        self.since_frame += delta;
        if self.frame_due() {
            let frame_delta = std::mem::take(&mut self.since_frame);
            self.context.debug.record_frame(frame_delta);
            self.game
                .render(&mut self.context, frame_delta.as_secs_f32() * 1000.0);
        }

        self.context.input.end_frame();
        !self.finished()
    }

    fn frame_due(&self) -> bool {
        match self.config.frames_per_second {
            0 => true,
            fps => self.since_frame >= Duration::from_secs(1) / fps,
        }
    }

    fn finished(&self) -> bool {
        self.context.should_quit()
            || self
                .config
                .max_ticks
                .is_some_and(|max| self.context.time.tick_count() >= max)
    }

    /// Run the engine until the game quits or `max_ticks` is reached.
    ///
    /// Ticks are paced to `ticks_per_second`. Pacing is best-effort: a tick
    /// that overruns its slot delays the next one instead of being skipped.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable config or a failed [`Game::init`]
    pub fn run(mut self) -> Result<(), EngineError> {
        // A host may already have installed a logger
        let _ = env_logger::try_init();
        log::info!("Starting engine: {}", self.config.title);

        self.config.validate()?;
        self.init()?;

        let interval = Duration::from_secs_f64(1.0 / f64::from(self.config.ticks_per_second));
        self.context.time.reset_clock();
        let mut deadline = Instant::now() + interval;

        loop {
            let now = Instant::now();
            if let Some(wait) = deadline.checked_duration_since(now) {
                thread::sleep(wait);
            }

            let delta = self.context.time.tick();
            if !self.run_tick(delta) {
                break;
            }

            let now = Instant::now();
            if now > deadline + interval {
                log::warn!(
                    "Tick {} overran its slot by {:.2}ms",
                    self.context.time.tick_count(),
                    (now - deadline - interval).as_secs_f32() * 1000.0
                );
                deadline = now + interval;
            } else {
                deadline += interval;
            }
        }

        self.game.shutdown(&mut self.context);
        log::info!(
            "Engine stopped after {} ticks ({:.2}s)",
            self.context.time.tick_count(),
            self.context.time.elapsed().as_secs_f32()
        );
        Ok(())
    }
}

/// Errors that stop the engine from starting
#[derive(Debug)]
pub enum EngineError {
    /// Invalid configuration
    Config(ConfigError),
    /// A texture failed to load
    Texture(TextureError),
    /// An entity could not be built
    Entity(EntityError),
    /// Game-specific startup failure
    Init(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Config error: {e}"),
            Self::Texture(e) => write!(f, "Texture error: {e}"),
            Self::Entity(e) => write!(f, "Entity error: {e}"),
            Self::Init(msg) => write!(f, "Init failed: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Texture(e) => Some(e),
            Self::Entity(e) => Some(e),
            Self::Init(_) => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TextureError> for EngineError {
    fn from(e: TextureError) -> Self {
        Self::Texture(e)
    }
}

impl From<EntityError> for EngineError {
    fn from(e: EntityError) -> Self {
        Self::Entity(e)
    }
}
