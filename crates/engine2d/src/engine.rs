//! Core engine implementation
//!
//! The engine owns the world, the event bus and the systems, and advances
//! them in a fixed order every frame:
//! input (the application) → movement → collision → timers → animation and
//! render collection → draw.

use crate::application::{AppError, Application};
use crate::config::{Config, ConfigError, EngineConfig};
use crate::ecs::systems::{
    AnimationSystem, CollisionScan, CollisionSystem, MovementSystem, RenderingSystem, TimerSystem,
};
use crate::ecs::{System, World};
use crate::events::{Event, EventBus, EventContext, SubscriptionId};
use crate::foundation::time::FrameClock;
use crate::render::{Canvas, RenderError, RenderQueue};
use std::path::Path;
use thiserror::Error;

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineStats {
    /// Frames updated since the engine was created
    pub frames: u64,
    /// Clamped delta of the last update
    pub last_delta: f32,
    /// Collision events published by the last update
    pub collisions: usize,
    /// Draw commands queued by the last update
    pub queued_draws: usize,
    /// Draw commands drawn by the last render
    pub drawn: usize,
    /// Live entities after the last update
    pub entities: usize,
}

/// Main engine struct
pub struct Engine {
    world: World,
    events: EventBus,
    movement: MovementSystem,
    collision: CollisionSystem,
    timers: TimerSystem,
    animation: AnimationSystem,
    rendering: RenderingSystem,
    render_queue: RenderQueue,
    clock: FrameClock,
    config: EngineConfig,
    stats: EngineStats,
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let mut events = EventBus::new();
        let mut timers = TimerSystem::new();
        timers.register(&mut events);

        Ok(Self {
            world: World::new(),
            events,
            movement: MovementSystem::with_motion_integration(config.integrate_motion),
            collision: CollisionSystem::new(config.collision_scan),
            timers,
            animation: AnimationSystem::new(),
            rendering: RenderingSystem::new(),
            render_queue: RenderQueue::new(),
            clock: FrameClock::new(),
            config,
            stats: EngineStats::default(),
            running: true,
        })
    }

    /// Create an engine from a `.toml` or `.ron` configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let config = EngineConfig::load_from_file(path)?;
        Self::new(config)
    }

    /// Advance every system by one frame.
    ///
    /// `delta_time` is clamped into `[0, max_frame_delta]`; negative and NaN
    /// deltas become zero. Returns the delta actually used.
    pub fn update(&mut self, delta_time: f32) -> f32 {
        let delta_time = self.config.clamp_delta(delta_time);

        let systems: [&mut dyn System; 4] = [
            &mut self.movement,
            &mut self.collision,
            &mut self.timers,
            &mut self.animation,
        ];
        for system in systems {
            log::trace!("Running {}", system.name());
            system.run(&mut self.world, &mut self.events, delta_time);
        }
        let collisions = self.collision.last_collision_count();

        self.render_queue.clear();
        let queued_draws = self.rendering.collect(&self.world, &mut self.render_queue);

        self.stats.frames += 1;
        self.stats.last_delta = delta_time;
        self.stats.collisions = collisions;
        self.stats.queued_draws = queued_draws;
        self.stats.entities = self.world.entity_count();
        log::debug!(
            "Frame {}: dt={:.4} collisions={} draws={}",
            self.stats.frames,
            delta_time,
            collisions,
            queued_draws
        );
        delta_time
    }

    /// Draw the queued commands in paint order.
    ///
    /// Fails with [`RenderError::NoCanvas`] when there is nothing to draw on.
    pub fn render(&mut self, canvas: Option<&mut dyn Canvas>) -> Result<usize, RenderError> {
        let drawn = self.render_queue.draw_all(canvas)?;
        self.stats.drawn = drawn;
        Ok(drawn)
    }

    /// Run the main loop until the application stops or [`Engine::quit`] is called
    pub fn run<A: Application>(
        &mut self,
        app: &mut A,
        mut canvas: Option<&mut dyn Canvas>,
    ) -> Result<(), EngineError> {
        app.initialize(self)?;
        log::info!("Starting main loop...");

        let result = self.main_loop(app, &mut canvas);

        app.cleanup(self);
        log::info!("Engine shutdown complete after {} frames", self.stats.frames);
        result
    }

    fn main_loop<A: Application>(
        &mut self,
        app: &mut A,
        canvas: &mut Option<&mut dyn Canvas>,
    ) -> Result<(), EngineError> {
        self.running = true;
        while self.running && app.is_running() {
            let delta_time = self.clock.tick();
            app.update(self, delta_time)?;
            self.update(delta_time);
            self.render(canvas.as_mut().map(|c| &mut **c as &mut dyn Canvas))?;
        }
        Ok(())
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Publish an event to every subscriber
    pub fn emit<E: Event>(&mut self, event: E) {
        self.events.emit(event, &mut self.world);
    }

    /// Subscribe a handler to events of type `E`
    pub fn subscribe<E, F>(&mut self, handler: F) -> SubscriptionId
    where
        E: Event,
        F: FnMut(&E, &mut EventContext<'_>) + 'static,
    {
        self.events.subscribe(handler)
    }

    /// Switch the collision scan mode
    pub fn set_collision_scan(&mut self, scan: CollisionScan) {
        self.config.collision_scan = scan;
        self.collision.set_scan(scan);
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get the event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Get mutable access to the event bus
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Commands waiting to be drawn
    pub fn render_queue(&self) -> &RenderQueue {
        &self.render_queue
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counters from the most recent frame
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Wall-clock frame timing of the main loop
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Rendering error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application error
    #[error("Application error: {0}")]
    Application(#[from] AppError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Collider, Rigidbody, Transform};
    use crate::foundation::math::Vec2;
    use crate::render::CommandList;
    use approx::assert_relative_eq;

    struct CountdownApp {
        frames_left: u32,
        initialized: bool,
        cleaned_up: bool,
        fail_on_update: bool,
    }

    impl CountdownApp {
        fn new(frames_left: u32) -> Self {
            Self {
                frames_left,
                initialized: false,
                cleaned_up: false,
                fail_on_update: false,
            }
        }
    }

    impl Application for CountdownApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let entity = engine.world_mut().spawn();
            engine
                .world_mut()
                .insert(entity, Rigidbody::with_velocity(Vec2::new(1.0, 0.0)))?;
            self.initialized = true;
            Ok(())
        }

        fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            if self.fail_on_update {
                return Err(AppError::GameLogic("boom".to_string()));
            }
            self.frames_left = self.frames_left.saturating_sub(1);
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }

        fn is_running(&self) -> bool {
            self.frames_left > 0
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            max_frame_delta: -1.0,
            ..EngineConfig::default()
        };
        assert!(matches!(Engine::new(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_update_clamps_delta() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        assert_relative_eq!(engine.update(10.0), 0.25);
        assert_relative_eq!(engine.update(-1.0), 0.0);
        assert_relative_eq!(engine.update(f32::NAN), 0.0);
        assert_eq!(engine.stats().frames, 3);
    }

    #[test]
    fn test_run_drives_application_lifecycle() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut app = CountdownApp::new(3);
        let mut canvas = CommandList::new();

        engine.run(&mut app, Some(&mut canvas)).unwrap();

        assert!(app.initialized);
        assert!(app.cleaned_up);
        assert_eq!(engine.stats().frames, 3);
        assert_eq!(canvas.frames(), 3);
    }

    #[test]
    fn test_run_without_canvas_fails_after_cleanup() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut app = CountdownApp::new(5);

        let result = engine.run(&mut app, None);
        assert!(matches!(result, Err(EngineError::Render(RenderError::NoCanvas))));
        assert!(app.cleaned_up);
        assert_eq!(engine.stats().frames, 1);
    }

    #[test]
    fn test_application_error_stops_loop() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut app = CountdownApp::new(5);
        app.fail_on_update = true;
        let mut canvas = CommandList::new();

        let result = engine.run(&mut app, Some(&mut canvas));
        assert!(matches!(result, Err(EngineError::Application(AppError::GameLogic(_)))));
        assert_eq!(engine.stats().frames, 0);
    }

    #[test]
    fn test_collision_scan_can_be_switched() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        for x in [0.0, 32.0] {
            let entity = engine.world_mut().spawn();
            engine.world_mut().insert(entity, Collider::default()).unwrap();
            engine.world_mut().get_mut::<Transform>(entity).unwrap().position.x = x;
        }

        engine.update(0.0);
        assert_eq!(engine.stats().collisions, 4);

        engine.set_collision_scan(CollisionScan::UniquePairs);
        engine.update(0.0);
        assert_eq!(engine.stats().collisions, 1);
        assert_eq!(engine.config().collision_scan, CollisionScan::UniquePairs);
    }

    #[test]
    fn test_collision_sees_positions_moved_this_frame() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.set_collision_scan(CollisionScan::UniquePairs);

        let fixed = engine.world_mut().spawn();
        engine.world_mut().insert(fixed, Collider::default()).unwrap();
        let mover = engine.world_mut().spawn();
        engine.world_mut().insert(mover, Collider::default()).unwrap();
        engine.world_mut().get_mut::<Transform>(mover).unwrap().position.x = 132.0;
        engine.world_mut().get_mut::<Rigidbody>(mover).unwrap().velocity = Vec2::new(-400.0, 0.0);

        engine.update(0.25);

        let position = engine.world().get::<Transform>(mover).unwrap().position;
        assert_relative_eq!(position.x, 32.0);
        assert_eq!(engine.stats().collisions, 1);
    }
}
