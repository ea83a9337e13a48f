//! Headless collision demo
//!
//! Spawns a handful of boxes with random velocities inside an arena, bounces
//! them off the walls and off each other, and draws every frame into a
//! recording canvas. Pass a `.toml` or `.ron` engine config path as the first
//! argument to override the defaults.

use engine2d::ecs::components::{RectangleShape, Text};
use engine2d::foundation::logging;
use engine2d::prelude::*;
use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

const ARENA_WIDTH: f32 = 1280.0;
const ARENA_HEIGHT: f32 = 720.0;
const BOX_COUNT: usize = 24;
const BOX_SIZE: f32 = 48.0;
const MAX_SPEED: f32 = 240.0;
const FRAME_LIMIT: u64 = 300;
const FRAME_TIME: Duration = Duration::from_millis(16);

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] engine2d::config::ConfigError),
}

struct CollisionDemoApp {
    boxes: Vec<Entity>,
    frames: u64,
    collisions: Rc<Cell<u64>>,
    restarts: Rc<Cell<u64>>,
}

impl CollisionDemoApp {
    fn new() -> Self {
        Self {
            boxes: Vec::with_capacity(BOX_COUNT),
            frames: 0,
            collisions: Rc::new(Cell::new(0)),
            restarts: Rc::new(Cell::new(0)),
        }
    }

    fn spawn_box(engine: &mut Engine, rng: &mut impl Rng, index: usize) -> Result<Entity, AppError> {
        let world = engine.world_mut();
        let entity = world.spawn();

        let position = Vec2::new(
            rng.gen_range(BOX_SIZE..ARENA_WIDTH - BOX_SIZE),
            rng.gen_range(BOX_SIZE..ARENA_HEIGHT - BOX_SIZE),
        );
        let velocity = Vec2::new(rng.gen_range(-MAX_SPEED..MAX_SPEED), rng.gen_range(-MAX_SPEED..MAX_SPEED));

        world.insert(entity, Collider::box_collider(BOX_SIZE, BOX_SIZE).with_layer("boxes"))?;
        if let Some(transform) = world.get_mut::<Transform>(entity) {
            transform.position = position;
        }
        if let Some(rigidbody) = world.get_mut::<Rigidbody>(entity) {
            rigidbody.velocity = velocity;
        }

        let color = Color::rgb(rng.gen(), rng.gen(), rng.gen());
        world.insert(
            entity,
            Renderer::default()
                .with("body", Renderable::new(RenderableKind::Rectangle(RectangleShape::new(BOX_SIZE, BOX_SIZE, color))))
                .with(
                    "label",
                    Renderable::new(RenderableKind::Text(Text::new(format!("#{index}"))))
                        .on_layer(RenderLayer::Hud)
                        .with_offset(Vec2::new(0.0, -BOX_SIZE)),
                ),
        )?;

        engine.emit(TimerEvent::new(entity, "since_last_hit", TimerOp::Add));
        Ok(entity)
    }

    /// Reflect boxes that left the arena back inside
    fn bounce_off_walls(&self, world: &mut World) {
        let half = BOX_SIZE / 2.0;
        for &entity in &self.boxes {
            let Some(position) = world.get::<Transform>(entity).map(|transform| transform.position) else {
                continue;
            };
            let Some(rigidbody) = world.get_mut::<Rigidbody>(entity) else {
                continue;
            };
            if position.x < half || position.x > ARENA_WIDTH - half {
                rigidbody.velocity.x = -rigidbody.velocity.x;
            }
            if position.y < half || position.y > ARENA_HEIGHT - half {
                rigidbody.velocity.y = -rigidbody.velocity.y;
            }
        }
    }
}

impl Application for CollisionDemoApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let collisions = self.collisions.clone();
        engine.subscribe(move |event: &CollisionEvent, context: &mut EventContext<'_>| {
            if event.is_self_pair() {
                return;
            }
            collisions.set(collisions.get() + 1);

            // Push each body away from the impact point
            for body in [&event.left, &event.right] {
                let away = body.transform.position - event.impact_point;
                if let Some(rigidbody) = context.world.get_mut::<Rigidbody>(body.entity) {
                    let speed = rigidbody.velocity.norm();
                    if away.norm() > f32::EPSILON {
                        rigidbody.velocity = away.normalize() * speed;
                    }
                }
                context.emit(TimerEvent::new(body.entity, "since_last_hit", TimerOp::Restart));
            }
        });

        let restarts = self.restarts.clone();
        engine.subscribe(move |event: &TimerRestarted, _: &mut EventContext<'_>| {
            log::trace!("{} went {:.2}s without a hit", event.entity, event.elapsed);
            restarts.set(restarts.get() + 1);
        });

        let mut rng = rand::thread_rng();
        for index in 0..BOX_COUNT {
            let entity = Self::spawn_box(engine, &mut rng, index)?;
            self.boxes.push(entity);
        }
        log::info!("Spawned {} boxes", self.boxes.len());
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        self.frames += 1;
        self.bounce_off_walls(engine.world_mut());
        std::thread::sleep(FRAME_TIME);
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let stats = engine.stats();
        log::info!(
            "Ran {} frames: {} box contacts, {} timer restarts, {} draws in the last frame",
            stats.frames,
            self.collisions.get(),
            self.restarts.get(),
            stats.drawn
        );
        let clock = engine.clock();
        log::info!(
            "Wall clock: {:.2}s over {} ticks, last delta {:.4}s",
            clock.total_time(),
            clock.frame_count(),
            clock.delta_time()
        );
        engine.world_mut().clear();
    }

    fn is_running(&self) -> bool {
        self.frames < FRAME_LIMIT
    }
}

fn load_config() -> Result<EngineConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let config = EngineConfig::load_from_file(&path)?;
            Ok(config)
        }
        None => Ok(EngineConfig::default().with_collision_scan(CollisionScan::UniquePairs)),
    }
}

fn main() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_filter);
    log::info!("Starting collision demo");

    let mut engine = Engine::new(config)?;
    let mut app = CollisionDemoApp::new();
    let mut canvas = CommandList::new();

    match engine.run(&mut app, Some(&mut canvas)) {
        Ok(()) => {
            log::info!("Collision demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Collision demo failed: {e}");
            Err(e.into())
        }
    }
}
