//! # engine2d
//!
//! The update core of a 2D game engine built on an entity-component-system.
//!
//! ## Features
//!
//! - **ECS Architecture**: generational entities, typed component columns and
//!   declared component prerequisites that are injected automatically
//! - **Frame Pipeline**: movement, box collision, timers, sprite animation and
//!   layered render ordering, run in a fixed order every frame
//! - **Event Bus**: typed synchronous events for collision and timer responses
//! - **Headless**: drawing goes through the [`render::Canvas`] trait, so the
//!   whole pipeline runs without a window
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use engine2d::prelude::*;
//!
//! struct MyApp {
//!     frames: u32,
//! }
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let ship = engine.world_mut().spawn();
//!         engine.world_mut().insert(ship, Collider::box_collider(64.0, 64.0))?;
//!         engine.subscribe(|event: &CollisionEvent, _: &mut EventContext<'_>| {
//!             log::info!("{} hit {}", event.left.entity, event.right.entity);
//!         });
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         self.frames += 1;
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//!
//!     fn is_running(&self) -> bool {
//!         self.frames < 600
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::default())?;
//!     let mut canvas = CommandList::new();
//!     engine.run(&mut MyApp { frames: 0 }, Some(&mut canvas))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use config::EngineConfig;
pub use engine::{Engine, EngineError, EngineStats};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::Config,
        ecs::components::{
            Animation, Collider, ColliderSettings, ColliderShape, Color, RenderLayer, Renderable,
            RenderableKind, Renderer, Rigidbody, Sprite, Timers, Transform,
        },
        ecs::systems::{CollisionEvent, CollisionScan, TimerEvent, TimerOp, TimerRestarted},
        ecs::{Component, EcsError, Entity, World},
        events::{Event, EventBus, EventContext, SubscriptionId},
        foundation::{math::Vec2, time::Stopwatch},
        render::{Canvas, CommandList, DrawCommand, RenderError},
        AppError, Application, Engine, EngineConfig, EngineError, EngineStats,
    };
}
