//! Application trait and lifecycle management

use crate::ecs::components::TimerError;
use crate::ecs::EcsError;
use crate::engine::Engine;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive the engine from [`Engine::run`]. The
/// application is the input stage of every frame: it runs before the
/// engine's systems.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Use this to spawn the initial
    /// entities and subscribe to events.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the engine systems run.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once when the main loop ends, including when it ends with an error.
    fn cleanup(&mut self, engine: &mut Engine);

    /// Whether the main loop should keep going
    fn is_running(&self) -> bool;
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Structural ECS error raised by game code
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Timer operation failed
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
