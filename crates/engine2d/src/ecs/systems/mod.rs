//! ECS Systems module
//!
//! Frame order used by the engine: movement, collision, timers, animation,
//! then render collection.

pub mod animation_system;
pub mod collision_system;
pub mod movement_system;
pub mod rendering_system;
pub mod timer_system;

pub use animation_system::AnimationSystem;
pub use collision_system::{CollisionBody, CollisionEvent, CollisionScan, CollisionSystem};
pub use movement_system::MovementSystem;
pub use rendering_system::RenderingSystem;
pub use timer_system::{TimerEvent, TimerOp, TimerRestarted, TimerSystem};
