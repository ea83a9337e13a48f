//! ECS Components module
//!
//! Data-only building blocks attached to entities. Prerequisites between them
//! are declared through [`crate::ecs::Component::requirements`].

pub mod collider;
pub mod renderable;
pub mod rigidbody;
pub mod sprite;
pub mod timers;
pub mod transform;

pub use collider::{Collider, ColliderSettings, ColliderShape};
pub use renderable::{
    CircleShape, Color, RectangleShape, RenderLayer, Renderable, RenderableKind, Renderer, Text,
    SHAPE_ORIGIN_CORRECTION,
};
pub use rigidbody::Rigidbody;
pub use sprite::{Animation, Sprite, UnknownAnimation};
pub use timers::{TimerError, Timers};
pub use transform::Transform;
