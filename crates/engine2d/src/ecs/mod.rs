//! Entity-Component-System implementation
//!
//! Entities are generational handles, components live in one type-erased
//! column per component type, and systems are plain structs driven by the
//! engine in a fixed order each frame.

pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod storage;
pub mod system;
pub mod systems;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentInfo, Requirements};
pub use entity::Entity;
pub use error::EcsError;
pub use system::System;
pub use world::World;
