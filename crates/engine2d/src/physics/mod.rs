//! Physics module for collision detection
//!
//! Holds the pure geometric tests. The ECS collision system gathers bodies
//! from the world and calls into this module pair by pair.

pub mod collision;

pub use collision::{box_overlap, BoundingBox};
