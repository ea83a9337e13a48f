//! Math utilities and types
//!
//! Provides the 2D math types shared by components and systems. World units
//! and pixels coincide; one tile is [`constants::UNIT_SIZE`] units wide.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Mathematical constants
pub mod constants {
    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

    /// Edge length of one tile in world units
    pub const UNIT_SIZE: f32 = 64.0;

    /// Full turn in degrees
    pub const FULL_TURN_DEGREES: f32 = 360.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Wrap an angle in degrees into `[0, 360)`
    pub fn wrap_degrees(degrees: f32) -> f32 {
        let wrapped = degrees.rem_euclid(constants::FULL_TURN_DEGREES);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= constants::FULL_TURN_DEGREES {
            0.0
        } else {
            wrapped
        }
    }

    /// Unit direction for an angle in degrees (0° = +x, counterclockwise positive)
    pub fn direction_from_degrees(degrees: f32) -> Vec2 {
        let radians = deg_to_rad(degrees);
        Vec2::new(radians.cos(), radians.sin())
    }
}
