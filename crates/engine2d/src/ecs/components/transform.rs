//! Transform component for the ECS system
//!
//! Pure data: a world-space position and a rotation in degrees
//! (0° points along +x, counterclockwise positive).

use crate::ecs::Component;
use crate::foundation::math::{utils, Vec2};
use serde::{Deserialize, Serialize};

/// ECS Transform component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// World space position
    pub position: Vec2,

    /// Rotation in degrees, counterclockwise
    pub rotation: f32,
}

impl Component for Transform {
    const NAME: &'static str = "Transform";
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from x/y coordinates
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Move by a world-space offset
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Rotate by an angle in degrees, keeping the result in `[0, 360)`
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation = utils::wrap_degrees(self.rotation + degrees);
    }

    /// Unit vector the transform is facing
    pub fn forward(&self) -> Vec2 {
        utils::direction_from_degrees(self.rotation)
    }
}
