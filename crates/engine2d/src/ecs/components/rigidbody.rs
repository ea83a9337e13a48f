//! Rigidbody component for entities that move in 2D space
//!
//! Only the velocity is applied by default. Acceleration and radial velocity
//! are stored data; the movement system integrates them when motion
//! integration is switched on in the engine configuration.

use super::Transform;
use crate::ecs::component::Requirements;
use crate::ecs::Component;
use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Component for entities that can move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rigidbody {
    /// Linear velocity in units per second
    pub velocity: Vec2,

    /// Linear acceleration in units per second squared
    pub acceleration: Vec2,

    /// Angular velocity in degrees per second
    pub radial_velocity: f32,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self {
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            radial_velocity: 0.0,
        }
    }
}

impl Component for Rigidbody {
    const NAME: &'static str = "Rigidbody";

    fn requirements(requirements: &mut Requirements) {
        requirements.require::<Transform>();
    }
}

impl Rigidbody {
    /// Create a rigidbody with an initial velocity
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Default::default()
        }
    }

    /// Builder pattern: set acceleration
    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Builder pattern: set radial velocity in degrees per second
    pub fn with_radial_velocity(mut self, degrees_per_second: f32) -> Self {
        self.radial_velocity = degrees_per_second;
        self
    }

    /// Position delta for this frame
    pub fn position_delta(&self, delta_time: f32) -> Vec2 {
        self.velocity * delta_time
    }

    /// Integrate acceleration into velocity
    pub fn integrate(&mut self, delta_time: f32) {
        self.velocity += self.acceleration * delta_time;
    }

    /// Stop all movement
    pub fn stop(&mut self) {
        *self = Self::default();
    }
}
