//! Collider component for ECS
//!
//! A collider is a shape anchored at the owning entity's transform plus an
//! origin offset. Boxes are centred on that point and store full extents.
//! Circles carry data only; the collision system tests boxes.

use super::Rigidbody;
use crate::ecs::component::Requirements;
use crate::ecs::Component;
use crate::foundation::math::{constants::UNIT_SIZE, Vec2};
use crate::physics::BoundingBox;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

bitflags! {
    /// How a collider reacts to contacts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ColliderSettings: u8 {
        /// Other solid bodies cannot pass through this one
        const SOLID = 1 << 0;
        /// The body is never pushed by collision response
        const FIXED = 1 << 1;
    }
}

impl Default for ColliderSettings {
    fn default() -> Self {
        Self::SOLID
    }
}

/// Geometric shape of a collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Axis-aligned box; width and height are full extents
    Box {
        /// Full width
        width: f32,
        /// Full height
        height: f32,
    },
    /// Circle around the collider origin
    Circle {
        /// Radius
        radius: f32,
    },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Box {
            width: UNIT_SIZE,
            height: UNIT_SIZE,
        }
    }
}

/// Component that gives an entity a collision shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collider {
    /// Offset of the shape centre from the transform position
    pub origin_offset: Vec2,

    /// Shape of the collider
    pub shape: ColliderShape,

    /// Named collision layers this collider belongs to
    pub layers: BTreeSet<String>,

    /// Contact behaviour flags
    pub settings: ColliderSettings,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            origin_offset: Vec2::zeros(),
            shape: ColliderShape::default(),
            layers: BTreeSet::new(),
            settings: ColliderSettings::default(),
        }
    }
}

impl Component for Collider {
    const NAME: &'static str = "Collider";

    fn requirements(requirements: &mut Requirements) {
        requirements.require::<Rigidbody>();
    }
}

impl Collider {
    /// Create a box collider with full width and height
    pub fn box_collider(width: f32, height: f32) -> Self {
        Self {
            shape: ColliderShape::Box { width, height },
            ..Default::default()
        }
    }

    /// Create a circle collider
    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            ..Default::default()
        }
    }

    /// Builder pattern: set the origin offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.origin_offset = offset;
        self
    }

    /// Builder pattern: add a named layer
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layers.insert(layer.into());
        self
    }

    /// Builder pattern: replace the settings flags
    pub fn with_settings(mut self, settings: ColliderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Full `(width, height)` when this is a box collider
    pub fn box_extents(&self) -> Option<(f32, f32)> {
        match self.shape {
            ColliderShape::Box { width, height } => Some((width, height)),
            ColliderShape::Circle { .. } => None,
        }
    }

    /// Whether this is a box collider
    pub fn is_box(&self) -> bool {
        self.box_extents().is_some()
    }

    /// World-space centre given the owner's position
    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.origin_offset
    }

    /// World-space box bounds given the owner's position; `None` for circles
    pub fn bounds(&self, position: Vec2) -> Option<BoundingBox> {
        self.box_extents()
            .map(|(width, height)| BoundingBox::new(self.center(position), width, height))
    }

    /// Whether the collider is on the given layer
    pub fn on_layer(&self, layer: &str) -> bool {
        self.layers.contains(layer)
    }

    /// Whether the `SOLID` flag is set
    pub fn is_solid(&self) -> bool {
        self.settings.contains(ColliderSettings::SOLID)
    }

    /// Whether the `FIXED` flag is set
    pub fn is_fixed(&self) -> bool {
        self.settings.contains(ColliderSettings::FIXED)
    }
}
