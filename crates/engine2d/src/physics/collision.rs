//! Narrow-phase overlap tests for 2D shapes

use crate::foundation::math::Vec2;

/// Axis-aligned box described by its centre and full extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Centre of the box in world space
    pub center: Vec2,
    /// Full width and height
    pub size: Vec2,
}

impl BoundingBox {
    /// Creates a box from its centre and full extents
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            size: Vec2::new(width, height),
        }
    }

    /// Half of the full extents
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Checks if this box overlaps another. Touching edges do not count.
    pub fn intersects(&self, other: &Self) -> bool {
        self.impact_point(other).is_some()
    }

    /// Returns the impact point if the boxes overlap
    pub fn impact_point(&self, other: &Self) -> Option<Vec2> {
        box_overlap(self.center, self.size, other.center, other.size)
    }
}

/// Overlap test between two boxes given by centre and full extents.
///
/// The boxes overlap when twice the centre distance on each axis is strictly
/// smaller than the summed extents on that axis. The impact point is the
/// midpoint between the two centres.
pub fn box_overlap(left_center: Vec2, left_size: Vec2, right_center: Vec2, right_size: Vec2) -> Option<Vec2> {
    let x_diff = (left_center.x - right_center.x).abs();
    let y_diff = (left_center.y - right_center.y).abs();

    let overlapping = 2.0 * x_diff < left_size.x + right_size.x && 2.0 * y_diff < left_size.y + right_size.y;
    overlapping.then(|| {
        Vec2::new(
            left_center.x.min(right_center.x) + x_diff / 2.0,
            left_center.y.min(right_center.y) + y_diff / 2.0,
        )
    })
}
