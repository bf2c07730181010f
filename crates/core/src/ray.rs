//! Pointer rays and hit results.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// Origin and aiming direction for one frame's ray cast.
///
/// Derived from the active hand anchor every tick; never stored across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPose {
    /// Ray origin in world space.
    pub origin: Vec3,
    /// Unit aiming direction.
    pub direction: Vec3,
}

impl PointerPose {
    /// Create a pose, normalizing the direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Pose taken from a transform's position and forward vector.
    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.position, transform.forward())
    }

    /// Point `distance` units along the ray.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a ray cast against a collider.
///
/// Transient; recomputed every frame. The identity of the hit target travels
/// alongside as a scene handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// World-space position where the ray struck the surface.
    pub point: Vec3,
    /// Outward surface normal at the hit point.
    pub normal: Vec3,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
}
