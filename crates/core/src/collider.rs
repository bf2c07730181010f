//! Collidable shapes and layer filtering for ray queries.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ray::{PointerPose, RayHit};
use crate::transform::Transform;

bitflags! {
    /// Which collidable layers a ray may hit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerMask: u32 {
        /// Catch-all layer for uncategorized colliders.
        const DEFAULT = 1;
        /// Props that react to hover/select.
        const INTERACTABLE = 1 << 1;
        /// Surfaces that accept spawned instances.
        const SURFACE = 1 << 2;
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Collider shape, positioned by the owning prop's transform.
///
/// Shapes are centered on the prop position. Boxes stay axis-aligned; prop
/// rotation affects appearance only, not the collidable volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    /// Axis-aligned box with the given half extents.
    Box {
        /// Half extents per axis; all components must be positive.
        half_extents: Vec3,
    },
    /// Sphere with the given radius.
    Sphere {
        /// Sphere radius; must be positive.
        radius: f32,
    },
}

impl Collider {
    /// Cast the pose's ray against this collider.
    ///
    /// Returns the nearest front-side intersection, or `None` when the ray
    /// misses or the shape lies entirely behind the origin. A ray starting
    /// inside the shape reports the exit point with the normal facing back
    /// along the ray.
    pub fn ray_intersection(&self, transform: &Transform, pose: &PointerPose) -> Option<RayHit> {
        match *self {
            Collider::Box { half_extents } => ray_box(transform.position, half_extents, pose),
            Collider::Sphere { radius } => ray_sphere(transform.position, radius, pose),
        }
    }
}

fn ray_box(center: Vec3, half_extents: Vec3, pose: &PointerPose) -> Option<RayHit> {
    debug_assert!(half_extents.cmpgt(Vec3::ZERO).all());

    let min = center - half_extents;
    let max = center + half_extents;
    let inv_dir = pose.direction.recip();

    let t1 = (min - pose.origin) * inv_dir;
    let t2 = (max - pose.origin) * inv_dir;
    let t_near = t1.min(t2);
    let t_far = t1.max(t2);

    let tmin = t_near.max_element();
    let tmax = t_far.min_element();

    // Entire box behind the origin, or no overlap between the slabs.
    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    let (distance, normal) = if tmin < 0.0 {
        // Origin inside the box.
        (tmax, -pose.direction)
    } else {
        let normal = if tmin == t_near.x {
            Vec3::new(-pose.direction.x.signum(), 0.0, 0.0)
        } else if tmin == t_near.y {
            Vec3::new(0.0, -pose.direction.y.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, -pose.direction.z.signum())
        };
        (tmin, normal)
    };

    if !distance.is_finite() {
        return None;
    }

    Some(RayHit {
        point: pose.point_at(distance),
        normal,
        distance,
    })
}

fn ray_sphere(center: Vec3, radius: f32, pose: &PointerPose) -> Option<RayHit> {
    debug_assert!(radius > 0.0);

    let oc = pose.origin - center;
    let b = oc.dot(pose.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let mut distance = -b - sqrt_d;
    if distance < 0.0 {
        // Origin inside the sphere; take the exit point.
        distance = -b + sqrt_d;
        if distance < 0.0 {
            return None;
        }
    }

    let point = pose.point_at(distance);
    Some(RayHit {
        point,
        normal: (point - center) / radius,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_hit_reports_distance_and_entry_normal() {
        let collider = Collider::Box {
            half_extents: Vec3::splat(0.5),
        };
        let transform = Transform::new(Vec3::new(0.0, 0.0, -5.0));
        let pose = PointerPose::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = collider
            .ray_intersection(&transform, &pose)
            .expect("ray aimed at box center should hit");
        assert!((hit.distance - 4.5).abs() < 1e-4);
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-6));
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, -4.5), 1e-4));
    }

    #[test]
    fn box_behind_origin_is_rejected() {
        let collider = Collider::Box {
            half_extents: Vec3::splat(0.5),
        };
        let transform = Transform::new(Vec3::new(0.0, 0.0, 5.0));
        let pose = PointerPose::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(collider.ray_intersection(&transform, &pose).is_none());
    }

    #[test]
    fn box_miss_is_rejected() {
        let collider = Collider::Box {
            half_extents: Vec3::splat(0.5),
        };
        let transform = Transform::new(Vec3::new(3.0, 0.0, -5.0));
        let pose = PointerPose::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(collider.ray_intersection(&transform, &pose).is_none());
    }

    #[test]
    fn floor_box_hit_from_above_has_up_normal() {
        let collider = Collider::Box {
            half_extents: Vec3::new(10.0, 0.05, 10.0),
        };
        let transform = Transform::new(Vec3::new(0.0, -0.05, 0.0));
        let pose = PointerPose::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, -1.0, -0.5));

        let hit = collider
            .ray_intersection(&transform, &pose)
            .expect("downward ray should strike the floor");
        assert!(hit.normal.abs_diff_eq(Vec3::Y, 1e-6));
        assert!((hit.point.y - 0.0).abs() < 1e-4);
    }

    #[test]
    fn sphere_hit_reports_outward_normal() {
        let collider = Collider::Sphere { radius: 1.0 };
        let transform = Transform::new(Vec3::new(0.0, 0.0, -5.0));
        let pose = PointerPose::new(Vec3::ZERO, Vec3::NEG_Z);

        let hit = collider
            .ray_intersection(&transform, &pose)
            .expect("ray aimed at sphere center should hit");
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn sphere_grazing_miss_is_rejected() {
        let collider = Collider::Sphere { radius: 1.0 };
        let transform = Transform::new(Vec3::new(0.0, 1.5, -5.0));
        let pose = PointerPose::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(collider.ray_intersection(&transform, &pose).is_none());
    }

    #[test]
    fn ray_from_inside_sphere_exits_forward() {
        let collider = Collider::Sphere { radius: 2.0 };
        let transform = Transform::new(Vec3::ZERO);
        let pose = PointerPose::new(Vec3::ZERO, Vec3::X);

        let hit = collider
            .ray_intersection(&transform, &pose)
            .expect("ray from inside should exit");
        assert!((hit.distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn layer_mask_filters_intersect() {
        let mask = LayerMask::INTERACTABLE | LayerMask::SURFACE;
        assert!(mask.intersects(LayerMask::SURFACE));
        assert!(!LayerMask::DEFAULT.intersects(LayerMask::INTERACTABLE));
    }
}
