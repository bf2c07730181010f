//! Rigid transform (position + rotation) used by rig anchors and props.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of an object in world space.
///
/// The local forward axis is `-Z`, matching glam's right-handed convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a transform at `position` with identity rotation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a transform at `position` with an explicit rotation.
    pub fn with_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a transform from a yaw/pitch aim, both in degrees.
    ///
    /// Yaw 0 / pitch 0 faces `-Z`; positive yaw turns left-handedly about
    /// world up, positive pitch aims upward.
    pub fn from_yaw_pitch(position: Vec3, yaw_degrees: f32, pitch_degrees: f32) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            yaw_degrees.to_radians(),
            pitch_degrees.to_radians(),
            0.0,
        );
        Self { position, rotation }
    }

    /// Local forward direction in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Local right direction in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local up direction in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate about a world-space axis by `degrees`.
    pub fn rotate_world(&mut self, axis: Vec3, degrees: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.rotation =
            (Quat::from_axis_angle(axis, degrees.to_radians()) * self.rotation).normalize();
    }

    /// Yaw of the forward vector about world up, in degrees.
    ///
    /// Inverse of [`Transform::from_yaw_pitch`] for the yaw component.
    pub fn yaw_degrees(&self) -> f32 {
        let f = self.forward();
        (-f.x).atan2(-f.z).to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn identity_faces_negative_z() {
        let t = Transform::default();
        assert!(t.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(approx(t.yaw_degrees(), 0.0));
    }

    #[test]
    fn yaw_roundtrips_through_forward() {
        for yaw in [-135.0f32, -45.0, 0.0, 30.0, 90.0, 170.0] {
            let t = Transform::from_yaw_pitch(Vec3::ZERO, yaw, 0.0);
            assert!(
                approx(t.yaw_degrees(), yaw),
                "yaw {} came back as {}",
                yaw,
                t.yaw_degrees()
            );
        }
    }

    #[test]
    fn pitch_does_not_disturb_yaw() {
        let t = Transform::from_yaw_pitch(Vec3::ZERO, 40.0, -25.0);
        assert!(approx(t.yaw_degrees(), 40.0));
    }

    #[test]
    fn rotate_world_about_up_turns_forward() {
        let mut t = Transform::default();
        t.rotate_world(Vec3::Y, 90.0);
        assert!(approx(t.yaw_degrees(), 90.0));
    }

    #[test]
    fn rotate_world_ignores_zero_axis() {
        let mut t = Transform::default();
        t.rotate_world(Vec3::ZERO, 45.0);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }
}
