//! Keeps a prop positioned in front of the viewpoint.

use raystage_core::CameraRig;
use tracing::warn;

use crate::scene::{PropHandle, PropScene};

/// Repositions one prop a fixed distance along the head's forward vector
/// every tick, matching the head's rotation.
///
/// The target is a regular scene prop; if it is removed the follower warns
/// once and goes quiet.
pub struct HeadFollower {
    handle: PropHandle,
    distance: f32,
    warned_missing: bool,
}

impl HeadFollower {
    /// Default distance in meters between the head and the followed prop.
    pub const DEFAULT_DISTANCE: f32 = 2.0;

    /// Create a follower for the prop at `handle`.
    pub fn new(handle: PropHandle) -> Self {
        Self {
            handle,
            distance: Self::DEFAULT_DISTANCE,
            warned_missing: false,
        }
    }

    /// Builder: override the follow distance.
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// The followed prop's handle.
    pub fn target(&self) -> PropHandle {
        self.handle
    }

    /// Move the target in front of the rig head for this tick.
    pub fn tick(&mut self, rig: &CameraRig, scene: &mut PropScene) {
        let Some(prop) = scene.get_mut(self.handle) else {
            if !self.warned_missing {
                warn!(handle = self.handle, "follow target no longer in the scene");
                self.warned_missing = true;
            }
            return;
        };

        prop.transform.position = rig.head.position + rig.head.forward() * self.distance;
        prop.transform.rotation = rig.head.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Prop;
    use glam::Vec3;
    use raystage_core::{Collider, Transform};

    fn panel(scene: &mut PropScene) -> PropHandle {
        scene.add(
            Prop::new(
                "panel",
                Transform::default(),
                Collider::Box {
                    half_extents: Vec3::new(0.3, 0.2, 0.01),
                },
            )
            .non_interactable(),
        )
    }

    #[test]
    fn target_tracks_the_head_each_tick() {
        let mut scene = PropScene::new();
        let handle = panel(&mut scene);
        let mut follower = HeadFollower::new(handle);

        let mut rig = CameraRig::new(Transform::new(Vec3::new(0.0, 1.7, 0.0)));
        follower.tick(&rig, &mut scene);
        assert!(scene
            .get(handle)
            .unwrap()
            .transform
            .position
            .abs_diff_eq(Vec3::new(0.0, 1.7, -2.0), 1e-5));

        // Head turns; the prop swings with it and copies the rotation.
        rig.head = Transform::from_yaw_pitch(Vec3::new(1.0, 1.7, 0.0), 90.0, 0.0);
        follower.tick(&rig, &mut scene);
        let prop = scene.get(handle).unwrap();
        assert!(prop
            .transform
            .position
            .abs_diff_eq(Vec3::new(-1.0, 1.7, 0.0), 1e-5));
        assert_eq!(prop.transform.rotation, rig.head.rotation);
    }

    #[test]
    fn custom_distance_scales_the_offset() {
        let mut scene = PropScene::new();
        let handle = panel(&mut scene);
        let mut follower = HeadFollower::new(handle).with_distance(5.0);
        let rig = CameraRig::new(Transform::default());

        follower.tick(&rig, &mut scene);
        assert!(scene
            .get(handle)
            .unwrap()
            .transform
            .position
            .abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn removed_target_warns_once_and_stops() {
        let mut scene = PropScene::new();
        let handle = panel(&mut scene);
        let mut follower = HeadFollower::new(handle);
        let rig = CameraRig::new(Transform::default());

        scene.remove(handle);
        follower.tick(&rig, &mut scene);
        assert!(follower.warned_missing);

        // Subsequent ticks stay quiet and do not panic.
        follower.tick(&rig, &mut scene);
    }
}
