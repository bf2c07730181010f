//! Camera rig: the head pose plus optional hand anchors.
//!
//! The rig is an explicitly injected collaborator. Consumers receive a
//! reference instead of looking the rig up through any global state, which
//! keeps the dependency visible and testable.

use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// Which controller hand drives the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    /// Left-hand controller anchor.
    Left,
    /// Right-hand controller anchor.
    Right,
}

impl Hand {
    fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

/// Head pose and per-hand controller anchors.
///
/// Hand anchors are optional: a rig tracked without one of its controllers
/// simply reports `None` for that anchor.
#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    /// Head (primary viewpoint) transform.
    pub head: Transform,
    hands: [Option<Transform>; 2],
}

impl CameraRig {
    /// Create a rig with the given head pose and no hand anchors.
    pub fn new(head: Transform) -> Self {
        Self {
            head,
            hands: [None, None],
        }
    }

    /// Builder: attach a hand anchor.
    pub fn with_hand(mut self, hand: Hand, transform: Transform) -> Self {
        self.hands[hand.index()] = Some(transform);
        self
    }

    /// Attach or replace a hand anchor.
    pub fn set_hand(&mut self, hand: Hand, transform: Transform) {
        self.hands[hand.index()] = Some(transform);
    }

    /// The anchor transform for `hand`, if that controller is tracked.
    pub fn anchor(&self, hand: Hand) -> Option<&Transform> {
        self.hands[hand.index()].as_ref()
    }

    /// Mutable access to a hand anchor.
    pub fn anchor_mut(&mut self, hand: Hand) -> Option<&mut Transform> {
        self.hands[hand.index()].as_mut()
    }

    /// Current viewpoint yaw in degrees, used for spawn orientation.
    pub fn head_yaw_degrees(&self) -> f32 {
        self.head.yaw_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn missing_anchor_reports_none() {
        let rig = CameraRig::new(Transform::default());
        assert!(rig.anchor(Hand::Left).is_none());
        assert!(rig.anchor(Hand::Right).is_none());
    }

    #[test]
    fn hands_are_tracked_independently() {
        let rig = CameraRig::new(Transform::default())
            .with_hand(Hand::Right, Transform::new(Vec3::new(0.2, 1.2, 0.0)));
        assert!(rig.anchor(Hand::Right).is_some());
        assert!(rig.anchor(Hand::Left).is_none());
    }

    #[test]
    fn head_yaw_follows_head_transform() {
        let mut rig = CameraRig::new(Transform::default());
        rig.head = Transform::from_yaw_pitch(Vec3::new(0.0, 1.7, 0.0), 75.0, 0.0);
        assert!((rig.head_yaw_degrees() - 75.0).abs() < 1e-3);
    }
}
