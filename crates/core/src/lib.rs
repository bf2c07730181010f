#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod collider;
pub mod ray;
pub mod rig;
pub mod transform;

use serde::{Deserialize, Serialize};

pub use collider::{Collider, LayerMask};
pub use ray::{PointerPose, RayHit};
pub use rig::{CameraRig, Hand};
pub use transform::Transform;

/// Fixed tick counter for the frame-driven simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
