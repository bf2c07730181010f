//! Per-tick hover/select state tracking for the controller ray.

use glam::{Vec2, Vec3};
use raystage_core::{CameraRig, Hand, LayerMask, PointerPose, RayHit};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::handler::FrameCtx;
use crate::scene::{PropHandle, PropScene};
use crate::visual::RayVisual;

/// Tuning for the tracker, typically sourced from the controls config.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Maximum ray length in meters.
    pub max_distance: f32,
    /// Layers the ray may hit.
    pub layer_mask: LayerMask,
    /// Rotate input magnitude below which no rotation is applied.
    pub deadzone: f32,
    /// Rotation speed in degrees per second at full deflection.
    pub rotate_sensitivity: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            layer_mask: LayerMask::all(),
            deadzone: 0.1,
            rotate_sensitivity: 100.0,
        }
    }
}

/// Pointer-relevant input for one tick, with press/release edges already
/// derived by the input layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerInput {
    /// Select input went down this tick.
    pub select_pressed: bool,
    /// Select input went up this tick.
    pub select_released: bool,
    /// 2-axis rotation input, each axis in `-1..=1`.
    pub rotate: Vec2,
}

/// Failure to construct a tracker from its collaborators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// The configured hand has no anchor on the rig. Fatal for the pointer
    /// feature: the caller logs and runs without it.
    #[error("no {0:?} hand anchor on the camera rig")]
    MissingAnchor(Hand),
}

/// Tracks the hovered and selected prop for one controller ray.
///
/// At most one prop is hovered and at most one is selected at any instant.
/// Selection is independent of hover: once set it survives the ray moving
/// elsewhere and is cleared only by the release edge.
pub struct PointerTracker {
    hand: Hand,
    config: TrackerConfig,
    hovered: Option<PropHandle>,
    selected: Option<PropHandle>,
    last_hit: Option<(PropHandle, RayHit)>,
    visual_warned: bool,
}

impl PointerTracker {
    /// Create a tracker for `hand`.
    ///
    /// Fails if the rig has no anchor for that hand; the pointer feature is
    /// unusable without one.
    pub fn new(rig: &CameraRig, hand: Hand, config: TrackerConfig) -> Result<Self, TrackerError> {
        if rig.anchor(hand).is_none() {
            return Err(TrackerError::MissingAnchor(hand));
        }
        Ok(Self {
            hand,
            config,
            hovered: None,
            selected: None,
            last_hit: None,
            visual_warned: false,
        })
    }

    /// Currently hovered prop, if any.
    pub fn hovered(&self) -> Option<PropHandle> {
        self.hovered
    }

    /// Currently selected prop, if any.
    pub fn selected(&self) -> Option<PropHandle> {
        self.selected
    }

    /// Run one tick: hit test, hover transitions, select edges, rotation.
    ///
    /// All transitions happen synchronously, in that order, before `tick`
    /// returns.
    pub fn tick(
        &mut self,
        rig: &CameraRig,
        scene: &mut PropScene,
        input: &PointerInput,
        dt: f32,
        mut visual: Option<&mut dyn RayVisual>,
    ) {
        let Some(anchor) = rig.anchor(self.hand) else {
            // Anchor was validated at construction; losing tracking later
            // skips the tick rather than tearing the feature down.
            return;
        };
        let pose = PointerPose::from_transform(anchor);

        // The visual is optional; without one the pointer still works but
        // the user gets no line or indicator. Say so once.
        if visual.is_none() && !self.visual_warned {
            warn!(hand = ?self.hand, "no ray visual attached; pointer feedback will not be shown");
            self.visual_warned = true;
        }

        self.update_hover(scene, &pose, visual.as_mut().map(|v| &mut **v as &mut dyn RayVisual));

        if input.select_pressed {
            self.handle_select_pressed(rig, scene);
        }
        if input.select_released {
            self.handle_select_released(scene);
        }

        self.apply_rotation(scene, input.rotate, dt);
    }

    fn update_hover(
        &mut self,
        scene: &mut PropScene,
        pose: &PointerPose,
        visual: Option<&mut dyn RayVisual>,
    ) {
        match scene.raycast_nearest(pose, self.config.max_distance, self.config.layer_mask) {
            Some((handle, hit)) => {
                if let Some(visual) = visual {
                    visual.set_line(pose.origin, hit.point, true);
                    visual.show_indicator(hit.point);
                }

                if self.hovered != Some(handle) {
                    if let Some(prev) = self.hovered.take() {
                        if let Some(handler) = scene.handler_mut(prev) {
                            handler.on_hover_exit();
                        }
                    }
                    if let Some(handler) = scene.handler_mut(handle) {
                        handler.on_hover_enter(&hit);
                    }
                    self.hovered = Some(handle);
                }

                self.last_hit = Some((handle, hit));
            }
            None => {
                if let Some(visual) = visual {
                    visual.set_line(
                        pose.origin,
                        pose.point_at(self.config.max_distance),
                        false,
                    );
                    visual.hide_indicator();
                }

                if let Some(prev) = self.hovered.take() {
                    if let Some(handler) = scene.handler_mut(prev) {
                        handler.on_hover_exit();
                    }
                }
                self.last_hit = None;
            }
        }
    }

    fn handle_select_pressed(&mut self, rig: &CameraRig, scene: &mut PropScene) {
        if let Some(current) = self.selected {
            // Policy: a second press while selected is ignored. Release must
            // precede the next select so enter/exit callbacks stay paired.
            debug!(handle = current, "select pressed while already selected; ignored");
            return;
        }

        let Some((handle, hit)) = self.last_hit else {
            info!("select pressed with nothing hovered");
            return;
        };

        self.selected = Some(handle);
        let name = scene.get(handle).map(|p| p.name.clone()).unwrap_or_default();
        info!(name = %name, handle, "selected");

        let ctx = FrameCtx {
            view_yaw_degrees: rig.head_yaw_degrees(),
        };
        let request = scene
            .handler_mut(handle)
            .and_then(|handler| handler.on_select_enter(&ctx, &hit));
        if let Some(request) = request {
            scene.spawn(request);
        }
    }

    fn handle_select_released(&mut self, scene: &mut PropScene) {
        let Some(handle) = self.selected.take() else {
            return;
        };

        let name = scene.get(handle).map(|p| p.name.clone()).unwrap_or_default();
        info!(name = %name, handle, "deselected");
        if let Some(handler) = scene.handler_mut(handle) {
            handler.on_select_exit();
        }
    }

    fn apply_rotation(&mut self, scene: &mut PropScene, rotate: Vec2, dt: f32) {
        let Some(handle) = self.selected else {
            return;
        };
        if rotate.length() <= self.config.deadzone {
            return;
        }

        let Some(prop) = scene.get_mut(handle) else {
            warn!(handle, "selected prop no longer exists; dropping selection");
            self.selected = None;
            return;
        };

        let step = self.config.rotate_sensitivity * dt;
        prop.transform.rotate_world(Vec3::Y, rotate.x * step);
        let right = prop.transform.right();
        prop.transform.rotate_world(right, rotate.y * step);
    }
}
