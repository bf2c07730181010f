//! Material-swap interactable with prototype spawning on selection.

use raystage_core::RayHit;
use tracing::{debug, warn};

use crate::handler::{FrameCtx, InteractionHandler};
use crate::scene::{Prototype, SpawnRequest};

/// Handle into the renderer's material registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialId(pub u32);

/// Materials for each interaction state.
#[derive(Debug, Clone, Copy)]
pub struct MaterialSet {
    /// Shown when neither hovered nor selected.
    pub default: MaterialId,
    /// Shown while hovered and not selected.
    pub hovered: MaterialId,
    /// Shown while selected; takes precedence over hover.
    pub selected: MaterialId,
}

/// Standard interactable: swaps materials on hover/select and spawns a
/// configured prototype on selection.
///
/// The displayed material is a pure function of the hover/select flags, so a
/// hover exit while selected leaves the selected material in place.
pub struct PropInteractable {
    name: String,
    materials: MaterialSet,
    hovered: bool,
    selected: bool,
    prototype: Option<Prototype>,
    surface_offset: f32,
}

impl PropInteractable {
    /// Default offset above the hit surface, avoiding z-fighting.
    pub const DEFAULT_SURFACE_OFFSET: f32 = 0.01;

    /// Create an interactable with no spawn prototype.
    pub fn new(name: impl Into<String>, materials: MaterialSet) -> Self {
        Self {
            name: name.into(),
            materials,
            hovered: false,
            selected: false,
            prototype: None,
            surface_offset: Self::DEFAULT_SURFACE_OFFSET,
        }
    }

    /// Builder: spawn `prototype` when this prop is selected.
    pub fn with_prototype(mut self, prototype: Prototype) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Builder: override the spawn offset from the hit surface.
    pub fn with_surface_offset(mut self, offset: f32) -> Self {
        self.surface_offset = offset;
        self
    }

    /// Material to display for the current interaction state.
    pub fn current_material(&self) -> MaterialId {
        if self.selected {
            self.materials.selected
        } else if self.hovered {
            self.materials.hovered
        } else {
            self.materials.default
        }
    }
}

impl InteractionHandler for PropInteractable {
    fn on_hover_enter(&mut self, hit: &RayHit) {
        self.hovered = true;
        debug!(name = %self.name, point = ?hit.point, "hover enter");
    }

    fn on_hover_exit(&mut self) {
        self.hovered = false;
        debug!(name = %self.name, "hover exit");
    }

    fn on_select_enter(&mut self, ctx: &FrameCtx, hit: &RayHit) -> Option<SpawnRequest> {
        self.selected = true;
        debug!(name = %self.name, "select enter");

        let Some(prototype) = self.prototype.clone() else {
            warn!(name = %self.name, "no spawn prototype configured; skipping spawn");
            return None;
        };

        // Orientation is viewpoint yaw only; the surface normal positions
        // the instance but does not tilt it.
        Some(SpawnRequest {
            prototype,
            position: hit.point + hit.normal * self.surface_offset,
            yaw_degrees: ctx.view_yaw_degrees,
        })
    }

    fn on_select_exit(&mut self) {
        self.selected = false;
        debug!(name = %self.name, "select exit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use raystage_core::{Collider, LayerMask};

    fn materials() -> MaterialSet {
        MaterialSet {
            default: MaterialId(0),
            hovered: MaterialId(1),
            selected: MaterialId(2),
        }
    }

    fn hit() -> RayHit {
        RayHit {
            point: Vec3::ZERO,
            normal: Vec3::Y,
            distance: 1.0,
        }
    }

    fn prototype() -> Prototype {
        Prototype {
            name: "marker".into(),
            collider: Collider::Sphere { radius: 0.05 },
            layers: LayerMask::DEFAULT,
        }
    }

    #[test]
    fn selected_material_wins_over_hover() {
        let mut prop = PropInteractable::new("cube", materials());
        assert_eq!(prop.current_material(), MaterialId(0));

        prop.on_hover_enter(&hit());
        assert_eq!(prop.current_material(), MaterialId(1));

        let _ = prop.on_select_enter(&FrameCtx { view_yaw_degrees: 0.0 }, &hit());
        assert_eq!(prop.current_material(), MaterialId(2));

        // Hover moving away does not disturb the selected appearance.
        prop.on_hover_exit();
        assert_eq!(prop.current_material(), MaterialId(2));

        prop.on_select_exit();
        assert_eq!(prop.current_material(), MaterialId(0));
    }

    #[test]
    fn spawn_position_offsets_along_normal_only() {
        let mut prop = PropInteractable::new("floor", materials()).with_prototype(prototype());
        let request = prop
            .on_select_enter(
                &FrameCtx {
                    view_yaw_degrees: 137.0,
                },
                &hit(),
            )
            .expect("prototype configured, spawn expected");

        assert!(request.position.abs_diff_eq(Vec3::new(0.0, 0.01, 0.0), 1e-6));
        // Yaw feeds orientation, never position.
        assert_eq!(request.yaw_degrees, 137.0);
    }

    #[test]
    fn missing_prototype_spawns_nothing() {
        let mut prop = PropInteractable::new("cube", materials());
        let request = prop.on_select_enter(&FrameCtx { view_yaw_degrees: 0.0 }, &hit());
        assert!(request.is_none());
    }
}
