//! Capability callbacks dispatched by the pointer tracker.
//!
//! Handlers are registered with their prop and cached for the prop's
//! lifetime; the tracker never probes for capabilities at runtime.

use raystage_core::RayHit;

use crate::scene::SpawnRequest;

/// Per-frame context handed to selection callbacks.
#[derive(Debug, Clone, Copy)]
pub struct FrameCtx {
    /// Viewpoint yaw in degrees; spawned instances orient to this.
    pub view_yaw_degrees: f32,
}

/// Hover and select capability surface for a scene prop.
///
/// The tracker guarantees pairing: every `on_hover_enter` is eventually
/// followed by `on_hover_exit`, and every `on_select_enter` by
/// `on_select_exit`. Selection callbacks receive the hit snapshot taken when
/// the ray last struck the prop.
pub trait InteractionHandler {
    /// The ray started intersecting this prop.
    fn on_hover_enter(&mut self, hit: &RayHit);

    /// The ray moved off this prop (or stopped hitting anything).
    fn on_hover_exit(&mut self);

    /// Select input was pressed while this prop was hovered.
    ///
    /// May return a spawn request; the tracker forwards it to the scene,
    /// which owns the spawned instance.
    fn on_select_enter(&mut self, ctx: &FrameCtx, hit: &RayHit) -> Option<SpawnRequest>;

    /// Select input was released while this prop was selected.
    fn on_select_exit(&mut self);
}

/// No-op handler for props that should block the ray without reacting.
pub struct DummyHandler;

impl InteractionHandler for DummyHandler {
    fn on_hover_enter(&mut self, _hit: &RayHit) {}
    fn on_hover_exit(&mut self) {}
    fn on_select_enter(&mut self, _ctx: &FrameCtx, _hit: &RayHit) -> Option<SpawnRequest> {
        None
    }
    fn on_select_exit(&mut self) {}
}
