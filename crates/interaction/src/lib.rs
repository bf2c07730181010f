//! Pointer interaction: prop scene, capability dispatch, hover/select
//! tracking, rotation input, and ray feedback.
//!
//! # Architecture
//!
//! - [`PropScene`] - owned collection of collidable props and spawned
//!   instances, with nearest-hit ray queries
//! - [`InteractionHandler`] - capability callbacks registered per prop
//! - [`PropInteractable`] - material-swap handler that spawns a prototype on
//!   selection
//! - [`PointerTracker`] - per-tick hover/select state machine
//! - [`HeadFollower`] - keeps a prop in front of the viewpoint
//! - [`RayVisual`] - presentation-only line/indicator feedback

mod follow;
mod handler;
mod interactable;
mod scene;
mod tracker;
mod visual;

pub use follow::HeadFollower;
pub use handler::{DummyHandler, FrameCtx, InteractionHandler};
pub use interactable::{MaterialId, MaterialSet, PropInteractable};
pub use scene::{Prop, PropHandle, PropScene, Prototype, SpawnRequest};
pub use tracker::{PointerInput, PointerTracker, TrackerConfig, TrackerError};
pub use visual::{LineIndicator, RayVisual};
