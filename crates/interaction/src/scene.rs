//! Prop scene: the owned collection of collidable props and spawned
//! instances.

use std::collections::HashMap;

use glam::Quat;
use glam::Vec3;
use raystage_core::{Collider, LayerMask, PointerPose, RayHit, Transform};
use tracing::info;

use crate::handler::InteractionHandler;

/// Handle to a prop for queries and updates.
pub type PropHandle = u64;

/// Template for instances created on selection.
#[derive(Debug, Clone)]
pub struct Prototype {
    /// Name stamped onto spawned instances.
    pub name: String,
    /// Collider given to spawned instances.
    pub collider: Collider,
    /// Layers spawned instances live on.
    pub layers: LayerMask,
}

/// A request to create one prototype instance, produced by a selection
/// callback and fulfilled by the scene.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    /// What to instantiate.
    pub prototype: Prototype,
    /// World-space position (hit point nudged off the surface).
    pub position: Vec3,
    /// Yaw-only orientation in degrees, taken from the viewpoint.
    pub yaw_degrees: f32,
}

/// A managed scene entry.
pub struct Prop {
    /// Display name used in logs.
    pub name: String,
    /// World transform; rotation input mutates this.
    pub transform: Transform,
    /// Collidable volume.
    pub collider: Collider,
    /// Layers this prop occupies.
    pub layers: LayerMask,
    /// Whether ray queries may return this prop.
    pub interactable: bool,
    /// Capability callbacks, cached at registration time.
    pub handler: Option<Box<dyn InteractionHandler>>,
}

impl Prop {
    /// Create an interactable prop with no handler.
    pub fn new(name: impl Into<String>, transform: Transform, collider: Collider) -> Self {
        Self {
            name: name.into(),
            transform,
            collider,
            layers: LayerMask::DEFAULT,
            interactable: true,
            handler: None,
        }
    }

    /// Builder: set the layer mask.
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Builder: attach capability callbacks.
    pub fn with_handler(mut self, handler: Box<dyn InteractionHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Builder: exclude this prop from ray queries.
    pub fn non_interactable(mut self) -> Self {
        self.interactable = false;
        self
    }
}

/// Manages all props in the scene.
///
/// Spawned instances are regular entries owned by the scene; their handles
/// are additionally tracked so callers can enumerate or clear them. There is
/// no fire-and-forget instantiation.
#[derive(Default)]
pub struct PropScene {
    props: HashMap<PropHandle, Prop>,
    spawned: Vec<PropHandle>,
    next_handle: u64,
}

impl PropScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            props: HashMap::new(),
            spawned: Vec::new(),
            next_handle: 1,
        }
    }

    /// Add a prop, returning its handle.
    pub fn add(&mut self, prop: Prop) -> PropHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.props.insert(handle, prop);
        handle
    }

    /// Shared access to a prop.
    pub fn get(&self, handle: PropHandle) -> Option<&Prop> {
        self.props.get(&handle)
    }

    /// Mutable access to a prop.
    pub fn get_mut(&mut self, handle: PropHandle) -> Option<&mut Prop> {
        self.props.get_mut(&handle)
    }

    /// Mutable access to a prop's capability handler.
    pub fn handler_mut(&mut self, handle: PropHandle) -> Option<&mut (dyn InteractionHandler + '_)> {
        match self.props.get_mut(&handle) {
            Some(prop) => prop
                .handler
                .as_deref_mut()
                .map(|h| h as &mut dyn InteractionHandler),
            None => None,
        }
    }

    /// Remove a prop (spawned or not) from the scene.
    pub fn remove(&mut self, handle: PropHandle) -> Option<Prop> {
        self.spawned.retain(|&h| h != handle);
        self.props.remove(&handle)
    }

    /// Number of props in the scene.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Whether the scene holds no props.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Instantiate a prototype per `request`, returning the new handle.
    ///
    /// The instance is positioned at the requested point and oriented with
    /// the requested yaw, zero pitch and roll. Spawned instances do not
    /// participate in ray queries.
    pub fn spawn(&mut self, request: SpawnRequest) -> PropHandle {
        let transform = Transform::with_rotation(
            request.position,
            Quat::from_rotation_y(request.yaw_degrees.to_radians()),
        );
        let prop = Prop {
            name: request.prototype.name,
            transform,
            collider: request.prototype.collider,
            layers: request.prototype.layers,
            interactable: false,
            handler: None,
        };
        info!(name = %prop.name, position = ?request.position, yaw = request.yaw_degrees, "spawned prop");

        let handle = self.add(prop);
        self.spawned.push(handle);
        handle
    }

    /// Handles of all instances created through [`PropScene::spawn`].
    pub fn spawned(&self) -> &[PropHandle] {
        &self.spawned
    }

    /// Remove every spawned instance from the scene.
    pub fn clear_spawned(&mut self) {
        for handle in std::mem::take(&mut self.spawned) {
            self.props.remove(&handle);
        }
    }

    /// Nearest interactable prop intersecting the ray within `max_distance`,
    /// restricted to props on layers in `mask`.
    ///
    /// Pure query: no scene state changes. Non-finite intersections are
    /// discarded.
    pub fn raycast_nearest(
        &self,
        pose: &PointerPose,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<(PropHandle, RayHit)> {
        let mut closest: Option<(PropHandle, RayHit)> = None;

        for (&handle, prop) in &self.props {
            if !prop.interactable || !prop.layers.intersects(mask) {
                continue;
            }

            if let Some(hit) = prop.collider.ray_intersection(&prop.transform, pose) {
                if !hit.distance.is_finite() || hit.distance > max_distance {
                    continue;
                }
                if closest.map_or(true, |(_, best)| hit.distance < best.distance) {
                    closest = Some((handle, hit));
                }
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_prop(name: &str, z: f32) -> Prop {
        Prop::new(
            name,
            Transform::new(Vec3::new(0.0, 0.0, z)),
            Collider::Box {
                half_extents: Vec3::splat(0.5),
            },
        )
        .with_layers(LayerMask::INTERACTABLE)
    }

    fn forward_pose() -> PointerPose {
        PointerPose::new(Vec3::ZERO, Vec3::NEG_Z)
    }

    #[test]
    fn nearest_of_two_overlapping_props_wins() {
        let mut scene = PropScene::new();
        let far = scene.add(box_prop("far", -10.0));
        let near = scene.add(box_prop("near", -5.0));

        let (handle, hit) = scene
            .raycast_nearest(&forward_pose(), 100.0, LayerMask::INTERACTABLE)
            .expect("both props are on the ray");
        assert_eq!(handle, near);
        assert_ne!(handle, far);
        assert!((hit.distance - 4.5).abs() < 1e-4);
    }

    #[test]
    fn layer_mask_excludes_props() {
        let mut scene = PropScene::new();
        scene.add(box_prop("cube", -5.0));

        assert!(scene
            .raycast_nearest(&forward_pose(), 100.0, LayerMask::SURFACE)
            .is_none());
    }

    #[test]
    fn out_of_range_hits_are_dropped() {
        let mut scene = PropScene::new();
        scene.add(box_prop("cube", -50.0));

        assert!(scene
            .raycast_nearest(&forward_pose(), 10.0, LayerMask::INTERACTABLE)
            .is_none());
    }

    #[test]
    fn non_interactable_props_are_invisible_to_rays() {
        let mut scene = PropScene::new();
        let handle = scene.add(box_prop("cube", -5.0).non_interactable());

        assert!(scene.get(handle).is_some());
        assert!(scene
            .raycast_nearest(&forward_pose(), 100.0, LayerMask::INTERACTABLE)
            .is_none());
    }

    #[test]
    fn spawned_instances_are_owned_and_clearable() {
        let mut scene = PropScene::new();
        let request = SpawnRequest {
            prototype: Prototype {
                name: "marker".into(),
                collider: Collider::Sphere { radius: 0.05 },
                layers: LayerMask::DEFAULT,
            },
            position: Vec3::new(1.0, 0.01, -2.0),
            yaw_degrees: 90.0,
        };

        let handle = scene.spawn(request);
        assert_eq!(scene.spawned(), &[handle]);

        let prop = scene.get(handle).expect("spawned prop exists");
        assert!(!prop.interactable);
        assert!(prop
            .transform
            .position
            .abs_diff_eq(Vec3::new(1.0, 0.01, -2.0), 1e-6));
        assert!((prop.transform.yaw_degrees() - 90.0).abs() < 1e-3);

        scene.clear_spawned();
        assert!(scene.spawned().is_empty());
        assert!(scene.get(handle).is_none());
    }

    #[test]
    fn remove_drops_spawn_tracking() {
        let mut scene = PropScene::new();
        let handle = scene.spawn(SpawnRequest {
            prototype: Prototype {
                name: "marker".into(),
                collider: Collider::Sphere { radius: 0.05 },
                layers: LayerMask::DEFAULT,
            },
            position: Vec3::ZERO,
            yaw_degrees: 0.0,
        });

        scene.remove(handle);
        assert!(scene.spawned().is_empty());
        assert!(scene.is_empty());
    }
}
