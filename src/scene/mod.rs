//! The seam between generation and the host scene.
//!
//! Generation never owns scene objects. It asks a [`Scene`] to find nearby
//! objects, to instantiate nodes and endpoints, and to resolve which objects
//! belong to a generated network.

use glam::Vec3;

use crate::{error::SceneError, system::node::NodeRef};

pub mod spatial;

/// Opaque identity of an object in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_num(&self) -> u64 {
        self.0
    }
}

/// Query filter for scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Objects a branch may connect to: network nodes and foreign attachable objects.
    Attachable,
    /// Objects that never take part in branch search (e.g. attachment endpoints).
    Inert,
}

/// Scene collaborator used by the builder and the branch evaluator.
///
/// Queries return handles in a stable order for the same input, otherwise
/// generation under a fixed seed is not reproducible.
pub trait Scene {
    /// Find objects of `category` touching the sphere of `radius` around `center`.
    fn query_sphere(
        &self,
        center: Vec3,
        radius: f32,
        category: Category,
    ) -> Result<Vec<ObjectHandle>, SceneError>;

    /// Find objects touching the outer sphere but not the inner one.
    ///
    /// The result may contain duplicates; callers deduplicate.
    fn query_annulus(
        &self,
        center: Vec3,
        inner_radius: f32,
        outer_radius: f32,
        category: Category,
    ) -> Result<Vec<ObjectHandle>, SceneError> {
        let inner = self.query_sphere(center, inner_radius, category)?;
        let mut outer = self.query_sphere(center, outer_radius, category)?;
        outer.retain(|handle| !inner.contains(handle));
        Ok(outer)
    }

    /// Calculate the closest point on the surface of `object` to `reference`.
    fn closest_point_on(&self, object: ObjectHandle, reference: Vec3)
        -> Result<Vec3, SceneError>;

    /// Instantiate an inert endpoint marker at `position`.
    fn create_endpoint(&mut self, position: Vec3) -> Result<ObjectHandle, SceneError>;

    /// Instantiate an attachable object for a freshly built network node.
    fn spawn_node(&mut self, node: NodeRef, position: Vec3) -> Result<ObjectHandle, SceneError>;

    /// Resolve whether `object` is a generated network node.
    fn node_component_of(&self, object: ObjectHandle) -> Option<NodeRef>;

    /// Destroy an object created by [`Scene::create_endpoint`] or [`Scene::spawn_node`].
    fn despawn(&mut self, object: ObjectHandle) -> Result<(), SceneError>;
}
