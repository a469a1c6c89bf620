use std::collections::BTreeMap;

use glam::Vec3;
use rstar::RTree;

use crate::{
    core::container::index_object::{IndexedShape, ShapeTreeObject},
    error::SceneError,
    system::node::NodeRef,
};

use super::{Category, ObjectHandle, Scene};

#[derive(Debug, Clone)]
struct SceneEntry {
    shape: IndexedShape,
    category: Category,
    node: Option<NodeRef>,
}

/// In-memory scene backed by an R-tree.
///
/// Foreign objects are spheres, generated nodes and endpoints are points.
/// An object is found by a sphere query when its surface touches the sphere.
/// Query results are sorted by handle, so the order is stable.
#[derive(Debug, Clone)]
pub struct SpatialScene {
    objects: BTreeMap<ObjectHandle, SceneEntry>,
    tree: RTree<ShapeTreeObject<ObjectHandle>>,
    next_handle: u64,
}

impl Default for SpatialScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            tree: RTree::new(),
            next_handle: 0,
        }
    }

    /// Add a spherical object that is not part of any network.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, category: Category) -> ObjectHandle {
        self.insert(
            IndexedShape::Sphere {
                center,
                radius: radius.max(0.0),
            },
            category,
            None,
        )
    }

    /// Add a point-like object that is not part of any network.
    pub fn add_point(&mut self, position: Vec3, category: Category) -> ObjectHandle {
        self.insert(IndexedShape::Point(position), category, None)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    pub fn category_of(&self, handle: ObjectHandle) -> Option<Category> {
        self.objects.get(&handle).map(|entry| entry.category)
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn insert(
        &mut self,
        shape: IndexedShape,
        category: Category,
        node: Option<NodeRef>,
    ) -> ObjectHandle {
        let handle = ObjectHandle::new(self.next_handle);
        self.next_handle += 1;
        self.tree.insert(ShapeTreeObject::new(shape, handle));
        self.objects.insert(
            handle,
            SceneEntry {
                shape,
                category,
                node,
            },
        );
        handle
    }

    fn remove(&mut self, handle: ObjectHandle) -> Option<SceneEntry> {
        let entry = self.objects.remove(&handle)?;
        self.tree.remove(&ShapeTreeObject::new(entry.shape, handle));
        Some(entry)
    }
}

impl Scene for SpatialScene {
    fn query_sphere(
        &self,
        center: Vec3,
        radius: f32,
        category: Category,
    ) -> Result<Vec<ObjectHandle>, SceneError> {
        if !center.is_finite() || !radius.is_finite() {
            return Err(SceneError::QueryFailed(format!(
                "non-finite sphere query at {center} with radius {radius}"
            )));
        }
        let radius = radius.max(0.0);
        let mut handles = self
            .tree
            .locate_within_distance(center.to_array(), radius * radius)
            .map(|object| *object.id())
            .filter(|handle| {
                self.objects
                    .get(handle)
                    .is_some_and(|entry| entry.category == category)
            })
            .collect::<Vec<_>>();
        handles.sort();
        Ok(handles)
    }

    fn closest_point_on(
        &self,
        object: ObjectHandle,
        reference: Vec3,
    ) -> Result<Vec3, SceneError> {
        self.objects
            .get(&object)
            .map(|entry| entry.shape.closest_point(reference))
            .ok_or(SceneError::UnknownObject(object))
    }

    fn create_endpoint(&mut self, position: Vec3) -> Result<ObjectHandle, SceneError> {
        if !position.is_finite() {
            return Err(SceneError::CreateFailed(format!(
                "endpoint position {position} is not finite"
            )));
        }
        Ok(self.insert(IndexedShape::Point(position), Category::Inert, None))
    }

    fn spawn_node(&mut self, node: NodeRef, position: Vec3) -> Result<ObjectHandle, SceneError> {
        if !position.is_finite() {
            return Err(SceneError::CreateFailed(format!(
                "node position {position} is not finite"
            )));
        }
        Ok(self.insert(
            IndexedShape::Point(position),
            Category::Attachable,
            Some(node),
        ))
    }

    fn node_component_of(&self, object: ObjectHandle) -> Option<NodeRef> {
        self.objects.get(&object).and_then(|entry| entry.node)
    }

    fn despawn(&mut self, object: ObjectHandle) -> Result<(), SceneError> {
        self.remove(object)
            .map(|_| ())
            .ok_or(SceneError::UnknownObject(object))
    }
}
