use glam::Vec3;
use rstar::{PointDistance, RTreeObject, AABB};

pub trait ObjectIdTrait: Copy + PartialEq {}
impl<T> ObjectIdTrait for T where T: Copy + PartialEq {}

/// Shape of an object stored in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexedShape {
    Point(Vec3),
    Sphere { center: Vec3, radius: f32 },
}

impl IndexedShape {
    /// Calculate the closest point on the surface of the shape to `site`.
    ///
    /// For a sphere whose center coincides with `site`, any surface point is equally close;
    /// the one on +Y is chosen.
    pub fn closest_point(&self, site: Vec3) -> Vec3 {
        match *self {
            IndexedShape::Point(point) => point,
            IndexedShape::Sphere { center, radius } => {
                let direction = (site - center).try_normalize().unwrap_or(Vec3::Y);
                center + direction * radius
            }
        }
    }

    /// Calculate the distance from `site` to the shape. Zero if the site is inside.
    pub fn distance(&self, site: Vec3) -> f32 {
        match *self {
            IndexedShape::Point(point) => point.distance(site),
            IndexedShape::Sphere { center, radius } => (center.distance(site) - radius).max(0.0),
        }
    }

    fn bounds(&self) -> (Vec3, Vec3) {
        match *self {
            IndexedShape::Point(point) => (point, point),
            IndexedShape::Sphere { center, radius } => {
                (center - Vec3::splat(radius), center + Vec3::splat(radius))
            }
        }
    }
}

/// An object indexed in the R-tree, identified by `id`.
#[derive(Debug, Clone)]
pub struct ShapeTreeObject<ID>
where
    ID: ObjectIdTrait,
{
    shape: IndexedShape,
    id: ID,
}

impl<ID> ShapeTreeObject<ID>
where
    ID: ObjectIdTrait,
{
    pub fn new(shape: IndexedShape, id: ID) -> Self {
        Self { shape, id }
    }

    pub fn shape(&self) -> &IndexedShape {
        &self.shape
    }

    pub fn id(&self) -> &ID {
        &self.id
    }
}

impl<ID> RTreeObject for ShapeTreeObject<ID>
where
    ID: ObjectIdTrait,
{
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        let (min, max) = self.shape.bounds();
        AABB::from_corners(min.to_array(), max.to_array())
    }
}

impl<ID> PointDistance for ShapeTreeObject<ID>
where
    ID: ObjectIdTrait,
{
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        self.shape.distance(Vec3::from_array(*point)).powi(2)
    }
}

impl<ID> PartialEq for ShapeTreeObject<ID>
where
    ID: ObjectIdTrait,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
