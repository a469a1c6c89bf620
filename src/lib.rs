pub mod core;
pub mod error;
pub mod generator;
pub mod scene;
pub mod system;

pub use crate::core::geometry::heading::Heading;
pub use error::{ConfigError, GenerationError, SceneError};
pub use generator::recursive::{GenerationReport, NetworkGenerator};
pub use scene::{spatial::SpatialScene, Category, ObjectHandle, Scene};
pub use system::{
    attachment::AttachmentRegistry,
    network::RoadNetwork,
    node::{NetworkId, NodeKind, NodeRef},
    params::GenerationParameters,
    waypoint::{Waypoint, WaypointList},
};
