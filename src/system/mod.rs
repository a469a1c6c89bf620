pub mod attachment;
pub mod chain;
pub mod network;
pub mod node;
pub mod params;
pub mod waypoint;
