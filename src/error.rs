use thiserror::Error;

use crate::scene::ObjectHandle;

/// Invalid parameters or waypoints. Generation never starts when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Corner spacing must be a finite value of at least {min}, got {value}")]
    InvalidSpacing { value: f32, min: f32 },
    #[error("Corner jitter must be within 0..={spacing}, got {value}")]
    InvalidJitter { value: f32, spacing: f32 },
    #[error("Minimum index separation must be at least 1")]
    InvalidIndexSeparation,
    #[error("Clearance radius must be a finite, non-negative value, got {0}")]
    InvalidClearance(f32),
    #[error("Branch search radius must be finite and at least the corner spacing ({spacing}), got {value}")]
    InvalidSearchRadius { value: f32, spacing: f32 },
    #[error("Branch chance must be a percentage within 0..=100, got {0}")]
    InvalidBranchChance(u8),
    #[error("Maximum branches per node must be within 0..={max}, got {value}")]
    InvalidMaxBranches { value: usize, max: usize },
    #[error("Maximum iteration depth must be within 0..={max}, got {value}")]
    InvalidMaxDepth { value: usize, max: usize },
    #[error("At least two waypoints are required, got {0}")]
    TooFewWaypoints(usize),
    #[error("Waypoint {0} is empty")]
    MissingWaypoint(usize),
}

/// Failure reported by the scene collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Spatial query failed: {0}")]
    QueryFailed(String),
    #[error("Unknown scene object {0:?}")]
    UnknownObject(ObjectHandle),
    #[error("Failed to create scene object: {0}")]
    CreateFailed(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
