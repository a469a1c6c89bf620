use serde::{Deserialize, Serialize};

use crate::{core::Depth, error::ConfigError};

/// Smallest allowed distance between corners.
pub const MIN_CORNER_SPACING: f32 = 1.0;

/// Upper bound of [`GenerationParameters::max_branches_per_node`].
pub const MAX_BRANCHES_PER_NODE_LIMIT: usize = 15;

/// Upper bound of [`GenerationParameters::max_iteration_depth`].
pub const MAX_ITERATION_DEPTH_LIMIT: usize = 15;

/// Parameters to generate a network.
///
/// A chain keeps its own copy; branch chains receive a copy with `depth` incremented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Target distance between two consecutive corners.
    pub corner_spacing: f32,

    /// Maximum random displacement of a corner along each horizontal axis of its local frame.
    ///
    /// Must not exceed `corner_spacing`, otherwise corner placement is not guaranteed to progress.
    pub max_corner_jitter: f32,

    /// Minimum difference of chain indices between a node and an existing node it connects to.
    pub min_index_separation: usize,

    /// Radius around a connection point that must be free of other attachable objects.
    pub min_clearance_radius: f32,

    /// Maximum distance from a node to search for branch candidates.
    pub max_branch_search_radius: f32,

    /// Probability (percent) for a candidate to become a branch at depth 0.
    pub branch_chance: u8,

    /// Maximum number of branches attached to a node or to a foreign object.
    pub max_branches_per_node: usize,

    /// Branch chains are generated up to this depth.
    pub max_iteration_depth: usize,

    /// Depth of the chain these parameters belong to.
    pub depth: Depth,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            corner_spacing: 7.5,
            max_corner_jitter: 5.5,
            min_index_separation: 5,
            min_clearance_radius: 7.0,
            max_branch_search_radius: 30.0,
            branch_chance: 20,
            max_branches_per_node: 2,
            max_iteration_depth: 3,
            depth: Depth::default(),
        }
    }
}

impl GenerationParameters {
    /// Set the target distance between corners.
    pub fn corner_spacing(mut self, corner_spacing: f32) -> Self {
        self.corner_spacing = corner_spacing;
        self
    }

    /// Set the maximum random displacement of corners.
    pub fn max_corner_jitter(mut self, max_corner_jitter: f32) -> Self {
        self.max_corner_jitter = max_corner_jitter;
        self
    }

    /// Set the minimum index separation to connect two nodes.
    pub fn min_index_separation(mut self, min_index_separation: usize) -> Self {
        self.min_index_separation = min_index_separation;
        self
    }

    /// Set the clearance radius around connection points.
    pub fn min_clearance_radius(mut self, min_clearance_radius: f32) -> Self {
        self.min_clearance_radius = min_clearance_radius;
        self
    }

    /// Set the maximum branch search radius.
    pub fn max_branch_search_radius(mut self, max_branch_search_radius: f32) -> Self {
        self.max_branch_search_radius = max_branch_search_radius;
        self
    }

    /// Set the branch chance (percent).
    pub fn branch_chance(mut self, branch_chance: u8) -> Self {
        self.branch_chance = branch_chance;
        self
    }

    /// Set the maximum number of branches per node.
    pub fn max_branches_per_node(mut self, max_branches_per_node: usize) -> Self {
        self.max_branches_per_node = max_branches_per_node;
        self
    }

    /// Set the maximum iteration depth.
    pub fn max_iteration_depth(mut self, max_iteration_depth: usize) -> Self {
        self.max_iteration_depth = max_iteration_depth;
        self
    }

    /// Check every parameter. Values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.corner_spacing.is_finite() || self.corner_spacing < MIN_CORNER_SPACING {
            return Err(ConfigError::InvalidSpacing {
                value: self.corner_spacing,
                min: MIN_CORNER_SPACING,
            });
        }
        if !(0.0..=self.corner_spacing).contains(&self.max_corner_jitter) {
            return Err(ConfigError::InvalidJitter {
                value: self.max_corner_jitter,
                spacing: self.corner_spacing,
            });
        }
        if self.min_index_separation < 1 {
            return Err(ConfigError::InvalidIndexSeparation);
        }
        if !self.min_clearance_radius.is_finite() || self.min_clearance_radius < 0.0 {
            return Err(ConfigError::InvalidClearance(self.min_clearance_radius));
        }
        if !self.max_branch_search_radius.is_finite()
            || self.max_branch_search_radius < self.corner_spacing
        {
            return Err(ConfigError::InvalidSearchRadius {
                value: self.max_branch_search_radius,
                spacing: self.corner_spacing,
            });
        }
        if self.branch_chance > 100 {
            return Err(ConfigError::InvalidBranchChance(self.branch_chance));
        }
        if self.max_branches_per_node > MAX_BRANCHES_PER_NODE_LIMIT {
            return Err(ConfigError::InvalidMaxBranches {
                value: self.max_branches_per_node,
                max: MAX_BRANCHES_PER_NODE_LIMIT,
            });
        }
        if self.max_iteration_depth > MAX_ITERATION_DEPTH_LIMIT {
            return Err(ConfigError::InvalidMaxDepth {
                value: self.max_iteration_depth,
                max: MAX_ITERATION_DEPTH_LIMIT,
            });
        }
        Ok(())
    }

    /// Parameters for a branch chain spawned from a chain with these parameters.
    pub fn child(&self) -> Self {
        Self {
            depth: self.depth.incremented(),
            ..self.clone()
        }
    }

    /// Whether chains at this depth may still spawn branches.
    pub fn can_branch(&self) -> bool {
        self.depth.as_num() < self.max_iteration_depth
    }

    /// Branch chance (percent) after decaying with depth.
    pub fn decayed_branch_chance(&self) -> f64 {
        self.branch_chance as f64 / (1.5 * self.depth.as_num() as f64 + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GenerationParameters::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_without_clamping() {
        let params = GenerationParameters::default().corner_spacing(0.5);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidSpacing { .. })
        ));
        assert_eq!(params.corner_spacing, 0.5);

        let params = GenerationParameters::default()
            .corner_spacing(5.0)
            .max_corner_jitter(5.5);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidJitter { .. })
        ));

        let params = GenerationParameters::default().max_corner_jitter(-0.1);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidJitter { .. })
        ));

        let params = GenerationParameters::default().min_index_separation(0);
        assert_eq!(params.validate(), Err(ConfigError::InvalidIndexSeparation));

        let params = GenerationParameters::default().max_branch_search_radius(2.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidSearchRadius { .. })
        ));

        let params = GenerationParameters::default().branch_chance(101);
        assert_eq!(params.validate(), Err(ConfigError::InvalidBranchChance(101)));

        let params = GenerationParameters::default().max_iteration_depth(16);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidMaxDepth { value: 16, .. })
        ));

        let params = GenerationParameters::default().min_clearance_radius(f32::NAN);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidClearance(_))
        ));
    }

    #[test]
    fn test_jitter_equal_to_spacing_is_valid() {
        let params = GenerationParameters::default()
            .corner_spacing(4.0)
            .max_corner_jitter(4.0);
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_child_and_decay() {
        let params = GenerationParameters::default()
            .branch_chance(50)
            .max_iteration_depth(2);
        assert_eq!(params.decayed_branch_chance(), 50.0);
        assert!(params.can_branch());

        let child = params.child();
        assert_eq!(child.depth, Depth::new(1));
        assert_eq!(child.corner_spacing, params.corner_spacing);
        assert_eq!(child.decayed_branch_chance(), 20.0);
        assert!(child.can_branch());

        let grandchild = child.child();
        assert_eq!(grandchild.depth, Depth::new(2));
        assert!(!grandchild.can_branch());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let params: GenerationParameters =
            serde_json::from_str(r#"{ "corner_spacing": 10.0, "branch_chance": 70 }"#).unwrap();
        assert_eq!(params.corner_spacing, 10.0);
        assert_eq!(params.branch_chance, 70);
        assert_eq!(params.max_corner_jitter, 5.5);
        assert_eq!(params.depth, Depth::default());
    }
}
