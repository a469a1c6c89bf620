use glam::{Mat3, Quat, Vec3};

/// Orientation of a placed node.
///
/// The local frame follows the scene convention: +Z is forward, +X is the
/// lateral axis to the right and +Y points up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading(Quat);

impl Default for Heading {
    fn default() -> Self {
        Self(Quat::IDENTITY)
    }
}

impl Heading {
    /// Create a heading placed at `from` that faces `to`, keeping world up (+Y) where possible.
    ///
    /// If the two positions coincide, the identity heading is returned.
    pub fn looking_at(from: Vec3, to: Vec3) -> Self {
        let forward = (to - from).normalize_or_zero();
        if forward == Vec3::ZERO {
            return Self::default();
        }
        let right = {
            let right = Vec3::Y.cross(forward);
            // looking straight up or down
            if right.length_squared() < 1e-12 {
                Vec3::X
            } else {
                right.normalize()
            }
        };
        let up = forward.cross(right);
        Self(Quat::from_mat3(&Mat3::from_cols(right, up, forward)))
    }

    /// Get the rotation.
    pub fn quat(&self) -> Quat {
        self.0
    }

    /// Get the forward axis in world space.
    pub fn forward(&self) -> Vec3 {
        self.0 * Vec3::Z
    }

    /// Get the lateral (right) axis in world space.
    pub fn right(&self) -> Vec3 {
        self.0 * Vec3::X
    }

    /// Get the up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.0 * Vec3::Y
    }

    /// Convert a displacement expressed in the local frame to world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.0 * local
    }
}
