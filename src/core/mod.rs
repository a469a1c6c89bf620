use serde::{Deserialize, Serialize};

pub mod container;
pub mod geometry;

/// Recursion depth of a chain. The root chain is at depth 0.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Depth(usize);

impl Depth {
    pub fn new(depth: usize) -> Self {
        Self(depth)
    }

    pub fn as_num(&self) -> usize {
        self.0
    }

    pub fn incremented(self) -> Self {
        Self(self.0 + 1)
    }
}
