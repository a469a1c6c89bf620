use glam::Vec3;

use crate::{core::geometry::heading::Heading, scene::ObjectHandle};

/// Identity of a generated network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkId(u64);

impl NetworkId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_num(&self) -> u64 {
        self.0
    }
}

/// Index of a chain in its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(usize);

impl ChainId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn as_num(&self) -> usize {
        self.0
    }
}

/// Address of a node: its network, its chain and its index within the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef {
    pub network: NetworkId,
    pub chain: ChainId,
    pub index: usize,
}

impl NodeRef {
    pub fn new(network: NetworkId, chain: ChainId, index: usize) -> Self {
        Self {
            network,
            chain,
            index,
        }
    }

    /// The node placed right before this one in the same chain.
    pub fn predecessor(&self) -> Option<Self> {
        self.index.checked_sub(1).map(|index| Self { index, ..*self })
    }
}

/// How a node came to be in its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A user waypoint of the root chain.
    Waypoint,

    /// A corner placed between two anchors.
    Corner,

    /// An anchor standing in for an existing node of the network
    /// (the origin of a branch, or the existing node a branch connects to).
    Junction(NodeRef),

    /// The end anchor of a branch which attaches to a foreign object.
    Attachment {
        object: ObjectHandle,
        endpoint: ObjectHandle,
    },
}

impl NodeKind {
    /// Anchors are the nodes given as waypoints, as opposed to interpolated corners.
    pub fn is_anchor(&self) -> bool {
        !matches!(self, NodeKind::Corner)
    }
}

/// A node in a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    position: Vec3,
    heading: Heading,
    index: usize,
    kind: NodeKind,

    /// Number of branches this node takes part in, as origin or as target.
    branch_count: usize,

    /// The scene object registered for this node, if spawning succeeded.
    handle: Option<ObjectHandle>,
}

impl Node {
    pub(crate) fn new(position: Vec3, heading: Heading, index: usize, kind: NodeKind) -> Self {
        Self {
            position,
            heading,
            index,
            kind,
            branch_count: 0,
            handle: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn branch_count(&self) -> usize {
        self.branch_count
    }

    pub fn handle(&self) -> Option<ObjectHandle> {
        self.handle
    }

    /// Whether another branch fits under `max_branches`.
    pub fn has_branch_capacity(&self, max_branches: usize) -> bool {
        self.branch_count < max_branches
    }

    pub(crate) fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    pub(crate) fn set_handle(&mut self, handle: ObjectHandle) {
        self.handle = Some(handle);
    }

    pub(crate) fn add_branch(&mut self) {
        self.branch_count += 1;
    }
}
