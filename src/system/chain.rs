use glam::Vec3;

use crate::core::{geometry::heading::Heading, Depth};

use super::{
    node::{ChainId, Node, NodeKind, NodeRef},
    params::GenerationParameters,
};

/// An ordered sequence of nodes from one anchor to another.
///
/// Nodes are only appended, so the index of a node never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    id: ChainId,
    nodes: Vec<Node>,
    parent: Option<NodeRef>,
    params: GenerationParameters,
}

impl Chain {
    pub(crate) fn new(id: ChainId, parent: Option<NodeRef>, params: GenerationParameters) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            parent,
            params,
        }
    }

    pub fn id(&self) -> ChainId {
        self.id
    }

    /// The node this chain branches from. `None` for the root chain.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    pub fn depth(&self) -> Depth {
        self.params.depth
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn first(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of interpolated corners between the anchors.
    pub fn corner_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| !node.kind().is_anchor())
            .count()
    }

    /// Positions of every node in order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.nodes.iter().map(|node| node.position()).collect()
    }

    pub(crate) fn push(&mut self, position: Vec3, heading: Heading, kind: NodeKind) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::new(position, heading, index, kind));
        index
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Node> {
        self.nodes.last_mut()
    }
}
