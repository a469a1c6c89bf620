use glam::Vec3;
use tracing::{debug, warn};

use crate::{
    core::{container::undirected::UndirectedGraph, geometry::heading::Heading, Depth},
    error::{GenerationError, SceneError},
    scene::Scene,
};

use super::{
    attachment::AttachmentRegistry,
    chain::Chain,
    node::{ChainId, Node, NodeKind, NodeRef, NetworkId},
    params::GenerationParameters,
};

/// A generated road network.
///
/// Chains live in an arena indexed by [`ChainId`]; the root chain is the first one.
/// A branch chain refers to its parent through a [`NodeRef`], so the tree never
/// holds references to itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNetwork {
    id: NetworkId,
    chains: Vec<Chain>,
}

impl RoadNetwork {
    /// Create an empty network.
    pub fn new(id: NetworkId) -> Self {
        Self {
            id,
            chains: Vec::new(),
        }
    }

    pub fn id(&self) -> NetworkId {
        self.id
    }

    /// The chain through the user waypoints.
    pub fn root(&self) -> Option<&Chain> {
        self.chains.first()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id.as_num())
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Get a node of this network. Nodes of other networks are never returned.
    pub fn node(&self, node_ref: NodeRef) -> Option<&Node> {
        if node_ref.network != self.id {
            return None;
        }
        self.chain(node_ref.chain)?.node(node_ref.index)
    }

    pub(crate) fn node_mut(&mut self, node_ref: NodeRef) -> Option<&mut Node> {
        if node_ref.network != self.id {
            return None;
        }
        self.chains
            .get_mut(node_ref.chain.as_num())?
            .node_mut(node_ref.index)
    }

    /// Address of the node at `index` in `chain`.
    pub fn node_ref(&self, chain: ChainId, index: usize) -> NodeRef {
        NodeRef::new(self.id, chain, index)
    }

    /// Chains branching directly from a node of `chain`.
    pub fn children_of(&self, chain: ChainId) -> impl Iterator<Item = &Chain> {
        self.chains
            .iter()
            .filter(move |child| child.parent().is_some_and(|parent| parent.chain == chain))
    }

    /// Total number of nodes over every chain.
    pub fn node_count(&self) -> usize {
        self.chains.iter().map(|chain| chain.len()).sum()
    }

    /// Depth of the deepest chain.
    pub fn max_depth(&self) -> Option<Depth> {
        self.chains.iter().map(|chain| chain.depth()).max()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Node positions of every chain, in chain order.
    pub fn polylines(&self) -> Vec<Vec<Vec3>> {
        self.chains.iter().map(|chain| chain.positions()).collect()
    }

    /// Road graph of the network.
    ///
    /// Consecutive nodes of a chain are connected, and every junction anchor
    /// is connected to the node it stands in for.
    pub fn connections(&self) -> UndirectedGraph<NodeRef> {
        let mut graph = UndirectedGraph::new();
        self.chains.iter().for_each(|chain| {
            chain.nodes().windows(2).for_each(|pair| {
                graph.add_edge(
                    self.node_ref(chain.id(), pair[0].index()),
                    self.node_ref(chain.id(), pair[1].index()),
                );
            });
            chain.nodes().iter().for_each(|node| {
                if let NodeKind::Junction(target) = node.kind() {
                    graph.add_edge(self.node_ref(chain.id(), node.index()), target);
                }
            });
        });
        graph
    }

    /// Remove every chain, destroying the scene objects created for them and
    /// releasing their attachments.
    ///
    /// Every object is attempted even if some fail; the first failure is returned.
    pub fn clear<S>(
        &mut self,
        scene: &mut S,
        registry: &mut AttachmentRegistry,
    ) -> Result<(), GenerationError>
    where
        S: Scene,
    {
        let mut first_error = None;
        let mut record = |result: Result<(), SceneError>| {
            if let Err(err) = result {
                warn!("Failed to despawn while clearing the network: {}", err);
                first_error.get_or_insert(err);
            }
        };

        for chain in self.chains.drain(..) {
            for node in chain.nodes() {
                if let Some(handle) = node.handle() {
                    record(scene.despawn(handle));
                }
                if let NodeKind::Attachment { endpoint, .. } = node.kind() {
                    registry.release(endpoint);
                    record(scene.despawn(endpoint));
                }
            }
        }
        debug!(network = self.id.as_num(), "Cleared network");

        first_error.map_or(Ok(()), |err| Err(err.into()))
    }

    pub(crate) fn open_chain(
        &mut self,
        parent: Option<NodeRef>,
        params: GenerationParameters,
    ) -> ChainId {
        let id = ChainId::new(self.chains.len());
        self.chains.push(Chain::new(id, parent, params));
        id
    }

    pub(crate) fn chain_mut(&mut self, id: ChainId) -> Option<&mut Chain> {
        self.chains.get_mut(id.as_num())
    }

    /// Append a node to `chain`. Returns `None` if the chain does not exist.
    pub(crate) fn push_node(
        &mut self,
        chain: ChainId,
        position: Vec3,
        heading: Heading,
        kind: NodeKind,
    ) -> Option<NodeRef> {
        let index = self.chain_mut(chain)?.push(position, heading, kind);
        Some(self.node_ref(chain, index))
    }
}

#[cfg(test)]
mod tests {
    use crate::scene::{spatial::SpatialScene, Category};

    use super::*;

    fn straight_network() -> RoadNetwork {
        let mut network = RoadNetwork::new(NetworkId::new(1));
        let root = network.open_chain(None, GenerationParameters::default());
        for x in 0..4 {
            let kind = if x == 0 || x == 3 {
                NodeKind::Waypoint
            } else {
                NodeKind::Corner
            };
            network.push_node(root, Vec3::new(x as f32, 0.0, 0.0), Heading::default(), kind);
        }
        network
    }

    #[test]
    fn test_node_lookup_is_scoped_to_network() {
        let network = straight_network();
        let inside = network.node_ref(ChainId::new(0), 2);
        assert_eq!(network.node(inside).map(|node| node.index()), Some(2));

        let foreign = NodeRef::new(NetworkId::new(7), ChainId::new(0), 2);
        assert!(network.node(foreign).is_none());
        assert!(network.node(network.node_ref(ChainId::new(0), 4)).is_none());
        assert!(network.node(network.node_ref(ChainId::new(3), 0)).is_none());
    }

    #[test]
    fn test_connections_and_children() {
        let mut network = straight_network();
        let origin = network.node_ref(ChainId::new(0), 1);
        let params = GenerationParameters::default().child();
        let branch = network.open_chain(Some(origin), params);
        network.push_node(
            branch,
            Vec3::new(1.0, 0.0, 0.0),
            Heading::default(),
            NodeKind::Junction(origin),
        );
        network.push_node(
            branch,
            Vec3::new(1.0, 0.0, 5.0),
            Heading::default(),
            NodeKind::Waypoint,
        );

        let graph = network.connections();
        assert_eq!(graph.size(), 3 + 1 + 1);
        assert!(graph.has_edge(origin, network.node_ref(branch, 0)));
        assert_eq!(graph.degree(origin), 3);

        let children = network.children_of(ChainId::new(0)).collect::<Vec<_>>();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id(), branch);
        assert_eq!(network.max_depth(), Some(Depth::new(1)));
        assert_eq!(network.node_count(), 6);
        assert_eq!(network.polylines().len(), 2);
    }

    #[test]
    fn test_clear_despawns_and_releases() {
        let mut scene = SpatialScene::new();
        let mut registry = AttachmentRegistry::new();
        let mut network = straight_network();

        let node_ref = network.node_ref(ChainId::new(0), 0);
        let handle = scene.spawn_node(node_ref, Vec3::ZERO).unwrap();
        if let Some(node) = network.node_mut(node_ref) {
            node.set_handle(handle);
        }

        let object = scene.add_sphere(Vec3::new(0.0, 0.0, 20.0), 2.0, Category::Attachable);
        let endpoint = scene.create_endpoint(Vec3::new(0.0, 0.0, 18.0)).unwrap();
        registry.attach(object, endpoint);
        network.push_node(
            ChainId::new(0),
            Vec3::new(0.0, 0.0, 18.0),
            Heading::default(),
            NodeKind::Attachment { object, endpoint },
        );

        assert_eq!(network.clear(&mut scene, &mut registry), Ok(()));
        assert!(network.is_empty());
        assert!(registry.is_empty());
        assert!(!scene.contains(handle));
        assert!(!scene.contains(endpoint));
        assert!(scene.contains(object));
    }

    #[test]
    fn test_clear_reports_first_failure() {
        let mut scene = SpatialScene::new();
        let mut registry = AttachmentRegistry::new();
        let mut network = straight_network();

        let handles = (0..2)
            .map(|index| {
                let node_ref = network.node_ref(ChainId::new(0), index);
                let handle = scene.spawn_node(node_ref, Vec3::ZERO).unwrap();
                if let Some(node) = network.node_mut(node_ref) {
                    node.set_handle(handle);
                }
                handle
            })
            .collect::<Vec<_>>();
        scene.despawn(handles[0]).unwrap();

        assert_eq!(
            network.clear(&mut scene, &mut registry),
            Err(GenerationError::Scene(SceneError::UnknownObject(handles[0])))
        );
        // the remaining objects are still removed
        assert!(network.is_empty());
        assert!(!scene.contains(handles[1]));
    }
}
