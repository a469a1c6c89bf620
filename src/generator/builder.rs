use glam::Vec3;
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    core::{geometry::heading::Heading, Depth},
    error::ConfigError,
    scene::Scene,
    system::{
        chain::Chain,
        network::RoadNetwork,
        node::{ChainId, NetworkId, NodeKind, NodeRef},
        params::GenerationParameters,
        waypoint::Waypoint,
    },
};

use super::interpolator::CornerInterpolator;

/// Builds chains through waypoints and registers their nodes in the scene.
pub struct NetworkBuilder<'a, S, R>
where
    S: Scene,
    R: Rng,
{
    scene: &'a mut S,
    rng: &'a mut R,
}

impl<'a, S, R> NetworkBuilder<'a, S, R>
where
    S: Scene,
    R: Rng,
{
    pub fn new(scene: &'a mut S, rng: &'a mut R) -> Self {
        Self { scene, rng }
    }

    /// Build a network whose root chain passes through `waypoints` in order.
    ///
    /// The root chain is always at depth 0, whatever the depth in `params`.
    pub fn build(
        &mut self,
        id: NetworkId,
        waypoints: &[Waypoint],
        params: &GenerationParameters,
    ) -> Result<RoadNetwork, ConfigError> {
        params.validate()?;
        let params = GenerationParameters {
            depth: Depth::default(),
            ..params.clone()
        };
        let mut network = RoadNetwork::new(id);
        self.build_chain(&mut network, waypoints, params, None)?;
        Ok(network)
    }

    /// Append a chain through `waypoints` to `network`.
    ///
    /// Each waypoint becomes an anchor node, with the interpolated corners towards
    /// the next waypoint placed right after it.
    pub fn build_chain(
        &mut self,
        network: &mut RoadNetwork,
        waypoints: &[Waypoint],
        params: GenerationParameters,
        parent: Option<NodeRef>,
    ) -> Result<ChainId, ConfigError> {
        if waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints(waypoints.len()));
        }
        let (spacing, jitter) = (params.corner_spacing, params.max_corner_jitter);
        let chain = network.open_chain(parent, params);

        let Self { scene, rng } = self;
        for (i, waypoint) in waypoints.iter().enumerate() {
            Self::place(
                &mut **scene,
                network,
                chain,
                waypoint.position,
                waypoint.heading,
                waypoint.kind(),
            );

            let Some(next) = waypoints.get(i + 1) else {
                continue;
            };
            let corners =
                CornerInterpolator::new(waypoint.position, next.position, spacing, jitter, &mut **rng);
            for corner in corners {
                if let Some(previous) = network.chain_mut(chain).and_then(Chain::last_mut) {
                    previous.set_heading(corner.predecessor_heading);
                }
                Self::place(
                    &mut **scene,
                    network,
                    chain,
                    corner.position,
                    corner.heading,
                    NodeKind::Corner,
                );
            }
        }

        if let Some(built) = network.chain(chain) {
            debug!(
                chain = chain.as_num(),
                depth = built.depth().as_num(),
                nodes = built.len(),
                corners = built.corner_count(),
                "Built chain"
            );
        }
        Ok(chain)
    }

    /// Append a node and spawn its scene object.
    ///
    /// A node whose object fails to spawn stays in the chain but cannot be found by queries.
    fn place(
        scene: &mut S,
        network: &mut RoadNetwork,
        chain: ChainId,
        position: Vec3,
        heading: Heading,
        kind: NodeKind,
    ) {
        let Some(node_ref) = network.push_node(chain, position, heading, kind) else {
            return;
        };
        match scene.spawn_node(node_ref, position) {
            Ok(handle) => {
                if let Some(node) = network.node_mut(node_ref) {
                    node.set_handle(handle);
                }
            }
            Err(err) => {
                warn!(
                    chain = chain.as_num(),
                    index = node_ref.index,
                    "Failed to spawn node: {}",
                    err
                );
            }
        }
    }
}
