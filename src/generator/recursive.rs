use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    error::{ConfigError, GenerationError},
    scene::Scene,
    system::{
        attachment::AttachmentRegistry,
        chain::Chain,
        network::RoadNetwork,
        node::{ChainId, NetworkId},
        params::GenerationParameters,
        waypoint::Waypoint,
    },
};

use super::{
    branch::{BranchEvaluation, BranchEvaluator, BranchTarget},
    builder::NetworkBuilder,
};

/// Summary of a branch generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Nodes whose surroundings were searched for branch targets.
    pub evaluated_nodes: usize,

    /// Branch chains added to the network.
    pub branches: usize,

    /// Branch targets that were existing nodes of the network.
    pub linked_nodes: usize,

    /// Branch targets that were new endpoints on foreign objects.
    pub attachments: usize,

    /// Scene failures that were skipped.
    pub recovered_failures: usize,
}

impl GenerationReport {
    fn record(&mut self, evaluation: &BranchEvaluation) {
        self.evaluated_nodes += 1;
        self.recovered_failures += evaluation.failures;
        evaluation.targets.iter().for_each(|target| match target {
            BranchTarget::Existing { .. } => self.linked_nodes += 1,
            BranchTarget::Attachment { .. } => self.attachments += 1,
        });
    }
}

/// Generates a road network and grows branches from it.
///
/// All randomness comes from the generator's own RNG, so a seed and a scene
/// with a stable query order always produce the same network.
pub struct NetworkGenerator<R = StdRng>
where
    R: Rng,
{
    rng: R,
}

impl NetworkGenerator<StdRng> {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R> NetworkGenerator<R>
where
    R: Rng,
{
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Build the root chain through `waypoints`, without branches.
    pub fn build<S>(
        &mut self,
        scene: &mut S,
        id: NetworkId,
        waypoints: &[Waypoint],
        params: &GenerationParameters,
    ) -> Result<RoadNetwork, ConfigError>
    where
        S: Scene,
    {
        NetworkBuilder::new(scene, &mut self.rng).build(id, waypoints, params)
    }

    /// Grow branches from every node of the root chain, recursively.
    ///
    /// A branch chain is grown as soon as it is built, before the next node of
    /// its parent is evaluated. A network that already has branches is left as is.
    pub fn generate_branches<S>(
        &mut self,
        network: &mut RoadNetwork,
        scene: &mut S,
        registry: &mut AttachmentRegistry,
    ) -> Result<GenerationReport, ConfigError>
    where
        S: Scene,
    {
        let mut report = GenerationReport::default();
        let Some(root) = network.root() else {
            return Ok(report);
        };
        root.params().validate()?;
        if network.chains().len() > 1 {
            warn!(
                network = network.id().as_num(),
                "Network already has branches, skipping"
            );
            return Ok(report);
        }

        let root = root.id();
        self.grow(network, root, scene, registry, &mut report);

        info!(
            network = network.id().as_num(),
            chains = network.chains().len(),
            nodes = network.node_count(),
            evaluated = report.evaluated_nodes,
            branches = report.branches,
            failures = report.recovered_failures,
            "Generated branches"
        );
        Ok(report)
    }

    /// Build a network through `waypoints` and grow its branches.
    pub fn generate<S>(
        &mut self,
        scene: &mut S,
        registry: &mut AttachmentRegistry,
        id: NetworkId,
        waypoints: &[Waypoint],
        params: &GenerationParameters,
    ) -> Result<(RoadNetwork, GenerationReport), GenerationError>
    where
        S: Scene,
    {
        let mut network = self.build(scene, id, waypoints, params)?;
        let report = self.generate_branches(&mut network, scene, registry)?;
        Ok((network, report))
    }

    fn grow<S>(
        &mut self,
        network: &mut RoadNetwork,
        chain: ChainId,
        scene: &mut S,
        registry: &mut AttachmentRegistry,
        report: &mut GenerationReport,
    ) where
        S: Scene,
    {
        let Some(params) = network.chain(chain).map(|chain| chain.params().clone()) else {
            return;
        };
        if !params.can_branch() {
            return;
        }

        let len = network.chain(chain).map_or(0, Chain::len);
        for index in 1..len {
            let node_ref = network.node_ref(chain, index);
            let Some(predecessor) = node_ref.predecessor() else {
                continue;
            };
            let evaluation = BranchEvaluator::new(&mut *scene, &mut *registry, &mut self.rng)
                .evaluate(network, node_ref, predecessor);
            report.record(&evaluation);
            if evaluation.targets.is_empty() {
                continue;
            }

            let Some(origin) = network.node(node_ref) else {
                continue;
            };
            let waypoints = std::iter::once(Waypoint::junction(origin, node_ref))
                .chain(evaluation.targets.iter().map(BranchTarget::to_waypoint))
                .collect::<Vec<_>>();
            let branch = NetworkBuilder::new(&mut *scene, &mut self.rng).build_chain(
                network,
                &waypoints,
                params.child(),
                Some(node_ref),
            );
            match branch {
                Ok(branch) => {
                    report.branches += 1;
                    debug!(
                        parent = chain.as_num(),
                        index,
                        branch = branch.as_num(),
                        targets = evaluation.targets.len(),
                        "Spawned branch"
                    );
                    self.grow(network, branch, scene, registry, report);
                }
                Err(err) => {
                    warn!(
                        parent = chain.as_num(),
                        index, "Failed to build branch: {}", err
                    );
                }
            }
        }
    }
}
