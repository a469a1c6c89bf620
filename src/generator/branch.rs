use std::collections::HashSet;

use glam::Vec3;
use rand::Rng;
use tracing::{trace, warn};

use crate::{
    core::geometry::heading::Heading,
    error::SceneError,
    scene::{Category, ObjectHandle, Scene},
    system::{
        attachment::AttachmentRegistry,
        network::RoadNetwork,
        node::NodeRef,
        params::GenerationParameters,
        waypoint::Waypoint,
    },
};

/// Margin added to the distance to the predecessor, so the predecessor is never a candidate.
pub const EXCLUSION_MARGIN: f32 = 1.0;

/// An accepted end of a branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BranchTarget {
    /// An existing node of the network.
    Existing {
        node: NodeRef,
        position: Vec3,
        heading: Heading,
    },

    /// A new endpoint attached to a foreign object.
    Attachment {
        object: ObjectHandle,
        endpoint: ObjectHandle,
        position: Vec3,
    },
}

impl BranchTarget {
    pub fn position(&self) -> Vec3 {
        match *self {
            BranchTarget::Existing { position, .. } => position,
            BranchTarget::Attachment { position, .. } => position,
        }
    }

    /// The waypoint the branch chain passes through for this target.
    pub fn to_waypoint(&self) -> Waypoint {
        match *self {
            BranchTarget::Existing {
                node,
                position,
                heading,
            } => Waypoint::junction_at(position, heading, node),
            BranchTarget::Attachment {
                object,
                endpoint,
                position,
            } => Waypoint::attachment(position, object, endpoint),
        }
    }
}

/// Result of evaluating one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchEvaluation {
    /// Accepted targets, in the order they were accepted.
    pub targets: Vec<BranchTarget>,

    /// Distinct candidates returned by the search.
    pub candidates: usize,

    /// Collaborator failures that were skipped.
    pub failures: usize,
}

/// Why a candidate did not become a branch.
#[derive(Debug)]
enum Rejection {
    Chance,
    Crowded(usize),
    SameNode,
    Unresolved,
    TargetFull,
    IndexTooClose(usize),
    ObjectFull(usize),
    Failed(SceneError),
}

/// Searches branch targets around the nodes of a network.
pub struct BranchEvaluator<'a, S, R>
where
    S: Scene,
    R: Rng,
{
    scene: &'a mut S,
    registry: &'a mut AttachmentRegistry,
    rng: &'a mut R,
}

impl<'a, S, R> BranchEvaluator<'a, S, R>
where
    S: Scene,
    R: Rng,
{
    pub fn new(scene: &'a mut S, registry: &'a mut AttachmentRegistry, rng: &'a mut R) -> Self {
        Self {
            scene,
            registry,
            rng,
        }
    }

    /// Find branch targets for `node_ref`, whose previous node in the chain is `predecessor`.
    ///
    /// The first node of a chain is never evaluated. Candidates are scanned in
    /// query order until the node has no branch capacity left; every accepted
    /// target counts as a branch of the node.
    pub fn evaluate(
        &mut self,
        network: &mut RoadNetwork,
        node_ref: NodeRef,
        predecessor: NodeRef,
    ) -> BranchEvaluation {
        let mut evaluation = BranchEvaluation::default();
        if node_ref.index == 0 {
            return evaluation;
        }
        let (origin, exclusion_radius) =
            match (network.node(node_ref), network.node(predecessor)) {
                (Some(node), Some(previous)) => (
                    node.position(),
                    node.position().distance(previous.position()) + EXCLUSION_MARGIN,
                ),
                _ => return evaluation,
            };
        let Some(params) = network
            .chain(node_ref.chain)
            .map(|chain| chain.params().clone())
        else {
            return evaluation;
        };

        let candidates = match self.scene.query_annulus(
            origin,
            exclusion_radius,
            params.max_branch_search_radius,
            Category::Attachable,
        ) {
            Ok(candidates) => distinct_in_order(candidates),
            Err(err) => {
                warn!(
                    chain = node_ref.chain.as_num(),
                    index = node_ref.index,
                    "Branch search failed: {}",
                    err
                );
                evaluation.failures += 1;
                return evaluation;
            }
        };
        evaluation.candidates = candidates.len();

        for candidate in candidates {
            let has_capacity = network
                .node(node_ref)
                .is_some_and(|node| node.has_branch_capacity(params.max_branches_per_node));
            if !has_capacity {
                break;
            }

            match self.consider(network, node_ref, origin, candidate, &params) {
                Ok(target) => {
                    if let Some(node) = network.node_mut(node_ref) {
                        node.add_branch();
                    }
                    trace!(
                        chain = node_ref.chain.as_num(),
                        index = node_ref.index,
                        candidate = candidate.as_num(),
                        "Accepted branch target"
                    );
                    evaluation.targets.push(target);
                }
                Err(Rejection::Failed(err)) => {
                    warn!(
                        chain = node_ref.chain.as_num(),
                        index = node_ref.index,
                        candidate = candidate.as_num(),
                        "Skipped candidate after scene failure: {}",
                        err
                    );
                    evaluation.failures += 1;
                }
                Err(reason) => {
                    trace!(
                        chain = node_ref.chain.as_num(),
                        index = node_ref.index,
                        candidate = candidate.as_num(),
                        "Rejected candidate: {:?}",
                        reason
                    );
                }
            }
        }
        evaluation
    }

    fn consider(
        &mut self,
        network: &mut RoadNetwork,
        node_ref: NodeRef,
        origin: Vec3,
        candidate: ObjectHandle,
        params: &GenerationParameters,
    ) -> Result<BranchTarget, Rejection> {
        // roll in (0, 100]
        let roll = 100.0 - self.rng.gen_range(0.0..100.0);
        if roll > params.decayed_branch_chance() {
            return Err(Rejection::Chance);
        }

        let connection = self
            .scene
            .closest_point_on(candidate, origin)
            .map_err(Rejection::Failed)?;
        let crowd = self
            .scene
            .query_sphere(connection, params.min_clearance_radius, Category::Attachable)
            .map_err(Rejection::Failed)?;
        // the candidate itself is always part of the crowd
        let crowd = distinct_in_order(crowd).len();
        if crowd > 1 {
            return Err(Rejection::Crowded(crowd));
        }

        match self
            .scene
            .node_component_of(candidate)
            .filter(|target| target.network == network.id())
        {
            Some(target) => link_existing(network, node_ref, target, params),
            None => self.attach_foreign(candidate, connection, params),
        }
    }

    fn attach_foreign(
        &mut self,
        object: ObjectHandle,
        connection: Vec3,
        params: &GenerationParameters,
    ) -> Result<BranchTarget, Rejection> {
        if !self
            .registry
            .has_capacity(object, params.max_branches_per_node)
        {
            return Err(Rejection::ObjectFull(
                self.registry.attachment_count(object),
            ));
        }
        let endpoint = self
            .scene
            .create_endpoint(connection)
            .map_err(Rejection::Failed)?;
        self.registry.attach(object, endpoint);
        Ok(BranchTarget::Attachment {
            object,
            endpoint,
            position: connection,
        })
    }
}

/// Connect to an existing node of the same network, counting the branch on that node too.
///
/// Within a chain, the two nodes must be more than `min_index_separation` apart.
fn link_existing(
    network: &mut RoadNetwork,
    node_ref: NodeRef,
    target_ref: NodeRef,
    params: &GenerationParameters,
) -> Result<BranchTarget, Rejection> {
    if target_ref == node_ref {
        return Err(Rejection::SameNode);
    }
    let target = network.node_mut(target_ref).ok_or(Rejection::Unresolved)?;
    if !target.has_branch_capacity(params.max_branches_per_node) {
        return Err(Rejection::TargetFull);
    }
    // a node of another chain counts as one place before the start of this chain
    let separation = if target_ref.chain == node_ref.chain {
        node_ref.index.abs_diff(target_ref.index)
    } else {
        node_ref.index + 1
    };
    if separation <= params.min_index_separation {
        return Err(Rejection::IndexTooClose(separation));
    }
    target.add_branch();
    Ok(BranchTarget::Existing {
        node: target_ref,
        position: target.position(),
        heading: target.heading(),
    })
}

/// Remove repeated handles, keeping the first occurrence of each.
fn distinct_in_order(handles: Vec<ObjectHandle>) -> Vec<ObjectHandle> {
    let mut seen = HashSet::new();
    handles
        .into_iter()
        .filter(|handle| seen.insert(*handle))
        .collect()
}
