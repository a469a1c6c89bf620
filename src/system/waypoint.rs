use glam::Vec3;

use crate::{core::geometry::heading::Heading, error::ConfigError, scene::ObjectHandle};

use super::node::{Node, NodeKind, NodeRef};

/// A point a chain always passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec3,
    pub heading: Heading,
    kind: NodeKind,
}

impl Waypoint {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            heading: Heading::default(),
            kind: NodeKind::Waypoint,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// A waypoint standing in for an existing node of the network.
    pub(crate) fn junction(node: &Node, node_ref: NodeRef) -> Self {
        Self::junction_at(node.position(), node.heading(), node_ref)
    }

    pub(crate) fn junction_at(position: Vec3, heading: Heading, node_ref: NodeRef) -> Self {
        Self {
            position,
            heading,
            kind: NodeKind::Junction(node_ref),
        }
    }

    /// A waypoint at an endpoint attached to a foreign object.
    pub(crate) fn attachment(position: Vec3, object: ObjectHandle, endpoint: ObjectHandle) -> Self {
        Self {
            position,
            heading: Heading::default(),
            kind: NodeKind::Attachment { object, endpoint },
        }
    }
}

/// Role of a slot in a waypoint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointRole {
    Start,
    Corner(usize),
    End,
}

/// Editable list of waypoints for a root chain.
///
/// Slots may be empty while the list is being edited; the list always keeps
/// at least two slots once normalized, so a start and an end exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointList {
    slots: Vec<Option<Waypoint>>,
}

impl WaypointList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_waypoints<I>(waypoints: I) -> Self
    where
        I: IntoIterator<Item = Waypoint>,
    {
        Self {
            slots: waypoints.into_iter().map(Some).collect(),
        }
    }

    pub fn push(&mut self, waypoint: Option<Waypoint>) {
        self.slots.push(waypoint);
    }

    /// Replace the slot at `index`. Returns false if it does not exist.
    pub fn set(&mut self, index: usize, waypoint: Option<Waypoint>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = waypoint;
                true
            }
            None => false,
        }
    }

    pub fn slots(&self) -> &[Option<Waypoint>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Repair the list after editing.
    ///
    ///  - pads the list to two slots.
    ///  - removes a waypoint repeating the position of any waypoint before it.
    ///  - removes empty slots, unless every slot is empty.
    ///
    /// Nothing is removed once only two slots are left.
    pub fn normalize(&mut self) {
        while self.slots.len() < 2 {
            self.slots.push(None);
        }

        let mut index = 1;
        while index < self.slots.len() && self.slots.len() > 2 {
            let repeated = self.slots[index].is_some_and(|current| {
                self.slots[..index]
                    .iter()
                    .flatten()
                    .any(|earlier| earlier.position == current.position)
            });
            if repeated {
                self.slots.remove(index);
            } else {
                index += 1;
            }
        }

        if self.slots.iter().all(Option::is_none) {
            return;
        }
        while self.slots.len() > 2 {
            match self.slots.iter().rposition(Option::is_none) {
                Some(empty) => {
                    self.slots.remove(empty);
                }
                None => break,
            }
        }
    }

    /// Role of the slot at `index`.
    pub fn role(&self, index: usize) -> Option<WaypointRole> {
        if index >= self.slots.len() {
            None
        } else if index == 0 {
            Some(WaypointRole::Start)
        } else if index == self.slots.len() - 1 {
            Some(WaypointRole::End)
        } else {
            Some(WaypointRole::Corner(index))
        }
    }

    /// Get the waypoints to build from.
    pub fn resolve(&self) -> Result<Vec<Waypoint>, ConfigError> {
        if self.slots.len() < 2 {
            return Err(ConfigError::TooFewWaypoints(self.slots.len()));
        }
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(ConfigError::MissingWaypoint(index)))
            .collect()
    }
}
