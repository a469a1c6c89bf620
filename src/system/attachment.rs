use std::collections::BTreeMap;

use crate::scene::ObjectHandle;

/// Endpoints attached to one foreign object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentEntry {
    endpoints: Vec<ObjectHandle>,
}

impl AttachmentEntry {
    /// Number of branches attached to the object.
    pub fn count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn endpoints(&self) -> &[ObjectHandle] {
        &self.endpoints
    }
}

/// Side table tracking how many branches attach to each foreign object.
///
/// An entry exists only while at least one endpoint is attached.
/// Access happens in evaluation order; a concurrent caller must serialize
/// the check-then-attach sequence around this registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentRegistry {
    entries: BTreeMap<ObjectHandle, AttachmentEntry>,
}

impl AttachmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object: ObjectHandle) -> Option<&AttachmentEntry> {
        self.entries.get(&object)
    }

    pub fn attachment_count(&self, object: ObjectHandle) -> usize {
        self.entries.get(&object).map_or(0, |entry| entry.count())
    }

    pub fn endpoints(&self, object: ObjectHandle) -> &[ObjectHandle] {
        self.entries
            .get(&object)
            .map(|entry| entry.endpoints())
            .unwrap_or(&[])
    }

    /// Whether one more branch may attach to `object`.
    pub fn has_capacity(&self, object: ObjectHandle, max_attachments: usize) -> bool {
        self.attachment_count(object) < max_attachments
    }

    /// Register `endpoint` against `object` and return the new attachment count.
    pub fn attach(&mut self, object: ObjectHandle, endpoint: ObjectHandle) -> usize {
        let entry = self.entries.entry(object).or_default();
        if !entry.endpoints.contains(&endpoint) {
            entry.endpoints.push(endpoint);
        }
        entry.count()
    }

    /// Drop `endpoint` from whichever object it is attached to.
    ///
    /// Returns that object. Its entry is removed once no endpoint is left.
    pub fn release(&mut self, endpoint: ObjectHandle) -> Option<ObjectHandle> {
        let object = self
            .entries
            .iter()
            .find(|(_, entry)| entry.endpoints.contains(&endpoint))
            .map(|(object, _)| *object)?;
        if let Some(entry) = self.entries.get_mut(&object) {
            entry.endpoints.retain(|handle| *handle != endpoint);
            if entry.endpoints.is_empty() {
                self.entries.remove(&object);
            }
        }
        Some(object)
    }

    /// Keep only the endpoints for which `keep` returns true, e.g. those still alive in the scene.
    pub fn retain_endpoints<F>(&mut self, mut keep: F)
    where
        F: FnMut(ObjectHandle) -> bool,
    {
        self.entries.retain(|_, entry| {
            entry.endpoints.retain(|handle| keep(*handle));
            !entry.endpoints.is_empty()
        });
    }

    /// Number of objects with at least one attachment.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &AttachmentEntry)> {
        self.entries.iter().map(|(object, entry)| (*object, entry))
    }
}
