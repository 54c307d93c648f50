//! Node registry and identifiers.

use std::collections::HashMap;

use crate::render::bubble::Bubble;

/// Stable identifier for a node owned by a single `NodeTree` instance.
///
/// Semantics:
/// - IDs are unique within a tree instance.
/// - IDs are never reused for the lifetime of the tree instance, including
///   across `clear`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct NodeRegistry {
    entries: HashMap<NodeId, Bubble>,
    next_id: u64,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the next id without storing anything under it.
    pub fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn register(&mut self, bubble: Bubble) -> NodeId {
        let id = self.allocate();
        self.entries.insert(id, bubble);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Bubble> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Bubble> {
        self.entries.get_mut(&id)
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Bubble> {
        self.entries.remove(&id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Bubble> {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::bubble::{BubbleProps, RoleClass};

    #[test]
    fn ids_are_not_reused_after_removal_or_clear() {
        let mut registry = NodeRegistry::new();
        let first = registry.register(Bubble::new(BubbleProps::new(RoleClass::User, "a")));
        registry.remove(first);
        let second = registry.register(Bubble::new(BubbleProps::new(RoleClass::User, "b")));
        registry.clear();
        let third = registry.allocate();

        assert!(first < second && second < third);
        assert!(registry.is_empty());
    }
}
