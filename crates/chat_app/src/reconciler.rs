use std::collections::HashMap;

use conversation_log::{LogEvent, Role, Turn, TurnId};
use miniapp_chat::{BubbleProps, NodeId, Presentation, RoleClass};

/// Keeps exactly one presentation node per turn id.
///
/// Nodes are created only for ids the reconciler has never seen, so a turn
/// patched any number of times keeps its original node and position.
#[derive(Debug, Default)]
pub struct Reconciler {
    nodes: HashMap<TurnId, NodeId>,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_for(&self, id: &TurnId) -> Option<NodeId> {
        self.nodes.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Locates or creates the node for `turn` and brings it up to date.
    pub fn reconcile<P: Presentation + ?Sized>(&mut self, tree: &mut P, turn: &Turn) -> NodeId {
        let props = bubble_props(turn);

        if let Some(&node) = self.nodes.get(turn.id()) {
            if !tree.update_node(node, props) {
                tracing::debug!(turn_id = %turn.id(), "tracked node missing from tree");
            }
            return node;
        }

        let node = tree.append_node(props);
        self.nodes.insert(turn.id().clone(), node);
        node
    }

    /// Removes every tracked node and forgets the mapping.
    pub fn reconcile_reset<P: Presentation + ?Sized>(&mut self, tree: &mut P) {
        for (_, node) in self.nodes.drain() {
            tree.remove_node(node);
        }
    }

    pub fn apply<P: Presentation + ?Sized>(&mut self, tree: &mut P, event: &LogEvent) {
        match event {
            LogEvent::TurnChanged(turn) => {
                self.reconcile(tree, turn);
            }
            LogEvent::Cleared => self.reconcile_reset(tree),
        }
    }
}

/// Display fields for `turn`.
#[must_use]
pub fn bubble_props(turn: &Turn) -> BubbleProps {
    let role = match turn.role() {
        Role::User => RoleClass::User,
        Role::Assistant => RoleClass::Assistant,
    };

    BubbleProps {
        role,
        loading: turn.is_pending(),
        primary: turn.content().to_string(),
        secondary: turn.note().map(ToString::to_string),
    }
}
