//! Retained bubble tree: the mount point the reconciler writes into.

use crate::core::component::Component;
use crate::render::bubble::{Bubble, BubbleProps, TextDirection};
use crate::render::theme::Theme;
use crate::runtime::node_registry::{NodeId, NodeRegistry};

/// Node-level mutation surface a reconciler drives.
pub trait Presentation {
    /// Appends a node after every existing node and returns its id.
    fn append_node(&mut self, props: BubbleProps) -> NodeId;

    /// Updates the node in place. Returns `false` when the id is unknown.
    fn update_node(&mut self, id: NodeId, props: BubbleProps) -> bool;

    /// Removes the node. Returns `false` when the id is unknown.
    fn remove_node(&mut self, id: NodeId) -> bool;

    fn node(&self, id: NodeId) -> Option<&BubbleProps>;
}

/// Ordered bubble nodes plus the shell-level render settings.
///
/// An unmounted tree accepts every call and keeps nothing, so a front end
/// without a message area still runs.
#[derive(Debug)]
pub struct NodeTree {
    registry: NodeRegistry,
    order: Vec<NodeId>,
    mounted: bool,
    direction: TextDirection,
    theme: Theme,
    styled: bool,
    revision: u64,
    appended: u64,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::new(),
            order: Vec::new(),
            mounted: true,
            direction: TextDirection::Ltr,
            theme: Theme::Dark,
            styled: false,
            revision: 0,
            appended: 0,
        }
    }

    pub fn unmounted() -> Self {
        Self {
            mounted: false,
            ..Self::new()
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Node ids in display order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bumped on every change that alters rendered output.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Total nodes ever appended.
    pub fn appended_count(&self) -> u64 {
        self.appended
    }

    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        if self.direction == direction {
            return;
        }
        self.direction = direction;
        for bubble in self.registry.values_mut() {
            bubble.set_direction(direction);
        }
        self.bump();
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        self.restyle();
    }

    pub fn is_styled(&self) -> bool {
        self.styled
    }

    /// Enables SGR painting of rendered lines.
    pub fn set_styled(&mut self, styled: bool) {
        if self.styled == styled {
            return;
        }
        self.styled = styled;
        self.restyle();
    }

    /// Removes every node at once.
    pub fn clear(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.order.clear();
        self.registry.clear();
        self.bump();
    }

    fn palette(&self) -> Option<crate::render::theme::Palette> {
        self.styled.then(|| self.theme.palette())
    }

    fn restyle(&mut self) {
        let palette = self.palette();
        for bubble in self.registry.values_mut() {
            bubble.set_palette(palette);
        }
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Presentation for NodeTree {
    fn append_node(&mut self, props: BubbleProps) -> NodeId {
        self.appended += 1;
        if !self.mounted {
            tracing::debug!("append on unmounted tree ignored");
            return self.registry.allocate();
        }

        let mut bubble = Bubble::new(props);
        bubble.set_direction(self.direction);
        bubble.set_palette(self.palette());
        let id = self.registry.register(bubble);
        self.order.push(id);
        self.bump();
        id
    }

    fn update_node(&mut self, id: NodeId, props: BubbleProps) -> bool {
        let Some(bubble) = self.registry.get_mut(id) else {
            return false;
        };
        if bubble.set_props(props) {
            self.bump();
        }
        true
    }

    fn remove_node(&mut self, id: NodeId) -> bool {
        if self.registry.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        self.bump();
        true
    }

    fn node(&self, id: NodeId) -> Option<&BubbleProps> {
        self.registry.get(id).map(Bubble::props)
    }
}

impl Component for NodeTree {
    fn render(&mut self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for (index, id) in self.order.iter().enumerate() {
            let Some(bubble) = self.registry.get_mut(*id) else {
                continue;
            };
            if index > 0 {
                lines.push(String::new());
            }
            lines.extend(bubble.render(width));
        }
        lines
    }

    fn invalidate(&mut self) {
        for bubble in self.registry.values_mut() {
            bubble.invalidate();
        }
    }
}
