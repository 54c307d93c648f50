//! Retained node tree and its identifiers.

pub mod node_registry;
pub mod tree;

pub use node_registry::{NodeId, NodeRegistry};
pub use tree::{NodeTree, Presentation};
