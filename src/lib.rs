//! Presentation primitives for the mini-app chat client.
//!
//! Invariant: a node id is never reused, so a reconciler keyed by turn id can
//! always tell "update this node" from "append a new node".
//!
//! # Public API Overview
//! - Retain bubbles in a [`NodeTree`] and mutate them through [`Presentation`].
//! - Describe each bubble with [`BubbleProps`] (role class, loading flag,
//!   primary text, secondary note).
//! - Render with [`Component::render`] at a fixed column width; Unicode width
//!   and wrapping helpers live under [`core::text`].
//! - Bootstrap environment flags with [`config::EnvConfig`] and `tracing`
//!   output with [`logging::init`].

pub mod config;
pub mod logging;

pub mod core;
pub mod render;
pub mod runtime;

/// Runtime component trait.
pub use crate::core::component::Component;
/// Bubble model and theming.
pub use crate::render::{
    paint, Bubble, BubbleProps, Palette, RoleClass, TextDirection, Theme, THINKING_TEXT,
};
/// Stable node identifier type and the retained tree.
pub use crate::runtime::{NodeId, NodeTree, Presentation};

/// Column-aware wrapping helper.
pub use crate::core::text::wrap::wrap_text;
/// Visible width helper that ignores SGR sequences.
pub use crate::core::text::width::visible_width;
