//! Bubble rendering and theming.

pub mod bubble;
pub mod theme;

pub use bubble::{Bubble, BubbleProps, RoleClass, TextDirection, THINKING_TEXT};
pub use theme::{paint, Palette, Theme};
