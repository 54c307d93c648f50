//! Core interfaces and pure helpers.

pub mod component;
pub mod text;
