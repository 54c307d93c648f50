//! Text helpers (width calculations, wrapping, alignment).
//!
//! These helpers are pure (string in/string out) and live under `core` so the
//! render layer can depend on them without importing runtime state.

pub mod width;
pub mod wrap;
