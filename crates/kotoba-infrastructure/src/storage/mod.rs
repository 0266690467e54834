//! Local storage primitives.

pub mod atomic_json;
