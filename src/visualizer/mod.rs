// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Visualization tools for inference results.

/// Color definitions.
pub mod color;

/// Skeleton topology.
pub mod skeleton;

pub use color::Color;
pub use skeleton::{SKELETON, Segment};
