//! Core data models for the draw statistics engine.

mod draw;
mod ids;
mod selection;
mod stats;

pub use draw::*;
pub use ids::*;
pub use selection::*;
pub use stats::*;
