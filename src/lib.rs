//! Outline geometry for the edges of a directed-graph diagram.
//!
//! An edge is described abstractly (two nodes or one self-referencing node,
//! a stroke width, a routing style, an optional arrowhead) and turned into a
//! closed, fillable [`OutlinePath`](geometry::OutlinePath) with the head
//! placed and oriented at an exact distance from the target boundary.

pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod scene;

pub use config::EngineParams;
pub use error::{EdgeformError, Result};
pub use scene::Scene;
