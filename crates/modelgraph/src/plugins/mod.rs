//! Renderer plugins and the pipeline orchestrator
//!
//! Each plugin implements [`crate::core::Renderer`] for the formats it
//! supports.

pub mod graphviz;
pub mod orchestrator;
pub mod text;

pub use graphviz::*;
pub use orchestrator::*;
pub use text::*;
