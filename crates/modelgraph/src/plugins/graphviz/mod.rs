//! Graphviz output plugin
//!
//! [`to_dot`] produces DOT source; [`GraphvizRenderer`] writes it or runs
//! the `dot` program to produce PNG, SVG or PDF files.

mod dot;
mod renderer;

pub use dot::to_dot;
pub use renderer::GraphvizRenderer;
