//! Text preview plugin
//!
//! Renders a graph as a grid of box-drawing record boxes followed by one
//! line per edge. Used for `txt` output and terminal previews.

mod layout;
mod renderer;

pub use layout::*;
pub use renderer::*;
