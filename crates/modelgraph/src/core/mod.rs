//! Core abstractions for schema graph processing
//!
//! Shared enumerations, errors, the edge style table and the renderer
//! boundary every output plugin implements.

pub mod canvas;
mod error;
pub mod logging;
mod renderer;
mod style;
mod types;

pub use canvas::TextCanvas;
pub use error::*;
pub use logging::*;
pub use renderer::*;
pub use style::*;
pub use types::*;
