//! # Rendering
//!
//! The engine does not rasterise anything itself. Each frame the rendering
//! system turns visible renderers into [`DrawCommand`]s, the [`RenderQueue`]
//! orders them by layer and priority, and draining the queue hands them to a
//! [`Canvas`] supplied by the application.

pub mod canvas;
pub mod render_queue;

pub use canvas::{Canvas, CommandList};
pub use render_queue::{DrawCommand, RenderQueue};

use thiserror::Error;

/// High-level rendering error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The queue was drained without a draw target
    ///
    /// Fatal for the frame: nothing is drawn and the queued commands are kept.
    #[error("no canvas to draw on")]
    NoCanvas,
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
