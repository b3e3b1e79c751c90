//! Rendering pipeline: frame-aware layout, render output, targeted re-render.

pub mod backend;
pub mod layout;
pub mod output;
pub mod pipeline;

pub use backend::{BackendError, NativeHandle, NativeSurface, RenderBackend};
pub use layout::{layout, Layout, Placement};
pub use output::{Primitive, RenderOutput};
pub use pipeline::Mount;

use crate::element::image::ImageSource;
use crate::element::NodeId;

/// Failure while rendering an element tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("image could not be resolved: {0}")]
    ImageUnresolved(ImageSource),
    #[error("element tree is empty")]
    EmptyTree,
    #[error("node {0:?} is not in the tree")]
    MissingNode(NodeId),
}
