//! Flexible space inside a stack.

use crate::geometry::{non_negative, Size};
use crate::render::{Primitive, RenderOutput};

use super::NodeId;

/// Expands along its stack's axis to take the space left over by fixed
/// siblings, but never below `min_length`. Outside a linear stack it is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spacer {
    pub min_length: f32,
}

impl Spacer {
    pub fn new(min_length: f32) -> Self {
        Self { min_length: non_negative(min_length) }
    }

    /// Render at a size already decided by the enclosing stack.
    pub fn render(&self, node: NodeId, size: Size) -> RenderOutput {
        RenderOutput::leaf(node, size, 1.0, Primitive::Spacer)
    }
}
