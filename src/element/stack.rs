//! Stack containers: VStack, HStack and ZStack.

use crate::frame::{self, FrameSpec};
use crate::geometry::{non_negative, Axis, EdgeInsets, Size};
use crate::render::{Primitive, RenderOutput};

use super::capability::{Frameable, Paddable, Spaced};
use super::NodeId;

/// How a stack arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackAxis {
    /// Top to bottom.
    Vertical,
    /// Leading to trailing.
    Horizontal,
    /// Layered back to front, each child centered.
    Depth,
}

impl StackAxis {
    /// The layout axis, or `None` for a depth stack.
    pub fn main_axis(self) -> Option<Axis> {
        match self {
            StackAxis::Vertical => Some(Axis::Vertical),
            StackAxis::Horizontal => Some(Axis::Horizontal),
            StackAxis::Depth => None,
        }
    }
}

/// A container. Children live in the tree; this holds only the stack's own
/// properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub axis: StackAxis,
    pub spacing: f32,
    pub padding: EdgeInsets,
    pub frame: FrameSpec,
}

impl Stack {
    pub fn new(axis: StackAxis) -> Self {
        Self { axis, spacing: 0.0, padding: EdgeInsets::ZERO, frame: FrameSpec::new() }
    }

    /// Outer size: the stack's own frame, else everything it is offered.
    pub fn outer_size(&self, proposal: Size) -> Size {
        frame::resolve(&self.frame, proposal).or_natural(proposal)
    }

    /// Size available to children once padding is removed.
    pub fn inner_size(&self, proposal: Size) -> Size {
        self.outer_size(proposal).inset(self.padding)
    }

    /// The stack's own output, without children.
    pub fn render(&self, node: NodeId, proposal: Size) -> RenderOutput {
        RenderOutput::leaf(node, self.outer_size(proposal), 1.0, Primitive::Stack { axis: self.axis })
    }
}

impl Paddable for Stack {
    fn set_padding(&mut self, padding: EdgeInsets) {
        self.padding = EdgeInsets::new(
            non_negative(padding.top),
            non_negative(padding.right),
            non_negative(padding.bottom),
            non_negative(padding.left),
        );
    }
}

impl Spaced for Stack {
    fn set_spacing(&mut self, spacing: f32) {
        self.spacing = non_negative(spacing);
    }
}

impl Frameable for Stack {
    fn frame(&self) -> &FrameSpec {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameSpec {
        &mut self.frame
    }
}
