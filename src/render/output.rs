//! RenderOutput: the resolved, positioned tree handed to the backend.

use crate::color::Color;
use crate::element::image::{AspectMode, ImageSource};
use crate::element::stack::StackAxis;
use crate::element::style::{Font, Stroke};
use crate::element::NodeId;
use crate::geometry::{Point, Rect, Size};

/// What the backend should draw for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rectangle { fill: Color, stroke: Option<Stroke>, corner_radius: f32 },
    Circle { fill: Color, stroke: Option<Stroke> },
    Text { content: String, font: Font, color: Color },
    /// `aspect` is `None` for a non-resizable image drawn at its natural size.
    Image { source: ImageSource, aspect: Option<AspectMode> },
    Button { label: String, font: Font, color: Color, fill: Option<Color>, stroke: Option<Stroke> },
    Spacer,
    Stack { axis: StackAxis },
}

/// One rendered node. `rect` is in surface coordinates once layout completes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub node: NodeId,
    pub rect: Rect,
    pub opacity: f32,
    pub primitive: Primitive,
    pub children: Vec<RenderOutput>,
}

impl RenderOutput {
    /// A childless output of `size` at the origin.
    pub fn leaf(node: NodeId, size: Size, opacity: f32, primitive: Primitive) -> Self {
        Self {
            node,
            rect: Rect::from_origin_size(Point::ZERO, size.clamped()),
            opacity,
            primitive,
            children: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.rect.size()
    }

    /// Move this output and all of its descendants by `delta`.
    pub fn translate(&mut self, delta: Point) {
        self.rect = self.rect.translate(delta);
        for child in &mut self.children {
            child.translate(delta);
        }
    }

    /// Depth-first search for `node`.
    pub fn find(&self, node: NodeId) -> Option<&RenderOutput> {
        if self.node == node {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(node))
    }

    pub fn find_mut(&mut self, node: NodeId) -> Option<&mut RenderOutput> {
        if self.node == node {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(node))
    }

    /// Swap in a re-rendered leaf, keeping the existing children.
    pub fn replace(&mut self, updated: RenderOutput) -> bool {
        match self.find_mut(updated.node) {
            Some(slot) => {
                slot.rect = updated.rect;
                slot.opacity = updated.opacity;
                slot.primitive = updated.primitive;
                true
            }
            None => false,
        }
    }

    /// Visit every node in pre-order.
    pub fn visit(&self, f: &mut impl FnMut(&RenderOutput)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// The deepest node whose rect contains `point`, later siblings first.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        if !self.rect.contains(point) {
            return None;
        }
        self.children
            .iter()
            .rev()
            .find_map(|c| c.hit_test(point))
            .or(Some(self.node))
    }
}
