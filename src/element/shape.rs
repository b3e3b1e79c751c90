//! Rectangle and circle shapes.

use crate::color::Color;
use crate::frame::{self, FrameSpec};
use crate::geometry::{non_negative, Size};
use crate::reactive::{Binding, Source};
use crate::render::{Primitive, RenderOutput};

use super::capability::{
    clamp_opacity, CornerRounded, Fillable, Frameable, Handlers, HasOpacity, Interactive, Strokeable,
};
use super::style::Stroke;
use super::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

/// A filled, optionally outlined shape. Takes the size it is offered unless framed.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub fill: Source<Color>,
    pub stroke: Option<Source<Color>>,
    pub stroke_width: f32,
    /// Rectangles only.
    pub corner_radius: f32,
    pub frame: FrameSpec,
    pub opacity: f32,
    pub handlers: Handlers,
}

impl Shape {
    pub const DEFAULT_STROKE_WIDTH: f32 = 1.0;

    pub fn new(kind: ShapeKind, fill: Color) -> Self {
        Self {
            kind,
            fill: Source::Literal(fill),
            stroke: None,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            corner_radius: 0.0,
            frame: FrameSpec::new(),
            opacity: 1.0,
            handlers: Handlers::default(),
        }
    }

    pub fn rectangle(fill: Color) -> Self {
        Self::new(ShapeKind::Rectangle, fill)
    }

    pub fn circle(fill: Color) -> Self {
        Self::new(ShapeKind::Circle, fill)
    }

    pub fn render(&self, node: NodeId, proposal: Size) -> RenderOutput {
        let size = frame::resolve(&self.frame, proposal).or_natural(proposal);
        let fill = self.fill.current();
        let stroke = self.stroke.as_ref().map(|c| Stroke { color: c.current(), width: self.stroke_width });
        let primitive = match self.kind {
            ShapeKind::Rectangle => Primitive::Rectangle { fill, stroke, corner_radius: self.corner_radius },
            ShapeKind::Circle => Primitive::Circle { fill, stroke },
        };
        RenderOutput::leaf(node, size, self.opacity, primitive)
    }

    pub fn bindings(&self) -> Vec<Box<dyn Binding>> {
        [Some(&self.fill), self.stroke.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(Source::binding)
            .collect()
    }
}

impl Fillable for Shape {
    fn set_fill(&mut self, fill: Source<Color>) {
        self.fill = fill;
    }
}

impl Strokeable for Shape {
    fn set_stroke(&mut self, color: Source<Color>) {
        self.stroke = Some(color);
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = non_negative(width);
    }
}

impl CornerRounded for Shape {
    fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = non_negative(radius);
    }
}

impl Frameable for Shape {
    fn frame(&self) -> &FrameSpec {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameSpec {
        &mut self.frame
    }
}

impl HasOpacity for Shape {
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_opacity(opacity);
    }
}

impl Interactive for Shape {
    fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }
}
