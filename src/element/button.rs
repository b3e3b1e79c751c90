//! Push buttons: a styled label with a required click callback.

use crate::callback::Callback;
use crate::color::Color;
use crate::frame::{self, FrameSpec};
use crate::geometry::{non_negative, EdgeInsets, Size};
use crate::reactive::{Binding, Source};
use crate::render::{Primitive, RenderBackend, RenderOutput};

use super::capability::{Fillable, Frameable, Handlers, Interactive, Strokeable, TextStyled};
use super::style::{Font, Stroke};
use super::NodeId;

/// Space between the label and the button edge.
const LABEL_PADDING: EdgeInsets = EdgeInsets::symmetric(4.0, 8.0);

#[derive(Debug, Clone)]
pub struct Button {
    pub label: Source<String>,
    pub font: Font,
    pub color: Source<Color>,
    pub fill: Option<Source<Color>>,
    pub stroke: Option<Source<Color>>,
    pub stroke_width: f32,
    pub frame: FrameSpec,
    /// `on_click` always holds the button's action.
    pub handlers: Handlers,
}

impl Button {
    pub fn new(label: Source<String>, action: Callback, font: Font, color: Color) -> Self {
        Self {
            label,
            font,
            color: Source::Literal(color),
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            frame: FrameSpec::new(),
            handlers: Handlers { on_click: Some(action), on_hover: None },
        }
    }

    pub fn render(&self, node: NodeId, proposal: Size, backend: &dyn RenderBackend) -> RenderOutput {
        let label = self.label.current();
        let measured = backend.measure_text(&label, &self.font);
        let natural = Size::new(measured.width + LABEL_PADDING.horizontal(), measured.height + LABEL_PADDING.vertical());
        let size = frame::resolve(&self.frame, proposal).or_natural(natural);
        let primitive = Primitive::Button {
            label,
            font: self.font.clone(),
            color: self.color.current(),
            fill: self.fill.as_ref().map(Source::current),
            stroke: self.stroke.as_ref().map(|c| Stroke { color: c.current(), width: self.stroke_width }),
        };
        RenderOutput::leaf(node, size, 1.0, primitive)
    }

    pub fn bindings(&self) -> Vec<Box<dyn Binding>> {
        [self.label.binding(), self.color.binding()]
            .into_iter()
            .chain([self.fill.as_ref(), self.stroke.as_ref()].into_iter().flatten().map(Source::binding))
            .flatten()
            .collect()
    }
}

impl TextStyled for Button {
    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn set_foreground_color(&mut self, color: Source<Color>) {
        self.color = color;
    }
}

impl Fillable for Button {
    fn set_fill(&mut self, fill: Source<Color>) {
        self.fill = Some(fill);
    }
}

impl Strokeable for Button {
    fn set_stroke(&mut self, color: Source<Color>) {
        self.stroke = Some(color);
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = non_negative(width);
    }
}

impl Frameable for Button {
    fn frame(&self) -> &FrameSpec {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameSpec {
        &mut self.frame
    }
}

impl Interactive for Button {
    fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }
}
