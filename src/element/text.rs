//! Static or bound text.

use crate::color::Color;
use crate::frame::{self, FrameSpec};
use crate::geometry::Size;
use crate::reactive::{Binding, Source};
use crate::render::{Primitive, RenderBackend, RenderOutput};

use super::capability::{clamp_opacity, Frameable, Handlers, HasOpacity, Interactive, TextStyled};
use super::style::Font;
use super::NodeId;

#[derive(Debug, Clone)]
pub struct Text {
    pub content: Source<String>,
    pub font: Font,
    pub color: Source<Color>,
    pub frame: FrameSpec,
    pub opacity: f32,
    pub handlers: Handlers,
}

impl Text {
    pub fn new(content: Source<String>, font: Font, color: Color) -> Self {
        Self {
            content,
            font,
            color: Source::Literal(color),
            frame: FrameSpec::new(),
            opacity: 1.0,
            handlers: Handlers::default(),
        }
    }

    /// Natural size comes from the backend's text measurement.
    pub fn render(&self, node: NodeId, proposal: Size, backend: &dyn RenderBackend) -> RenderOutput {
        let content = self.content.current();
        let natural = backend.measure_text(&content, &self.font);
        let size = frame::resolve(&self.frame, proposal).or_natural(natural);
        let primitive = Primitive::Text { content, font: self.font.clone(), color: self.color.current() };
        RenderOutput::leaf(node, size, self.opacity, primitive)
    }

    pub fn bindings(&self) -> Vec<Box<dyn Binding>> {
        [self.content.binding(), self.color.binding()].into_iter().flatten().collect()
    }
}

impl TextStyled for Text {
    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn set_foreground_color(&mut self, color: Source<Color>) {
        self.color = color;
    }
}

impl Frameable for Text {
    fn frame(&self) -> &FrameSpec {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameSpec {
        &mut self.frame
    }
}

impl HasOpacity for Text {
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_opacity(opacity);
    }
}

impl Interactive for Text {
    fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }
}
