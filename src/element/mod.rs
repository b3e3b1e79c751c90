//! The UI element model: a closed set of variants plus capability traits.
//!
//! - [`Element`]: the variant set stored in an [`ElementTree`].
//! - [`capability`]: traits gating which modifiers apply to which variant.
//! - [`ElementTree`]: append-only arena with parent/child links.

pub mod button;
pub mod capability;
pub mod image;
pub mod node;
pub mod shape;
pub mod spacer;
pub mod stack;
pub mod style;
pub mod text;
pub mod tree;

pub use button::Button;
pub use capability::{
    CornerRounded, Fillable, Frameable, Handlers, HasOpacity, Interactive, Paddable, Resizable, Spaced,
    Strokeable, TextStyled,
};
pub use image::{AspectMode, Image, ImageSource};
pub use node::{ElementKind, NodeId};
pub use shape::{Shape, ShapeKind};
pub use spacer::Spacer;
pub use stack::{Stack, StackAxis};
pub use style::{ElementDefaults, Font, FontWeight, Stroke};
pub use text::Text;
pub use tree::ElementTree;

use crate::geometry::{Axis, Size};
use crate::reactive::Binding;
use crate::render::{RenderBackend, RenderError, RenderOutput};

/// One node of the UI tree.
#[derive(Debug, Clone)]
pub enum Element {
    Shape(Shape),
    Text(Text),
    Image(Image),
    Button(Button),
    Spacer(Spacer),
    Stack(Stack),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Shape(s) => match s.kind {
                ShapeKind::Rectangle => ElementKind::Rectangle,
                ShapeKind::Circle => ElementKind::Circle,
            },
            Element::Text(_) => ElementKind::Text,
            Element::Image(_) => ElementKind::Image,
            Element::Button(_) => ElementKind::Button,
            Element::Spacer(_) => ElementKind::Spacer,
            Element::Stack(s) => match s.axis {
                StackAxis::Vertical => ElementKind::VStack,
                StackAxis::Horizontal => ElementKind::HStack,
                StackAxis::Depth => ElementKind::ZStack,
            },
        }
    }

    /// Render this node alone against `proposal`, the size its container offers.
    ///
    /// Containers render without their children; [`crate::render::layout`]
    /// composes the full tree.
    pub fn render(&self, node: NodeId, proposal: Size, backend: &dyn RenderBackend) -> Result<RenderOutput, RenderError> {
        let proposal = proposal.clamped();
        Ok(match self {
            Element::Shape(s) => s.render(node, proposal),
            Element::Text(t) => t.render(node, proposal, backend),
            Element::Image(i) => i.render(node, proposal, backend)?,
            Element::Button(b) => b.render(node, proposal, backend),
            Element::Spacer(s) => s.render(node, Size::ZERO),
            Element::Stack(s) => s.render(node, proposal),
        })
    }

    /// Whether this element grows to share leftover space along `axis`
    /// inside a linear stack.
    pub fn is_flexible(&self, axis: Axis) -> bool {
        let unset = |frame: &crate::frame::FrameSpec| match axis {
            Axis::Horizontal => frame.width.is_none(),
            Axis::Vertical => frame.height.is_none(),
        };
        match self {
            Element::Spacer(_) => true,
            Element::Shape(s) => unset(&s.frame),
            Element::Image(i) => i.resizable && unset(&i.frame),
            Element::Stack(s) => unset(&s.frame),
            Element::Text(_) | Element::Button(_) => false,
        }
    }

    /// Every reactive box this element reads while rendering.
    pub fn bindings(&self) -> Vec<Box<dyn Binding>> {
        match self {
            Element::Shape(s) => s.bindings(),
            Element::Text(t) => t.bindings(),
            Element::Image(i) => i.bindings(),
            Element::Button(b) => b.bindings(),
            Element::Spacer(_) | Element::Stack(_) => Vec::new(),
        }
    }

    // -- capability accessors ------------------------------------------------

    pub fn as_fillable_mut(&mut self) -> Option<&mut dyn Fillable> {
        match self {
            Element::Shape(s) => Some(s),
            Element::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_strokeable_mut(&mut self) -> Option<&mut dyn Strokeable> {
        match self {
            Element::Shape(s) => Some(s),
            Element::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_corner_rounded_mut(&mut self) -> Option<&mut dyn CornerRounded> {
        match self {
            Element::Shape(s) if s.kind == ShapeKind::Rectangle => Some(s),
            _ => None,
        }
    }

    pub fn as_frameable_mut(&mut self) -> Option<&mut dyn Frameable> {
        match self {
            Element::Shape(s) => Some(s),
            Element::Text(t) => Some(t),
            Element::Image(i) => Some(i),
            Element::Button(b) => Some(b),
            Element::Stack(s) => Some(s),
            Element::Spacer(_) => None,
        }
    }

    pub fn as_opacity_mut(&mut self) -> Option<&mut dyn HasOpacity> {
        match self {
            Element::Shape(s) => Some(s),
            Element::Text(t) => Some(t),
            Element::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_paddable_mut(&mut self) -> Option<&mut dyn Paddable> {
        match self {
            Element::Stack(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_spaced_mut(&mut self) -> Option<&mut dyn Spaced> {
        match self {
            Element::Stack(s) if s.axis != StackAxis::Depth => Some(s),
            _ => None,
        }
    }

    pub fn as_text_styled_mut(&mut self) -> Option<&mut dyn TextStyled> {
        match self {
            Element::Text(t) => Some(t),
            Element::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_interactive(&self) -> Option<&dyn Interactive> {
        match self {
            Element::Shape(s) => Some(s),
            Element::Text(t) => Some(t),
            Element::Image(i) => Some(i),
            Element::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_interactive_mut(&mut self) -> Option<&mut dyn Interactive> {
        match self {
            Element::Shape(s) => Some(s),
            Element::Text(t) => Some(t),
            Element::Image(i) => Some(i),
            Element::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_resizable_mut(&mut self) -> Option<&mut dyn Resizable> {
        match self {
            Element::Image(i) => Some(i),
            _ => None,
        }
    }

    /// The element's handlers, if it is interactive.
    pub fn handlers(&self) -> Option<&Handlers> {
        self.as_interactive().map(|i| i.handlers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::frame::{Dimension, FrameSpec};
    use crate::reactive::{Source, ValueBox};

    #[test]
    fn capabilities_by_variant() {
        let mut text = Element::Text(Text::new("hi".into(), Font::default(), Color::BLACK));
        assert!(text.as_fillable_mut().is_none());
        assert!(text.as_text_styled_mut().is_some());
        assert!(text.as_frameable_mut().is_some());

        let mut circle = Element::Shape(Shape::circle(Color::RED));
        assert!(circle.as_corner_rounded_mut().is_none());
        let mut rect = Element::Shape(Shape::rectangle(Color::RED));
        assert!(rect.as_corner_rounded_mut().is_some());

        let mut z = Element::Stack(Stack::new(StackAxis::Depth));
        assert!(z.as_spaced_mut().is_none());
        assert!(z.as_paddable_mut().is_some());
        let mut v = Element::Stack(Stack::new(StackAxis::Vertical));
        assert!(v.as_spaced_mut().is_some());

        let mut spacer = Element::Spacer(Spacer::default());
        assert!(spacer.as_frameable_mut().is_none());
        assert!(spacer.as_interactive().is_none());
    }

    #[test]
    fn flexibility_follows_frame() {
        let mut rect = Shape::rectangle(Color::RED);
        assert!(Element::Shape(rect.clone()).is_flexible(Axis::Vertical));
        rect.frame = FrameSpec::new().with_height(Dimension::Absolute(10.0));
        let rect = Element::Shape(rect);
        assert!(!rect.is_flexible(Axis::Vertical));
        assert!(rect.is_flexible(Axis::Horizontal));
        assert!(Element::Spacer(Spacer::default()).is_flexible(Axis::Horizontal));
    }

    #[test]
    fn bindings_collect_reactive_sources() {
        let fill = ValueBox::new(Color::RED);
        let mut shape = Shape::rectangle(Color::BLACK);
        shape.fill = Source::Reactive(fill.clone());
        shape.stroke = Some(Source::Literal(Color::BLUE));
        let ids: Vec<_> = Element::Shape(shape).bindings().iter().map(|b| b.box_id()).collect();
        assert_eq!(ids, vec![fill.id()]);
    }

    #[test]
    fn kinds() {
        assert_eq!(Element::Stack(Stack::new(StackAxis::Horizontal)).kind(), ElementKind::HStack);
        assert_eq!(Element::Shape(Shape::circle(Color::RED)).kind().as_str(), "circle");
    }
}
