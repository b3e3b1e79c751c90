//! The fluent construction protocol as an explicit state machine.
//!
//! [`TreeBuilder`] holds the tree under construction, a `current` cursor and
//! the stack of open containers:
//!
//! - element calls attach to the innermost open container (or become the
//!   root) and move the cursor to the new element;
//! - `vstack`/`hstack`/`zstack` do the same and push the new container;
//! - `end` pops the innermost container and moves the cursor to the new top;
//! - modifiers apply to the cursor only if it has the matching capability.
//!
//! Nothing here fails. Misuse is logged and ignored so a malformed script
//! description can never take down the host.

use crate::callback::Callback;
use crate::color::Color;
use crate::element::{
    AspectMode, Button, Element, ElementDefaults, ElementTree, Font, Image, ImageSource, NodeId, Shape, Spacer,
    Stack, StackAxis, Text,
};
use crate::frame::FrameSpec;
use crate::geometry::EdgeInsets;
use crate::reactive::Source;
use crate::script::{FromScript, ScriptValue};

/// Normalize a script argument, logging and discarding it on failure.
fn arg<T: FromScript>(call: &str, value: ScriptValue) -> Option<T> {
    match T::from_script(&value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("{call}(): {e}");
            None
        }
    }
}

fn number(call: &str, value: ScriptValue) -> Option<f32> {
    match value {
        ScriptValue::Number(n) if n.is_finite() => Some(n as f32),
        other => {
            log::warn!("{call}(): expected a finite number, got {}", other.type_name());
            None
        }
    }
}

/// Builds one element tree from a sequence of construction calls.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: ElementTree,
    current: Option<NodeId>,
    stack: Vec<NodeId>,
    defaults: ElementDefaults,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: ElementDefaults) -> Self {
        Self { defaults, ..Self::default() }
    }

    /// The element the next modifier applies to.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Open containers, innermost last.
    pub fn open_containers(&self) -> &[NodeId] {
        &self.stack
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Finish construction. Containers left open are closed implicitly.
    pub fn finish(self) -> ElementTree {
        if !self.stack.is_empty() {
            log::debug!("{} container(s) left open at end of construction", self.stack.len());
        }
        self.tree
    }

    // -- structure -----------------------------------------------------------

    fn add(&mut self, element: Element) -> Option<NodeId> {
        let kind = element.kind();
        let id = match self.stack.last() {
            Some(&parent) => self.tree.insert_child(parent, element),
            None if self.tree.root().is_none() => self.tree.insert_root(element),
            None => {
                log::warn!("{kind}(): the tree already has a root and no container is open; element dropped");
                None
            }
        };
        self.current = id;
        id
    }

    fn open(&mut self, axis: StackAxis) -> &mut Self {
        if let Some(id) = self.add(Element::Stack(Stack::new(axis))) {
            self.stack.push(id);
        }
        self
    }

    pub fn rectangle(&mut self) -> &mut Self {
        self.add(Element::Shape(Shape::rectangle(self.defaults.shape_fill)));
        self
    }

    pub fn circle(&mut self) -> &mut Self {
        self.add(Element::Shape(Shape::circle(self.defaults.shape_fill)));
        self
    }

    /// A text element. `content` is a string, a number, or a text box.
    pub fn text(&mut self, content: impl Into<ScriptValue>) -> &mut Self {
        let content = arg::<Source<String>>("text", content.into()).unwrap_or_else(|| Source::Literal(String::new()));
        self.add(Element::Text(Text::new(content, self.defaults.font.clone(), self.defaults.text_color)));
        self
    }

    /// An image from a path, `{named = ...}`, or an image box.
    pub fn image(&mut self, source: impl Into<ScriptValue>) -> &mut Self {
        match arg::<Source<ImageSource>>("image", source.into()) {
            Some(source) => {
                self.add(Element::Image(Image::new(source)));
            }
            None => self.current = None,
        }
        self
    }

    /// A button. The click callback is required; without one the button is dropped.
    pub fn button(&mut self, label: impl Into<ScriptValue>, action: impl Into<ScriptValue>) -> &mut Self {
        let label = arg::<Source<String>>("button", label.into()).unwrap_or_else(|| Source::Literal(String::new()));
        match arg::<Callback>("button", action.into()) {
            Some(action) => {
                let button = Button::new(label, action, self.defaults.font.clone(), self.defaults.text_color);
                self.add(Element::Button(button));
            }
            None => self.current = None,
        }
        self
    }

    pub fn spacer(&mut self) -> &mut Self {
        self.add(Element::Spacer(Spacer::default()));
        self
    }

    /// A spacer that never shrinks below `min_length`.
    pub fn spacer_min(&mut self, min_length: impl Into<ScriptValue>) -> &mut Self {
        let min = number("spacer", min_length.into()).unwrap_or(0.0);
        self.add(Element::Spacer(Spacer::new(min)));
        self
    }

    pub fn vstack(&mut self) -> &mut Self {
        self.open(StackAxis::Vertical)
    }

    pub fn hstack(&mut self) -> &mut Self {
        self.open(StackAxis::Horizontal)
    }

    pub fn zstack(&mut self) -> &mut Self {
        self.open(StackAxis::Depth)
    }

    /// Close the innermost open container. A no-op when none is open.
    pub fn end(&mut self) -> &mut Self {
        if self.stack.pop().is_none() {
            log::debug!("end(): no open container");
        }
        self.current = self.stack.last().copied();
        self
    }

    // -- modifiers -----------------------------------------------------------

    fn current_element(&mut self) -> Option<&mut Element> {
        self.current.and_then(|id| self.tree.get_mut(id))
    }

    fn unsupported(&self, modifier: &str) {
        match self.current.and_then(|id| self.tree.get(id)) {
            Some(element) => log::debug!("{modifier}() has no effect on {}", element.kind()),
            None => log::debug!("{modifier}() with no current element"),
        }
    }

    pub fn fill(&mut self, color: impl Into<ScriptValue>) -> &mut Self {
        if let Some(color) = arg::<Source<Color>>("fill", color.into()) {
            match self.current_element().and_then(Element::as_fillable_mut) {
                Some(target) => target.set_fill(color),
                None => self.unsupported("fill"),
            }
        }
        self
    }

    pub fn stroke(&mut self, color: impl Into<ScriptValue>) -> &mut Self {
        if let Some(color) = arg::<Source<Color>>("stroke", color.into()) {
            match self.current_element().and_then(Element::as_strokeable_mut) {
                Some(target) => target.set_stroke(color),
                None => self.unsupported("stroke"),
            }
        }
        self
    }

    pub fn stroke_width(&mut self, width: impl Into<ScriptValue>) -> &mut Self {
        if let Some(width) = number("stroke_width", width.into()) {
            match self.current_element().and_then(Element::as_strokeable_mut) {
                Some(target) => target.set_stroke_width(width),
                None => self.unsupported("stroke_width"),
            }
        }
        self
    }

    pub fn corner_radius(&mut self, radius: impl Into<ScriptValue>) -> &mut Self {
        if let Some(radius) = number("corner_radius", radius.into()) {
            match self.current_element().and_then(Element::as_corner_rounded_mut) {
                Some(target) => target.set_corner_radius(radius),
                None => self.unsupported("corner_radius"),
            }
        }
        self
    }

    /// Set the frame from a `{w, h}` table. A malformed axis is left unset.
    pub fn frame(&mut self, frame: impl Into<ScriptValue>) -> &mut Self {
        match FrameSpec::from_script(&frame.into()) {
            Ok(spec) => self.frame_spec(spec),
            Err(e) => {
                log::warn!("frame(): {e}");
                self
            }
        }
    }

    pub fn frame_spec(&mut self, spec: FrameSpec) -> &mut Self {
        match self.current_element().and_then(Element::as_frameable_mut) {
            Some(target) => *target.frame_mut() = spec,
            None => self.unsupported("frame"),
        }
        self
    }

    pub fn opacity(&mut self, opacity: impl Into<ScriptValue>) -> &mut Self {
        if let Some(opacity) = number("opacity", opacity.into()) {
            match self.current_element().and_then(Element::as_opacity_mut) {
                Some(target) => target.set_opacity(opacity),
                None => self.unsupported("opacity"),
            }
        }
        self
    }

    /// Padding from a number (all edges) or a `{top, left, bottom, right}` table.
    pub fn padding(&mut self, padding: impl Into<ScriptValue>) -> &mut Self {
        if let Some(padding) = arg::<EdgeInsets>("padding", padding.into()) {
            match self.current_element().and_then(Element::as_paddable_mut) {
                Some(target) => target.set_padding(padding),
                None => self.unsupported("padding"),
            }
        }
        self
    }

    pub fn spacing(&mut self, spacing: impl Into<ScriptValue>) -> &mut Self {
        if let Some(spacing) = number("spacing", spacing.into()) {
            match self.current_element().and_then(Element::as_spaced_mut) {
                Some(target) => target.set_spacing(spacing),
                None => self.unsupported("spacing"),
            }
        }
        self
    }

    pub fn font(&mut self, font: impl Into<ScriptValue>) -> &mut Self {
        if let Some(font) = arg::<Font>("font", font.into()) {
            match self.current_element().and_then(Element::as_text_styled_mut) {
                Some(target) => target.set_font(font),
                None => self.unsupported("font"),
            }
        }
        self
    }

    pub fn foreground_color(&mut self, color: impl Into<ScriptValue>) -> &mut Self {
        if let Some(color) = arg::<Source<Color>>("foreground_color", color.into()) {
            match self.current_element().and_then(Element::as_text_styled_mut) {
                Some(target) => target.set_foreground_color(color),
                None => self.unsupported("foreground_color"),
            }
        }
        self
    }

    pub fn resizable(&mut self) -> &mut Self {
        match self.current_element().and_then(Element::as_resizable_mut) {
            Some(target) => target.set_resizable(true),
            None => self.unsupported("resizable"),
        }
        self
    }

    /// `"fit"` or `"fill"`.
    pub fn aspect_ratio(&mut self, mode: impl Into<ScriptValue>) -> &mut Self {
        if let Some(mode) = arg::<AspectMode>("aspect_ratio", mode.into()) {
            match self.current_element().and_then(Element::as_resizable_mut) {
                Some(target) => target.set_aspect_mode(mode),
                None => self.unsupported("aspect_ratio"),
            }
        }
        self
    }

    pub fn on_click(&mut self, callback: impl Into<ScriptValue>) -> &mut Self {
        if let Some(callback) = arg::<Callback>("on_click", callback.into()) {
            match self.current_element().and_then(Element::as_interactive_mut) {
                Some(target) => target.handlers_mut().on_click = Some(callback),
                None => self.unsupported("on_click"),
            }
        }
        self
    }

    pub fn on_hover(&mut self, callback: impl Into<ScriptValue>) -> &mut Self {
        if let Some(callback) = arg::<Callback>("on_hover", callback.into()) {
            match self.current_element().and_then(Element::as_interactive_mut) {
                Some(target) => target.handlers_mut().on_hover = Some(callback),
                None => self.unsupported("on_hover"),
            }
        }
        self
    }
}
