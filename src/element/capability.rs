//! Capability traits gating which modifiers affect which elements.
//!
//! Each modifier call on the builder looks up one of these traits through the
//! matching `Element::as_*_mut` accessor. Elements that do not implement the
//! trait return `None`, and the modifier is a no-op.

use crate::callback::Callback;
use crate::color::Color;
use crate::frame::FrameSpec;
use crate::geometry::EdgeInsets;
use crate::reactive::Source;

use super::image::AspectMode;
use super::style::Font;

pub trait Fillable {
    fn set_fill(&mut self, fill: Source<Color>);
}

pub trait Strokeable {
    fn set_stroke(&mut self, color: Source<Color>);
    fn set_stroke_width(&mut self, width: f32);
}

pub trait CornerRounded {
    fn set_corner_radius(&mut self, radius: f32);
}

pub trait Frameable {
    fn frame(&self) -> &FrameSpec;
    fn frame_mut(&mut self) -> &mut FrameSpec;
}

pub trait HasOpacity {
    fn set_opacity(&mut self, opacity: f32);
}

pub trait Paddable {
    fn set_padding(&mut self, padding: EdgeInsets);
}

pub trait Spaced {
    fn set_spacing(&mut self, spacing: f32);
}

pub trait TextStyled {
    fn set_font(&mut self, font: Font);
    fn set_foreground_color(&mut self, color: Source<Color>);
}

pub trait Interactive {
    fn handlers(&self) -> &Handlers;
    fn handlers_mut(&mut self) -> &mut Handlers;
}

pub trait Resizable {
    fn set_resizable(&mut self, resizable: bool);
    fn set_aspect_mode(&mut self, mode: AspectMode);
}

/// Script callbacks attached to an interactive element.
#[derive(Debug, Clone, Default)]
pub struct Handlers {
    /// Called with no arguments.
    pub on_click: Option<Callback>,
    /// Called with one boolean: whether the pointer is inside.
    pub on_hover: Option<Callback>,
}

impl Handlers {
    pub fn is_empty(&self) -> bool {
        self.on_click.is_none() && self.on_hover.is_none()
    }
}

/// Opacity is clamped to `0.0..=1.0`; NaN becomes fully opaque.
pub(crate) fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}
