//! Text and stroke styling values.

use crate::color::Color;
use crate::geometry::non_negative;

/// Font weight. Scripts may give a name or a CSS-style numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Medium,
    Bold,
}

/// A font request. `name: None` means the system font.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: Option<String>,
    pub size: f32,
    pub weight: FontWeight,
}

impl Font {
    pub const DEFAULT_SIZE: f32 = 13.0;

    pub fn system(size: f32) -> Self {
        Self { name: None, size: non_negative(size), weight: FontWeight::Regular }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = non_negative(size);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::system(Font::DEFAULT_SIZE)
    }
}

/// A resolved outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// Defaults applied to newly created elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDefaults {
    pub font: Font,
    pub text_color: Color,
    pub shape_fill: Color,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self { font: Font::default(), text_color: Color::BLACK, shape_fill: Color::BLACK }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_builders() {
        let f = Font::default().with_name("Menlo").with_size(-3.0).with_weight(FontWeight::Bold);
        assert_eq!(f.name.as_deref(), Some("Menlo"));
        assert_eq!(f.size, 0.0);
        assert_eq!(f.weight, FontWeight::Bold);
        assert_eq!(Font::default().size, Font::DEFAULT_SIZE);
    }
}
