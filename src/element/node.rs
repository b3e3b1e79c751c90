//! Node identity and kind tags.

use std::fmt;

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for an element in its tree. Copy, lightweight (u64).
    pub struct NodeId;
}

/// The variant of an element, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Rectangle,
    Circle,
    Text,
    Image,
    Button,
    Spacer,
    VStack,
    HStack,
    ZStack,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Button => "button",
            ElementKind::Spacer => "spacer",
            ElementKind::VStack => "vstack",
            ElementKind::HStack => "hstack",
            ElementKind::ZStack => "zstack",
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, ElementKind::VStack | ElementKind::HStack | ElementKind::ZStack)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
