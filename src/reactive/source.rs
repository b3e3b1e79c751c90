//! Source<T>: a value given either literally or through a reactive box.

use super::value_box::{Binding, ValueBox};

/// An element property that is either fixed or bound to a [`ValueBox`].
#[derive(Clone, Debug)]
pub enum Source<T> {
    Literal(T),
    Reactive(ValueBox<T>),
}

impl<T: Clone + Send + 'static> Source<T> {
    /// The value to render right now.
    pub fn current(&self) -> T {
        match self {
            Source::Literal(v) => v.clone(),
            Source::Reactive(b) => b.get(),
        }
    }

    /// The bound box, type-erased, if this source is reactive.
    pub fn binding(&self) -> Option<Box<dyn Binding>> {
        match self {
            Source::Literal(_) => None,
            Source::Reactive(b) => Some(Box::new(b.clone())),
        }
    }

    pub fn is_reactive(&self) -> bool {
        matches!(self, Source::Reactive(_))
    }
}

impl<T> From<ValueBox<T>> for Source<T> {
    fn from(b: ValueBox<T>) -> Self {
        Source::Reactive(b)
    }
}

impl From<crate::color::Color> for Source<crate::color::Color> {
    fn from(c: crate::color::Color) -> Self {
        Source::Literal(c)
    }
}

impl From<String> for Source<String> {
    fn from(s: String) -> Self {
        Source::Literal(s)
    }
}

impl From<&str> for Source<String> {
    fn from(s: &str) -> Self {
        Source::Literal(s.to_owned())
    }
}
