//! Reactive state: value boxes and the literal-or-bound property type.
//!
//! - [`ValueBox`]: observable single-value container, safe to set from any thread.
//! - [`Source`]: an element property that is a literal or bound to a box.
//! - [`Binding`]: a box without its value type, used by the rendering pipeline.

pub mod source;
pub mod value_box;

pub use source::Source;
pub use value_box::{Binding, BoxId, ColorBox, ImageBox, ObserverId, TextBox, ValueBox};
