//! The native rendering backend interface.
//!
//! The backend owns pixels, window chrome and hit testing. The core hands it
//! a description of each native surface, complete [`RenderOutput`] trees on
//! show, and single re-rendered leaves when a bound value changes.

use std::time::Duration;

use crate::element::image::ImageSource;
use crate::element::style::Font;
use crate::geometry::{Rect, Size};
use crate::surface::file_picker::FilePickerOptions;
use crate::surface::SurfaceId;

use super::output::RenderOutput;

/// Failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("no display available")]
    DisplayUnavailable,
    #[error("unknown native surface handle {0:?}")]
    UnknownHandle(NativeHandle),
    #[error("native backend error: {0}")]
    Native(String),
}

/// A backend-assigned handle to an allocated native surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// What kind of native surface to allocate.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeSurface {
    Window { frame: Rect, title: Option<String> },
    Alert { message: String, duration: Duration },
    Dialog { message: String, informative_text: Option<String>, buttons: Vec<String> },
    TextPrompt { message: String, informative_text: Option<String>, default_text: String, buttons: Vec<String> },
    FilePicker(FilePickerOptions),
}

impl NativeSurface {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NativeSurface::Window { .. } => "window",
            NativeSurface::Alert { .. } => "alert",
            NativeSurface::Dialog { .. } => "dialog",
            NativeSurface::TextPrompt { .. } => "text prompt",
            NativeSurface::FilePicker(_) => "file picker",
        }
    }
}

/// The platform side of the UI host.
///
/// All methods are called on the interaction thread. Input flows back through
/// [`Dispatcher::post_event`](crate::event::Dispatcher::post_event).
pub trait RenderBackend {
    /// Allocate a native surface for `id`.
    fn create_surface(&mut self, id: SurfaceId, surface: &NativeSurface) -> Result<NativeHandle, BackendError>;

    /// Draw a complete tree into a window surface.
    fn present(&mut self, handle: NativeHandle, output: &RenderOutput) -> Result<(), BackendError>;

    /// Redraw a single leaf, already positioned in surface coordinates.
    fn update_leaf(&mut self, handle: NativeHandle, leaf: &RenderOutput) -> Result<(), BackendError>;

    fn set_visible(&mut self, handle: NativeHandle, visible: bool);

    /// Tear down the native surface. Called at most once per handle.
    fn release(&mut self, handle: NativeHandle);

    /// Natural size of `text` set in `font`.
    fn measure_text(&self, text: &str, font: &Font) -> Size;

    /// Natural size of an image, or `None` if it cannot be resolved.
    fn image_size(&self, source: &ImageSource) -> Option<Size>;
}
