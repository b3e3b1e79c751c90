//! Surfaces: windows, alerts, dialogs, text prompts and file pickers.
//!
//! A surface is described through a builder borrowed from the
//! [`UiHost`](crate::host::UiHost), then shown, hidden and closed through the
//! host by its [`SurfaceId`]. Message-style surfaces carry a message model
//! instead of an element tree.

pub mod file_picker;
pub mod lifecycle;
pub mod message;
pub mod registry;
pub mod window;

pub use file_picker::{FilePicker, FilePickerBuilder, FilePickerOptions};
pub use lifecycle::SurfaceState;
pub use message::{Alert, AlertBuilder, Dialog, DialogBuilder, TextPrompt, TextPromptBuilder};
pub use registry::SurfaceRegistry;
pub use window::{Window, WindowBuilder};

use tokio::task::JoinHandle;

use crate::render::{Mount, NativeHandle, NativeSurface};

slotmap::new_key_type! {
    /// Identity token of a surface.
    pub struct SurfaceId;
}

/// The description a surface was built from.
#[derive(Debug)]
pub enum SurfaceKind {
    Window(Window),
    Alert(Alert),
    Dialog(Dialog),
    TextPrompt(TextPrompt),
    FilePicker(FilePicker),
}

impl SurfaceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceKind::Window(_) => "window",
            SurfaceKind::Alert(_) => "alert",
            SurfaceKind::Dialog(_) => "dialog",
            SurfaceKind::TextPrompt(_) => "text prompt",
            SurfaceKind::FilePicker(_) => "file picker",
        }
    }

    /// Why this surface cannot be shown, if it cannot.
    pub(crate) fn empty_reason(&self) -> Option<&'static str> {
        match self {
            SurfaceKind::Window(w) if w.tree.is_empty() => Some("window has no elements"),
            SurfaceKind::Alert(a) if a.message.is_empty() => Some("alert has no message"),
            SurfaceKind::Dialog(d) if d.message.is_empty() => Some("dialog has no message"),
            SurfaceKind::TextPrompt(p) if p.message.is_empty() => Some("text prompt has no message"),
            _ => None,
        }
    }

    /// The native surface the backend should allocate.
    pub(crate) fn native(&self) -> NativeSurface {
        match self {
            SurfaceKind::Window(w) => NativeSurface::Window { frame: w.frame, title: w.title.clone() },
            SurfaceKind::Alert(a) => NativeSurface::Alert { message: a.message.clone(), duration: a.duration },
            SurfaceKind::Dialog(d) => NativeSurface::Dialog {
                message: d.message.clone(),
                informative_text: d.informative_text.clone(),
                buttons: d.buttons.clone(),
            },
            SurfaceKind::TextPrompt(p) => NativeSurface::TextPrompt {
                message: p.message.clone(),
                informative_text: p.informative_text.clone(),
                default_text: p.default_text.clone(),
                buttons: p.buttons.clone(),
            },
            SurfaceKind::FilePicker(f) => NativeSurface::FilePicker(f.options.clone()),
        }
    }
}

/// A surface and its runtime state, owned by the host.
#[derive(Debug)]
pub struct Surface {
    pub(crate) kind: SurfaceKind,
    pub(crate) state: SurfaceState,
    pub(crate) visible: bool,
    pub(crate) native: Option<NativeHandle>,
    pub(crate) timer: Option<JoinHandle<()>>,
    pub(crate) mount: Option<Mount>,
    /// The script dropped its handle while the surface was shown.
    pub(crate) released: bool,
}

impl Surface {
    pub(crate) fn new(kind: SurfaceKind) -> Self {
        Self { kind, state: SurfaceState::Unshown, visible: false, native: None, timer: None, mount: None, released: false }
    }

    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn native(&self) -> Option<NativeHandle> {
        self.native
    }

    pub fn mount(&self) -> Option<&Mount> {
        self.mount.as_ref()
    }
}
