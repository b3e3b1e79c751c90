//! Messages carried by the interaction queue.

use std::fmt;
use std::path::PathBuf;

use crate::element::NodeId;
use crate::surface::SurfaceId;

/// An input event reported by the rendering backend.
///
/// Backends may post these from any thread; the host handles them on the
/// interaction thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The element was clicked.
    Click { surface: SurfaceId, node: NodeId },
    /// The pointer entered (`inside == true`) or left the element.
    Hover { surface: SurfaceId, node: NodeId, inside: bool },
    /// A dialog or text prompt button was pressed. `text` carries the prompt input.
    ButtonPressed { surface: SurfaceId, index: usize, text: Option<String> },
    /// A file picker completed. `None` means the user cancelled.
    FilesChosen { surface: SurfaceId, paths: Option<Vec<PathBuf>> },
    /// The user clicked the native close control.
    CloseRequested { surface: SurfaceId },
}

impl SurfaceEvent {
    /// The surface the event targets.
    pub fn surface(&self) -> SurfaceId {
        match self {
            SurfaceEvent::Click { surface, .. }
            | SurfaceEvent::Hover { surface, .. }
            | SurfaceEvent::ButtonPressed { surface, .. }
            | SurfaceEvent::FilesChosen { surface, .. }
            | SurfaceEvent::CloseRequested { surface } => *surface,
        }
    }
}

/// A unit of work queued for the interaction thread.
pub enum Dispatch {
    /// Deliver a marshaled value-box notification.
    Notify(Box<dyn FnOnce() + Send>),
    /// Handle a backend input event.
    Event(SurfaceEvent),
    /// Re-render the dirty leaves of a mounted surface.
    Flush(SurfaceId),
    /// An auto-dismiss timer fired.
    Dismiss(SurfaceId),
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Notify(_) => f.write_str("Notify(..)"),
            Dispatch::Event(event) => f.debug_tuple("Event").field(event).finish(),
            Dispatch::Flush(id) => f.debug_tuple("Flush").field(id).finish(),
            Dispatch::Dismiss(id) => f.debug_tuple("Dismiss").field(id).finish(),
        }
    }
}

impl From<SurfaceEvent> for Dispatch {
    fn from(event: SurfaceEvent) -> Self {
        Dispatch::Event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn event_surface_accessor() {
        let mut surfaces: SlotMap<SurfaceId, ()> = SlotMap::with_key();
        let mut nodes: SlotMap<NodeId, ()> = SlotMap::with_key();
        let s = surfaces.insert(());
        let n = nodes.insert(());
        assert_eq!(SurfaceEvent::Click { surface: s, node: n }.surface(), s);
        assert_eq!(SurfaceEvent::CloseRequested { surface: s }.surface(), s);
    }

    #[test]
    fn dispatch_debug_hides_closures() {
        let d = Dispatch::Notify(Box::new(|| {}));
        assert_eq!(format!("{d:?}"), "Notify(..)");
    }
}
