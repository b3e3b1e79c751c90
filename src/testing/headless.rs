//! A recording [`RenderBackend`] that needs no display.
//!
//! Every call is appended to a shared [`Journal`] so tests can assert on
//! exactly what the host asked the platform to do. Text is measured with a
//! fixed-pitch model: each character is half the font size wide and one font
//! size tall.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::element::{Font, ImageSource};
use crate::geometry::Size;
use crate::reactive::value_box::lock;
use crate::render::{BackendError, NativeHandle, NativeSurface, RenderBackend, RenderOutput};
use crate::surface::SurfaceId;

/// Natural size of every named image.
pub const NAMED_IMAGE_SIZE: Size = Size::new(32.0, 32.0);

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Create { surface: SurfaceId, handle: NativeHandle, kind: &'static str },
    Present { handle: NativeHandle, output: RenderOutput },
    UpdateLeaf { handle: NativeHandle, leaf: RenderOutput },
    SetVisible { handle: NativeHandle, visible: bool },
    Release { handle: NativeHandle },
}

/// Shared record of backend calls. Cloning shares the record.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<BackendCall>>>);

impl Journal {
    fn push(&self, call: BackendCall) {
        lock(&self.0).push(call);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.0).clone()
    }

    /// Every leaf passed to `update_leaf`, in order.
    pub fn updates(&self) -> Vec<RenderOutput> {
        lock(&self.0)
            .iter()
            .filter_map(|c| match c {
                BackendCall::UpdateLeaf { leaf, .. } => Some(leaf.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent full tree presented to `handle`.
    pub fn last_present(&self, handle: NativeHandle) -> Option<RenderOutput> {
        lock(&self.0).iter().rev().find_map(|c| match c {
            BackendCall::Present { handle: h, output } if *h == handle => Some(output.clone()),
            _ => None,
        })
    }

    /// The handle allocated for `surface`, if any.
    pub fn handle_of(&self, surface: SurfaceId) -> Option<NativeHandle> {
        lock(&self.0).iter().find_map(|c| match c {
            BackendCall::Create { surface: s, handle, .. } if *s == surface => Some(*handle),
            _ => None,
        })
    }

    pub fn release_count(&self, handle: NativeHandle) -> usize {
        lock(&self.0).iter().filter(|c| matches!(c, BackendCall::Release { handle: h } if *h == handle)).count()
    }

    pub fn len(&self) -> usize {
        lock(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.0).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.0).clear();
    }
}

/// A backend that records instead of drawing.
#[derive(Debug)]
pub struct HeadlessBackend {
    journal: Journal,
    display: bool,
    next_handle: u64,
    images: HashMap<PathBuf, Size>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self { journal: Journal::default(), display: true, next_handle: 1, images: HashMap::new() }
    }

    /// A backend whose surface allocation always fails.
    pub fn without_display() -> Self {
        Self { display: false, ..Self::new() }
    }

    /// Make the image file at `path` resolvable with the given natural size.
    pub fn with_image(mut self, path: impl AsRef<Path>, size: Size) -> Self {
        self.images.insert(path.as_ref().to_path_buf(), size);
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_surface(&mut self, id: SurfaceId, surface: &NativeSurface) -> Result<NativeHandle, BackendError> {
        if !self.display {
            return Err(BackendError::DisplayUnavailable);
        }
        let handle = NativeHandle(self.next_handle);
        self.next_handle += 1;
        self.journal.push(BackendCall::Create { surface: id, handle, kind: surface.kind_name() });
        Ok(handle)
    }

    fn present(&mut self, handle: NativeHandle, output: &RenderOutput) -> Result<(), BackendError> {
        self.journal.push(BackendCall::Present { handle, output: output.clone() });
        Ok(())
    }

    fn update_leaf(&mut self, handle: NativeHandle, leaf: &RenderOutput) -> Result<(), BackendError> {
        self.journal.push(BackendCall::UpdateLeaf { handle, leaf: leaf.clone() });
        Ok(())
    }

    fn set_visible(&mut self, handle: NativeHandle, visible: bool) {
        self.journal.push(BackendCall::SetVisible { handle, visible });
    }

    fn release(&mut self, handle: NativeHandle) {
        self.journal.push(BackendCall::Release { handle });
    }

    fn measure_text(&self, text: &str, font: &Font) -> Size {
        Size::new(text.chars().count() as f32 * font.size / 2.0, font.size)
    }

    fn image_size(&self, source: &ImageSource) -> Option<Size> {
        match source {
            ImageSource::Named(_) => Some(NAMED_IMAGE_SIZE),
            ImageSource::File(path) => self.images.get(path).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn fixed_pitch_text() {
        let b = HeadlessBackend::new();
        assert_eq!(b.measure_text("abcd", &Font::system(10.0)), Size::new(20.0, 10.0));
        assert_eq!(b.measure_text("", &Font::system(10.0)), Size::new(0.0, 10.0));
    }

    #[test]
    fn file_images_resolve_only_when_registered() {
        let b = HeadlessBackend::new().with_image("/img/logo.png", Size::new(64.0, 48.0));
        assert_eq!(b.image_size(&ImageSource::file("/img/logo.png")), Some(Size::new(64.0, 48.0)));
        assert_eq!(b.image_size(&ImageSource::file("/img/missing.png")), None);
        assert_eq!(b.image_size(&ImageSource::Named("gear".into())), Some(NAMED_IMAGE_SIZE));
    }

    #[test]
    fn handles_are_distinct_and_journaled() {
        let mut ids: SlotMap<SurfaceId, ()> = SlotMap::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));
        let mut backend = HeadlessBackend::new();
        let journal = backend.journal();
        let alert = NativeSurface::Alert { message: "hi".into(), duration: std::time::Duration::from_secs(1) };
        let ha = backend.create_surface(a, &alert).unwrap();
        let hb = backend.create_surface(b, &alert).unwrap();
        assert_ne!(ha, hb);
        assert_eq!(journal.handle_of(b), Some(hb));
        backend.release(ha);
        assert_eq!(journal.release_count(ha), 1);
        assert_eq!(journal.len(), 3);
    }

    #[test]
    fn without_display_refuses_surfaces() {
        let mut ids: SlotMap<SurfaceId, ()> = SlotMap::with_key();
        let mut backend = HeadlessBackend::without_display();
        let err = backend
            .create_surface(ids.insert(()), &NativeSurface::Dialog { message: "m".into(), informative_text: None, buttons: vec![] })
            .unwrap_err();
        assert_eq!(err, BackendError::DisplayUnavailable);
        assert!(backend.journal().is_empty());
    }
}
