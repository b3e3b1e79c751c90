//! File and directory selection.

use crate::callback::Callback;
use crate::host::UiHost;
use crate::script::{FromScript, ScriptValue};

use super::{SurfaceId, SurfaceKind};

/// What the native picker may select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePickerOptions {
    pub allow_files: bool,
    pub allow_directories: bool,
    pub multiple: bool,
    /// Extensions without the leading dot. Empty means any.
    pub allowed_extensions: Vec<String>,
}

impl Default for FilePickerOptions {
    fn default() -> Self {
        Self { allow_files: true, allow_directories: false, multiple: false, allowed_extensions: Vec::new() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    pub options: FilePickerOptions,
    /// Called with a list of paths, or nil when cancelled.
    pub on_complete: Option<Callback>,
}

pub struct FilePickerBuilder<'h> {
    host: &'h mut UiHost,
    picker: FilePicker,
}

impl<'h> FilePickerBuilder<'h> {
    pub(crate) fn new(host: &'h mut UiHost) -> Self {
        Self { host, picker: FilePicker::default() }
    }

    pub fn allow_files(mut self, allow: bool) -> Self {
        self.picker.options.allow_files = allow;
        self
    }

    pub fn allow_directories(mut self, allow: bool) -> Self {
        self.picker.options.allow_directories = allow;
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.picker.options.multiple = multiple;
        self
    }

    /// Restrict selectable files, e.g. `["png", ".jpg"]`.
    pub fn allowed_extensions<S: AsRef<str>>(mut self, extensions: impl IntoIterator<Item = S>) -> Self {
        self.picker.options.allowed_extensions =
            extensions.into_iter().map(|e| e.as_ref().trim_start_matches('.').to_owned()).collect();
        self
    }

    pub fn on_complete(mut self, cb: impl Into<ScriptValue>) -> Self {
        match Callback::from_script(&cb.into()) {
            Ok(cb) => self.picker.on_complete = Some(cb),
            Err(e) => log::warn!("on_complete(): {e}"),
        }
        self
    }

    pub fn build(self) -> SurfaceId {
        self.host.insert_surface(SurfaceKind::FilePicker(self.picker))
    }

    pub fn show(self) -> SurfaceId {
        let id = self.host.insert_surface(SurfaceKind::FilePicker(self.picker));
        self.host.show(id);
        id
    }
}
