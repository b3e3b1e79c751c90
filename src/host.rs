//! The UI host: owns every surface and drives the interaction queue.
//!
//! [`UiHost`] is created on the interaction thread and stays there. Scripts
//! describe surfaces through builders borrowed from the host, then move them
//! through their lifecycle by [`SurfaceId`]. Everything that happens later
//! (value-box notifications, backend input, auto-dismiss timers) arrives as a
//! [`Dispatch`] on the host's run loop and is handled by [`UiHost::run_pending`]
//! or [`UiHost::run_next`].

use std::time::Duration;

use slotmap::SlotMap;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::callback::{invoke, Callback, CallbackKind};
use crate::color::Color;
use crate::element::{ElementDefaults, ElementTree, Font, Handlers, ImageSource, NodeId};
use crate::event::{Dispatch, Dispatcher, Runloop, SurfaceEvent};
use crate::geometry::Rect;
use crate::reactive::{ColorBox, ImageBox, TextBox, ValueBox};
use crate::render::{Mount, RenderBackend, RenderOutput};
use crate::script::{FromScript, ScriptValue};
use crate::surface::{
    AlertBuilder, DialogBuilder, FilePickerBuilder, Surface, SurfaceId, SurfaceKind, SurfaceRegistry, SurfaceState,
    TextPromptBuilder, WindowBuilder,
};

// ---------------------------------------------------------------------------
// HostConfig
// ---------------------------------------------------------------------------

/// Host-wide defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// How long an alert stays up unless closed earlier.
    pub alert_duration: Duration,
    /// Font and colors given to newly created elements.
    pub defaults: ElementDefaults,
    pub dialog_buttons: Vec<String>,
    pub prompt_buttons: Vec<String>,
    pub window_title: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            alert_duration: Duration::from_secs(2),
            defaults: ElementDefaults::default(),
            dialog_buttons: vec!["OK".to_owned()],
            prompt_buttons: vec!["OK".to_owned(), "Cancel".to_owned()],
            window_title: None,
        }
    }
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alert_duration(mut self, duration: Duration) -> Self {
        self.alert_duration = duration;
        self
    }

    pub fn with_defaults(mut self, defaults: ElementDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.defaults.font = font;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.defaults.text_color = color;
        self
    }

    pub fn with_dialog_buttons<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.dialog_buttons = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prompt_buttons<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.prompt_buttons = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = Some(title.into());
        self
    }
}

// ---------------------------------------------------------------------------
// UiHost
// ---------------------------------------------------------------------------

pub struct UiHost {
    config: HostConfig,
    backend: Box<dyn RenderBackend>,
    surfaces: SlotMap<SurfaceId, Surface>,
    registry: SurfaceRegistry,
    runloop: Runloop,
    /// Runtime for auto-dismiss timers, if the host was created inside one.
    runtime: Option<Handle>,
}

impl std::fmt::Debug for UiHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHost")
            .field("config", &self.config)
            .field("surfaces", &self.surfaces.len())
            .field("registry", &self.registry)
            .field("queued", &self.runloop.len())
            .finish()
    }
}

impl UiHost {
    /// Create a host. The calling thread becomes the interaction thread.
    pub fn new(config: HostConfig, backend: impl RenderBackend + 'static) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            log::debug!("no tokio runtime at host creation; alerts will not auto-dismiss");
        }
        Self {
            config,
            backend: Box::new(backend),
            surfaces: SlotMap::with_key(),
            registry: SurfaceRegistry::new(),
            runloop: Runloop::new(),
            runtime,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// A sender onto the interaction queue, for backends and worker threads.
    pub fn dispatcher(&self) -> Dispatcher {
        self.runloop.dispatcher()
    }

    // -- reactive boxes --------------------------------------------------------

    pub fn color_box(&self, initial: Color) -> ColorBox {
        ValueBox::with_dispatcher(initial, self.dispatcher())
    }

    pub fn text_box(&self, initial: impl Into<String>) -> TextBox {
        ValueBox::with_dispatcher(initial.into(), self.dispatcher())
    }

    pub fn image_box(&self, initial: ImageSource) -> ImageBox {
        ValueBox::with_dispatcher(initial, self.dispatcher())
    }

    // -- surface construction ----------------------------------------------------

    /// Start describing a window at `geometry` (a `{x, y, w, h}` table or a [`Rect`]).
    pub fn window(&mut self, geometry: impl Into<ScriptValue>) -> WindowBuilder<'_> {
        let frame = match Rect::from_script(&geometry.into()) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("window(): {e}; using an empty frame");
                Rect::ZERO
            }
        };
        WindowBuilder::new(self, frame)
    }

    pub fn alert(&mut self, message: impl Into<String>) -> AlertBuilder<'_> {
        AlertBuilder::new(self, message.into())
    }

    pub fn dialog(&mut self, message: impl Into<String>) -> DialogBuilder<'_> {
        DialogBuilder::new(self, message.into())
    }

    pub fn text_prompt(&mut self, message: impl Into<String>) -> TextPromptBuilder<'_> {
        TextPromptBuilder::new(self, message.into())
    }

    pub fn file_picker(&mut self) -> FilePickerBuilder<'_> {
        FilePickerBuilder::new(self)
    }

    pub(crate) fn insert_surface(&mut self, kind: SurfaceKind) -> SurfaceId {
        let name = kind.name();
        let id = self.surfaces.insert(Surface::new(kind));
        log::debug!("created {name} {id:?}");
        id
    }

    // -- lifecycle ---------------------------------------------------------------

    /// Show a surface, allocating its native counterpart on first show.
    ///
    /// Returns the resulting state. Any failure leaves the surface as it was.
    pub fn show(&mut self, id: SurfaceId) -> SurfaceState {
        let Some(surface) = self.surfaces.get_mut(id) else {
            log::warn!("show(): unknown surface {id:?}");
            return SurfaceState::Closed;
        };
        match surface.state {
            SurfaceState::Closed => {
                log::debug!("show(): {} {id:?} is closed", surface.kind.name());
                return SurfaceState::Closed;
            }
            SurfaceState::Shown => {
                if !surface.visible {
                    if let Some(handle) = surface.native {
                        self.backend.set_visible(handle, true);
                    }
                    surface.visible = true;
                }
                return SurfaceState::Shown;
            }
            SurfaceState::Unshown => {}
        }

        let name = surface.kind.name();
        if let Some(reason) = surface.kind.empty_reason() {
            log::warn!("show(): {reason}; {id:?} stays unshown");
            return SurfaceState::Unshown;
        }
        let handle = match self.backend.create_surface(id, &surface.kind.native()) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("show(): cannot allocate {name} {id:?}: {e}");
                return SurfaceState::Unshown;
            }
        };

        if let SurfaceKind::Window(window) = &surface.kind {
            let dispatcher = self.runloop.dispatcher();
            let mount = match Mount::new(id, &window.tree, window.frame.size(), &*self.backend, &dispatcher) {
                Ok(mount) => mount,
                Err(e) => {
                    log::warn!("show(): cannot render window {id:?}: {e}");
                    self.backend.release(handle);
                    return SurfaceState::Unshown;
                }
            };
            if let Err(e) = self.backend.present(handle, mount.output()) {
                log::warn!("show(): cannot present window {id:?}: {e}");
                mount.unmount();
                self.backend.release(handle);
                return SurfaceState::Unshown;
            }
            surface.mount = Some(mount);
        }

        self.backend.set_visible(handle, true);
        surface.native = Some(handle);
        surface.visible = true;
        surface.state = SurfaceState::Shown;
        if let SurfaceKind::Alert(alert) = &surface.kind {
            surface.timer = schedule_dismiss(self.runtime.as_ref(), self.runloop.dispatcher(), id, alert.duration);
        }
        self.registry.register(id);
        log::debug!("{name} {id:?} shown");
        SurfaceState::Shown
    }

    /// Take a shown surface off-screen. State and registration are unchanged.
    pub fn hide(&mut self, id: SurfaceId) -> SurfaceState {
        let Some(surface) = self.surfaces.get_mut(id) else {
            log::warn!("hide(): unknown surface {id:?}");
            return SurfaceState::Closed;
        };
        match (surface.state, surface.native) {
            (SurfaceState::Shown, Some(handle)) if surface.visible => {
                self.backend.set_visible(handle, false);
                surface.visible = false;
            }
            (state, _) => log::debug!("hide(): {} {id:?} is {state} and not visible", surface.kind.name()),
        }
        surface.state
    }

    /// Close a surface. Idempotent; pending response callbacks are dropped.
    pub fn close(&mut self, id: SurfaceId) -> SurfaceState {
        let Some(surface) = self.surfaces.get_mut(id) else {
            log::debug!("close(): unknown surface {id:?}");
            return SurfaceState::Closed;
        };
        if surface.state.is_closed() {
            return SurfaceState::Closed;
        }
        if let Some(timer) = surface.timer.take() {
            timer.abort();
        }
        let unmounted = surface.mount.take().map(Mount::unmount).is_some();
        if let Some(handle) = surface.native.take() {
            self.backend.release(handle);
        }
        surface.visible = false;
        surface.state = SurfaceState::Closed;
        let released = surface.released;
        log::debug!("{} {id:?} closed", surface.kind.name());

        self.registry.unregister(id);
        if released {
            self.surfaces.remove(id);
        }
        if unmounted {
            self.reclaim_shared_boxes();
        }
        SurfaceState::Closed
    }

    /// Hand boxes a closed window had taken over back to the windows still shown.
    fn reclaim_shared_boxes(&mut self) {
        for (other, surface) in self.surfaces.iter_mut() {
            let Some(mount) = surface.mount.as_mut() else { continue };
            let n = mount.reclaim();
            if n > 0 {
                log::debug!("window {other:?} observes {n} shared box(es) again");
            }
        }
    }

    /// The script dropped its last handle to `id`.
    ///
    /// Unregistered surfaces are destroyed now and `true` is returned. A shown
    /// surface lives on until it is closed.
    pub fn release(&mut self, id: SurfaceId) -> bool {
        if self.registry.contains(id) {
            if let Some(surface) = self.surfaces.get_mut(id) {
                surface.released = true;
            }
            log::debug!("released {id:?} while shown; kept alive until closed");
            return false;
        }
        self.surfaces.remove(id).is_some()
    }

    // -- inspection --------------------------------------------------------------

    pub fn state(&self, id: SurfaceId) -> Option<SurfaceState> {
        self.surfaces.get(id).map(Surface::state)
    }

    pub fn is_visible(&self, id: SurfaceId) -> bool {
        self.surfaces.get(id).is_some_and(Surface::is_visible)
    }

    pub fn is_registered(&self, id: SurfaceId) -> bool {
        self.registry.contains(id)
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn tree(&self, id: SurfaceId) -> Option<&ElementTree> {
        match self.surfaces.get(id).map(Surface::kind) {
            Some(SurfaceKind::Window(window)) => Some(&window.tree),
            _ => None,
        }
    }

    /// The current render of a shown window.
    pub fn output(&self, id: SurfaceId) -> Option<&RenderOutput> {
        self.surfaces.get(id)?.mount.as_ref().map(Mount::output)
    }

    // -- interaction queue ---------------------------------------------------------

    /// Handle everything currently queued. Returns how many items ran.
    pub fn run_pending(&mut self) -> usize {
        let mut n = 0;
        while let Some(dispatch) = self.runloop.try_next() {
            self.dispatch(dispatch);
            n += 1;
        }
        n
    }

    /// Wait for one queued item and handle it. `false` if the queue closed.
    pub async fn run_next(&mut self) -> bool {
        match self.runloop.next().await {
            Some(dispatch) => {
                self.dispatch(dispatch);
                true
            }
            None => false,
        }
    }

    pub fn dispatch(&mut self, dispatch: Dispatch) {
        log::trace!("dispatch {dispatch:?}");
        match dispatch {
            Dispatch::Notify(notify) => notify(),
            Dispatch::Event(event) => self.handle_event(event),
            Dispatch::Flush(id) => {
                self.flush(id);
            }
            Dispatch::Dismiss(id) => self.dismiss(id),
        }
    }

    /// Re-render the dirty leaves of a shown window. Returns how many were redrawn.
    pub fn flush(&mut self, id: SurfaceId) -> usize {
        let Some(surface) = self.surfaces.get_mut(id) else {
            return 0;
        };
        let (SurfaceKind::Window(window), Some(mount), Some(handle)) =
            (&surface.kind, surface.mount.as_mut(), surface.native)
        else {
            return 0;
        };
        match mount.flush(&window.tree, &mut *self.backend, handle) {
            Ok(n) => n,
            Err(e) => {
                log::warn!("flush of window {id:?} failed: {e}");
                0
            }
        }
    }

    fn dismiss(&mut self, id: SurfaceId) {
        match self.surfaces.get(id) {
            Some(surface) if surface.state.is_shown() => {
                log::debug!("alert {id:?} timed out");
                self.close(id);
            }
            _ => log::trace!("dismiss of {id:?} ignored"),
        }
    }

    /// Route a backend input event to the script callback it triggers.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        let id = event.surface();
        match self.surfaces.get(id) {
            Some(surface) if surface.state.is_shown() => {}
            Some(surface) => {
                log::debug!("ignoring {event:?}: surface is {}", surface.state);
                return;
            }
            None => {
                log::debug!("ignoring {event:?}: unknown surface");
                return;
            }
        }

        match event {
            SurfaceEvent::Click { node, .. } => {
                if let Some(cb) = self.handler(id, node, |h| h.on_click.clone()) {
                    invoke(CallbackKind::Click, &cb, &[]);
                }
            }
            SurfaceEvent::Hover { node, inside, .. } => {
                if let Some(cb) = self.handler(id, node, |h| h.on_hover.clone()) {
                    invoke(CallbackKind::Hover, &cb, &[ScriptValue::Bool(inside)]);
                }
            }
            SurfaceEvent::ButtonPressed { index, text, .. } => self.button_pressed(id, index, text),
            SurfaceEvent::FilesChosen { paths, .. } => self.files_chosen(id, paths),
            SurfaceEvent::CloseRequested { .. } => {
                self.close(id);
            }
        }
    }

    fn handler(&self, id: SurfaceId, node: NodeId, pick: impl Fn(&Handlers) -> Option<Callback>) -> Option<Callback> {
        match self.surfaces.get(id).map(Surface::kind) {
            Some(SurfaceKind::Window(window)) => window.tree.get(node)?.handlers().and_then(pick),
            _ => None,
        }
    }

    fn button_pressed(&mut self, id: SurfaceId, index: usize, text: Option<String>) {
        let Some(surface) = self.surfaces.get(id) else { return };
        let (cb, args) = match &surface.kind {
            SurfaceKind::Dialog(dialog) if index < dialog.buttons.len() => {
                (dialog.on_button.clone(), vec![ScriptValue::from(index)])
            }
            SurfaceKind::TextPrompt(prompt) if index < prompt.buttons.len() => {
                let text = text.unwrap_or_else(|| prompt.default_text.clone());
                (prompt.on_button.clone(), vec![ScriptValue::from(index), ScriptValue::from(text)])
            }
            SurfaceKind::Dialog(_) | SurfaceKind::TextPrompt(_) => {
                log::warn!("button index {index} out of range for {id:?}");
                return;
            }
            other => {
                log::warn!("button press reported for {} {id:?}", other.name());
                return;
            }
        };
        if let Some(cb) = cb {
            invoke(CallbackKind::ButtonPress, &cb, &args);
        }
        self.close(id);
    }

    fn files_chosen(&mut self, id: SurfaceId, paths: Option<Vec<std::path::PathBuf>>) {
        let Some(SurfaceKind::FilePicker(picker)) = self.surfaces.get(id).map(Surface::kind) else {
            log::warn!("file selection reported for non-picker {id:?}");
            return;
        };
        if let Some(cb) = picker.on_complete.clone() {
            let arg = match paths {
                Some(paths) => ScriptValue::List(
                    paths.iter().map(|p| ScriptValue::from(p.to_string_lossy().into_owned())).collect(),
                ),
                None => ScriptValue::Nil,
            };
            invoke(CallbackKind::FilePicker, &cb, &[arg]);
        }
        self.close(id);
    }
}

impl Drop for UiHost {
    fn drop(&mut self) {
        for (_, surface) in self.surfaces.iter_mut() {
            if let Some(timer) = surface.timer.take() {
                timer.abort();
            }
            if let Some(mount) = surface.mount.take() {
                mount.unmount();
            }
            if let Some(handle) = surface.native.take() {
                self.backend.release(handle);
            }
        }
    }
}

/// Post a dismissal for `id` after `duration`, if a runtime is available.
fn schedule_dismiss(
    runtime: Option<&Handle>,
    dispatcher: Dispatcher,
    id: SurfaceId,
    duration: Duration,
) -> Option<JoinHandle<()>> {
    let Some(runtime) = runtime else {
        log::warn!("no tokio runtime: alert {id:?} stays up until closed");
        return None;
    };
    Some(runtime.spawn(async move {
        tokio::time::sleep(duration).await;
        dispatcher.post(Dispatch::Dismiss(id));
    }))
}
