//! Message-style surfaces: alerts, dialogs and text prompts.
//!
//! These carry a message model instead of an element tree. Dialogs and
//! prompts report the pressed button back through their `on_button`
//! callback exactly once, then close.

use std::time::Duration;

use crate::callback::Callback;
use crate::host::UiHost;
use crate::script::{FromScript, ScriptValue};

use super::{SurfaceId, SurfaceKind};

/// Normalize a callback argument, logging a bad one.
fn callback(call: &str, value: ScriptValue) -> Option<Callback> {
    match Callback::from_script(&value) {
        Ok(cb) => Some(cb),
        Err(e) => {
            log::warn!("{call}(): {e}");
            None
        }
    }
}

/// A transient message that dismisses itself after `duration`.
#[derive(Debug, Clone)]
pub struct Alert {
    pub message: String,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Dialog {
    pub message: String,
    pub informative_text: Option<String>,
    pub buttons: Vec<String>,
    /// Called as `cb(index)` with the zero-based index of the pressed button.
    pub on_button: Option<Callback>,
}

#[derive(Debug, Clone)]
pub struct TextPrompt {
    pub message: String,
    pub informative_text: Option<String>,
    pub default_text: String,
    pub buttons: Vec<String>,
    /// Called as `cb(index, text)`.
    pub on_button: Option<Callback>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub struct AlertBuilder<'h> {
    host: &'h mut UiHost,
    alert: Alert,
}

impl<'h> AlertBuilder<'h> {
    pub(crate) fn new(host: &'h mut UiHost, message: String) -> Self {
        let duration = host.config().alert_duration;
        Self { host, alert: Alert { message, duration } }
    }

    /// How long the alert stays up once shown.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.alert.duration = duration;
        self
    }

    pub fn build(self) -> SurfaceId {
        self.host.insert_surface(SurfaceKind::Alert(self.alert))
    }

    pub fn show(self) -> SurfaceId {
        let id = self.host.insert_surface(SurfaceKind::Alert(self.alert));
        self.host.show(id);
        id
    }
}

pub struct DialogBuilder<'h> {
    host: &'h mut UiHost,
    dialog: Dialog,
}

impl<'h> DialogBuilder<'h> {
    pub(crate) fn new(host: &'h mut UiHost, message: String) -> Self {
        let buttons = host.config().dialog_buttons.clone();
        Self { host, dialog: Dialog { message, informative_text: None, buttons, on_button: None } }
    }

    pub fn informative_text(mut self, text: impl Into<String>) -> Self {
        self.dialog.informative_text = Some(text.into());
        self
    }

    /// Button labels, left to right. An empty list keeps the defaults.
    pub fn buttons<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            log::warn!("buttons(): empty list ignored");
        } else {
            self.dialog.buttons = labels;
        }
        self
    }

    pub fn on_button(mut self, cb: impl Into<ScriptValue>) -> Self {
        if let Some(cb) = callback("on_button", cb.into()) {
            self.dialog.on_button = Some(cb);
        }
        self
    }

    pub fn build(self) -> SurfaceId {
        self.host.insert_surface(SurfaceKind::Dialog(self.dialog))
    }

    pub fn show(self) -> SurfaceId {
        let id = self.host.insert_surface(SurfaceKind::Dialog(self.dialog));
        self.host.show(id);
        id
    }
}

pub struct TextPromptBuilder<'h> {
    host: &'h mut UiHost,
    prompt: TextPrompt,
}

impl<'h> TextPromptBuilder<'h> {
    pub(crate) fn new(host: &'h mut UiHost, message: String) -> Self {
        let buttons = host.config().prompt_buttons.clone();
        let prompt = TextPrompt { message, informative_text: None, default_text: String::new(), buttons, on_button: None };
        Self { host, prompt }
    }

    pub fn informative_text(mut self, text: impl Into<String>) -> Self {
        self.prompt.informative_text = Some(text.into());
        self
    }

    /// Initial contents of the input field.
    pub fn default_text(mut self, text: impl Into<String>) -> Self {
        self.prompt.default_text = text.into();
        self
    }

    pub fn buttons<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            log::warn!("buttons(): empty list ignored");
        } else {
            self.prompt.buttons = labels;
        }
        self
    }

    pub fn on_button(mut self, cb: impl Into<ScriptValue>) -> Self {
        if let Some(cb) = callback("on_button", cb.into()) {
            self.prompt.on_button = Some(cb);
        }
        self
    }

    pub fn build(self) -> SurfaceId {
        self.host.insert_surface(SurfaceKind::TextPrompt(self.prompt))
    }

    pub fn show(self) -> SurfaceId {
        let id = self.host.insert_surface(SurfaceKind::TextPrompt(self.prompt));
        self.host.show(id);
        id
    }
}
