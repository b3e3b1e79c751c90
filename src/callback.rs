//! Opaque script callbacks and the invocation boundary.
//!
//! Script callbacks are stored as [`Callback`] handles and only ever invoked
//! through [`invoke`], which contains failures: a callback that returns an
//! error or panics is logged with the kind of callback that produced it and
//! never unwinds into builder or lifecycle state.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::script::ScriptValue;

/// Error reported by a script callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    /// The script raised an error.
    #[error("{0}")]
    Script(String),
    /// The callback panicked on the native side.
    #[error("callback panicked: {0}")]
    Panicked(String),
}

impl CallbackError {
    pub fn script(message: impl Into<String>) -> Self {
        CallbackError::Script(message.into())
    }
}

pub type CallbackResult = Result<(), CallbackError>;

type CallbackFn = dyn Fn(&[ScriptValue]) -> CallbackResult + Send + Sync;

/// A script function, invoked with positional arguments.
#[derive(Clone)]
pub struct Callback {
    func: Arc<CallbackFn>,
}

impl Callback {
    pub fn new(func: impl Fn(&[ScriptValue]) -> CallbackResult + Send + Sync + 'static) -> Self {
        Self { func: Arc::new(func) }
    }

    /// Call without containment. Prefer [`invoke`].
    pub fn call(&self, args: &[ScriptValue]) -> CallbackResult {
        (self.func)(args)
    }

    /// Whether two handles refer to the same function.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.func))
    }
}

/// Which user interaction a callback answers. Used to label diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    Click,
    Hover,
    ButtonPress,
    FilePicker,
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallbackKind::Click => "click",
            CallbackKind::Hover => "hover",
            CallbackKind::ButtonPress => "button-press",
            CallbackKind::FilePicker => "file-picker",
        })
    }
}

/// Invoke `callback` with containment. Returns `true` if it completed normally.
pub fn invoke(kind: CallbackKind, callback: &Callback, args: &[ScriptValue]) -> bool {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback.call(args)));
    let error = match outcome {
        Ok(Ok(())) => return true,
        Ok(Err(e)) => e,
        Err(payload) => CallbackError::Panicked(panic_message(payload.as_ref())),
    };
    log::warn!("{kind} callback failed: {error}");
    false
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn invoke_passes_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let cb = Callback::new(move |args| {
            sink.lock().unwrap().extend(args.iter().map(ToString::to_string));
            Ok(())
        });
        assert!(invoke(CallbackKind::ButtonPress, &cb, &[ScriptValue::from(1), ScriptValue::from("x")]));
        assert_eq!(*seen.lock().unwrap(), vec!["1".to_string(), "x".to_string()]);
    }

    #[test]
    fn invoke_contains_script_errors() {
        let cb = Callback::new(|_| Err(CallbackError::script("boom")));
        assert!(!invoke(CallbackKind::Click, &cb, &[]));
    }

    #[test]
    fn invoke_contains_panics() {
        let cb = Callback::new(|_| panic!("script runtime exploded"));
        assert!(!invoke(CallbackKind::Hover, &cb, &[ScriptValue::Bool(true)]));
    }

    #[test]
    fn ptr_eq_tracks_clones() {
        let a = Callback::new(|_| Ok(()));
        let b = a.clone();
        let c = Callback::new(|_| Ok(()));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn kind_display() {
        assert_eq!(CallbackKind::ButtonPress.to_string(), "button-press");
    }
}
