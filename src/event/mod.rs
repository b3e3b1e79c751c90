//! Event system: the interaction queue and the messages it carries.

pub mod message;
pub mod queue;

pub use message::{Dispatch, SurfaceEvent};
pub use queue::{Dispatcher, Runloop};
