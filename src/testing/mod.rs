//! Headless testing support.
//!
//! [`HeadlessBackend`] stands in for the platform so a whole host can be
//! driven and inspected in unit tests without a display.

pub mod headless;

pub use headless::{BackendCall, HeadlessBackend, Journal, NAMED_IMAGE_SIZE};
