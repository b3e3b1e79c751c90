//! # hostkit-ui
//!
//! The declarative UI core of a scriptable automation host.
//!
//! Scripts describe windows through a fluent construction protocol
//! (`vstack().rectangle().fill("#FF0000").end()`), bind element properties to
//! reactive value boxes, and show message surfaces (alerts, dialogs, text
//! prompts, file pickers). The core turns descriptions into element trees,
//! lays them out against their containers, hands render output to a native
//! backend, and re-renders single leaves when a bound box changes.
//!
//! ## Core Systems
//!
//! - **[`builder`]**: the `TreeBuilder` cursor state machine
//! - **[`element`]**: element variants, capability traits and the tree arena
//! - **[`frame`]**: frame specs and their resolution against a container
//! - **[`reactive`]**: value boxes and literal-or-bound properties
//! - **[`render`]**: two-pass layout, render output and targeted re-render
//! - **[`surface`]**: windows and message surfaces with their lifecycle
//! - **[`event`]**: the interaction queue
//! - **[`host`]**: `UiHost`, tying everything together
//! - **[`script`]**: argument normalization at the script boundary
//! - **[`testing`]**: a headless recording backend

// Foundation
pub mod color;
pub mod geometry;

// Script boundary
pub mod callback;
pub mod script;

// Element model
pub mod builder;
pub mod element;
pub mod frame;

// Events and reactivity
pub mod event;
pub mod reactive;

// Rendering
pub mod render;

// Surfaces and the host
pub mod host;
pub mod surface;

pub mod testing;

pub use builder::TreeBuilder;
pub use callback::{Callback, CallbackError};
pub use color::Color;
pub use element::{Element, ElementTree, NodeId};
pub use frame::{Dimension, FrameSpec};
pub use geometry::{Rect, Size};
pub use host::{HostConfig, UiHost};
pub use reactive::{ColorBox, ImageBox, Source, TextBox, ValueBox};
pub use render::{RenderBackend, RenderOutput};
pub use script::ScriptValue;
pub use surface::{SurfaceId, SurfaceState};
