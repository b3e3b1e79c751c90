//! Windows: a frame, an optional title and an element tree.

use crate::builder::TreeBuilder;
use crate::element::ElementTree;
use crate::frame::FrameSpec;
use crate::geometry::Rect;
use crate::host::UiHost;
use crate::script::ScriptValue;

use super::{SurfaceId, SurfaceKind};

/// A window's description. The tree is immutable once the window is built.
#[derive(Debug)]
pub struct Window {
    pub frame: Rect,
    pub title: Option<String>,
    pub tree: ElementTree,
}

/// Forward construction calls to the inner [`TreeBuilder`], by value.
macro_rules! forward {
    ($($(#[$meta:meta])* $name:ident($($arg:ident),*);)*) => {
        $(
            $(#[$meta])*
            pub fn $name(mut self, $($arg: impl Into<ScriptValue>),*) -> Self {
                self.builder.$name($($arg),*);
                self
            }
        )*
    };
}

/// Describes a window's contents, then builds or shows it.
///
/// ```ignore
/// let id = host
///     .window(Rect::new(0.0, 0.0, 200.0, 200.0))
///     .vstack()
///     .rectangle()
///     .fill("#FF0000")
///     .end()
///     .show();
/// ```
pub struct WindowBuilder<'h> {
    host: &'h mut UiHost,
    frame: Rect,
    title: Option<String>,
    builder: TreeBuilder,
}

impl<'h> WindowBuilder<'h> {
    pub(crate) fn new(host: &'h mut UiHost, frame: Rect) -> Self {
        let builder = TreeBuilder::with_defaults(host.config().defaults.clone());
        let title = host.config().window_title.clone();
        Self { host, frame, title, builder }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Run `f` against the tree builder directly, for loops and helpers.
    pub fn with(mut self, f: impl FnOnce(&mut TreeBuilder)) -> Self {
        f(&mut self.builder);
        self
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    forward! {
        rectangle();
        circle();
        text(content);
        image(source);
        button(label, action);
        spacer();
        spacer_min(min_length);
        vstack();
        hstack();
        zstack();
        end();
        fill(color);
        stroke(color);
        stroke_width(width);
        corner_radius(radius);
        frame(frame);
        opacity(opacity);
        padding(padding);
        spacing(spacing);
        font(font);
        foreground_color(color);
        resizable();
        aspect_ratio(mode);
        on_click(callback);
        on_hover(callback);
    }

    pub fn frame_spec(mut self, spec: FrameSpec) -> Self {
        self.builder.frame_spec(spec);
        self
    }

    /// Finish construction and register the window as `Unshown`.
    pub fn build(self) -> SurfaceId {
        let window = Window { frame: self.frame, title: self.title, tree: self.builder.finish() };
        self.host.insert_surface(SurfaceKind::Window(window))
    }

    /// Build, then show. A failed show leaves the window `Unshown`.
    pub fn show(self) -> SurfaceId {
        let WindowBuilder { host, frame, title, builder } = self;
        let id = host.insert_surface(SurfaceKind::Window(Window { frame, title, tree: builder.finish() }));
        host.show(id);
        id
    }
}
