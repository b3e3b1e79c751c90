//! Images loaded from a file path or a named system image.

use std::fmt;
use std::path::PathBuf;

use crate::frame::{self, FrameSpec};
use crate::geometry::Size;
use crate::reactive::{Binding, Source};
use crate::render::{Primitive, RenderBackend, RenderError, RenderOutput};

use super::capability::{clamp_opacity, Frameable, Handlers, HasOpacity, Interactive, Resizable};
use super::NodeId;

/// Where an image comes from. Resolution is up to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    File(PathBuf),
    Named(String),
}

impl ImageSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ImageSource::File(path.into())
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => write!(f, "{}", path.display()),
            ImageSource::Named(name) => write!(f, "named:{name}"),
        }
    }
}

/// How a resizable image fits the space it is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectMode {
    /// Scale uniformly to fit inside.
    #[default]
    Fit,
    /// Take the whole space.
    Fill,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub source: Source<ImageSource>,
    pub resizable: bool,
    pub aspect: AspectMode,
    pub frame: FrameSpec,
    pub opacity: f32,
    pub handlers: Handlers,
}

impl Image {
    pub fn new(source: Source<ImageSource>) -> Self {
        Self {
            source,
            resizable: false,
            aspect: AspectMode::Fit,
            frame: FrameSpec::new(),
            opacity: 1.0,
            handlers: Handlers::default(),
        }
    }

    /// Fails if the backend cannot resolve the image.
    pub fn render(&self, node: NodeId, proposal: Size, backend: &dyn RenderBackend) -> Result<RenderOutput, RenderError> {
        let source = self.source.current();
        let Some(natural) = backend.image_size(&source) else {
            return Err(RenderError::ImageUnresolved(source));
        };
        let resolved = frame::resolve(&self.frame, proposal);
        let size = if self.resizable {
            let target = resolved.or_natural(proposal);
            match self.aspect {
                AspectMode::Fill => target,
                AspectMode::Fit => fit_within(natural, target),
            }
        } else {
            resolved.or_natural(natural)
        };
        let aspect = self.resizable.then_some(self.aspect);
        Ok(RenderOutput::leaf(node, size, self.opacity, Primitive::Image { source, aspect }))
    }

    pub fn bindings(&self) -> Vec<Box<dyn Binding>> {
        self.source.binding().into_iter().collect()
    }
}

/// Largest size with `natural`'s aspect ratio that fits inside `bounds`.
fn fit_within(natural: Size, bounds: Size) -> Size {
    if natural.is_empty() {
        return Size::ZERO;
    }
    let scale = (bounds.width / natural.width).min(bounds.height / natural.height);
    Size::new(natural.width * scale, natural.height * scale).clamped()
}

impl Resizable for Image {
    fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    fn set_aspect_mode(&mut self, mode: AspectMode) {
        self.aspect = mode;
    }
}

impl Frameable for Image {
    fn frame(&self) -> &FrameSpec {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut FrameSpec {
        &mut self.frame
    }
}

impl HasOpacity for Image {
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_opacity(opacity);
    }
}

impl Interactive for Image {
    fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }
}
