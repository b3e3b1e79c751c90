//! Two-pass layout: containers size themselves, then hand sizes down.
//!
//! Every node is rendered against a *proposal*, the size its immediate
//! container offers. Percentage and fill frames resolve against that
//! proposal, so the container size is threaded down the recursion.
//!
//! Linear stacks lay out in two passes over their children:
//!
//! 1. children with a fixed main-axis size are rendered against the stack's
//!    inner (padded) size and their extents summed;
//! 2. the remaining main-axis space is split evenly between flexible
//!    children (spacers, shapes, resizable images and stacks without a
//!    main-axis frame), spacers never going below their minimum length.
//!
//! Children are centered on the cross axis. When nothing is flexible the
//! content is also centered on the main axis. Depth stacks center every
//! child within their inner size.

use slotmap::SecondaryMap;

use crate::element::{Element, ElementTree, NodeId, Stack};
use crate::geometry::{non_negative, Axis, Point, Size};

use super::backend::RenderBackend;
use super::output::RenderOutput;
use super::RenderError;

/// Where a node was placed and what it was offered. Cached per mounted
/// surface so a single leaf can be re-rendered without a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub origin: Point,
    pub proposal: Size,
}

/// A fully laid-out tree.
#[derive(Debug, Clone)]
pub struct Layout {
    pub output: RenderOutput,
    pub placements: SecondaryMap<NodeId, Placement>,
}

/// Lay out the subtree at `root` inside a container of size `container`.
pub fn layout(
    tree: &ElementTree,
    root: NodeId,
    container: Size,
    backend: &dyn RenderBackend,
) -> Result<Layout, RenderError> {
    let mut proposals = SecondaryMap::new();
    let output = measure(tree, root, container.clamped(), backend, &mut proposals)?;

    let mut placements = SecondaryMap::new();
    output.visit(&mut |node: &RenderOutput| {
        if let Some(&proposal) = proposals.get(node.node) {
            placements.insert(node.node, Placement { origin: node.rect.origin(), proposal });
        }
    });
    Ok(Layout { output, placements })
}

fn measure(
    tree: &ElementTree,
    id: NodeId,
    proposal: Size,
    backend: &dyn RenderBackend,
    proposals: &mut SecondaryMap<NodeId, Size>,
) -> Result<RenderOutput, RenderError> {
    let element = tree.get(id).ok_or(RenderError::MissingNode(id))?;
    proposals.insert(id, proposal);
    match element {
        Element::Stack(stack) => measure_stack(tree, id, stack, proposal, backend, proposals),
        leaf => leaf.render(id, proposal, backend),
    }
}

fn measure_stack(
    tree: &ElementTree,
    id: NodeId,
    stack: &Stack,
    proposal: Size,
    backend: &dyn RenderBackend,
    proposals: &mut SecondaryMap<NodeId, Size>,
) -> Result<RenderOutput, RenderError> {
    let inner = stack.inner_size(proposal);
    let children = tree.children(id);

    let mut placed = match stack.axis.main_axis() {
        Some(axis) => distribute(tree, children, axis, stack.spacing, inner, backend, proposals)?,
        None => overlay(tree, children, inner, backend, proposals)?,
    };

    let offset = stack.padding.origin();
    for child in &mut placed {
        child.translate(offset);
    }

    let mut output = stack.render(id, proposal);
    output.children = placed;
    Ok(output)
}

fn overlay(
    tree: &ElementTree,
    children: &[NodeId],
    inner: Size,
    backend: &dyn RenderBackend,
    proposals: &mut SecondaryMap<NodeId, Size>,
) -> Result<Vec<RenderOutput>, RenderError> {
    let mut placed = Vec::with_capacity(children.len());
    for &child in children {
        let mut output = measure(tree, child, inner, backend, proposals)?;
        let size = output.size();
        output.translate(Point::new((inner.width - size.width) / 2.0, (inner.height - size.height) / 2.0));
        placed.push(output);
    }
    Ok(placed)
}

fn distribute(
    tree: &ElementTree,
    children: &[NodeId],
    axis: Axis,
    spacing: f32,
    inner: Size,
    backend: &dyn RenderBackend,
    proposals: &mut SecondaryMap<NodeId, Size>,
) -> Result<Vec<RenderOutput>, RenderError> {
    if children.is_empty() {
        return Ok(Vec::new());
    }
    let main = inner.along(axis);
    let cross = inner.along(axis.cross());
    let gaps = spacing * (children.len() - 1) as f32;

    // Pass 1: fixed children.
    let mut slots: Vec<Option<RenderOutput>> = Vec::with_capacity(children.len());
    let mut used = 0.0;
    let mut flexible = 0usize;
    for &child in children {
        let element = tree.get(child).ok_or(RenderError::MissingNode(child))?;
        if element.is_flexible(axis) {
            flexible += 1;
            slots.push(None);
            continue;
        }
        let output = measure(tree, child, inner, backend, proposals)?;
        used += output.size().along(axis);
        slots.push(Some(output));
    }

    // Pass 2: flexible children share what is left.
    let share = if flexible > 0 { non_negative(main - gaps - used) / flexible as f32 } else { 0.0 };
    for (slot, &child) in slots.iter_mut().zip(children) {
        if slot.is_some() {
            continue;
        }
        let output = match tree.get(child) {
            Some(Element::Spacer(spacer)) => {
                let size = Size::from_axes(axis, share.max(spacer.min_length), 0.0);
                proposals.insert(child, size);
                spacer.render(child, size)
            }
            _ => measure(tree, child, Size::from_axes(axis, share, cross), backend, proposals)?,
        };
        *slot = Some(output);
    }

    let mut placed: Vec<RenderOutput> = slots.into_iter().flatten().collect();
    let content: f32 = placed.iter().map(|o| o.size().along(axis)).sum::<f32>() + gaps;
    let mut cursor = if flexible == 0 { non_negative(main - content) / 2.0 } else { 0.0 };
    for output in &mut placed {
        let size = output.size();
        let cross_offset = (cross - size.along(axis.cross())) / 2.0;
        let delta = match axis {
            Axis::Horizontal => Point::new(cursor, cross_offset),
            Axis::Vertical => Point::new(cross_offset, cursor),
        };
        output.translate(delta);
        cursor += size.along(axis) + spacing;
    }
    Ok(placed)
}
