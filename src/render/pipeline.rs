//! Mounted surfaces and targeted leaf re-rendering.
//!
//! Mounting a tree runs a full layout, then registers one observer on every
//! reactive box the tree reads. A box change never touches the tree or the
//! layout: the observer marks the bound leaves dirty and queues a flush for
//! the surface. Flushing re-renders only those leaves, at their cached
//! placement, and sends each to [`RenderBackend::update_leaf`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use slotmap::SecondaryMap;

use crate::element::{ElementTree, NodeId};
use crate::event::{Dispatch, Dispatcher};
use crate::geometry::Size;
use crate::reactive::value_box::lock;
use crate::reactive::{Binding, BoxId, ObserverId};
use crate::surface::SurfaceId;

use super::backend::{BackendError, NativeHandle, RenderBackend};
use super::layout::{layout, Placement};
use super::output::RenderOutput;
use super::RenderError;

struct Watch {
    binding: Box<dyn Binding>,
    observer: ObserverId,
    nodes: Vec<NodeId>,
}

/// The live state of a shown window's element tree.
pub struct Mount {
    surface: SurfaceId,
    output: RenderOutput,
    placements: SecondaryMap<NodeId, Placement>,
    watches: Vec<Watch>,
    dirty: Arc<Mutex<Vec<NodeId>>>,
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("surface", &self.surface)
            .field("watches", &self.watches.len())
            .field("placements", &self.placements.len())
            .finish()
    }
}

impl Mount {
    /// Lay out `tree` inside `container` and start observing its boxes.
    ///
    /// Boxes without a dispatcher are attached to `dispatcher` here, so
    /// off-thread sets on them are marshaled like any other.
    pub fn new(
        surface: SurfaceId,
        tree: &ElementTree,
        container: Size,
        backend: &dyn RenderBackend,
        dispatcher: &Dispatcher,
    ) -> Result<Mount, RenderError> {
        let root = tree.root().ok_or(RenderError::EmptyTree)?;
        let output = layout(tree, root, container, backend)?;

        let mut bound: BTreeMap<BoxId, (Box<dyn Binding>, Vec<NodeId>)> = BTreeMap::new();
        for id in tree.walk_depth_first(root) {
            let Some(element) = tree.get(id) else { continue };
            for binding in element.bindings() {
                bound.entry(binding.box_id()).or_insert_with(|| (binding, Vec::new())).1.push(id);
            }
        }

        let dirty = Arc::new(Mutex::new(Vec::new()));
        let mut watches = Vec::with_capacity(bound.len());
        for (box_id, (binding, nodes)) in bound {
            binding.attach(dispatcher.clone());
            if binding.is_observed() {
                log::warn!("box {box_id:?} is already mounted elsewhere; surface {surface:?} takes it over");
            }
            let observer =
                binding.watch(Box::new(mark_dirty(surface, nodes.clone(), Arc::clone(&dirty), dispatcher.clone())));
            watches.push(Watch { binding, observer, nodes });
        }
        log::debug!("mounted surface {surface:?}: {} nodes, {} boxes observed", output.placements.len(), watches.len());

        Ok(Mount { surface, output: output.output, placements: output.placements, watches, dirty, dispatcher: dispatcher.clone() })
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// The most recent full render, with flushed leaves patched in.
    pub fn output(&self) -> &RenderOutput {
        &self.output
    }

    pub fn placement(&self, node: NodeId) -> Option<&Placement> {
        self.placements.get(node)
    }

    /// Number of boxes this mount observes.
    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    pub fn is_dirty(&self) -> bool {
        !lock(&self.dirty).is_empty()
    }

    /// Re-render dirty leaves and push each to the backend.
    ///
    /// Returns how many leaves were re-rendered. A leaf that fails to render
    /// keeps its previous output.
    pub fn flush(
        &mut self,
        tree: &ElementTree,
        backend: &mut dyn RenderBackend,
        handle: NativeHandle,
    ) -> Result<usize, BackendError> {
        let mut nodes = std::mem::take(&mut *lock(&self.dirty));
        nodes.sort();
        nodes.dedup();

        let mut updated = 0;
        for node in nodes {
            let (Some(placement), Some(element)) = (self.placements.get(node).copied(), tree.get(node)) else {
                continue;
            };
            let mut leaf = match element.render(node, placement.proposal, &*backend) {
                Ok(leaf) => leaf,
                Err(e) => {
                    log::warn!("re-render of {} in surface {:?} failed: {e}", element.kind(), self.surface);
                    continue;
                }
            };
            leaf.translate(placement.origin);
            log::trace!("re-render {} {node:?} at {:?}", element.kind(), leaf.rect);
            backend.update_leaf(handle, &leaf)?;
            self.output.replace(leaf);
            updated += 1;
        }
        Ok(updated)
    }

    /// Re-observe boxes whose slot another surface took over and then gave up.
    ///
    /// Each reclaimed box's leaves are marked dirty, so changes made while the
    /// slot was elsewhere show up on the next flush. Returns how many boxes
    /// were reclaimed.
    pub fn reclaim(&mut self) -> usize {
        let mut reclaimed = 0;
        for watch in &mut self.watches {
            if watch.binding.is_observed() {
                continue;
            }
            let mut on_change =
                mark_dirty(self.surface, watch.nodes.clone(), Arc::clone(&self.dirty), self.dispatcher.clone());
            on_change();
            watch.observer = watch.binding.watch(Box::new(on_change));
            log::debug!("surface {:?} reclaimed box {:?}", self.surface, watch.binding.box_id());
            reclaimed += 1;
        }
        reclaimed
    }

    /// Stop observing. Boxes since taken over by another surface are left alone.
    pub fn unmount(self) {
        for watch in self.watches {
            watch.binding.release(watch.observer);
        }
        log::debug!("unmounted surface {:?}", self.surface);
    }
}

/// Observer body shared by every box of a mount.
fn mark_dirty(
    surface: SurfaceId,
    nodes: Vec<NodeId>,
    dirty: Arc<Mutex<Vec<NodeId>>>,
    dispatcher: Dispatcher,
) -> impl FnMut() + Send + 'static {
    move || {
        let was_clean = {
            let mut pending = lock(&dirty);
            let was_clean = pending.is_empty();
            pending.extend(nodes.iter().copied());
            was_clean
        };
        if was_clean {
            dispatcher.post(Dispatch::Flush(surface));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::element::{Element, Font, Shape, Stack, StackAxis, Text};
    use crate::event::Runloop;
    use crate::geometry::Rect;
    use crate::reactive::{Source, ValueBox};
    use crate::render::Primitive;
    use crate::testing::{BackendCall, HeadlessBackend};
    use slotmap::SlotMap;

    struct Fixture {
        tree: ElementTree,
        rect: NodeId,
        label: NodeId,
        fill: ValueBox<Color>,
        text: ValueBox<String>,
    }

    fn fixture() -> Fixture {
        let fill = ValueBox::new(Color::RED);
        let text = ValueBox::new(String::from("hi"));
        let mut tree = ElementTree::new();
        let root = tree.insert_root(Element::Stack(Stack::new(StackAxis::Vertical))).unwrap();
        let mut shape = Shape::rectangle(Color::BLACK);
        shape.fill = Source::Reactive(fill.clone());
        let rect = tree.insert_child(root, Element::Shape(shape)).unwrap();
        let label = tree
            .insert_child(root, Element::Text(Text::new(Source::Reactive(text.clone()), Font::system(10.0), Color::BLACK)))
            .unwrap();
        Fixture { tree, rect, label, fill, text }
    }

    fn surface_id() -> SurfaceId {
        let mut sm: SlotMap<SurfaceId, ()> = SlotMap::with_key();
        sm.insert(())
    }

    #[test]
    fn mount_observes_each_box_once() {
        let f = fixture();
        let runloop = Runloop::new();
        let backend = HeadlessBackend::new();
        let mount = Mount::new(surface_id(), &f.tree, Size::new(100.0, 100.0), &backend, &runloop.dispatcher()).unwrap();
        assert_eq!(mount.watch_count(), 2);
        assert!(f.fill.has_observer());
        assert!(f.text.has_observer());
        mount.unmount();
        assert!(!f.fill.has_observer());
    }

    #[test]
    fn box_change_rerenders_only_bound_leaf() {
        let f = fixture();
        let mut runloop = Runloop::new();
        let mut backend = HeadlessBackend::new();
        let journal = backend.journal();
        let surface = surface_id();
        let mut mount = Mount::new(surface, &f.tree, Size::new(100.0, 100.0), &backend, &runloop.dispatcher()).unwrap();
        let before = mount.output().find(f.rect).unwrap().rect;

        f.fill.set(Color::GREEN);
        assert!(mount.is_dirty());
        assert!(matches!(runloop.try_next(), Some(Dispatch::Flush(s)) if s == surface));

        let n = mount.flush(&f.tree, &mut backend, NativeHandle(1)).unwrap();
        assert_eq!(n, 1);
        let updates = journal.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].node, f.rect);
        assert_eq!(updates[0].rect, before);
        assert!(matches!(updates[0].primitive, Primitive::Rectangle { fill, .. } if fill == Color::GREEN));
        assert!(matches!(
            mount.output().find(f.rect).unwrap().primitive,
            Primitive::Rectangle { fill, .. } if fill == Color::GREEN
        ));
        assert!(!journal.calls().iter().any(|c| matches!(c, BackendCall::Present { .. })));
    }

    #[test]
    fn repeated_sets_coalesce_into_one_flush() {
        let f = fixture();
        let mut runloop = Runloop::new();
        let mut backend = HeadlessBackend::new();
        let mut mount = Mount::new(surface_id(), &f.tree, Size::new(100.0, 100.0), &backend, &runloop.dispatcher()).unwrap();

        f.text.set("one".into());
        f.text.set("two".into());
        assert_eq!(runloop.len(), 1);
        assert!(runloop.try_next().is_some());
        assert_eq!(mount.flush(&f.tree, &mut backend, NativeHandle(1)).unwrap(), 1);
        match &mount.output().find(f.label).unwrap().primitive {
            Primitive::Text { content, .. } => assert_eq!(content, "two"),
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn leaf_keeps_cached_origin() {
        let f = fixture();
        let runloop = Runloop::new();
        let mut backend = HeadlessBackend::new();
        let mut mount = Mount::new(surface_id(), &f.tree, Size::new(100.0, 100.0), &backend, &runloop.dispatcher()).unwrap();
        let origin = mount.placement(f.label).unwrap().origin;
        f.text.set("a much longer label".into());
        mount.flush(&f.tree, &mut backend, NativeHandle(1)).unwrap();
        let rect: Rect = mount.output().find(f.label).unwrap().rect;
        assert_eq!(rect.origin(), origin);
    }

    #[test]
    fn reclaim_after_second_mount_lets_go() {
        let f = fixture();
        let mut runloop = Runloop::new();
        let mut backend = HeadlessBackend::new();
        let journal = backend.journal();
        let first = surface_id();
        let mut a = Mount::new(first, &f.tree, Size::new(100.0, 100.0), &backend, &runloop.dispatcher()).unwrap();
        let b = Mount::new(surface_id(), &f.tree, Size::new(100.0, 100.0), &backend, &runloop.dispatcher()).unwrap();
        assert_eq!(a.reclaim(), 0);

        b.unmount();
        assert!(!f.fill.has_observer());
        assert_eq!(a.reclaim(), 2);
        assert!(f.fill.has_observer() && f.text.has_observer());
        assert!(matches!(runloop.try_next(), Some(Dispatch::Flush(s)) if s == first));
        assert!(runloop.try_next().is_none());

        f.fill.set(Color::BLUE);
        a.flush(&f.tree, &mut backend, NativeHandle(1)).unwrap();
        let last = journal.updates().into_iter().rev().find(|u| u.node == f.rect).unwrap();
        assert!(matches!(last.primitive, Primitive::Rectangle { fill, .. } if fill == Color::BLUE));
    }

    #[test]
    fn empty_tree_cannot_mount() {
        let runloop = Runloop::new();
        let err = Mount::new(surface_id(), &ElementTree::new(), Size::new(1.0, 1.0), &HeadlessBackend::new(), &runloop.dispatcher())
            .unwrap_err();
        assert_eq!(err, RenderError::EmptyTree);
    }
}
