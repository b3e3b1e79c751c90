//! The element tree: an append-only arena with parent/child links.

use std::fmt::Write as _;

use slotmap::{SecondaryMap, SlotMap};

use super::node::NodeId;
use super::Element;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// A retained tree of elements, backed by a slotmap arena.
///
/// Nodes are only ever added: a child is appended to exactly one parent and
/// never moved, so every node has a single owner.
#[derive(Debug, Default)]
pub struct ElementTree {
    nodes: SlotMap<NodeId, Element>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the root. Returns `None` if the tree already has one.
    pub fn insert_root(&mut self, element: Element) -> Option<NodeId> {
        if self.root.is_some() {
            return None;
        }
        let id = self.nodes.insert(element);
        self.children.insert(id, Vec::new());
        self.root = Some(id);
        Some(id)
    }

    /// Append `element` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is not in the tree.
    pub fn insert_child(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(element);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children.entry(parent)?.or_default().push(id);
        Some(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children in insertion order. Empty if the node has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(EMPTY_CHILDREN)
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Indented outline of the tree shape, one element kind per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.outline_into(root, 0, &mut out);
        }
        out
    }

    fn outline_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(element) = self.nodes.get(id) else {
            return;
        };
        let _ = writeln!(out, "{:indent$}{}", "", element.kind(), indent = depth * 2);
        for &child in self.children(id) {
            self.outline_into(child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::element::shape::Shape;
    use crate::element::stack::{Stack, StackAxis};
    use crate::element::Spacer;

    /// ```text
    ///     vstack
    ///     /    \
    /// hstack  spacer
    ///    |
    ///  rect
    /// ```
    fn build() -> (ElementTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = ElementTree::new();
        let root = tree.insert_root(Element::Stack(Stack::new(StackAxis::Vertical))).unwrap();
        let h = tree.insert_child(root, Element::Stack(Stack::new(StackAxis::Horizontal))).unwrap();
        let s = tree.insert_child(root, Element::Spacer(Spacer::default())).unwrap();
        let r = tree.insert_child(h, Element::Shape(Shape::rectangle(Color::RED))).unwrap();
        (tree, root, h, s, r)
    }

    #[test]
    fn second_root_is_refused() {
        let (mut tree, root, ..) = build();
        assert!(tree.insert_root(Element::Spacer(Spacer::default())).is_none());
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn parent_and_children() {
        let (tree, root, h, s, r) = build();
        assert_eq!(tree.children(root), &[h, s]);
        assert_eq!(tree.parent(r), Some(h));
        assert_eq!(tree.parent(root), None);
        assert!(tree.children(r).is_empty());
    }

    #[test]
    fn walk_is_pre_order() {
        let (tree, root, h, s, r) = build();
        assert_eq!(tree.walk_depth_first(root), vec![root, h, r, s]);
    }

    #[test]
    fn outline_shape() {
        let (tree, ..) = build();
        assert_eq!(tree.outline(), "vstack\n  hstack\n    rectangle\n  spacer\n");
    }
}
