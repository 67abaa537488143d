use std::fmt;
use std::ops::{Index, IndexMut};

use serde::Serialize;

use crate::element::{Element, is_void_tag};

/// A type-safe index into a [`Tree`].
///
/// Ids are plain positions in the arena. They stay valid across in-place
/// edits; only [`Tree::mid`] produces a tree with renumbered ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The synthetic document root is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena of markup elements addressed by [`NodeId`].
///
/// The arena only grows. Removing a subtree clears its nodes in place, and a
/// cleared node can later be recycled through [`Tree::reuse_or_insert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    /// All nodes; index 0 is the synthetic root.
    pub(crate) elements: Vec<Element>,
}

impl Tree {
    /// Create a tree holding only the synthetic root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new()],
        }
    }

    /// Drop every node except a fresh root.
    pub fn reset(&mut self) {
        self.elements.clear();
        self.elements.push(Element::new());
    }

    /// Number of nodes, the synthetic root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the tree holds nothing but a text-less synthetic root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1 && self.elements.first().is_none_or(|root| root.text.is_empty())
    }

    /// Get a node by its id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Get a mutable reference to a node by its id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    /// Id of the most recently allocated node.
    #[must_use]
    pub fn last_id(&self) -> NodeId {
        NodeId(self.elements.len() - 1)
    }

    /// The logical root of a fragment: index 1, if any node exists besides
    /// the synthetic root.
    ///
    /// Text before the first tag stays on the root, so for parsed markup this
    /// is the first tag.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        (self.elements.len() > 1).then_some(NodeId(1))
    }

    /// Iterate over every id in arena order, the root included.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + use<> {
        (0..self.elements.len()).map(NodeId)
    }

    /// Get the parent of a node; `None` for the root or an unknown id.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if id == NodeId::ROOT {
            return None;
        }
        self.get(id).map(|e| e.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Whether the element at `id` can no longer receive children.
    ///
    /// True for the root, for self-closed tags, for tags whose end tag was
    /// seen, and for void tags.
    #[must_use]
    pub fn is_element_closed(&self, id: NodeId) -> bool {
        if id == NodeId::ROOT {
            return true;
        }
        self.get(id).is_some_and(|e| {
            e.tag_closed || e.self_close_mark.is_present() || is_void_tag(&e.tag)
        })
    }

    /// Number of parent hops from `id` up to the root.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
            remaining: self.elements.len(),
        }
    }

    /// Pre-order iterator over the descendants of `id`, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        DescendantIterator {
            tree: self,
            stack,
            remaining: self.elements.len(),
        }
    }

    /// Allocate a new node as the `position`-th child of `parent`.
    ///
    /// A missing or out-of-range position appends. An unknown parent is
    /// replaced by the root.
    pub fn insert_new_element(&mut self, parent: NodeId, position: Option<usize>) -> NodeId {
        let parent = self.known_or_root(parent);
        let id = NodeId(self.elements.len());
        self.elements.push(Element {
            parent,
            ..Element::new()
        });
        self.link_child(parent, id, position);
        id
    }

    /// Allocate a new node as the last child of `parent`.
    pub fn append_new_element(&mut self, parent: NodeId) -> NodeId {
        self.insert_new_element(parent, None)
    }

    /// Place a node at `position` under `parent`, recycling `slot` when it is
    /// an empty non-root node.
    ///
    /// `slot` is the caller's pending insertion point, typically the
    /// placeholder left after a closed element. When it still holds nothing
    /// it is moved to the requested place instead of growing the arena.
    pub fn reuse_or_insert(
        &mut self,
        slot: NodeId,
        parent: NodeId,
        position: Option<usize>,
    ) -> NodeId {
        let reusable = slot != NodeId::ROOT && self.get(slot).is_some_and(Element::is_empty);
        if reusable {
            self.change_parent(slot, parent, position);
            slot
        } else {
            self.insert_new_element(parent, position)
        }
    }

    /// Detach `id` from its parent and attach it at `position` under `new_parent`.
    pub fn change_parent(&mut self, id: NodeId, new_parent: NodeId, position: Option<usize>) {
        if id == NodeId::ROOT || id.0 >= self.elements.len() {
            return;
        }
        let new_parent = self.known_or_root(new_parent);
        if new_parent == id {
            return;
        }
        let old_parent = self.elements[id.0].parent;
        let siblings = &mut self.elements[old_parent.0].children;
        if let Some(i) = siblings.iter().position(|&child| child == id) {
            let _ = siblings.remove(i);
        }
        self.elements[id.0].parent = new_parent;
        self.link_child(new_parent, id, position);
    }

    /// Clear `id` and its whole subtree.
    ///
    /// Nodes are cleared in place, not freed. `id` keeps its slot in its
    /// parent's children, so callers can refill it (for instance with
    /// replacement text).
    pub fn remove_element_tree(&mut self, id: NodeId) {
        self.remove_child_elements(id);
        if let Some(e) = self.get_mut(id) {
            e.clear();
        }
    }

    /// Clear every descendant of `id` and empty its child list.
    pub fn remove_child_elements(&mut self, id: NodeId) {
        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for child in doomed {
            self.elements[child.0].clear();
        }
        if let Some(e) = self.get_mut(id) {
            e.children.clear();
        }
    }

    fn known_or_root(&self, id: NodeId) -> NodeId {
        if id.0 < self.elements.len() {
            id
        } else {
            NodeId::ROOT
        }
    }

    fn link_child(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
        let children = &mut self.elements[parent.0].children;
        match position {
            Some(i) if i < children.len() => children.insert(i, child),
            _ => children.push(child),
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics if `id` is out of range, like slice indexing.
impl Index<NodeId> for Tree {
    type Output = Element;

    fn index(&self, id: NodeId) -> &Element {
        &self.elements[id.0]
    }
}

/// Panics if `id` is out of range, like slice indexing.
impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.elements[id.0]
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
    // Bounds the walk if caller edits ever produce a parent cycle.
    remaining: usize,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.stack.pop()?;
        self.remaining -= 1;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_has_only_root() {
        let tree = Tree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.root_element(), None);
        assert!(tree.is_element_closed(NodeId::ROOT));
        assert_eq!(tree.parent(NodeId::ROOT), None);
    }

    #[test]
    fn out_of_range_position_appends() {
        let mut tree = Tree::new();
        let a = tree.append_new_element(NodeId::ROOT);
        let b = tree.insert_new_element(NodeId::ROOT, Some(7));
        let c = tree.insert_new_element(NodeId::ROOT, Some(0));
        assert_eq!(tree.children(NodeId::ROOT), &[c, a, b]);
    }

    #[test]
    fn unknown_parent_falls_back_to_root() {
        let mut tree = Tree::new();
        let a = tree.append_new_element(NodeId(42));
        assert_eq!(tree.parent(a), Some(NodeId::ROOT));
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut tree = Tree::new();
        let a = tree.append_new_element(NodeId::ROOT);
        let b = tree.append_new_element(a);
        let c = tree.append_new_element(b);
        let d = tree.append_new_element(a);
        let all: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
        assert_eq!(all, vec![a, b, c, d]);
        assert_eq!(tree.depth(c), 3);
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![b, a, NodeId::ROOT]);
    }
}
