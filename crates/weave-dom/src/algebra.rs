//! Slicing, splicing and merging of trees.
//!
//! Every cross-tree operation copies: the source tree is never aliased or
//! modified, and the copied nodes are freshly allocated in the target.

use crate::element::{Element, trimmed_quotes};
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Copy the subtree rooted at `id` out into a standalone tree.
    ///
    /// The copied root becomes index 1 under a new synthetic root and its
    /// descendants are numbered in pre-order after it. `mid(ROOT)` copies the
    /// whole tree; an unknown id yields an empty tree.
    #[must_use]
    pub fn mid(&self, id: NodeId) -> Self {
        if id == NodeId::ROOT {
            return self.clone();
        }
        let mut fragment = Self::new();
        if self.get(id).is_some() {
            let _ = fragment.copy_subtree(self, id, NodeId::ROOT, None);
        }
        fragment
    }

    /// Deep-copy `fragment`'s root (index 1) as the last child of `parent`.
    ///
    /// Returns the id of the copy, or `None` when the fragment is empty.
    pub fn append(&mut self, parent: NodeId, fragment: &Self) -> Option<NodeId> {
        let root = fragment.root_element()?;
        Some(self.copy_subtree(fragment, root, parent, None))
    }

    /// Deep-copy `fragment`'s root (index 1) as the first child of `parent`.
    ///
    /// The copied subtree keeps its internal child order. Returns the id of
    /// the copy, or `None` when the fragment is empty.
    pub fn prepend(&mut self, parent: NodeId, fragment: &Self) -> Option<NodeId> {
        let root = fragment.root_element()?;
        Some(self.copy_subtree(fragment, root, parent, Some(0)))
    }

    /// Structurally combine `other` into this tree.
    ///
    /// Only applies when both trees have a root element (index 1) with the
    /// same non-empty tag, compared case-sensitively; otherwise nothing
    /// happens.
    ///
    /// - Every attribute of `other`'s root is set on this root, overwriting
    ///   the first attribute of the same name. Quoted values are re-quoted
    ///   with `"`, so `value=''` stays `value=""`; bare attributes stay bare.
    /// - `other`'s root text replaces ours when it is non-empty, or when we
    ///   have no children but `other`'s root does.
    /// - Each child of `other`'s root is prepended, in `other`'s order, so
    ///   they end up ahead of our original children in reverse order.
    ///
    /// Returns true if the merge was applied.
    pub fn merge(&mut self, other: &Self) -> bool {
        let (Some(root), Some(other_root)) = (self.root_element(), other.root_element()) else {
            return false;
        };
        let theirs = &other[other_root];
        if theirs.tag.is_empty() || self[root].tag != theirs.tag {
            return false;
        }

        for attr in &theirs.attributes {
            let value = (!attr.value.is_empty()).then(|| trimmed_quotes(&attr.value));
            self[root].set_attribute(&attr.name, value);
        }

        let ours = &self[root];
        if !theirs.text.is_empty() || (ours.children.is_empty() && !theirs.children.is_empty()) {
            self[root].text.clone_from(&theirs.text);
        }

        for &child in &theirs.children {
            let _ = self.copy_subtree(other, child, root, Some(0));
        }
        true
    }

    /// Copy `src_root` and its descendants from `src` under `parent`.
    ///
    /// The top node goes to `position` among `parent`'s children; descendants
    /// keep their order.
    fn copy_subtree(
        &mut self,
        src: &Self,
        src_root: NodeId,
        parent: NodeId,
        position: Option<usize>,
    ) -> NodeId {
        let top = self.insert_new_element(parent, position);
        self.copy_fields(top, &src[src_root]);

        let mut stack: Vec<(NodeId, NodeId)> = src
            .children(src_root)
            .iter()
            .rev()
            .map(|&child| (child, top))
            .collect();
        let mut budget = src.len();
        while let Some((from, to_parent)) = stack.pop() {
            if budget == 0 {
                break;
            }
            budget -= 1;
            let copy = self.append_new_element(to_parent);
            self.copy_fields(copy, &src[from]);
            stack.extend(src.children(from).iter().rev().map(|&child| (child, copy)));
        }
        top
    }

    fn copy_fields(&mut self, to: NodeId, from: &Element) {
        let e = &mut self[to];
        e.tag.clone_from(&from.tag);
        e.attributes.clone_from(&from.attributes);
        e.text.clone_from(&from.text);
        e.self_close_mark = from.self_close_mark;
        e.tag_closed = from.tag_closed;
    }
}
