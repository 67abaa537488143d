//! Markup reconstruction.
//!
//! An element renders as its start tag, its own text, its children in order
//! and then an end tag, but only if the parser saw an explicit end tag for it.
//! Nothing is synthesized, so a tree built from well-formed input serializes
//! back to the input.

use std::fmt;

use crate::tree::{NodeId, Tree};

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl Tree {
    /// Serialize `id`, its subtree and its end tag.
    #[must_use]
    pub fn element_to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_subtree(id, &mut out);
        out
    }

    /// Serialize only the children of `id`, without `id`'s own tags or text.
    #[must_use]
    pub fn child_elements_to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_subtree(child, &mut out);
        }
        out
    }

    /// One line per node in arena order: `depth-indent tag:child-count:text`.
    ///
    /// Meant for debugging the arena layout rather than the document shape.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for id in self.ids() {
            let e = &self[id];
            out.push_str(&" ".repeat(self.depth(id) * 4));
            out.push_str(&format!("{}:{}:{}", e.tag, e.children.len(), e.text));
            out.push('\n');
        }
        out
    }

    // Iterative so that deeply nested input cannot overflow the stack.
    fn write_subtree(&self, id: NodeId, out: &mut String) {
        let mut steps = vec![Step::Open(id)];
        let mut budget = self.len();
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(id) => {
                    let Some(e) = self.get(id) else { continue };
                    if budget == 0 {
                        break;
                    }
                    budget -= 1;
                    out.push_str(&e.to_string());
                    steps.push(Step::Close(id));
                    steps.extend(e.children.iter().rev().map(|&child| Step::Open(child)));
                }
                Step::Close(id) => {
                    let e = &self[id];
                    if !e.tag.is_empty() && e.tag_closed {
                        out.push_str("</");
                        out.push_str(&e.tag);
                        out.push('>');
                    }
                }
            }
        }
    }
}

/// The whole document, starting from the synthetic root.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.element_to_string(NodeId::ROOT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_tag_only_when_explicitly_closed() {
        let mut tree = Tree::new();
        let p = tree.append_new_element(NodeId::ROOT);
        tree[p].tag = "p".to_string();
        tree[p].text = "open".to_string();
        assert_eq!(tree.to_string(), "<p>open");

        tree[p].tag_closed = true;
        assert_eq!(tree.to_string(), "<p>open</p>");
    }

    #[test]
    fn children_only() {
        let mut tree = Tree::new();
        let div = tree.append_new_element(NodeId::ROOT);
        tree[div].tag = "div".to_string();
        tree[div].text = "t".to_string();
        tree[div].tag_closed = true;
        let b = tree.append_new_element(div);
        tree[b].tag = "b".to_string();
        tree[b].tag_closed = true;
        assert_eq!(tree.child_elements_to_string(div), "<b></b>");
        assert_eq!(tree.element_to_string(div), "<div>t<b></b></div>");
    }

    #[test]
    fn dump_indents_by_depth() {
        let mut tree = Tree::new();
        let div = tree.append_new_element(NodeId::ROOT);
        tree[div].tag = "div".to_string();
        let _ = tree.append_new_element(div);
        assert_eq!(tree.dump(), ":1:\n    div:1:\n        :0:\n");
    }
}
