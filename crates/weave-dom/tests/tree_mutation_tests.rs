//! Tests for arena mutation: insertion, slot reuse, re-parenting and subtree removal.

use weave_dom::{NodeId, SelfCloseMark, Tree};

/// Helper to create a tagged child and return its id.
fn alloc_element(tree: &mut Tree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.append_new_element(parent);
    tree[id].tag = tag.to_string();
    id
}

// ========== insertion ==========

#[test]
fn test_insert_at_position() {
    let mut tree = Tree::new();
    let ul = alloc_element(&mut tree, NodeId::ROOT, "ul");
    let a = alloc_element(&mut tree, ul, "li");
    let b = alloc_element(&mut tree, ul, "li");
    let c = tree.insert_new_element(ul, Some(1));

    assert_eq!(tree.children(ul), &[a, c, b]);
    assert_eq!(tree.parent(c), Some(ul));
    assert_eq!(tree.last_id(), c);
}

// ========== reuse_or_insert ==========

#[test]
fn test_empty_slot_is_recycled() {
    let mut tree = Tree::new();
    let div = alloc_element(&mut tree, NodeId::ROOT, "div");
    let slot = tree.append_new_element(div);
    let len = tree.len();

    let placed = tree.reuse_or_insert(slot, NodeId::ROOT, Some(0));

    assert_eq!(placed, slot);
    assert_eq!(tree.len(), len);
    assert!(tree.children(div).is_empty());
    assert_eq!(tree.children(NodeId::ROOT), &[slot, div]);
    assert_eq!(tree.parent(slot), Some(NodeId::ROOT));
}

#[test]
fn test_occupied_slot_is_not_recycled() {
    let mut tree = Tree::new();
    let div = alloc_element(&mut tree, NodeId::ROOT, "div");
    let text = tree.append_new_element(div);
    tree[text].text = "keep me".to_string();

    let placed = tree.reuse_or_insert(text, NodeId::ROOT, None);

    assert_ne!(placed, text);
    assert_eq!(tree.children(div), &[text]);
    assert_eq!(tree.children(NodeId::ROOT), &[div, placed]);
}

#[test]
fn test_root_is_never_recycled() {
    let mut tree = Tree::new();
    let placed = tree.reuse_or_insert(NodeId::ROOT, NodeId::ROOT, None);
    assert_eq!(placed, NodeId(1));
    assert_eq!(tree.len(), 2);
}

// ========== change_parent ==========

#[test]
fn test_change_parent_moves_between_lists() {
    let mut tree = Tree::new();
    let a = alloc_element(&mut tree, NodeId::ROOT, "a");
    let b = alloc_element(&mut tree, NodeId::ROOT, "b");
    let x = alloc_element(&mut tree, a, "x");

    tree.change_parent(x, b, None);

    assert!(tree.children(a).is_empty());
    assert_eq!(tree.children(b), &[x]);
    assert_eq!(tree.depth(x), 2);
}

// ========== removal ==========

#[test]
fn test_remove_element_tree_leaves_placeholder() {
    let mut tree = Tree::new();
    let div = alloc_element(&mut tree, NodeId::ROOT, "div");
    let p = alloc_element(&mut tree, div, "p");
    let span = alloc_element(&mut tree, p, "span");
    tree[span].text = "deep".to_string();
    tree[p].self_close_mark = SelfCloseMark::Slash;

    tree.remove_element_tree(p);

    assert_eq!(tree.children(div), &[p]);
    assert!(tree[p].is_empty());
    assert!(tree[p].is_end_element());
    assert_eq!(tree[p].self_close_mark, SelfCloseMark::None);
    assert!(tree[span].is_empty());
    assert_eq!(tree.len(), 4);

    // The cleared node can be refilled in place.
    tree[p].text = "replacement".to_string();
    assert_eq!(tree.to_string(), "<div>replacement");
}

#[test]
fn test_remove_child_elements_keeps_node() {
    let mut tree = Tree::new();
    let div = alloc_element(&mut tree, NodeId::ROOT, "div");
    tree[div].text = "own".to_string();
    let _ = alloc_element(&mut tree, div, "p");
    let _ = alloc_element(&mut tree, div, "p");

    tree.remove_child_elements(div);

    assert!(tree.children(div).is_empty());
    assert_eq!(tree[div].tag, "div");
    assert_eq!(tree.to_string(), "<div>own");
}

#[test]
fn test_mutators_ignore_unknown_ids() {
    let mut tree = Tree::new();
    let before = tree.clone();
    tree.remove_element_tree(NodeId(9));
    tree.remove_child_elements(NodeId(9));
    tree.change_parent(NodeId(9), NodeId::ROOT, None);
    assert_eq!(tree, before);
    assert!(tree.children(NodeId(9)).is_empty());
    assert_eq!(tree.get(NodeId(9)), None);
}

#[test]
fn test_reset() {
    let mut tree = Tree::new();
    let _ = alloc_element(&mut tree, NodeId::ROOT, "div");
    tree.reset();
    assert_eq!(tree, Tree::new());
}
