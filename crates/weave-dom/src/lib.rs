//! Markup tree for the weave engine.
//!
//! This crate provides an arena-based tree of loosely parsed markup elements
//! plus the tree algebra used to graft one parsed fragment onto another.
//!
//! # Design
//!
//! All nodes live in one vector and refer to each other through [`NodeId`]
//! indices. Index 0 is a permanent synthetic root that never carries a tag; it
//! holds whatever text precedes the first tag, so the first tag of a parsed
//! document is always index 1. Because links are plain indices a tree can be cloned, sliced with
//! [`Tree::mid`] or spliced with [`Tree::append`] / [`Tree::prepend`] without
//! any pointer fix-up, and nodes are never freed individually: removal clears
//! a node in place.
//!
//! # Scope
//!
//! - **Element** - tag, ordered attribute pairs, text, self-close marker, closed flag
//! - **Tree** - the arena, structural mutators and traversal helpers
//! - **Tree algebra** - `mid`, `append`, `prepend`, `merge`
//! - **Serializer** - reconstructs markup text from the tree

mod algebra;
mod element;
mod serialize;
mod tree;

pub use element::{Attribute, Element, SelfCloseMark, VoidTag, is_void_tag, trimmed_quotes};
pub use tree::{AncestorIterator, DescendantIterator, NodeId, Tree};
