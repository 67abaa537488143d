//! Tag-soup markup parser for the weave engine.
//!
//! # Scope
//!
//! This crate turns irregular, not necessarily well-formed markup into a
//! [`weave_dom::Tree`]:
//! - Start tags, end tags and self-closed tags, with `img`, `hr`, `br` and
//!   `meta` always treated as closed
//! - Quoted and unquoted attribute values, kept verbatim, plus line-break
//!   pseudo-attributes that preserve multi-line start tags
//! - Comments, doctypes and processing instructions, kept as opaque text
//! - Stray end tags, kept as literal text
//!
//! Parsing never fails. Every anomaly that was absorbed can be inspected
//! with [`TreeBuilder::run_with_issues`].
//!
//! # Not Implemented
//!
//! - HTML5 tree construction (insertion modes, implied end tags, foster parenting)
//! - Encoding detection and character references
//! - Raw-text handling for `script` and `style`

mod builder;
mod issue;
mod scanner;

pub use builder::TreeBuilder;
pub use issue::{IssueKind, ParseIssue};

use weave_dom::Tree;

/// Parse `text` into a new tree.
///
/// ```
/// let tree = weave_html::parse("<p class=\"x\">hi</p>");
/// assert_eq!(tree.to_string(), "<p class=\"x\">hi</p>");
/// ```
#[must_use]
pub fn parse(text: &str) -> Tree {
    TreeBuilder::new(text).run()
}

/// Parse both inputs and [merge](Tree::merge) the second into the first.
///
/// If the two root elements do not share a tag the first tree is returned
/// unchanged.
#[must_use]
pub fn merge_elements(text1: &str, text2: &str) -> Tree {
    let mut merged = parse(text1);
    let other = parse(text2);
    if !merged.merge(&other) {
        tracing::debug!("merge skipped: root elements differ or are missing");
    }
    merged
}

/// In-place parsing for an existing tree.
pub trait Parse {
    /// Discard the current contents and rebuild from `text`.
    fn parse(&mut self, text: &str);
}

impl Parse for Tree {
    fn parse(&mut self, text: &str) {
        *self = TreeBuilder::new(text).run();
    }
}
