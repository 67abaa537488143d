use weave_dom::{Attribute, NodeId, SelfCloseMark, Tree};

use crate::issue::{IssueKind, ParseIssue};
use crate::scanner::Scanner;

/// Builds a [`Tree`] from tag soup in a single left-to-right pass.
///
/// The builder never fails. Comments, doctypes and processing instructions
/// are kept as opaque text, void tags close themselves, and an end tag with
/// no matching open element is kept as literal text.
///
/// # Insertion point
///
/// The builder tracks one node, the cursor, that receives text. After an
/// element closes, an empty placeholder sibling becomes the cursor. When the
/// next structural step needs a node and the cursor is still empty, the
/// placeholder is moved there instead of allocating a new one.
pub struct TreeBuilder<'a> {
    scanner: Scanner<'a>,
    tree: Tree,
    /// Text target and pending insertion point. `NodeId::ROOT` until the
    /// first tag, so leading text (a doctype, a newline) stays on the root
    /// and the first tag always lands at index 1.
    cursor: NodeId,
    issues: Vec<ParseIssue>,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder over `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
            tree: Tree::new(),
            cursor: NodeId::ROOT,
            issues: Vec::new(),
        }
    }

    /// Parse the whole input and return the tree.
    #[must_use]
    pub fn run(self) -> Tree {
        self.run_with_issues().0
    }

    /// Parse the whole input and return the tree together with every
    /// anomaly that was absorbed along the way.
    #[must_use]
    pub fn run_with_issues(mut self) -> (Tree, Vec<ParseIssue>) {
        tracing::debug!(bytes = self.scanner.rest().len(), "parsing markup");
        while !self.scanner.at_end() {
            let text = self.scanner.take_text();
            self.push_text(text);
            if self.scanner.bump() == Some('<') {
                self.parse_tag();
            }
        }
        tracing::debug!(
            nodes = self.tree.len(),
            issues = self.issues.len(),
            "parsed markup"
        );
        (self.tree, self.issues)
    }

    /// Dispatch on what follows a `<`.
    fn parse_tag(&mut self) {
        let start = self.scanner.pos() - 1;
        self.scanner.skip_blank();
        match self.scanner.peek() {
            None => {
                let literal = self.scanner.since(start);
                self.push_text(literal);
                self.report(IssueKind::BareLessThan, start, "");
            }
            Some('!') => self.parse_exclamation_tag(start),
            Some('?') => self.parse_question_tag(start),
            Some('/') => self.parse_close_tag(start),
            Some(_) => self.parse_open_tag(start),
        }
    }

    /// `<!-- ... -->` and `<!DOCTYPE ...>`: copied verbatim into the text.
    fn parse_exclamation_tag(&mut self, start: usize) {
        self.push_text("<!");
        let _ = self.scanner.bump();
        let (terminator, kind) = if self.scanner.starts_with("--") {
            ("-->", IssueKind::UnterminatedComment)
        } else {
            (">", IssueKind::UnterminatedDeclaration)
        };
        let (body, terminated) = self.scanner.take_through(terminator);
        self.push_text(body);
        if !terminated {
            self.report(kind, start, "");
        }
    }

    /// `<? ... ?>`: copied verbatim into the text.
    fn parse_question_tag(&mut self, start: usize) {
        self.push_text("<?");
        let _ = self.scanner.bump();
        let (body, terminated) = self.scanner.take_through("?>");
        self.push_text(body);
        if !terminated {
            self.report(IssueKind::UnterminatedProcessingInstruction, start, "");
        }
    }

    fn parse_open_tag(&mut self, start: usize) {
        // The new element goes under the nearest ancestor that is still open.
        let mut parent = self.cursor;
        while parent != NodeId::ROOT {
            let e = &self.tree[parent];
            if !e.tag.is_empty() && !self.tree.is_element_closed(parent) {
                break;
            }
            parent = e.parent();
        }

        let id = self.place(parent);
        let tag = self.scanner.word();
        self.tree[id].tag = tag.to_string();

        if self.scanner.peek().is_some_and(char::is_whitespace) {
            let attributes = self.parse_attributes();
            self.tree[id].attributes = attributes;
        }

        let mut terminated = false;
        while let Some(c) = self.scanner.peek() {
            if c == '/' {
                self.tree[id].self_close_mark = if self.scanner.preceded_by(' ') {
                    SelfCloseMark::SpacedSlash
                } else {
                    SelfCloseMark::Slash
                };
            }
            let _ = self.scanner.bump();
            if c == '>' {
                terminated = true;
                break;
            }
        }
        if !terminated {
            self.report(IssueKind::UnterminatedTag, start, tag);
        }

        // Closed on arrival: give following text a sibling to land in.
        if self.tree.is_element_closed(id) {
            let parent = self.tree[id].parent();
            let _ = self.place(parent);
        }
    }

    /// Attributes up to `/` or `>`. Line breaks between attributes become
    /// `"\n"` / `"\r\n"` pseudo-attributes so the layout survives reserialization.
    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        while !self.scanner.at_end() {
            let breaks = self.scanner.skip_whitespace();
            if matches!(self.scanner.peek(), Some('>' | '/')) {
                break;
            }
            if breaks.lf > 0 {
                let newline = if breaks.lf == breaks.cr { "\r\n" } else { "\n" };
                attributes.push(Attribute::new(newline, ""));
            }

            let key = self.scanner.word();
            if key.is_empty() {
                break;
            }
            self.scanner.skip_blank();
            let mut value = "";
            if self.scanner.peek() == Some('=') {
                let _ = self.scanner.bump();
                self.scanner.skip_blank();
                value = self.scanner.word();
            }
            attributes.push(Attribute::new(key, value));
        }
        attributes
    }

    fn parse_close_tag(&mut self, start: usize) {
        let _ = self.scanner.bump();
        self.scanner.skip_blank();
        let tag = self.scanner.word();
        let (_, terminated) = self.scanner.take_through(">");
        if !terminated {
            self.report(IssueKind::UnterminatedTag, start, tag);
        }

        if let Some(open) = self.find_open_element(tag) {
            self.tree[open].tag_closed = true;
            let parent = self.tree[open].parent();
            let _ = self.place(parent);
        } else {
            self.push_text(&format!("</{tag}>"));
            self.report(IssueKind::UnmatchedCloseTag, start, tag);
        }
    }

    /// Nearest open ancestor-or-self of the cursor whose tag matches `tag`
    /// case-insensitively.
    fn find_open_element(&self, tag: &str) -> Option<NodeId> {
        if tag.is_empty() {
            return None;
        }
        let mut id = self.cursor;
        while id != NodeId::ROOT {
            let e = &self.tree[id];
            if eq_ignore_case(&e.tag, tag) && !self.tree.is_element_closed(id) {
                return Some(id);
            }
            id = e.parent();
        }
        None
    }

    /// Put a node at the end of `parent`'s children and make it the cursor,
    /// recycling the cursor itself when it is an empty placeholder.
    fn place(&mut self, parent: NodeId) -> NodeId {
        let id = self.tree.reuse_or_insert(self.cursor, parent, None);
        self.cursor = id;
        id
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.tree[self.cursor].text.push_str(text);
    }

    fn report(&mut self, kind: IssueKind, offset: usize, detail: &str) {
        let issue = ParseIssue {
            kind,
            offset,
            detail: detail.to_string(),
        };
        tracing::trace!(%issue, "recovered from malformed markup");
        self.issues.push(issue);
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_folding_is_unicode_aware() {
        assert!(eq_ignore_case("DIV", "div"));
        assert!(eq_ignore_case("Ärger", "äRGER"));
        assert!(!eq_ignore_case("div", "dvi"));
    }

    #[test]
    fn placeholder_is_reused_by_next_element() {
        // <p>a</p> leaves an empty placeholder which the second <p> takes over.
        let tree = TreeBuilder::new("<p>a</p><p>b</p>").run();
        assert_eq!(tree[NodeId(2)].tag, "p");
        assert_eq!(tree[NodeId(2)].text, "b");
        assert_eq!(tree.children(NodeId::ROOT), &[NodeId(1), NodeId(2), NodeId(3)]);
        assert!(tree[NodeId(3)].is_empty());
    }

    #[test]
    fn leading_text_keeps_first_tag_at_index_one() {
        let tree = TreeBuilder::new("<!DOCTYPE html>\n<html><body>x</body></html>").run();
        assert_eq!(tree[NodeId::ROOT].text, "<!DOCTYPE html>\n");
        assert_eq!(tree[NodeId(1)].tag, "html");
        assert_eq!(tree.root_element(), Some(NodeId(1)));
    }
}
