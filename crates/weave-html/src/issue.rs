use std::fmt;

use strum_macros::Display;

/// Kind of anomaly the builder absorbed while parsing.
///
/// None of these stop the parse; they describe where the resulting tree
/// deviates from a strict reading of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    /// An end tag with no open element of that name; kept as literal text.
    UnmatchedCloseTag,
    /// A start or end tag cut off by the end of input.
    UnterminatedTag,
    /// A `<!-- ... -->` comment without its terminator.
    UnterminatedComment,
    /// A `<!...>` declaration (doctype and friends) without its `>`.
    UnterminatedDeclaration,
    /// A `<? ... ?>` processing instruction without its `?>`.
    UnterminatedProcessingInstruction,
    /// A `<` with nothing after it; kept as literal text.
    BareLessThan,
}

/// A tolerated anomaly, reported alongside the tree by
/// [`TreeBuilder::run_with_issues`](crate::TreeBuilder::run_with_issues).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Byte offset of the `<` that started the offending construct.
    pub offset: usize,
    /// Short excerpt, typically the tag name.
    pub detail: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{} at byte {}", self.kind, self.offset)
        } else {
            write!(f, "{} `{}` at byte {}", self.kind, self.detail, self.offset)
        }
    }
}
