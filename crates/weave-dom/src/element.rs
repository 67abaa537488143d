use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{AsRefStr, EnumString};

use crate::tree::NodeId;

/// Tags that are always treated as closed as soon as they open, whatever
/// the source syntax says.
///
/// Matching is ASCII case-insensitive: `<BR>` and `<br>` are both void.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VoidTag {
    /// `<img>`
    Img,
    /// `<hr>`
    Hr,
    /// `<br>`
    Br,
    /// `<meta>`
    Meta,
}

/// Returns true if `tag` names a [`VoidTag`].
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VoidTag::from_str(tag).is_ok()
}

/// Strips surrounding whitespace and one matching pair of `"` or `'` quotes.
///
/// ```
/// use weave_dom::trimmed_quotes;
///
/// assert_eq!(trimmed_quotes("\"a b\""), "a b");
/// assert_eq!(trimmed_quotes(" 'x' "), "x");
/// assert_eq!(trimmed_quotes("\"unbalanced"), "\"unbalanced");
/// ```
#[must_use]
pub fn trimmed_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// The trailing slash of a self-closed tag, kept verbatim so that `<br/>`
/// and `<br />` serialize back the way they were written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SelfCloseMark {
    /// The tag was not self-closed.
    #[default]
    None,
    /// `<br/>`
    Slash,
    /// `<br />`
    SpacedSlash,
}

impl SelfCloseMark {
    /// The literal marker text: `""`, `"/"` or `" /"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Slash => "/",
            Self::SpacedSlash => " /",
        }
    }

    /// Returns true if the source tag carried a slash.
    #[must_use]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One attribute of an element, in source order.
///
/// `value` holds the text after `=` exactly as written, quotes included, so
/// `href='x'` keeps its single quotes. An empty value means a bare attribute.
///
/// Line breaks between attributes are recorded as pseudo-attributes whose
/// name is `"\n"` or `"\r\n"` and whose value is empty; the serializer emits
/// them verbatim instead of a separating space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name (or a line-break pseudo-name).
    pub name: String,
    /// Raw value, including any quotes; empty for bare attributes.
    pub value: String,
}

impl Attribute {
    /// Create an attribute from a name and raw (already quoted) value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true for the `"\n"` / `"\r\n"` layout pseudo-attributes.
    #[must_use]
    pub fn is_line_break(&self) -> bool {
        self.value.is_empty() && (self.name == "\n" || self.name == "\r\n")
    }
}

/// A node of the markup tree.
///
/// A node with an empty `tag` is a pure text node. Text that appears right
/// after a start tag belongs to that element; text after an end tag belongs
/// to the sibling placeholder created for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Tag name as written; empty for text nodes.
    pub tag: String,
    /// Ordered attribute list. Duplicate names are allowed.
    pub attributes: Vec<Attribute>,
    /// Raw text attached to this node.
    pub text: String,
    /// Trailing slash of a self-closed start tag.
    pub self_close_mark: SelfCloseMark,
    /// Set once an explicit matching end tag was seen.
    pub tag_closed: bool,
    pub(crate) parent: NodeId,
    pub(crate) children: Vec<NodeId>,
}

impl Element {
    /// Create an empty element attached to the root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The owning node; [`NodeId::ROOT`] for top-level nodes.
    #[must_use]
    pub const fn parent(&self) -> NodeId {
        self.parent
    }

    /// Child ids in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// No tag, no text and no attributes.
    ///
    /// Empty nodes are the placeholders the builder leaves behind after a
    /// closed element; they may be recycled by the next insertion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag.is_empty() && self.text.is_empty() && self.attributes.is_empty()
    }

    /// A leaf: no children.
    #[must_use]
    pub fn is_end_element(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if any attribute is named `name`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    /// Value of the first attribute named `name`, with surrounding quotes removed.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| trimmed_quotes(&attr.value))
    }

    /// Like [`Element::attribute`] but falls back to `default`.
    #[must_use]
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute(name).unwrap_or(default)
    }

    /// Sets `name` to `value`, wrapping the value in double quotes.
    ///
    /// Only the first attribute with that name is overwritten; if none
    /// exists the pair is appended. `None` stores a bare attribute.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        let value = value.map(|v| format!("\"{v}\"")).unwrap_or_default();
        if let Some(attr) = self.attributes.iter_mut().find(|attr| attr.name == name) {
            attr.value = value;
            return;
        }
        self.attributes.push(Attribute::new(name, value));
    }

    /// Removes every attribute named `name`.
    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|attr| attr.name != name);
    }

    /// Resets everything but the parent link.
    pub fn clear(&mut self) {
        self.tag.clear();
        self.attributes.clear();
        self.text.clear();
        self.self_close_mark = SelfCloseMark::None;
        self.tag_closed = false;
        self.children.clear();
    }

    /// Renders the attribute list as it appears inside the start tag.
    ///
    /// A single space separates attributes unless the attribute name itself
    /// starts with whitespace or the rendered text already ends with it, which
    /// is how the line-break pseudo-attributes replace the space.
    #[must_use]
    pub fn attributes_string(&self) -> String {
        let mut out = String::new();
        if self.tag.is_empty() {
            return out;
        }
        for attr in &self.attributes {
            let starts_blank = attr.name.chars().next().is_some_and(char::is_whitespace);
            let ends_blank = out.chars().next_back().is_some_and(char::is_whitespace);
            if !starts_blank && !out.is_empty() && !ends_blank {
                out.push(' ');
            }
            out.push_str(&attr.name);
            if !attr.value.is_empty() {
                out.push('=');
                out.push_str(&attr.value);
            }
        }
        out
    }
}

/// Renders the start tag (if any) followed by the node's own text.
/// Children and the end tag are the tree's business.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tag.is_empty() {
            write!(f, "<{}", self.tag)?;
            if !self.attributes.is_empty() {
                write!(f, " {}", self.attributes_string())?;
            }
            write!(f, "{}>", self.self_close_mark.as_str())?;
        }
        f.write_str(&self.text)
    }
}
