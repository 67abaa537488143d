use std::iter;

use owo_colors::OwoColorize;
use weave_dom::{Element, NodeId, Tree};

/// Render the tree one node per line, two spaces of indent per level.
///
/// Tags show their attributes and self-close marker; text is quoted on its
/// own line below the element that owns it. Spaces show as `·` and line
/// breaks as `\n` so layout text stays visible.
pub fn render_tree(tree: &Tree, color: bool) -> String {
    let mut out = String::new();
    for id in iter::once(NodeId::ROOT).chain(tree.descendants(NodeId::ROOT)) {
        let depth = tree.depth(id);
        let element = &tree[id];
        if id == NodeId::ROOT {
            out.push_str("Document\n");
            if !element.text.is_empty() {
                push_line(&mut out, 1, &format_text(&element.text, color));
            }
            continue;
        }
        if element.tag.is_empty() {
            if !element.text.is_empty() {
                push_line(&mut out, depth, &format_text(&element.text, color));
            }
            continue;
        }
        push_line(&mut out, depth, &format_tag(element, color));
        if !element.text.is_empty() {
            push_line(&mut out, depth + 1, &format_text(&element.text, color));
        }
    }
    out
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(line);
    out.push('\n');
}

fn format_tag(element: &Element, color: bool) -> String {
    let attrs = escape_breaks(&element.attributes_string());
    let sep = if attrs.is_empty() { "" } else { " " };
    let mark = element.self_close_mark.as_str();
    if color {
        format!(
            "<{}{sep}{}{mark}>",
            element.tag.cyan().bold(),
            attrs.yellow()
        )
    } else {
        format!("<{}{sep}{attrs}{mark}>", element.tag)
    }
}

fn format_text(text: &str, color: bool) -> String {
    let display = escape_breaks(text).replace(' ', "\u{00B7}");
    if color {
        format!("\"{}\"", display.green())
    } else {
        format!("\"{display}\"")
    }
}

fn escape_breaks(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}
