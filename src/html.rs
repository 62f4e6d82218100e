//! HTML to plain text normalization.
//!
//! Best-effort by construction: html5ever parses anything, so malformed
//! markup degrades to whatever text it can recover, never an error.

use ego_tree::NodeRef;
use scraper::{node::Node, Html};

/// Elements whose text content is never page content.
const SKIP_TAGS: &[&str] = &["script", "style"];

/// Strips `script`/`style` subtrees and returns the remaining visible text
/// with single-space word boundaries, trimmed.
pub fn normalize(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut fragments: Vec<String> = Vec::new();
    collect_text(&document.tree.root(), &mut fragments);
    fragments.join(" ")
}

fn collect_text(node: &NodeRef<'_, Node>, out: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            // One fragment per whitespace-delimited run keeps joining simple.
            for word in text.split_whitespace() {
                out.push(word.to_string());
            }
        }
        Node::Element(element) => {
            if SKIP_TAGS.contains(&element.name()) {
                return;
            }
            for child in node.children() {
                collect_text(&child, out);
            }
        }
        _ => {
            for child in node.children() {
                collect_text(&child, out);
            }
        }
    }
}
