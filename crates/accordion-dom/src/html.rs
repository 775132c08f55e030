//! HTML import and serialization for [`Document`].
//!
//! Parsing goes through `scraper` (html5ever underneath) so markup is
//! normalised the way a browser would; only the `<body>` subtree is kept.

use std::ops::Deref;
use std::path::Path;

use anyhow::{Context, Result};
use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use tracing::debug;

use crate::document::{Document, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl Document {
    /// Parse a full HTML page. The page's `<body>` becomes the document root.
    pub fn parse_html(source: &str) -> Self {
        let html = Html::parse_document(source);
        let mut document = Document::new();
        let root = document.root();
        if let Some(body) = find_body(&html) {
            if let Node::Element(element) = body.value() {
                for (name, value) in element.attrs() {
                    document.set_attr(root, name, value);
                }
            }
            for child in body.children() {
                document.import(Some(root), child);
            }
        }
        debug!(nodes = document.descendants(root).len(), "parsed html document");
        document
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read HTML file '{}'", path.display()))?;
        Ok(Self::parse_html(&source))
    }

    /// Parse `source` as a fragment and return the detached top-level nodes.
    pub fn parse_fragment(&mut self, source: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(source);
        let mut nodes = Vec::new();
        for child in fragment.tree.root().children() {
            match child.value() {
                // html5ever wraps fragment content in a synthetic <html>.
                Node::Element(element) if element.name() == "html" => {
                    nodes.extend(child.children().filter_map(|inner| self.import(None, inner)));
                }
                _ => nodes.extend(self.import(None, child)),
            }
        }
        nodes
    }

    fn import(&mut self, parent: Option<NodeId>, source: NodeRef<Node>) -> Option<NodeId> {
        let id = match source.value() {
            Node::Text(text) => self.create_text(text.deref()),
            Node::Element(element) => {
                let id = self.create_element(element.name());
                for (name, value) in element.attrs() {
                    self.set_attr(id, name, value);
                }
                id
            }
            _ => return None,
        };
        if let Some(parent) = parent {
            self.append_child(parent, id);
        }
        for child in source.children() {
            self.import(Some(id), child);
        }
        Some(id)
    }

    /// Serialize `node` including its own tag.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Serialize the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match self.node(node) {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in self.attributes(node) {
                    out.push(' ');
                    out.push_str(&name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for child in self.children(node) {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

fn find_body(document: &Html) -> Option<NodeRef<'_, Node>> {
    let selector = Selector::parse("body").ok()?;
    document
        .select(&selector)
        .next()
        .map(|body| (*body).clone())
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    input.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_skips_comments() {
        let mut doc = Document::new();
        let nodes = doc.parse_fragment("<!-- note --><i class=\"x\">+</i> tail");
        assert_eq!(nodes.len(), 2);
        assert_eq!(doc.tag(nodes[0]), Some("i"));
        assert!(doc.has_class(nodes[0], "x"));
        assert_eq!(doc.text_content(nodes[1]), " tail");
        assert!(nodes.iter().all(|n| doc.parent(*n).is_none()));
    }

    #[test]
    fn fragment_allocates_only_its_own_nodes() {
        let mut doc = Document::new();
        let before = doc.node_count();
        let nodes = doc.parse_fragment("<b>+</b>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(doc.node_count(), before + 2);
        assert!(!doc.is_connected(nodes[0]));
    }

    #[test]
    fn serializes_sorted_attributes_and_void_tags() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.append_child(doc.root(), div);
        doc.set_attr(div, "role", "button");
        doc.set_attr(div, "aria-pressed", "false");
        doc.set_attr(div, "title", "a \"b\" & c");
        let br = doc.create_element("br");
        doc.append_child(div, br);
        let text = doc.create_text("1 < 2");
        doc.append_child(div, text);

        assert_eq!(
            doc.to_html(div),
            "<div aria-pressed=\"false\" role=\"button\" title=\"a &quot;b&quot; &amp; c\"><br>1 &lt; 2</div>"
        );
    }
}
