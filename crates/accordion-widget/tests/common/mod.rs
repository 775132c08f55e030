#![allow(dead_code)]

use std::collections::BTreeMap;

use accordion_config::AccordionConfig;
use accordion_dom::{Document, LayoutBox, NodeId};
use accordion_widget::Accordion;

/// Markup with `count` `<h3>`/`<div>` pairs inside `#faq`.
pub fn markup(count: usize) -> String {
    let mut html = String::from("<main><div id=\"faq\" class=\"faq\">\n");
    for i in 0..count {
        html.push_str(&format!(
            "  <h3 class=\"title\">Section <em>{i}</em></h3>\n  <div class=\"body\"><p>Body {i}</p></div>\n"
        ));
    }
    html.push_str("</div></main>");
    html
}

/// Parsed document with measured panels: panel `i` is `50 + 10 * i` tall.
pub fn fixture(count: usize) -> (Document, NodeId) {
    let mut doc = Document::parse_html(&markup(count));
    let container = doc.find_by_id("faq").expect("container");
    let children = doc.element_children(container);
    for (i, pair) in children.chunks(2).enumerate() {
        let top = 100.0 * i as f64;
        doc.set_layout_box(pair[0], LayoutBox::new(top, 30.0));
        doc.set_layout_box(pair[1], LayoutBox::new(top + 30.0, panel_height(i)));
    }
    (doc, container)
}

pub fn panel_height(index: usize) -> f64 {
    50.0 + 10.0 * index as f64
}

pub fn build(doc: &mut Document, container: NodeId, config: AccordionConfig) -> Accordion {
    Accordion::initialize(doc, container, config)
        .expect("initialize")
        .expect("fresh container")
}

pub fn control(accordion: &Accordion, index: usize) -> NodeId {
    accordion.pairs()[index].control
}

pub fn panel(accordion: &Accordion, index: usize) -> NodeId {
    accordion.pairs()[index].panel
}

pub fn attr(doc: &Document, node: NodeId, name: &str) -> Option<String> {
    doc.attr(node, name)
}

/// Indices whose panel reports `aria-hidden="false"`.
pub fn visible_panels(doc: &Document, accordion: &Accordion) -> Vec<usize> {
    accordion
        .pairs()
        .iter()
        .enumerate()
        .filter(|(_, pair)| doc.attr(pair.panel, "aria-hidden").as_deref() == Some("false"))
        .map(|(i, _)| i)
        .collect()
}

/// Attributes of the container and everything below it, keyed by node.
pub fn snapshot(doc: &Document, container: NodeId) -> BTreeMap<NodeId, BTreeMap<String, String>> {
    std::iter::once(container)
        .chain(doc.descendants(container))
        .filter(|node| doc.is_element(*node))
        .map(|node| (node, doc.attributes(node)))
        .collect()
}
