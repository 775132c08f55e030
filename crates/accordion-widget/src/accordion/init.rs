//! Pair discovery and first-time markup setup.

use accordion_config::AccordionConfig;
use accordion_dom::{Document, EventKind, ListenerTarget, NodeId};

use super::indicators::{Indicator, Markers};
use super::state::Pair;
use crate::error::{AccordionError, Result};

fn is_panel(doc: &Document, node: NodeId, config: &AccordionConfig) -> bool {
    doc.tag(node) == Some(config.panel_container_tag.as_str())
        && config
            .panel_container_class
            .as_deref()
            .is_none_or(|class| doc.has_class(node, class))
}

/// Split the container's element children into `(control, panel)` pairs.
///
/// Every panel must directly follow its control; anything else is an error.
pub(crate) fn collect_pairs(
    doc: &Document,
    container: NodeId,
    config: &AccordionConfig,
) -> Result<Vec<(NodeId, NodeId)>> {
    let children = doc.element_children(container);
    let mut pairs = Vec::new();
    let mut position = 0;
    while position < children.len() {
        let control = children[position];
        if is_panel(doc, control, config) {
            return Err(AccordionError::OrphanPanel { position });
        }
        match children.get(position + 1) {
            Some(panel) if is_panel(doc, *panel, config) => {
                pairs.push((control, *panel));
                position += 2;
            }
            _ => {
                return Err(AccordionError::UnpairedControl {
                    tag: doc.tag(control).unwrap_or_default().to_string(),
                    position,
                });
            }
        }
    }

    if pairs.is_empty() {
        return Err(AccordionError::NoPanels);
    }
    Ok(pairs)
}

impl super::Accordion {
    /// Assign ids, classes, ARIA attributes and listeners to pair `index`.
    pub(crate) fn prepare_pair(&mut self, doc: &mut Document, control: NodeId, panel: NodeId) {
        let index = self.pairs.len();
        let instance = self.id.instance();
        let owner = self.id.instance();
        let panel_id = format!("{}{}{}", self.config.panel_id, instance, index);
        let control_id = format!("{}{}{}", self.config.panel_control_id, instance, index);

        for property in ["display", "height", "overflow", "width"] {
            self.journal.remember_style(doc, panel, property);
        }
        for property in ["width", "min-height"] {
            self.journal.remember_style(doc, control, property);
        }

        self.journal.set_class(doc, panel, &self.config.panel_class, true);
        self.journal.set_attr(doc, panel, "aria-hidden", "true");
        self.journal.set_attr(doc, panel, "aria-labelledby", control_id.as_str());
        self.journal.set_attr(doc, panel, "id", panel_id.as_str());
        doc.hide(panel);

        self.journal.set_class(doc, control, &self.config.panel_control_class, true);
        self.journal.set_attr(doc, control, "aria-controls", panel_id.as_str());
        self.journal.set_attr(doc, control, "aria-expanded", "false");
        self.journal.set_attr(doc, control, "aria-pressed", "false");
        self.journal.set_attr(doc, control, "id", control_id.as_str());
        self.journal.set_attr(doc, control, "role", "button");
        self.journal.set_attr(doc, control, "tabindex", "0");

        doc.add_listener(ListenerTarget::Node { node: control }, EventKind::Click, owner);
        doc.add_listener(ListenerTarget::Node { node: control }, EventKind::KeyDown, owner);

        let wrapper = doc.wrap_inner(control, "span");
        let markers = self
            .config
            .state_indicators
            .enabled()
            .then(|| Markers::build(doc, &self.config.state_indicators.elements));
        if let Some(markers) = markers {
            markers.show(doc, control, Indicator::Open);
        }

        self.pairs.push(Pair {
            control,
            panel,
            control_id,
            panel_id,
            wrapper,
            heading: None,
            markers,
        });
        self.states.push(Default::default());
    }

    /// Mirror each control's text as a heading at the top of its panel.
    pub(crate) fn add_panel_headings(&mut self, doc: &mut Document) {
        for pair in self.pairs.iter_mut() {
            let title = doc.text_content(pair.wrapper).trim().to_string();
            let heading = doc.create_element("p");
            doc.set_attr(heading, "aria-hidden", "true");
            doc.add_class(heading, &self.config.panel_title_class);
            doc.set_text(heading, &title);
            doc.prepend_child(pair.panel, heading);
            pair.heading = Some(heading);
        }
    }
}
