//! Undo log for document changes and the teardown that replays it.

use std::collections::BTreeMap;

use accordion_dom::{Document, NodeId};
use log::info;

use super::{Accordion, CONTAINER_MARKER};
use crate::registry;

/// Remembers the value every touched attribute, class and inline style
/// property had before the widget first changed it.
#[derive(Debug, Default)]
pub(crate) struct MarkupJournal {
    attributes: BTreeMap<(NodeId, String), Option<String>>,
    classes: BTreeMap<(NodeId, String), bool>,
    styles: BTreeMap<(NodeId, String), Option<String>>,
}

impl MarkupJournal {
    pub(crate) fn set_attr(&mut self, doc: &mut Document, node: NodeId, name: &str, value: impl Into<String>) {
        self.attributes
            .entry((node, name.to_string()))
            .or_insert_with(|| doc.attr(node, name));
        doc.set_attr(node, name, value);
    }

    pub(crate) fn set_class(&mut self, doc: &mut Document, node: NodeId, class: &str, present: bool) {
        self.classes
            .entry((node, class.to_string()))
            .or_insert_with(|| doc.has_class(node, class));
        if present {
            doc.add_class(node, class);
        } else {
            doc.remove_class(node, class);
        }
    }

    /// Record a style property that may later be written directly.
    pub(crate) fn remember_style(&mut self, doc: &Document, node: NodeId, property: &str) {
        self.styles
            .entry((node, property.to_string()))
            .or_insert_with(|| doc.style(node, property).map(str::to_string));
    }

    pub(crate) fn set_style(&mut self, doc: &mut Document, node: NodeId, property: &str, value: impl Into<String>) {
        self.remember_style(doc, node, property);
        doc.set_style(node, property, value);
    }

    pub(crate) fn remove_style(&mut self, doc: &mut Document, node: NodeId, property: &str) {
        self.remember_style(doc, node, property);
        doc.remove_style(node, property);
    }

    pub(crate) fn restore(self, doc: &mut Document) {
        for ((node, name), original) in self.attributes {
            match original {
                Some(value) => doc.set_attr(node, &name, value),
                None => doc.remove_attr(node, &name),
            }
        }
        for ((node, class), was_present) in self.classes {
            if was_present {
                doc.add_class(node, &class);
            } else {
                doc.remove_class(node, &class);
            }
        }
        for ((node, property), original) in self.styles {
            match original {
                Some(value) => doc.set_style(node, &property, value),
                None => doc.remove_style(node, &property),
            }
        }
    }
}

impl Accordion {
    /// Revert everything the widget did to the document and release the
    /// container for a new instance.
    pub fn destroy(mut self, doc: &mut Document) {
        self.slides.clear(doc);
        self.pending.clear();

        for pair in &self.pairs {
            if let Some(markers) = pair.markers {
                markers.remove(doc);
            }
            if let Some(heading) = pair.heading {
                doc.detach(heading);
            }
            doc.unwrap(pair.wrapper);
        }

        std::mem::take(&mut self.journal).restore(doc);
        doc.remove_listeners(self.id.instance());
        doc.remove_data(self.container, CONTAINER_MARKER);
        if self.config.scroll_to_panel {
            doc.set_location_hash("#");
        }

        registry::unregister(self.id);
        self.observers.clear();
        info!("accordion {} destroyed ({} panels)", self.id, self.pairs.len());

        if let Some(hook) = self.hooks.on_destroy.take() {
            hook(self.id);
        }
    }
}
