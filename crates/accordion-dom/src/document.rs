use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::events::{EventKind, Listener, ListenerTarget};
use crate::viewport::{LayoutBox, ViewportCommand};

/// Handle to a node in a [`Document`]. Detached nodes keep their id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Build a handle from a raw arena index. Only meaningful for ids that
    /// came from the same document.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

/// Element payload. `class` and `style` are kept structured rather than as
/// raw attribute strings.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub style: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed element tree plus the page-level state a DOM carries:
/// focus, per-node data, listeners, measured layout and viewport requests.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    root: NodeId,
    focused: Option<NodeId>,
    data: HashMap<NodeId, BTreeMap<String, String>>,
    listeners: Vec<Listener>,
    layout: HashMap<NodeId, LayoutBox>,
    commands: VecDeque<ViewportCommand>,
    location_hash: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = Slot {
            data: NodeData::Element(ElementData {
                tag: "body".to_string(),
                ..ElementData::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![root],
            root: NodeId(0),
            focused: None,
            data: HashMap::new(),
            listeners: Vec::new(),
            layout: HashMap::new(),
            commands: VecDeque::new(),
            location_hash: String::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn slot(&self, node: NodeId) -> &Slot {
        &self.slots[node.0]
    }

    fn slot_mut(&mut self, node: NodeId) -> &mut Slot {
        &mut self.slots[node.0]
    }

    pub fn node(&self, node: NodeId) -> &NodeData {
        &self.slot(node).data
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.slot(node).data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.slot_mut(node).data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag.as_str())
    }

    // ---- tree -------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_slot(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_slot(NodeData::Text(text.to_string()))
    }

    pub(crate) fn push_slot(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Nodes ever allocated, detached ones included. Ids are never reused.
    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.slot(node).children
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Ancestors from the parent up to the tree root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(node);
        while let Some(id) = current {
            result.push(id);
            current = self.parent(id);
        }
        result
    }

    /// Descendants in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        result
    }

    /// Whether `node` is attached under the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.ancestors(node).last() == Some(&self.root)
    }

    fn sibling_position(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node)?;
        let position = self.children(parent).iter().position(|c| *c == node)?;
        Some((parent, position))
    }

    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let (parent, position) = self.sibling_position(node)?;
        self.children(parent)[..position]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.is_element(*sibling))
    }

    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let (parent, position) = self.sibling_position(node)?;
        self.children(parent)[position + 1..]
            .iter()
            .copied()
            .find(|sibling| self.is_element(*sibling))
    }

    /// Remove `node` from its parent. The subtree stays intact and can be
    /// re-inserted.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.slot(node).parent {
            self.slot_mut(parent).children.retain(|c| *c != node);
            self.slot_mut(node).parent = None;
        }
        if let Some(focused) = self.focused {
            if focused == node || self.ancestors(focused).contains(&node) {
                self.focused = None;
            }
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.slot_mut(parent).children.push(child);
        self.slot_mut(child).parent = Some(parent);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, 0, child);
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.slot_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.slot_mut(child).parent = Some(parent);
    }

    /// Move all children of `node` into a new `tag` element appended to `node`.
    pub fn wrap_inner(&mut self, node: NodeId, tag: &str) -> NodeId {
        let wrapper = self.create_element(tag);
        let children = std::mem::take(&mut self.slot_mut(node).children);
        for child in &children {
            self.slot_mut(*child).parent = Some(wrapper);
        }
        self.slot_mut(wrapper).children = children;
        self.append_child(node, wrapper);
        wrapper
    }

    /// Replace `node` with its own children.
    pub fn unwrap(&mut self, node: NodeId) {
        let Some((parent, position)) = self.sibling_position(node) else {
            return;
        };
        let children = std::mem::take(&mut self.slot_mut(node).children);
        self.detach(node);
        for (offset, child) in children.into_iter().enumerate() {
            self.slot_mut(child).parent = None;
            self.insert_child(parent, position + offset, child);
        }
    }

    /// Detach every child of `node`.
    pub fn empty(&mut self, node: NodeId) {
        for child in self.children(node).to_vec() {
            self.detach(child);
        }
    }

    // ---- content ----------------------------------------------------------

    pub fn text_content(&self, node: NodeId) -> String {
        match &self.slot(node).data {
            NodeData::Text(text) => text.clone(),
            NodeData::Element(_) => {
                let mut content = String::new();
                for child in self.children(node) {
                    content.push_str(&self.text_content(*child));
                }
                content
            }
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.empty(node);
        let text_node = self.create_text(text);
        self.append_child(node, text_node);
    }

    // ---- attributes -------------------------------------------------------

    /// Attribute value, with `class` and `style` rendered from their
    /// structured form.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let element = self.element(node)?;
        match name {
            "class" if element.classes.is_empty() => None,
            "class" => Some(element.classes.join(" ")),
            "style" if element.style.is_empty() => None,
            "style" => Some(render_style(&element.style)),
            _ => element.attributes.get(name).cloned(),
        }
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let Some(element) = self.element_mut(node) else {
            return;
        };
        match name {
            "class" => {
                element.classes.clear();
                for class in value.split_whitespace() {
                    if !element.classes.iter().any(|c| c == class) {
                        element.classes.push(class.to_string());
                    }
                }
            }
            "style" => element.style = parse_style(&value),
            _ => {
                element.attributes.insert(name.to_string(), value);
            }
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        match name {
            "class" => element.classes.clear(),
            "style" => element.style.clear(),
            _ => {
                element.attributes.remove(name);
            }
        }
    }

    /// Every attribute of an element, `class` and `style` included.
    pub fn attributes(&self, node: NodeId) -> BTreeMap<String, String> {
        let Some(element) = self.element(node) else {
            return BTreeMap::new();
        };
        let mut attributes = element.attributes.clone();
        for name in ["class", "style"] {
            if let Some(value) = self.attr(node, name) {
                attributes.insert(name.to_string(), value);
            }
        }
        attributes
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|element| element.classes.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?.style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.style.insert(property.to_string(), value.into());
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(element) = self.element_mut(node) {
            element.style.remove(property);
        }
    }

    pub fn hide(&mut self, node: NodeId) {
        self.set_style(node, "display", "none");
    }

    pub fn show(&mut self, node: NodeId) {
        self.remove_style(node, "display");
    }

    /// Whether the node's own inline style leaves it displayed.
    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.style(node, "display") != Some("none")
    }

    // ---- lookup -----------------------------------------------------------

    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.element(*node).and_then(|e| e.attributes.get("id")).map(String::as_str) == Some(id))
    }

    pub fn find_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    // ---- focus ------------------------------------------------------------

    pub fn focus(&mut self, node: NodeId) {
        if self.is_element(node) {
            self.focused = Some(node);
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    // ---- per-node data ----------------------------------------------------

    pub fn set_data(&mut self, node: NodeId, key: &str, value: impl Into<String>) {
        self.data
            .entry(node)
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.data.get(&node)?.get(key).map(String::as_str)
    }

    pub fn remove_data(&mut self, node: NodeId, key: &str) {
        if let Some(entries) = self.data.get_mut(&node) {
            entries.remove(key);
            if entries.is_empty() {
                self.data.remove(&node);
            }
        }
    }

    // ---- listeners --------------------------------------------------------

    pub fn add_listener(&mut self, target: ListenerTarget, kind: EventKind, owner: u64) {
        let listener = Listener {
            target,
            kind,
            owner,
        };
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    pub fn has_listener(&self, target: ListenerTarget, kind: EventKind, owner: u64) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && l.kind == kind && l.owner == owner)
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// Drop every listener bound by `owner`.
    pub fn remove_listeners(&mut self, owner: u64) {
        self.listeners.retain(|l| l.owner != owner);
    }

    // ---- layout -----------------------------------------------------------

    pub fn set_layout_box(&mut self, node: NodeId, layout: LayoutBox) {
        self.layout.insert(node, layout);
    }

    pub fn layout_box(&self, node: NodeId) -> Option<LayoutBox> {
        self.layout.get(&node).copied()
    }

    /// Natural height reported by the host, regardless of display state.
    pub fn natural_height(&self, node: NodeId) -> f64 {
        self.layout_box(node).map(|b| b.height).unwrap_or(0.0)
    }

    /// Rendered outer height: zero when undisplayed, the inline pixel height
    /// while one is forced, the measured height otherwise.
    pub fn outer_height(&self, node: NodeId) -> f64 {
        if !self.is_displayed(node) {
            return 0.0;
        }
        if let Some(px) = self.style(node, "height").and_then(parse_px) {
            return px;
        }
        self.natural_height(node)
    }

    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.layout_box(node).map(|b| b.top).unwrap_or(0.0)
    }

    // ---- viewport ---------------------------------------------------------

    pub fn request(&mut self, command: ViewportCommand) {
        self.commands.push_back(command);
    }

    pub fn pop_command(&mut self) -> Option<ViewportCommand> {
        self.commands.pop_front()
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn location_hash(&self) -> &str {
        &self.location_hash
    }

    /// Update the location hash, queueing a command only when it changes.
    pub fn set_location_hash(&mut self, hash: &str) {
        if self.location_hash != hash {
            self.location_hash = hash.to_string();
            self.request(ViewportCommand::SetLocationHash {
                hash: hash.to_string(),
            });
        }
    }
}

pub(crate) fn parse_style(source: &str) -> BTreeMap<String, String> {
    source
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

pub(crate) fn render_style(style: &BTreeMap<String, String>) -> String {
    style
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_items(doc: &mut Document, count: usize) -> (NodeId, Vec<NodeId>) {
        let list = doc.create_element("ul");
        doc.append_child(doc.root(), list);
        let items = (0..count)
            .map(|i| {
                let item = doc.create_element("li");
                doc.set_text(item, &format!("item {i}"));
                doc.append_child(list, item);
                item
            })
            .collect();
        (list, items)
    }

    #[test]
    fn sibling_navigation_skips_text_nodes() {
        let mut doc = Document::new();
        let (list, items) = list_with_items(&mut doc, 3);
        let gap = doc.create_text("\n  ");
        doc.insert_child(list, 1, gap);

        assert_eq!(doc.children(list).len(), 4);
        assert_eq!(doc.element_children(list), items);
        assert_eq!(doc.previous_element_sibling(items[1]), Some(items[0]));
        assert_eq!(doc.next_element_sibling(items[0]), Some(items[1]));
        assert_eq!(doc.previous_element_sibling(items[0]), None);
        assert_eq!(doc.next_element_sibling(items[2]), None);
    }

    #[test]
    fn wrap_and_unwrap_restore_children() {
        let mut doc = Document::new();
        let heading = doc.create_element("h3");
        doc.append_child(doc.root(), heading);
        let text = doc.create_text("Title ");
        let em = doc.create_element("em");
        doc.set_text(em, "one");
        doc.append_child(heading, text);
        doc.append_child(heading, em);

        let span = doc.wrap_inner(heading, "span");
        assert_eq!(doc.children(heading), &[span]);
        assert_eq!(doc.children(span), &[text, em]);
        assert_eq!(doc.parent(em), Some(span));
        assert_eq!(doc.text_content(heading), "Title one");

        doc.unwrap(span);
        assert_eq!(doc.children(heading), &[text, em]);
        assert_eq!(doc.parent(text), Some(heading));
        assert_eq!(doc.parent(span), None);
    }

    #[test]
    fn class_and_style_attributes_are_structured() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "class", "a b a");
        assert_eq!(doc.classes(div), &["a".to_string(), "b".to_string()]);
        doc.add_class(div, "b");
        doc.add_class(div, "c");
        doc.remove_class(div, "a");
        assert_eq!(doc.attr(div, "class").as_deref(), Some("b c"));

        doc.set_attr(div, "style", "width: 10%; display:none");
        assert_eq!(doc.style(div, "width"), Some("10%"));
        assert!(!doc.is_displayed(div));
        doc.show(div);
        assert!(doc.is_displayed(div));
        assert_eq!(doc.attr(div, "style").as_deref(), Some("width: 10%;"));

        doc.set_attr(div, "role", "button");
        let attributes = doc.attributes(div);
        assert_eq!(attributes.get("role").map(String::as_str), Some("button"));
        assert_eq!(attributes.get("class").map(String::as_str), Some("b c"));

        doc.remove_attr(div, "style");
        doc.remove_attr(div, "role");
        assert_eq!(doc.attr(div, "style"), None);
        assert_eq!(doc.attr(div, "role"), None);
    }

    #[test]
    fn outer_height_follows_display_and_inline_height() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_layout_box(div, LayoutBox::new(40.0, 120.0));
        assert_eq!(doc.outer_height(div), 120.0);
        assert_eq!(doc.offset_top(div), 40.0);

        doc.set_style(div, "height", "30px");
        assert_eq!(doc.outer_height(div), 30.0);

        doc.hide(div);
        assert_eq!(doc.outer_height(div), 0.0);
        assert_eq!(doc.natural_height(div), 120.0);
    }

    #[test]
    fn detaching_focused_subtree_clears_focus() {
        let mut doc = Document::new();
        let (list, items) = list_with_items(&mut doc, 2);
        doc.focus(items[1]);
        assert_eq!(doc.focused(), Some(items[1]));
        doc.detach(list);
        assert_eq!(doc.focused(), None);
        assert!(!doc.is_connected(items[1]));
    }

    #[test]
    fn listeners_are_removed_per_owner() {
        let mut doc = Document::new();
        let node = doc.create_element("button");
        let target = ListenerTarget::Node { node };
        doc.add_listener(target, EventKind::Click, 1);
        doc.add_listener(target, EventKind::Click, 1);
        doc.add_listener(ListenerTarget::Window, EventKind::Resize, 2);
        assert_eq!(doc.listeners().len(), 2);

        doc.remove_listeners(1);
        assert!(!doc.has_listener(target, EventKind::Click, 1));
        assert!(doc.has_listener(ListenerTarget::Window, EventKind::Resize, 2));
    }

    #[test]
    fn location_hash_only_queues_changes() {
        let mut doc = Document::new();
        doc.set_location_hash("#panel");
        doc.set_location_hash("#panel");
        assert_eq!(
            doc.pop_command(),
            Some(ViewportCommand::SetLocationHash {
                hash: "#panel".into()
            })
        );
        assert!(!doc.has_pending_commands());
    }
}
