mod common;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use accordion_config::{AccordionConfig, IndicatorElements, StateIndicatorConfig};
use accordion_dom::{Document, DomEvent, NodeId};
use accordion_widget::{Accordion, CONTAINER_MARKER, EventResult, LifecycleHooks, registry};
use common::{build, control, fixture, snapshot};

fn decorated() -> AccordionConfig {
    AccordionConfig {
        horizontal: true,
        active_control_hidden: true,
        default_panel: Some(1),
        scroll_to_panel: true,
        slide_down: true,
        slide_up: true,
        state_indicators: StateIndicatorConfig {
            elements: IndicatorElements {
                open: "<b>+</b>".into(),
                close: "<b>-</b>".into(),
                ..IndicatorElements::default()
            },
        },
        ..AccordionConfig::default()
    }
}

/// Tags and attributes in document order, with values that embed the
/// instance number masked.
fn masked_outline(doc: &Document, container: NodeId) -> Vec<(String, BTreeMap<String, String>)> {
    std::iter::once(container)
        .chain(doc.descendants(container))
        .filter_map(|node| {
            let tag = doc.tag(node)?.to_string();
            let mut attributes = doc.attributes(node);
            for name in ["id", "aria-controls", "aria-labelledby"] {
                if let Some(value) = attributes.get_mut(name) {
                    if value.starts_with("js-accordion_") {
                        *value = "<generated>".to_string();
                    }
                }
            }
            Some((tag, attributes))
        })
        .collect()
}

#[test]
fn destroy_restores_original_markup() {
    let (mut doc, container) = fixture(3);
    let original_attributes = snapshot(&doc, container);
    let original_html = doc.to_html(container);

    let mut accordion = build(&mut doc, container, decorated());
    accordion.toggle(&mut doc, control(&accordion, 2)).expect("open");
    accordion.update(&mut doc, 100.0);
    let id = accordion.id();
    accordion.destroy(&mut doc);

    assert_eq!(snapshot(&doc, container), original_attributes);
    assert_eq!(doc.to_html(container), original_html);
    assert!(doc.listeners().is_empty());
    assert_eq!(doc.data(container, CONTAINER_MARKER), None);
    assert_eq!(doc.location_hash(), "#");
    assert!(!registry::is_live(id));
}

#[test]
fn destroy_is_safe_when_nothing_was_opened() {
    let (mut doc, container) = fixture(2);
    let original_html = doc.to_html(container);
    let accordion = build(&mut doc, container, AccordionConfig::default());
    accordion.destroy(&mut doc);
    assert_eq!(doc.to_html(container), original_html);
    assert_eq!(doc.location_hash(), "");
}

#[test]
fn destroy_mid_slide_clears_inline_heights() {
    let (mut doc, container) = fixture(2);
    let original_html = doc.to_html(container);
    let mut accordion = build(&mut doc, container, decorated());
    accordion.toggle(&mut doc, control(&accordion, 0)).expect("open");
    accordion.update(&mut doc, 50.0);
    assert!(!accordion.is_settled());

    accordion.destroy(&mut doc);
    assert_eq!(doc.to_html(container), original_html);
}

#[test]
fn reinitialization_reproduces_initial_attributes() {
    let (mut doc, container) = fixture(3);
    let first = build(&mut doc, container, decorated());
    let initial = masked_outline(&doc, container);
    first.destroy(&mut doc);

    let second = build(&mut doc, container, decorated());
    assert_eq!(masked_outline(&doc, container), initial);
    second.check_invariants(&doc).expect("invariants");
}

#[test]
fn destroyed_widget_no_longer_handles_input() {
    let (mut doc, container) = fixture(2);
    let accordion = build(&mut doc, container, AccordionConfig::default());
    let first = control(&accordion, 0);
    accordion.destroy(&mut doc);

    let mut replacement = build(&mut doc, container, AccordionConfig::default());
    let result = replacement.handle_event(&mut doc, &DomEvent::Click { target: first });
    assert_eq!(result, EventResult::Handled);
    assert_eq!(replacement.open_index(), Some(0));
}

#[test]
fn destroy_hook_runs_last() {
    let (mut doc, container) = fixture(2);
    let log = Rc::new(RefCell::new(Vec::new()));
    let created = Rc::clone(&log);
    let destroyed = Rc::clone(&log);
    let hooks = LifecycleHooks::new()
        .on_create(move |id| created.borrow_mut().push(format!("create {id}")))
        .on_destroy(move |id| destroyed.borrow_mut().push(format!("destroy {id}")));

    let accordion =
        Accordion::initialize_with_hooks(&mut doc, container, AccordionConfig::default(), hooks)
            .expect("initialize")
            .expect("fresh");
    let id = accordion.id();
    accordion.destroy(&mut doc);

    assert_eq!(
        *log.borrow(),
        vec![format!("create {id}"), format!("destroy {id}")]
    );
    assert_eq!(doc.data(container, CONTAINER_MARKER), None);
}

#[test]
fn preexisting_attributes_survive_teardown() {
    let mut doc = Document::parse_html(
        "<div id=\"faq\"><h3 id=\"intro\" tabindex=\"3\">A</h3><div style=\"width: 50%\" class=\"x\">a</div></div>",
    );
    let container = doc.find_by_id("faq").expect("container");
    let before = snapshot(&doc, container);

    let accordion = build(
        &mut doc,
        container,
        AccordionConfig {
            horizontal: true,
            ..AccordionConfig::default()
        },
    );
    let heading = control(&accordion, 0);
    assert_ne!(doc.attr(heading, "id").as_deref(), Some("intro"));
    accordion.destroy(&mut doc);

    assert_eq!(snapshot(&doc, container), before);
    assert_eq!(doc.attr(heading, "tabindex").as_deref(), Some("3"));
}
