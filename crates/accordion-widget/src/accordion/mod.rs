//! The accordion widget.
//!
//! An [`Accordion`] owns the pairs found in one container and drives them
//! through a borrowed [`Document`]:
//!
//! ```text
//! initialize ─► open/close/toggle ◄── handle_event (click, keydown, resize)
//!                     │
//!                     ├─► SlideManager ─► update(delta_ms) ─► deferred `opened`
//!                     └─► calculate_widths / calculate_heights (horizontal)
//! destroy ─► MarkupJournal::restore
//! ```

mod indicators;
mod init;
mod keyboard;
mod layout;
pub mod notify;
pub mod state;
mod teardown;

use std::fmt;

use accordion_config::AccordionConfig;
use accordion_dom::{Document, DomEvent, EventKind, ListenerTarget, NodeId};
use log::{debug, info, warn};

use crate::animation::{AnimationId, SlideManager};
use crate::error::{AccordionError, Result};
use crate::event_handler::EventResult;
use crate::registry::{self, WidgetId};

use keyboard::KeyAction;
use notify::{AccordionEvent, Callback, Observers, Subscription, SubscriptionId};
use state::{Pair, PairState};
use teardown::MarkupJournal;

/// Per-node data key marking a container that already hosts an accordion.
pub const CONTAINER_MARKER: &str = "accordion";

pub type LifecycleHook = Box<dyn FnOnce(WidgetId)>;

/// Caller callbacks run after initialization and after teardown.
#[derive(Default)]
pub struct LifecycleHooks {
    pub(crate) on_create: Option<LifecycleHook>,
    pub(crate) on_destroy: Option<LifecycleHook>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(mut self, hook: impl FnOnce(WidgetId) + 'static) -> Self {
        self.on_create = Some(Box::new(hook));
        self
    }

    pub fn on_destroy(mut self, hook: impl FnOnce(WidgetId) + 'static) -> Self {
        self.on_destroy = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("on_create", &self.on_create.is_some())
            .field("on_destroy", &self.on_destroy.is_some())
            .finish()
    }
}

/// An open whose `opened` notification waits on running slides.
#[derive(Debug, Clone)]
pub(crate) struct PendingOpen {
    pub(crate) index: usize,
    pub(crate) animations: Vec<AnimationId>,
}

#[derive(Debug)]
pub struct Accordion {
    id: WidgetId,
    container: NodeId,
    config: AccordionConfig,
    pairs: Vec<Pair>,
    states: Vec<PairState>,
    open_index: Option<usize>,
    tab_hidden: Option<usize>,
    slides: SlideManager,
    pending: Vec<PendingOpen>,
    observers: Observers,
    journal: MarkupJournal,
    hooks: LifecycleHooks,
}

impl Accordion {
    /// Build an accordion on `container`.
    ///
    /// Returns `Ok(None)` when the container already hosts one. Markup is
    /// validated before anything is changed, so an error leaves the document
    /// untouched.
    pub fn initialize(
        doc: &mut Document,
        container: NodeId,
        config: AccordionConfig,
    ) -> Result<Option<Accordion>> {
        Self::initialize_with_hooks(doc, container, config, LifecycleHooks::default())
    }

    pub fn initialize_with_hooks(
        doc: &mut Document,
        container: NodeId,
        config: AccordionConfig,
        mut hooks: LifecycleHooks,
    ) -> Result<Option<Accordion>> {
        if !doc.is_element(container) {
            return Err(AccordionError::NotAnElement);
        }
        if let Some(existing) = doc.data(container, CONTAINER_MARKER) {
            debug!("container already hosts accordion {existing}; skipping");
            return Ok(None);
        }
        config.validate()?;

        let found = init::collect_pairs(doc, container, &config)?;
        if let Some(index) = config.default_panel {
            if index >= found.len() {
                return Err(AccordionError::DefaultPanelOutOfRange {
                    index,
                    count: found.len(),
                });
            }
        }

        let id = registry::register();
        let mut accordion = Accordion {
            id,
            container,
            config,
            pairs: Vec::with_capacity(found.len()),
            states: Vec::with_capacity(found.len()),
            open_index: None,
            tab_hidden: None,
            slides: SlideManager::new(),
            pending: Vec::new(),
            observers: Observers::default(),
            journal: MarkupJournal::default(),
            hooks: LifecycleHooks::default(),
        };

        for (control, panel) in found {
            accordion.prepare_pair(doc, control, panel);
        }

        if let Some(index) = accordion.config.default_panel {
            let control = accordion.pairs[index].control;
            accordion.open(doc, control, false)?;
        }

        let container_class = accordion.config.container_class.clone();
        accordion.journal.set_class(doc, container, &container_class, true);
        if accordion.config.horizontal {
            let horizontal_class = accordion.config.container_class_horizontal.clone();
            accordion
                .journal
                .set_class(doc, container, &horizontal_class, true);
            if accordion.config.active_control_hidden {
                accordion.add_panel_headings(doc);
            }
            doc.add_listener(ListenerTarget::Window, EventKind::Resize, id.instance());
            accordion.calculate_widths(doc);
            accordion.calculate_heights(doc);
        }

        doc.set_data(container, CONTAINER_MARKER, id.to_string());
        info!(
            "accordion {} initialized with {} panels{}",
            id,
            accordion.pairs.len(),
            if accordion.config.horizontal { " (horizontal)" } else { "" }
        );

        if let Some(hook) = hooks.on_create.take() {
            hook(id);
        }
        accordion.hooks = hooks;
        Ok(Some(accordion))
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn config(&self) -> &AccordionConfig {
        &self.config
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn pair_state(&self, index: usize) -> Option<PairState> {
        self.states.get(index).copied()
    }

    /// Index of the pair whose control is pressed.
    pub fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    /// No slide is running and no `opened` notification is outstanding.
    pub fn is_settled(&self) -> bool {
        self.slides.is_idle() && self.pending.is_empty()
    }

    /// Advance slides by `delta_ms` and emit `opened` for opens whose slides
    /// have all finished.
    pub fn update(&mut self, doc: &mut Document, delta_ms: f32) {
        self.slides.update(doc, delta_ms);
        self.resolve_pending(doc);
    }

    /// Route an input event. `Handled` means the host should suppress the
    /// event's default action.
    pub fn handle_event(&mut self, doc: &mut Document, event: &DomEvent) -> EventResult {
        let owner = self.id.instance();
        match event {
            DomEvent::Resize => {
                if !doc.has_listener(ListenerTarget::Window, EventKind::Resize, owner) {
                    return EventResult::Ignored;
                }
                self.calculate_widths(doc);
                self.calculate_heights(doc);
                EventResult::Handled
            }
            DomEvent::Click { target } => {
                let Some(control) = self.control_for(doc, *target, EventKind::Click) else {
                    return EventResult::Ignored;
                };
                if let Err(err) = self.toggle(doc, control) {
                    warn!("accordion {}: click failed: {err}", self.id);
                }
                EventResult::Handled
            }
            DomEvent::KeyDown { target, key } => {
                let Some(action) = KeyAction::from_key(*key) else {
                    return EventResult::Ignored;
                };
                let Some(control) = self.control_for(doc, *target, EventKind::KeyDown) else {
                    return EventResult::Ignored;
                };
                if let Err(err) = self.handle_key(doc, control, action) {
                    warn!("accordion {}: key {key:?} failed: {err}", self.id);
                }
                EventResult::Handled
            }
        }
    }

    /// The bound control at or above `target`.
    fn control_for(&self, doc: &Document, target: NodeId, kind: EventKind) -> Option<NodeId> {
        let owner = self.id.instance();
        std::iter::once(target)
            .chain(doc.ancestors(target))
            .take_while(|node| *node != self.container)
            .find(|node| {
                self.pairs.iter().any(|pair| pair.control == *node)
                    && doc.has_listener(ListenerTarget::Node { node: *node }, kind, owner)
            })
    }

    pub fn subscribe(
        &mut self,
        subscription: Subscription,
        callback: impl FnMut(&AccordionEvent) + 'static,
    ) -> SubscriptionId {
        let callback: Callback = Box::new(callback);
        self.observers.subscribe(subscription, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Notifications emitted since the last drain, oldest first. At most
    /// [`EVENT_QUEUE_CAPACITY`](notify::EVENT_QUEUE_CAPACITY) are kept.
    pub fn drain_events(&mut self) -> impl Iterator<Item = AccordionEvent> + '_ {
        self.observers.drain()
    }
}
