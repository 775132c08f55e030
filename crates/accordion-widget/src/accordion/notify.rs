//! Lifecycle notifications and their observers.

use std::collections::VecDeque;
use std::fmt;

use accordion_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::registry::WidgetId;

/// Notification emitted after a pair changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccordionEvent {
    /// A panel finished opening. `panel_selector` is `#<panel id>`.
    Opened {
        widget: WidgetId,
        control: NodeId,
        panel_selector: String,
    },
    Closed { widget: WidgetId, control: NodeId },
}

impl AccordionEvent {
    pub fn control(&self) -> NodeId {
        match self {
            AccordionEvent::Opened { control, .. } | AccordionEvent::Closed { control, .. } => {
                *control
            }
        }
    }
}

/// Which notifications a subscriber receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    All,
    /// Only notifications about one control.
    Control(NodeId),
}

impl Subscription {
    fn matches(&self, event: &AccordionEvent) -> bool {
        match self {
            Subscription::All => true,
            Subscription::Control(control) => event.control() == *control,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Callback = Box<dyn FnMut(&AccordionEvent)>;

struct Observer {
    id: SubscriptionId,
    filter: Subscription,
    callback: Callback,
}

/// Notifications kept for [`Accordion::drain_events`](crate::Accordion::drain_events).
/// Older ones are dropped once the queue is full.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Subscriber list plus a bounded queue of recent notifications.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    observers: Vec<Observer>,
    queue: VecDeque<AccordionEvent>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.observers.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl Observers {
    pub(crate) fn subscribe(&mut self, filter: Subscription, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push(Observer {
            id,
            filter,
            callback,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id != id);
        self.observers.len() != before
    }

    /// Deliver to matching subscribers in subscription order, then queue,
    /// evicting the oldest queued notification when full.
    pub(crate) fn emit(&mut self, event: AccordionEvent) {
        for observer in self.observers.iter_mut() {
            if observer.filter.matches(&event) {
                (observer.callback)(&event);
            }
        }
        if self.queue.len() == EVENT_QUEUE_CAPACITY {
            self.queue.pop_front();
        }
        self.queue.push_back(event);
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = AccordionEvent> + '_ {
        self.queue.drain(..)
    }

    pub(crate) fn clear(&mut self) {
        self.observers.clear();
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn closed(control: usize) -> AccordionEvent {
        AccordionEvent::Closed {
            widget: WidgetId(7),
            control: NodeId::from_index(control),
        }
    }

    #[test]
    fn control_subscription_filters() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();
        let sink = Rc::clone(&seen);
        observers.subscribe(
            Subscription::Control(NodeId::from_index(2)),
            Box::new(move |event| sink.borrow_mut().push(event.control())),
        );

        observers.emit(closed(1));
        observers.emit(closed(2));
        assert_eq!(*seen.borrow(), vec![NodeId::from_index(2)]);
        assert_eq!(observers.drain().count(), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::default();
        let sink = Rc::clone(&count);
        let id = observers.subscribe(Subscription::All, Box::new(move |_| *sink.borrow_mut() += 1));

        observers.emit(closed(1));
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit(closed(1));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn queue_keeps_only_recent_notifications() {
        let mut observers = Observers::default();
        for control in 0..EVENT_QUEUE_CAPACITY + 10 {
            observers.emit(closed(control));
        }
        let queued: Vec<_> = observers.drain().collect();
        assert_eq!(queued.len(), EVENT_QUEUE_CAPACITY);
        assert_eq!(queued[0].control(), NodeId::from_index(10));
    }

    #[test]
    fn opened_serializes_with_type_tag() {
        let event = AccordionEvent::Opened {
            widget: WidgetId(0),
            control: NodeId::from_index(4),
            panel_selector: "#js-accordion_panel--01".into(),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "opened");
        assert_eq!(json["panel_selector"], "#js-accordion_panel--01");
    }
}
