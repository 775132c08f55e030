//! Accessible accordion widget over an in-memory document.
//!
//! A container's children are read as alternating control/panel pairs. The
//! widget assigns ARIA attributes and ids, keeps at most one panel open,
//! moves focus between controls with the arrow keys, optionally slides
//! panels open and closed, and in horizontal mode lays the panels out as a
//! tab strip. [`Accordion::destroy`] reverts all of it.
//!
//! ```ignore
//! let mut doc = Document::parse_html(markup);
//! let container = doc.find_by_id("faq").unwrap();
//! let mut accordion = Accordion::initialize(&mut doc, container, AccordionConfig::default())?
//!     .expect("container is fresh");
//! accordion.handle_event(&mut doc, &DomEvent::Click { target: accordion.pairs()[0].control });
//! accordion.update(&mut doc, 16.0);
//! ```

pub mod accordion;
pub mod animation;
pub mod error;
pub mod event_handler;
pub mod registry;

pub use accordion::notify::{AccordionEvent, EVENT_QUEUE_CAPACITY, Subscription, SubscriptionId};
pub use accordion::state::{CloseOutcome, Pair, PairState};
pub use accordion::{Accordion, CONTAINER_MARKER, LifecycleHook, LifecycleHooks};
pub use animation::{AnimationId, EasingFunction, SlideManager};
pub use error::{AccordionError, InvariantViolation};
pub use event_handler::EventResult;
pub use registry::WidgetId;
