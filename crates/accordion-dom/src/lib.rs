//! In-memory document model for hosting accordion widgets.
//!
//! The widget never talks to a live rendering surface. It mutates a
//! [`Document`], and the host mirrors the document onto whatever surface it
//! owns, feeding measured geometry back through [`LayoutBox`] and draining
//! [`ViewportCommand`]s the widget queues.

pub mod document;
pub mod events;
pub mod html;
pub mod viewport;

pub use document::{Document, ElementData, NodeData, NodeId};
pub use events::{DomEvent, EventKind, Key, Listener, ListenerTarget};
pub use viewport::{LayoutBox, ViewportCommand};
