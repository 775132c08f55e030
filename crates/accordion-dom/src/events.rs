//! Input events and the listener table entries that route them.

use serde::{Deserialize, Serialize};

use crate::document::NodeId;

/// Kind of event a listener is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    KeyDown,
    /// Debounced viewport resize, delivered to window listeners.
    Resize,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListenerTarget {
    Node { node: NodeId },
    Window,
}

/// A bound listener. `owner` identifies the widget that bound it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub target: ListenerTarget,
    pub kind: EventKind,
    pub owner: u64,
}

/// Keys the document distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Space,
    Enter,
    /// Any other key, carrying its legacy key code when known.
    Other(u32),
}

impl Key {
    /// Map a legacy `KeyboardEvent.which` code.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            37 => Key::ArrowLeft,
            38 => Key::ArrowUp,
            39 => Key::ArrowRight,
            40 => Key::ArrowDown,
            32 => Key::Space,
            13 => Key::Enter,
            other => Key::Other(other),
        }
    }

    /// Map a `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowDown" | "Down" => Key::ArrowDown,
            " " | "Space" | "Spacebar" => Key::Space,
            "Enter" => Key::Enter,
            _ => Key::Other(0),
        }
    }
}

/// An input event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomEvent {
    Click { target: NodeId },
    KeyDown { target: NodeId, key: Key },
    Resize,
}

impl DomEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomEvent::Click { .. } => EventKind::Click,
            DomEvent::KeyDown { .. } => EventKind::KeyDown,
            DomEvent::Resize => EventKind::Resize,
        }
    }

    /// The node the event was dispatched at; `None` for window events.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            DomEvent::Click { target } | DomEvent::KeyDown { target, .. } => Some(*target),
            DomEvent::Resize => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_key_codes() {
        assert_eq!(Key::from_key_code(37), Key::ArrowLeft);
        assert_eq!(Key::from_key_code(38), Key::ArrowUp);
        assert_eq!(Key::from_key_code(39), Key::ArrowRight);
        assert_eq!(Key::from_key_code(40), Key::ArrowDown);
        assert_eq!(Key::from_key_code(32), Key::Space);
        assert_eq!(Key::from_key_code(13), Key::Enter);
        assert_eq!(Key::from_key_code(9), Key::Other(9));
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("Spacebar"), Key::Space);
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name("Tab"), Key::Other(0));
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = DomEvent::KeyDown {
            target: NodeId::from_index(3),
            key: Key::Enter,
        };
        let json = serde_json::to_string(&event).expect("serialize event");
        assert!(json.contains("\"type\":\"key_down\""), "{json}");
        let back: DomEvent = serde_json::from_str(&json).expect("deserialize event");
        assert_eq!(back, event);
        assert_eq!(back.kind(), EventKind::KeyDown);
        assert_eq!(DomEvent::Resize.target(), None);
    }
}
