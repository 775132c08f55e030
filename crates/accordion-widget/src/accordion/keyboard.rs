//! Arrow-key focus movement and activation keys.

use accordion_dom::{Document, Key, NodeId};

use super::Accordion;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Previous,
    Next,
    Activate,
}

impl KeyAction {
    pub(crate) fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowLeft | Key::ArrowUp => Some(KeyAction::Previous),
            Key::ArrowRight | Key::ArrowDown => Some(KeyAction::Next),
            Key::Space | Key::Enter => Some(KeyAction::Activate),
            Key::Other(_) => None,
        }
    }
}

impl Accordion {
    /// Apply a key action for `control`. Navigation only moves focus.
    pub(crate) fn handle_key(&mut self, doc: &mut Document, control: NodeId, action: KeyAction) -> Result<()> {
        let index = self.index_of(control)?;
        let count = self.pairs.len();
        match action {
            KeyAction::Previous => {
                let target = if index == 0 { count - 1 } else { index - 1 };
                doc.focus(self.pairs[target].control);
            }
            KeyAction::Next => {
                let target = if index + 1 == count { 0 } else { index + 1 };
                doc.focus(self.pairs[target].control);
            }
            KeyAction::Activate => self.toggle(doc, control)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keys_to_actions() {
        assert_eq!(KeyAction::from_key(Key::ArrowUp), Some(KeyAction::Previous));
        assert_eq!(KeyAction::from_key(Key::ArrowLeft), Some(KeyAction::Previous));
        assert_eq!(KeyAction::from_key(Key::ArrowDown), Some(KeyAction::Next));
        assert_eq!(KeyAction::from_key(Key::ArrowRight), Some(KeyAction::Next));
        assert_eq!(KeyAction::from_key(Key::Enter), Some(KeyAction::Activate));
        assert_eq!(KeyAction::from_key(Key::Space), Some(KeyAction::Activate));
        assert_eq!(KeyAction::from_key(Key::Other(9)), None);
    }
}
