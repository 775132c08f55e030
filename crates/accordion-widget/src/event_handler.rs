//! Event handling result shared by widget input paths.

/// Result of an event handling operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; the host should suppress its default action.
    Handled,
    /// Event was not for this widget, continue propagation.
    Ignored,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }
}
