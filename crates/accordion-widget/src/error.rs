//! Error types for the accordion runtime.

use accordion_config::ConfigError;
use thiserror::Error;

/// Result type for accordion operations.
pub type Result<T> = std::result::Result<T, AccordionError>;

/// Errors raised while building or driving an accordion.
#[derive(Error, Debug)]
pub enum AccordionError {
    /// The container handle does not point at an element.
    #[error("accordion container is not an element")]
    NotAnElement,

    /// The container has no control/panel pairs.
    #[error("accordion container has no panels")]
    NoPanels,

    /// A panel without a control immediately before it.
    #[error("panel at child position {position} has no preceding control")]
    OrphanPanel { position: usize },

    /// A control that is not followed by a panel.
    #[error("<{tag}> at child position {position} is not followed by a panel")]
    UnpairedControl { tag: String, position: usize },

    /// `default_panel` points past the last pair.
    #[error("default panel {index} is out of range for {count} panels")]
    DefaultPanelOutOfRange { index: usize, count: usize },

    /// The node is not one of this accordion's controls.
    #[error("node is not a control of this accordion")]
    UnknownControl,

    /// Options rejected by validation.
    #[error("invalid accordion options: {0}")]
    Config(#[from] ConfigError),
}

/// A disagreement between the state record and the document, or a broken
/// open/closed rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("pair {index}: {attribute} is {found:?}, state says {expected:?}")]
    Attribute {
        index: usize,
        attribute: &'static str,
        expected: String,
        found: Option<String>,
    },

    #[error("pair {index}: pressed, expanded and hidden disagree")]
    PairState { index: usize },

    #[error("more than one panel is open: {indices:?}")]
    MultipleOpen { indices: Vec<usize> },

    #[error("open index is {recorded:?} but pressed pair is {actual:?}")]
    OpenIndex {
        recorded: Option<usize>,
        actual: Option<usize>,
    },
}
