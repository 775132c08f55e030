//! Geometry reported by the host and commands sent back to it.

use serde::{Deserialize, Serialize};

/// Measured box of a rendered node, in logical pixels.
///
/// `height` is the node's natural outer height, i.e. what it occupies when
/// fully displayed without inline height overrides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutBox {
    pub top: f64,
    pub height: f64,
}

impl LayoutBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Requests the host viewport should carry out.
///
/// Commands are queued by the document and consumed by the host in FIFO order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewportCommand {
    /// Animate the viewport scroll offset to `top`.
    ScrollTo { top: f64, duration_ms: u32 },
    /// Replace the fragment part of the page location.
    SetLocationHash { hash: String },
}
