//! Decorative open/close markers next to each control.

use accordion_config::{IndicatorElements, IndicatorPosition};
use accordion_dom::{Document, NodeId};

/// Which template is shown. `Open` is displayed while the pair is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Indicator {
    Open,
    Close,
}

impl Indicator {
    fn modifier(self) -> &'static str {
        match self {
            Indicator::Open => "open",
            Indicator::Close => "close",
        }
    }
}

/// Both markers of one control, parsed once and swapped in and out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Markers {
    open: NodeId,
    close: NodeId,
    position: IndicatorPosition,
}

impl Markers {
    pub(crate) fn build(doc: &mut Document, elements: &IndicatorElements) -> Self {
        Self {
            open: build_marker(doc, elements, Indicator::Open),
            close: build_marker(doc, elements, Indicator::Close),
            position: elements.position,
        }
    }

    /// Attach the `indicator` marker to `control`, detaching the other one.
    pub(crate) fn show(self, doc: &mut Document, control: NodeId, indicator: Indicator) {
        let (shown, hidden) = match indicator {
            Indicator::Open => (self.open, self.close),
            Indicator::Close => (self.close, self.open),
        };
        doc.detach(hidden);
        match self.position {
            IndicatorPosition::After => doc.append_child(control, shown),
            IndicatorPosition::Before => doc.prepend_child(control, shown),
        }
    }

    pub(crate) fn remove(self, doc: &mut Document) {
        doc.detach(self.open);
        doc.detach(self.close);
    }
}

fn build_marker(doc: &mut Document, elements: &IndicatorElements, indicator: Indicator) -> NodeId {
    let template = match indicator {
        Indicator::Open => &elements.open,
        Indicator::Close => &elements.close,
    };
    let nodes = doc.parse_fragment(template);
    let marker = match nodes.as_slice() {
        [single] if doc.is_element(*single) => *single,
        _ => {
            let span = doc.create_element("span");
            for node in nodes {
                doc.append_child(span, node);
            }
            span
        }
    };
    doc.add_class(marker, &elements.class_name);
    doc.add_class(marker, &format!("{}--{}", elements.class_name, indicator.modifier()));
    marker
}
