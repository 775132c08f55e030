//! Width and height metrics for the horizontal tab strip.

use accordion_dom::Document;
use log::trace;

use super::Accordion;

impl Accordion {
    /// Give every panel `panel_width` percent and split the rest evenly
    /// between the controls that are in flow.
    pub fn calculate_widths(&mut self, doc: &mut Document) {
        let panel_width = self.config.panel_width;
        let in_flow = if self.config.active_control_hidden {
            self.pairs.len().saturating_sub(1)
        } else {
            self.pairs.len()
        };
        let control_width = (100.0 - panel_width) / in_flow.max(1) as f64;

        for pair in &self.pairs {
            self.journal
                .set_style(doc, pair.panel, "width", format!("{panel_width}%"));
            self.journal
                .set_style(doc, pair.control, "width", format!("{control_width}%"));
        }
        trace!(
            "accordion {}: panels {}%, controls {}%",
            self.id, panel_width, control_width
        );
    }

    /// Match every control's minimum height to the open panel.
    pub fn calculate_heights(&mut self, doc: &mut Document) {
        for pair in &self.pairs {
            self.journal.remove_style(doc, pair.control, "min-height");
        }
        let height = self
            .open_index
            .map(|index| doc.outer_height(self.pairs[index].panel))
            .unwrap_or(0.0);
        for pair in &self.pairs {
            self.journal
                .set_style(doc, pair.control, "min-height", format!("{height}px"));
        }
        trace!("accordion {}: control min-height {}px", self.id, height);
    }
}
