//! Open/close state machine and its in-memory mirror.
//!
//! Every transition writes [`PairState`] first and then pushes it to the
//! document, so the `aria-*` attributes can always be checked against the
//! record with [`Accordion::check_invariants`].

use accordion_dom::{Document, NodeId, ViewportCommand};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::indicators::{Indicator, Markers};
use super::notify::AccordionEvent;
use super::{Accordion, PendingOpen};
use crate::animation::AnimationId;
use crate::error::{AccordionError, InvariantViolation, Result};

/// A control and the panel it discloses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub control: NodeId,
    pub panel: NodeId,
    pub control_id: String,
    pub panel_id: String,
    /// Span wrapping the control's original content.
    pub(crate) wrapper: NodeId,
    /// Heading mirrored into the panel in horizontal hidden-control mode.
    pub(crate) heading: Option<NodeId>,
    /// State indicator markers, when both templates are configured.
    pub(crate) markers: Option<Markers>,
}

/// Mirror of one pair's accessibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairState {
    pub pressed: bool,
    pub expanded: bool,
    pub hidden: bool,
    /// Removed from the tab order (`tabindex="-1"`).
    pub tab_hidden: bool,
}

impl Default for PairState {
    fn default() -> Self {
        Self::CLOSED
    }
}

impl PairState {
    pub const CLOSED: PairState = PairState {
        pressed: false,
        expanded: false,
        hidden: true,
        tab_hidden: false,
    };

    fn set_open(&mut self, open: bool) {
        self.pressed = open;
        self.expanded = open;
        self.hidden = !open;
    }

    pub fn is_open(&self) -> bool {
        self.pressed
    }

    /// pressed == expanded == !hidden
    pub fn is_consistent(&self) -> bool {
        self.pressed == self.expanded && self.expanded == !self.hidden
    }
}

/// Result of [`Accordion::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseOutcome {
    Closed,
    /// Closing is not allowed while `active_control_hidden` is set.
    Disallowed,
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

impl Accordion {
    /// Open the pair if its control is not pressed, close it otherwise.
    pub fn toggle(&mut self, doc: &mut Document, control: NodeId) -> Result<()> {
        let index = self.index_of(control)?;
        if self.states[index].is_open() {
            if self.close(doc, control)? == CloseOutcome::Disallowed {
                debug!("accordion {}: close of pair {} disallowed", self.id, index);
            }
        } else {
            self.open(doc, control, true)?;
        }
        Ok(())
    }

    /// Open the pair owning `control`, closing whichever pair is open.
    ///
    /// With `animate`, configured slides run and the `opened` notification
    /// waits until every one of them has finished.
    pub fn open(&mut self, doc: &mut Document, control: NodeId, animate: bool) -> Result<()> {
        let index = self.index_of(control)?;
        let mut animations: Vec<AnimationId> = Vec::new();

        let others: Vec<usize> = (0..self.pairs.len())
            .filter(|other| *other != index && self.states[*other].pressed)
            .collect();
        for other in others {
            self.states[other].set_open(false);
            self.sync_pair(doc, other);
            self.show_indicator(doc, other, Indicator::Open);

            let panel = self.pairs[other].panel;
            if animate && self.config.slide_up {
                animations.push(self.slides.slide_up(doc, panel, &self.config.slide_up_options));
            } else {
                self.slides.stop(doc, panel);
                doc.hide(panel);
            }
        }

        let panel = self.pairs[index].panel;
        let was_hidden = self.states[index].hidden;
        if animate && self.config.slide_down && was_hidden {
            animations.push(self.slides.slide_down(doc, panel, &self.config.slide_down_options));
        } else {
            self.slides.stop(doc, panel);
            doc.show(panel);
        }

        self.states[index].set_open(true);
        self.open_index = Some(index);
        self.sync_pair(doc, index);

        if self.config.horizontal && self.config.active_control_hidden {
            if let Some(previous) = self.tab_hidden.filter(|previous| *previous != index) {
                self.states[previous].tab_hidden = false;
                self.sync_pair(doc, previous);
            }
            self.states[index].tab_hidden = true;
            self.tab_hidden = Some(index);
            self.sync_pair(doc, index);
        }

        if self.config.horizontal {
            self.calculate_widths(doc);
            self.calculate_heights(doc);
        }

        self.show_indicator(doc, index, Indicator::Close);

        if animate && self.config.scroll_to_panel {
            self.scroll_to(doc, index);
        }

        if animations.is_empty() {
            self.emit_opened(index);
        } else {
            debug!(
                "accordion {}: pair {} opening, waiting on {} slide(s)",
                self.id,
                index,
                animations.len()
            );
            self.pending.push(PendingOpen { index, animations });
        }
        Ok(())
    }

    /// Close the pair owning `control`. Refused in hidden-control mode, where
    /// one panel must always stay open.
    pub fn close(&mut self, doc: &mut Document, control: NodeId) -> Result<CloseOutcome> {
        let index = self.index_of(control)?;
        if self.config.active_control_hidden {
            return Ok(CloseOutcome::Disallowed);
        }

        let panel = self.pairs[index].panel;
        let was_hidden = self.states[index].hidden;
        self.states[index].set_open(false);
        if self.open_index == Some(index) {
            self.open_index = None;
        }
        self.sync_pair(doc, index);

        if self.config.slide_up && !was_hidden {
            // Not joined: `closed` goes out as soon as the attributes change.
            self.slides.slide_up(doc, panel, &self.config.slide_up_options);
        } else {
            self.slides.stop(doc, panel);
            doc.hide(panel);
        }

        self.show_indicator(doc, index, Indicator::Open);
        if self.config.horizontal {
            self.calculate_widths(doc);
            self.calculate_heights(doc);
        }

        self.observers.emit(AccordionEvent::Closed {
            widget: self.id,
            control,
        });
        debug!("accordion {}: pair {} closed", self.id, index);
        Ok(CloseOutcome::Closed)
    }

    pub(crate) fn index_of(&self, control: NodeId) -> Result<usize> {
        self.pairs
            .iter()
            .position(|pair| pair.control == control)
            .ok_or(AccordionError::UnknownControl)
    }

    pub(crate) fn emit_opened(&mut self, index: usize) {
        let pair = &self.pairs[index];
        let event = AccordionEvent::Opened {
            widget: self.id,
            control: pair.control,
            panel_selector: format!("#{}", pair.panel_id),
        };
        debug!("accordion {}: pair {} opened", self.id, index);
        self.observers.emit(event);
    }

    /// Push the recorded state of pair `index` to the document.
    pub(crate) fn sync_pair(&mut self, doc: &mut Document, index: usize) {
        let state = self.states[index];
        let control = self.pairs[index].control;
        let panel = self.pairs[index].panel;

        self.journal.set_attr(doc, control, "aria-pressed", flag(state.pressed));
        self.journal.set_attr(doc, control, "aria-expanded", flag(state.expanded));
        self.journal.set_attr(doc, panel, "aria-hidden", flag(state.hidden));
        self.journal.set_class(
            doc,
            control,
            &self.config.panel_control_active_class,
            state.pressed,
        );
        self.journal.set_attr(
            doc,
            control,
            "tabindex",
            if state.tab_hidden { "-1" } else { "0" },
        );
        self.journal.set_class(
            doc,
            control,
            &self.config.panel_control_hidden_class,
            state.tab_hidden,
        );
    }

    fn show_indicator(&self, doc: &mut Document, index: usize, indicator: Indicator) {
        let pair = &self.pairs[index];
        if let Some(markers) = pair.markers {
            markers.show(doc, pair.control, indicator);
        }
    }

    fn scroll_to(&self, doc: &mut Document, index: usize) {
        let pair = &self.pairs[index];
        let target = if self.config.scroll_to_anchor {
            pair.panel
        } else {
            pair.control
        };
        doc.request(ViewportCommand::ScrollTo {
            top: doc.offset_top(target),
            duration_ms: self.config.scroll_to_panel_speed,
        });
        doc.set_location_hash(&format!("#{}", pair.panel_id));
    }

    /// Compare the state record with the document and check the single-open
    /// rule.
    pub fn check_invariants(&self, doc: &Document) -> std::result::Result<(), InvariantViolation> {
        let mut open = Vec::new();
        for (index, (pair, state)) in self.pairs.iter().zip(&self.states).enumerate() {
            if !state.is_consistent() {
                return Err(InvariantViolation::PairState { index });
            }
            let expectations = [
                (pair.control, "aria-pressed", flag(state.pressed)),
                (pair.control, "aria-expanded", flag(state.expanded)),
                (pair.panel, "aria-hidden", flag(state.hidden)),
                (
                    pair.control,
                    "tabindex",
                    if state.tab_hidden { "-1" } else { "0" },
                ),
            ];
            for (node, attribute, expected) in expectations {
                let found = doc.attr(node, attribute);
                if found.as_deref() != Some(expected) {
                    return Err(InvariantViolation::Attribute {
                        index,
                        attribute,
                        expected: expected.to_string(),
                        found,
                    });
                }
            }
            if state.pressed {
                open.push(index);
            }
        }

        if open.len() > 1 && !self.config.active_control_hidden {
            return Err(InvariantViolation::MultipleOpen { indices: open });
        }
        let actual = open.first().copied();
        if open.len() <= 1 && self.open_index != actual {
            return Err(InvariantViolation::OpenIndex {
                recorded: self.open_index,
                actual,
            });
        }
        Ok(())
    }

    /// Resolve opens whose slides have all finished.
    pub(crate) fn resolve_pending(&mut self, doc: &mut Document) {
        if self.pending.is_empty() {
            return;
        }
        let (settled, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|pending| {
                pending
                    .animations
                    .iter()
                    .all(|id| !self.slides.is_running(*id))
            });
        self.pending = waiting;

        for pending in settled {
            if self.config.horizontal {
                self.calculate_widths(doc);
                self.calculate_heights(doc);
            }
            if !self.states[pending.index].pressed {
                warn!(
                    "accordion {}: pair {} was closed before its open settled",
                    self.id, pending.index
                );
            }
            self.emit_opened(pending.index);
        }
    }
}
