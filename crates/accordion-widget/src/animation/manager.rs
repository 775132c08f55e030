//! Coordinator for the panel slides of one accordion.
//!
//! Each frame the host calls [`SlideManager::update`], which advances every
//! running slide and writes the interpolated height into the document as an
//! inline `height` (with `overflow: hidden` while moving). Only one slide can
//! run per node; starting another retargets it.

use std::collections::HashMap;

use accordion_config::SlideOptions;
use accordion_dom::{Document, NodeId};

use super::slide::{ActiveSlide, AnimationId, SlideDirection};

#[derive(Debug, Default)]
pub struct SlideManager {
    slides: HashMap<AnimationId, ActiveSlide>,
    node_index: HashMap<NodeId, AnimationId>,
}

impl SlideManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal `node`, growing its height from the current rendered height to
    /// its natural height.
    pub fn slide_down(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        options: &SlideOptions,
    ) -> AnimationId {
        let from = doc.outer_height(node);
        let to = doc.natural_height(node);
        doc.show(node);
        self.start(doc, node, SlideDirection::Down, from, to, options)
    }

    /// Collapse `node` to zero height; it is hidden once the slide finishes.
    pub fn slide_up(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        options: &SlideOptions,
    ) -> AnimationId {
        let from = doc.outer_height(node);
        self.start(doc, node, SlideDirection::Up, from, 0.0, options)
    }

    fn start(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        direction: SlideDirection,
        from: f64,
        to: f64,
        options: &SlideOptions,
    ) -> AnimationId {
        if let Some(&existing_id) = self.node_index.get(&node) {
            if let Some(existing) = self.slides.get_mut(&existing_id) {
                existing.retarget(direction, to, options);
                log::trace!("retargeted slide {:?} on node {:?}", existing_id, node);
                return existing_id;
            }
        }

        let slide = ActiveSlide::new(node, direction, from, to, options);
        let id = slide.id;
        write_height(doc, node, from);
        self.slides.insert(id, slide);
        self.node_index.insert(node, id);
        id
    }

    /// Advance all slides by `delta_ms` and return the ids that finished.
    pub fn update(&mut self, doc: &mut Document, delta_ms: f32) -> Vec<AnimationId> {
        if self.slides.is_empty() {
            return Vec::new();
        }

        let mut finished = Vec::new();
        for (id, slide) in self.slides.iter_mut() {
            if slide.update(delta_ms) {
                write_height(doc, slide.node, slide.current_height());
            } else {
                finished.push(*id);
            }
        }

        finished.sort();
        for id in &finished {
            if let Some(slide) = self.slides.remove(id) {
                self.node_index.remove(&slide.node);
                clear_height(doc, slide.node);
                if slide.direction == SlideDirection::Up {
                    doc.hide(slide.node);
                }
            }
        }
        finished
    }

    /// Drop any slide on `node` without applying its end state.
    pub fn stop(&mut self, doc: &mut Document, node: NodeId) -> Option<AnimationId> {
        let id = self.node_index.remove(&node)?;
        self.slides.remove(&id);
        clear_height(doc, node);
        Some(id)
    }

    /// Drop every slide, clearing the inline styles they wrote.
    pub fn clear(&mut self, doc: &mut Document) {
        for (node, _) in self.node_index.drain() {
            clear_height(doc, node);
        }
        self.slides.clear();
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.slides.contains_key(&id)
    }

    pub fn is_sliding(&self, node: NodeId) -> bool {
        self.node_index.contains_key(&node)
    }

    pub fn is_idle(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slides.len()
    }
}

fn write_height(doc: &mut Document, node: NodeId, height: f64) {
    doc.set_style(node, "height", format!("{height:.2}px"));
    doc.set_style(node, "overflow", "hidden");
}

fn clear_height(doc: &mut Document, node: NodeId) {
    doc.remove_style(node, "height");
    doc.remove_style(node, "overflow");
}
