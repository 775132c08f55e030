//! Runtime state of a single height slide.

use std::sync::atomic::{AtomicU64, Ordering};

use accordion_config::SlideOptions;
use accordion_dom::NodeId;
use serde::{Deserialize, Serialize};

use super::easing::EasingFunction;

/// Unique identifier for a slide animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// `Down` reveals a panel, `Up` collapses and then hides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideDirection {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideState {
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct ActiveSlide {
    pub id: AnimationId,
    pub node: NodeId,
    pub direction: SlideDirection,
    pub from_height: f64,
    pub to_height: f64,
    pub duration_ms: f32,
    pub elapsed_ms: f32,
    pub easing: EasingFunction,
    pub state: SlideState,
}

impl ActiveSlide {
    pub fn new(
        node: NodeId,
        direction: SlideDirection,
        from_height: f64,
        to_height: f64,
        options: &SlideOptions,
    ) -> Self {
        Self {
            id: AnimationId::new(),
            node,
            direction,
            from_height,
            to_height,
            duration_ms: options.duration_ms,
            elapsed_ms: 0.0,
            easing: options.easing.into(),
            state: SlideState::Running,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms > 0.0 {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn current_height(&self) -> f64 {
        match self.state {
            SlideState::Finished => self.to_height,
            SlideState::Running => {
                let eased = f64::from(self.easing.evaluate(self.progress()));
                self.from_height + (self.to_height - self.from_height) * eased
            }
        }
    }

    /// Advance time. Returns `false` once the slide has reached its target.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        if self.state == SlideState::Finished {
            return false;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.duration_ms {
            self.state = SlideState::Finished;
            false
        } else {
            true
        }
    }

    /// Continue from the current height towards a new target, keeping the id.
    pub fn retarget(&mut self, direction: SlideDirection, to_height: f64, options: &SlideOptions) {
        self.from_height = self.current_height();
        self.to_height = to_height;
        self.direction = direction;
        self.duration_ms = options.duration_ms;
        self.elapsed_ms = 0.0;
        self.easing = options.easing.into();
        self.state = SlideState::Running;
    }
}
