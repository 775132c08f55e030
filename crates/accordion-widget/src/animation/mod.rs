//! Height slide animations for panels.
//!
//! Slides are frame driven: nothing moves until the host calls
//! [`SlideManager::update`] with the elapsed time. Callers that need to wait
//! for a slide keep its [`AnimationId`] and poll [`SlideManager::is_running`].

pub mod easing;
pub mod manager;
pub mod slide;

pub use easing::EasingFunction;
pub use manager::SlideManager;
pub use slide::{ActiveSlide, AnimationId, SlideDirection, SlideState};
