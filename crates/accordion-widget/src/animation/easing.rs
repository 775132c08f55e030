//! Timing curves for slide animations.
//!
//! `Swing` is the classic sinusoidal ease used by jQuery's slide helpers; the
//! CSS keywords map to their standard cubic bezier control points.

use std::f32::consts::PI;

use accordion_config::SlideEasing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// `0.5 - cos(t * PI) / 2`
    Swing,
    Linear,
    /// CSS `ease`, `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
    Ease,
    /// CSS `ease-in`, `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// CSS `ease-out`, `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// CSS `ease-in-out`, `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Swing
    }
}

impl From<SlideEasing> for EasingFunction {
    fn from(easing: SlideEasing) -> Self {
        match easing {
            SlideEasing::Swing => Self::Swing,
            SlideEasing::Linear => Self::Linear,
            SlideEasing::Ease => Self::Ease,
            SlideEasing::EaseIn => Self::EaseIn,
            SlideEasing::EaseOut => Self::EaseOut,
            SlideEasing::EaseInOut => Self::EaseInOut,
        }
    }
}

impl EasingFunction {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Swing => 0.5 - (t * PI).cos() / 2.0,
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }
}

/// Solve the curve for `x == progress` with Newton-Raphson, then read `y`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let mut t = progress;
    for _ in 0..8 {
        let error = bezier_axis(x1, x2, t) - progress;
        if error.abs() < 1e-6 {
            break;
        }
        let slope = bezier_slope(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }
    bezier_axis(y1, y2, t)
}

/// One coordinate of a bezier anchored at (0,0) and (1,1).
#[inline]
fn bezier_axis(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_slope(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn swing_is_symmetric() {
        let swing = EasingFunction::Swing;
        assert!(approx_eq(swing.evaluate(0.0), 0.0));
        assert!(approx_eq(swing.evaluate(0.5), 0.5));
        assert!(approx_eq(swing.evaluate(1.0), 1.0));
        assert!(approx_eq(swing.evaluate(0.25) + swing.evaluate(0.75), 1.0));
        assert!(swing.evaluate(0.1) < 0.1);
    }

    #[test]
    fn css_curves_hit_endpoints_and_increase() {
        for easing in [
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ] {
            assert!(approx_eq(easing.evaluate(0.0), 0.0), "{easing:?}");
            assert!(approx_eq(easing.evaluate(1.0), 1.0), "{easing:?}");
            let samples: Vec<f32> = (0..=10).map(|i| easing.evaluate(i as f32 / 10.0)).collect();
            assert!(samples.windows(2).all(|w| w[0] <= w[1] + EPSILON), "{easing:?}");
        }
        let mid = EasingFunction::Ease.evaluate(0.5);
        assert!(mid > 0.7 && mid < 0.9, "ease midpoint {mid}");
    }

    #[test]
    fn config_names_map_to_curves() {
        assert_eq!(EasingFunction::from(SlideEasing::Swing), EasingFunction::Swing);
        assert_eq!(EasingFunction::from(SlideEasing::EaseInOut), EasingFunction::EaseInOut);
        assert!(approx_eq(EasingFunction::Linear.evaluate(1.5), 1.0));
    }
}
