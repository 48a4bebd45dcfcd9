//! Data-described tween steps and a minimal tick-driven runner

use serde::{Deserialize, Serialize};

/// Easing curve for a tween phase `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// `f(t) = t`
    Linear,
    /// `f(t) = t * (2 - t)`
    OutQuad,
    /// `f(t) = t²`
    InQuad,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::OutQuad => t * (2.0 - t),
            Easing::InQuad => t * t,
        }
    }
}

/// One step of a settle sequence, expressed relative to a rest target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TweenStep {
    /// Offset from the rest target this step moves to.
    pub target_delta: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

/// An in-flight tween toward an absolute value.
#[derive(Debug, Clone, Copy)]
pub struct ActiveTween {
    begin: f64,
    target: f64,
    duration_ms: f64,
    easing: Easing,
    start_ms: f64,
}

impl ActiveTween {
    pub fn new(begin: f64, target: f64, duration_ms: f64, easing: Easing, now_ms: f64) -> Self {
        Self {
            begin,
            target,
            duration_ms,
            easing,
            start_ms: now_ms,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Sample the tween at `now_ms`. Returns the interpolated value and
    /// whether the tween has completed (value pinned to the target).
    pub fn sample(&self, now_ms: f64) -> (f64, bool) {
        let phase = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).min(1.0)
        };
        if phase >= 1.0 {
            (self.target, true)
        } else {
            (lerp(self.begin, self.target, self.easing.apply(phase)), false)
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_curves() {
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
        assert_eq!(Easing::OutQuad.apply(0.5), 0.75);
        assert_eq!(Easing::InQuad.apply(0.5), 0.25);
        for easing in [Easing::Linear, Easing::OutQuad, Easing::InQuad] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_active_tween_pins_to_target() {
        let tween = ActiveTween::new(0.0, 10.0, 100.0, Easing::Linear, 1000.0);

        let (mid, done) = tween.sample(1050.0);
        assert!(!done);
        assert!((mid - 5.0).abs() < 1e-9);

        let (end, done) = tween.sample(1100.0);
        assert!(done);
        assert_eq!(end, 10.0);

        // Past the end the value stays pinned exactly on target.
        let (late, done) = tween.sample(2000.0);
        assert!(done);
        assert_eq!(late, 10.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let tween = ActiveTween::new(3.0, 4.0, 0.0, Easing::OutQuad, 0.0);
        let (value, done) = tween.sample(0.0);
        assert!(done);
        assert_eq!(value, 4.0);
    }
}
