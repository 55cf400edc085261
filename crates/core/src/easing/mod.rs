//! Easing curves used by the rotation sequences.
//!
//! Every curve maps normalised progress to eased progress and is pinned so
//! that `0 -> 0` and `1 -> 1`. Cubic-Bézier curves may overshoot in between.

use serde::{Deserialize, Serialize};

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;
const X_TOLERANCE: f64 = 1e-6;
const MIN_SLOPE: f64 = 1e-6;

/// Easing function applied to a phase's normalised progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseOutQuad,
    EaseOutCubic,
    CubicBezier(CubicBezier),
}

impl Easing {
    /// CSS `ease`, used for the slow reveal turn.
    pub const APPEAR: Easing = Easing::CubicBezier(CubicBezier::new(0.25, 0.1, 0.25, 1.0));
    /// Snappier curve used for the click spin.
    pub const CLICK: Easing = Easing::CubicBezier(CubicBezier::new(0.5, 0.0, 0.3, 1.0));

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::EaseOutQuad => ease_out_quad(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::CubicBezier(curve) => curve.ease(t),
        }
    }
}

/// `1 - (1 - t)^3`, clamped at the boundaries.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// `1 - (1 - t)^2`, clamped at the boundaries.
pub fn ease_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cubic Bézier timing curve anchored at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased progress for `t`: solves `x(u) = t` and returns `y(u)`.
    pub fn ease(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let u = self.solve_x(t);
        sample(u, self.y1, self.y2)
    }

    /// Finds the curve parameter whose x-component equals `x`.
    ///
    /// Newton-Raphson is tried first; a flat slope or a failure to converge
    /// falls back to bisection over `[0, 1]`.
    pub fn solve_x(&self, x: f64) -> f64 {
        newton(x, self.x1, self.x2).unwrap_or_else(|| bisect(x, self.x1, self.x2))
    }
}

fn newton(x: f64, p1: f64, p2: f64) -> Option<f64> {
    let mut u = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = sample(u, p1, p2) - x;
        if err.abs() < X_TOLERANCE {
            return Some(u);
        }
        let d = slope(u, p1, p2);
        if d.abs() < MIN_SLOPE {
            return None;
        }
        u -= err / d;
    }
    None
}

fn bisect(x: f64, p1: f64, p2: f64) -> f64 {
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut u = x.clamp(0.0, 1.0);
    for _ in 0..BISECTION_ITERATIONS {
        let est = sample(u, p1, p2);
        if (est - x).abs() < X_TOLERANCE {
            break;
        }
        if x > est {
            lo = u;
        } else {
            hi = u;
        }
        u = lo + (hi - lo) * 0.5;
    }
    u
}

/// Horner form of `3(1-u)²u·p1 + 3(1-u)u²·p2 + u³`.
#[inline]
fn sample(u: f64, p1: f64, p2: f64) -> f64 {
    let (a, b, c) = coefficients(p1, p2);
    ((a * u + b) * u + c) * u
}

#[inline]
fn slope(u: f64, p1: f64, p2: f64) -> f64 {
    let (a, b, c) = coefficients(p1, p2);
    (3.0 * a * u + 2.0 * b) * u + c
}

#[inline]
fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
    (1.0 - 3.0 * p2 + 3.0 * p1, 3.0 * p2 - 6.0 * p1, 3.0 * p1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_easings() -> Vec<Easing> {
        vec![
            Easing::Linear,
            Easing::EaseOutQuad,
            Easing::EaseOutCubic,
            Easing::APPEAR,
            Easing::CLICK,
            Easing::CubicBezier(CubicBezier::new(0.68, -0.6, 0.32, 1.6)),
        ]
    }

    #[test]
    fn boundaries_are_exact() {
        for easing in all_easings() {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
            assert_eq!(easing.apply(-0.5), 0.0, "{easing:?} below range");
            assert_eq!(easing.apply(1.5), 1.0, "{easing:?} above range");
        }
    }

    #[test]
    fn fixed_eases_match_their_polynomials() {
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        assert!((ease_out_quad(0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn appear_curve_converges_at_midpoint() {
        let curve = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
        let u = curve.solve_x(0.5);
        assert!((sample(u, curve.x1, curve.x2) - 0.5).abs() < 1e-6);
        // CSS `ease` at 50% is roughly 0.8024.
        assert!((curve.ease(0.5) - 0.8024).abs() < 1e-3);
    }

    #[test]
    fn bisection_agrees_with_newton() {
        let curve = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
        let via_newton = newton(0.5, curve.x1, curve.x2).expect("newton converges here");
        let via_bisection = bisect(0.5, curve.x1, curve.x2);
        assert!((sample(via_bisection, curve.x1, curve.x2) - 0.5).abs() < 1e-6);
        assert!((via_newton - via_bisection).abs() < 1e-4);
    }

    #[test]
    fn flat_slope_falls_back_to_bisection() {
        // x(u) = 0.5 + 0.5(2u - 1)^3, so x'(u) vanishes at u = 0.5.
        let (x1, x2) = (1.0, 0.0);
        assert!(slope(0.5, x1, x2).abs() < MIN_SLOPE);

        let u = bisect(0.3, x1, x2);
        assert!((sample(u, x1, x2) - 0.3).abs() < 1e-6);

        let curve = CubicBezier::new(x1, 0.0, x2, 1.0);
        for x in [0.1, 0.3, 0.45, 0.55, 0.9] {
            let u = curve.solve_x(x);
            assert!((sample(u, x1, x2) - x).abs() < 1e-6, "x = {x}");
        }
    }

    #[test]
    fn overshooting_curves_are_allowed() {
        let back = CubicBezier::new(0.34, 1.56, 0.64, 1.0);
        let peak = (1..100)
            .map(|i| back.ease(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn easing_deserialises_from_config() {
        let easing: Easing =
            serde_json::from_str(r#"{"cubic_bezier":{"x1":0.5,"y1":0.0,"x2":0.3,"y2":1.0}}"#)
                .unwrap();
        assert_eq!(easing, Easing::CLICK);
    }
}
