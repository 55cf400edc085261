use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{AnimationSequence, Phase, SequenceKind, Target};
use crate::easing::Easing;

const SPIN_TURNS: f64 = 2.0;
const SPIN_DURATION_MS: f64 = 1000.0;
const DECAY_INITIAL_SPEED: f64 = 0.1;
const DECAY_FACTOR: f64 = 0.93;
const DECAY_CUTOFF: f64 = 0.003;
const BOUNCE_DURATION_MS: f64 = 500.0;
const BOUNCE_OVERSHOOT: f64 = 0.25;
const BOUNCE_SPLIT: f64 = 0.7;

const APPEAR_DURATION_MS: f64 = 1800.0;
const APPEAR_SETTLE_MS: f64 = 400.0;

const CLICK_SETTLE_MS: f64 = 350.0;

/// Two exact turns, a per-frame decay, then a small bounce back to `resting`.
pub fn spin_with_bounce(resting: f64) -> AnimationSequence {
    AnimationSequence::new(
        SequenceKind::SpinWithBounce,
        vec![
            Phase::tween(
                SPIN_DURATION_MS,
                Target::By(SPIN_TURNS * TAU),
                Easing::EaseOutCubic,
            ),
            Phase::Decay {
                initial_speed: DECAY_INITIAL_SPEED,
                factor: DECAY_FACTOR,
                cutoff: DECAY_CUTOFF,
            },
            Phase::Bounce {
                duration_ms: BOUNCE_DURATION_MS,
                resting,
                overshoot: BOUNCE_OVERSHOOT,
                split: BOUNCE_SPLIT,
            },
        ],
    )
}

/// One slow turn past the resting angle followed by a short settle.
pub fn appear(resting: f64) -> AnimationSequence {
    AnimationSequence::new(
        SequenceKind::Appear,
        vec![
            Phase::tween(APPEAR_DURATION_MS, Target::To(resting + TAU), Easing::APPEAR),
            Phase::tween(APPEAR_SETTLE_MS, Target::To(resting), Easing::EaseOutQuad),
        ],
    )
}

/// Parameters of the click spin on the scroll-revealed sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickSpin {
    pub revolutions: f64,
    pub duration_ms: f64,
}

impl Default for ClickSpin {
    fn default() -> Self {
        Self {
            revolutions: 3.0,
            duration_ms: 1500.0,
        }
    }
}

/// Always starts from `resting`, whatever the rotation was before.
pub fn click_spin(resting: f64, spin: ClickSpin) -> AnimationSequence {
    AnimationSequence::new(
        SequenceKind::Click,
        vec![
            Phase::tween(
                spin.duration_ms,
                Target::By(spin.revolutions * TAU),
                Easing::CLICK,
            ),
            Phase::tween(CLICK_SETTLE_MS, Target::To(resting), Easing::EaseOutCubic),
        ],
    )
    .starting_from(resting)
}
