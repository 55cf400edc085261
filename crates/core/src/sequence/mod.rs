//! Multi-phase rotation sequences.
//!
//! A sequence owns no state besides its own cursor: the rotation it drives is
//! passed into [`AnimationSequence::step`] each frame. Each phase starts from
//! whatever value the previous phase left behind, so chained phases never
//! drift from one another.

mod presets;

use serde::{Deserialize, Serialize};

use crate::easing::{ease_out_cubic, Easing};

pub use presets::{appear, click_spin, spin_with_bounce, ClickSpin};

/// Which of the scripted effects a sequence implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    Appear,
    Click,
    SpinWithBounce,
    Custom,
}

/// End value of a timed phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Offset added to the value the phase starts from.
    By(f64),
    /// Absolute angle.
    To(f64),
}

impl Target {
    fn resolve(self, from: f64) -> f64 {
        match self {
            Target::By(delta) => from + delta,
            Target::To(value) => value,
        }
    }
}

/// One sub-animation of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Eased interpolation towards a target over a fixed duration.
    Tween {
        duration_ms: f64,
        target: Target,
        easing: Easing,
    },
    /// Geometric speed falloff applied once per frame. Frame-rate dependent.
    Decay {
        initial_speed: f64,
        factor: f64,
        cutoff: f64,
    },
    /// Ease-out-cubic to `resting + overshoot` for the first `split` of the
    /// duration, then a linear return to `resting`.
    Bounce {
        duration_ms: f64,
        resting: f64,
        overshoot: f64,
        split: f64,
    },
}

impl Phase {
    pub fn tween(duration_ms: f64, target: Target, easing: Easing) -> Self {
        Phase::Tween {
            duration_ms,
            target,
            easing,
        }
    }
}

/// Lifecycle of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceState {
    /// Created but not yet stepped.
    Idle,
    /// Stepping the phase at this index.
    Running(usize),
    Cancelled,
    Completed,
}

/// Result of stepping a sequence for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More frames are needed.
    Continue,
    /// The last phase finished on this frame.
    Completed,
    /// The sequence was already cancelled or completed; nothing was written.
    Inactive,
}

/// An ordered list of phases plus the cursor that walks through them.
#[derive(Debug, Clone)]
pub struct AnimationSequence {
    kind: SequenceKind,
    phases: Vec<Phase>,
    reset_to: Option<f64>,
    state: SequenceState,
    phase_start: Option<f64>,
    phase_from: f64,
    speed: f64,
}

impl AnimationSequence {
    pub fn new(kind: SequenceKind, phases: Vec<Phase>) -> Self {
        Self {
            kind,
            phases,
            reset_to: None,
            state: SequenceState::Idle,
            phase_start: None,
            phase_from: 0.0,
            speed: 0.0,
        }
    }

    /// Forces the rotation to `value` at the moment the sequence is started,
    /// before the first frame is stepped.
    pub fn starting_from(mut self, value: f64) -> Self {
        self.reset_to = Some(value);
        self
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Value the rotation must be snapped to when the sequence starts, if any.
    pub fn reset_value(&self) -> Option<f64> {
        self.reset_to
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SequenceState::Idle | SequenceState::Running(_))
    }

    /// Stops the sequence without touching the rotation. Returns whether
    /// anything was actually cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.is_active() {
            self.state = SequenceState::Cancelled;
            true
        } else {
            false
        }
    }

    /// Advances the sequence to `now_ms` and writes the new angle into
    /// `rotation`.
    pub fn step(&mut self, now_ms: f64, rotation: &mut f64) -> StepOutcome {
        let index = match self.state {
            SequenceState::Idle => 0,
            SequenceState::Running(index) => index,
            SequenceState::Cancelled | SequenceState::Completed => return StepOutcome::Inactive,
        };

        let Some(phase) = self.phases.get(index) else {
            self.state = SequenceState::Completed;
            return StepOutcome::Completed;
        };
        self.state = SequenceState::Running(index);

        let start = match self.phase_start {
            Some(start) => start,
            None => {
                self.phase_start = Some(now_ms);
                self.phase_from = *rotation;
                if let Phase::Decay { initial_speed, .. } = phase {
                    self.speed = *initial_speed;
                }
                now_ms
            }
        };

        let finished = match *phase {
            Phase::Tween {
                duration_ms,
                target,
                easing,
            } => {
                let t = progress(now_ms - start, duration_ms);
                let to = target.resolve(self.phase_from);
                if t < 1.0 {
                    *rotation = self.phase_from + (to - self.phase_from) * easing.apply(t);
                    false
                } else {
                    *rotation = to;
                    true
                }
            }
            Phase::Decay { factor, cutoff, .. } => {
                *rotation += self.speed;
                self.speed *= factor;
                self.speed <= cutoff
            }
            Phase::Bounce {
                duration_ms,
                resting,
                overshoot,
                split,
            } => {
                let t = progress(now_ms - start, duration_ms);
                let peak = resting + overshoot;
                if t >= 1.0 {
                    *rotation = resting;
                    true
                } else if t < split {
                    let tt = t / split;
                    *rotation = self.phase_from + (peak - self.phase_from) * ease_out_cubic(tt);
                    false
                } else {
                    let tt = (t - split) / (1.0 - split);
                    *rotation = peak + (resting - peak) * tt;
                    false
                }
            }
        };

        if !finished {
            return StepOutcome::Continue;
        }

        self.phase_start = None;
        if index + 1 < self.phases.len() {
            self.state = SequenceState::Running(index + 1);
            StepOutcome::Continue
        } else {
            self.state = SequenceState::Completed;
            StepOutcome::Completed
        }
    }
}

fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        1.0
    } else {
        (elapsed_ms / duration_ms).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(seq: &mut AnimationSequence, rotation: &mut f64, frame_ms: f64) -> usize {
        let mut now = 0.0;
        let mut frames = 0;
        loop {
            frames += 1;
            if seq.step(now, rotation) == StepOutcome::Completed {
                return frames;
            }
            assert!(frames < 100_000, "sequence never completed");
            now += frame_ms;
        }
    }

    #[test]
    fn first_step_captures_start_lazily() {
        let mut seq = AnimationSequence::new(
            SequenceKind::Custom,
            vec![Phase::tween(100.0, Target::By(1.0), Easing::Linear)],
        );
        let mut rotation = 2.0;

        // The first frame arrives long after the sequence was built.
        assert_eq!(seq.step(5_000.0, &mut rotation), StepOutcome::Continue);
        assert_eq!(rotation, 2.0);
        assert_eq!(seq.step(5_050.0, &mut rotation), StepOutcome::Continue);
        assert!((rotation - 2.5).abs() < 1e-12);
        assert_eq!(seq.step(5_100.0, &mut rotation), StepOutcome::Completed);
        assert_eq!(rotation, 3.0);
    }

    #[test]
    fn phases_chain_from_previous_terminal_value() {
        let mut seq = AnimationSequence::new(
            SequenceKind::Custom,
            vec![
                Phase::tween(100.0, Target::By(1.0), Easing::EaseOutCubic),
                Phase::tween(100.0, Target::By(1.0), Easing::EaseOutQuad),
            ],
        );
        let mut rotation = 0.0;
        seq.step(0.0, &mut rotation);
        seq.step(100.0, &mut rotation);
        assert_eq!(rotation, 1.0);
        assert_eq!(seq.state(), SequenceState::Running(1));

        // Second phase starts on the next frame from exactly 1.0.
        seq.step(400.0, &mut rotation);
        assert_eq!(rotation, 1.0);
        assert_eq!(seq.step(500.0, &mut rotation), StepOutcome::Completed);
        assert_eq!(rotation, 2.0);
    }

    #[test]
    fn decay_is_frame_driven() {
        let mut seq = AnimationSequence::new(
            SequenceKind::Custom,
            vec![Phase::Decay {
                initial_speed: 0.1,
                factor: 0.93,
                cutoff: 0.003,
            }],
        );
        let mut rotation = 0.0;
        // Timestamps do not matter; only the frame count does.
        let frames = run_to_end(&mut seq, &mut rotation, 0.0);
        assert_eq!(frames, 49);

        let expected: f64 = (0..49).map(|k| 0.1 * 0.93_f64.powi(k)).sum();
        assert!((rotation - expected).abs() < 1e-12);
    }

    #[test]
    fn bounce_overshoots_then_snaps_to_rest() {
        let mut seq = AnimationSequence::new(
            SequenceKind::Custom,
            vec![Phase::Bounce {
                duration_ms: 500.0,
                resting: 0.0,
                overshoot: 0.25,
                split: 0.7,
            }],
        );
        let mut rotation = 10.0;
        seq.step(0.0, &mut rotation);
        assert_eq!(rotation, 10.0);

        seq.step(350.0, &mut rotation);
        assert!((rotation - 0.25).abs() < 1e-12);

        seq.step(425.0, &mut rotation);
        assert!((rotation - 0.125).abs() < 1e-12);

        assert_eq!(seq.step(500.0, &mut rotation), StepOutcome::Completed);
        assert_eq!(rotation, 0.0);
    }

    #[test]
    fn cancel_is_idempotent_and_freezes_value() {
        let mut seq = AnimationSequence::new(
            SequenceKind::Custom,
            vec![Phase::tween(100.0, Target::To(1.0), Easing::Linear)],
        );
        let mut rotation = 0.0;
        seq.step(0.0, &mut rotation);
        seq.step(40.0, &mut rotation);
        let frozen = rotation;

        assert!(seq.cancel());
        assert!(!seq.cancel());
        assert_eq!(seq.state(), SequenceState::Cancelled);
        assert_eq!(seq.step(80.0, &mut rotation), StepOutcome::Inactive);
        assert_eq!(rotation, frozen);
    }

    #[test]
    fn empty_sequence_completes_immediately() {
        let mut seq = AnimationSequence::new(SequenceKind::Custom, Vec::new());
        let mut rotation = 1.5;
        assert_eq!(seq.step(0.0, &mut rotation), StepOutcome::Completed);
        assert_eq!(rotation, 1.5);
        assert!(!seq.cancel());
    }

    #[test]
    fn zero_duration_tween_jumps_to_target() {
        let mut seq = AnimationSequence::new(
            SequenceKind::Custom,
            vec![Phase::tween(0.0, Target::To(-1.0), Easing::APPEAR)],
        );
        let mut rotation = 3.0;
        assert_eq!(seq.step(0.0, &mut rotation), StepOutcome::Completed);
        assert_eq!(rotation, -1.0);
    }
}
