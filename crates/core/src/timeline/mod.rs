//! Frame timing and the registry of running rotation sequences.

use slotmap::SecondaryMap;

use crate::{
    scene::{Scene, SphereId},
    sequence::{AnimationSequence, SequenceKind, StepOutcome},
    Result, SphereError,
};

/// Wall clock measured from the first rendered frame, like a render-loop
/// clock that starts on its first read.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    origin_ms: Option<f64>,
    now_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.origin_ms = None;
        self.now_ms = 0.0;
    }

    /// Records a frame timestamp and returns the elapsed time in seconds.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let origin = *self.origin_ms.get_or_insert(now_ms);
        self.now_ms = now_ms.max(origin);
        self.elapsed_seconds()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.origin_ms
            .map(|origin| (self.now_ms - origin) / 1000.0)
            .unwrap_or(0.0)
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Identifies one particular sequence started on a sphere.
///
/// Handles of superseded sequences go stale: cancelling them is a no-op and
/// never touches the sequence that replaced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceHandle {
    pub sphere: SphereId,
    generation: u64,
}

/// Emitted by [`Scheduler::tick`] for every sequence that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEvent {
    pub handle: SequenceHandle,
    pub kind: SequenceKind,
}

#[derive(Debug)]
struct ActiveSequence {
    generation: u64,
    sequence: AnimationSequence,
}

/// Owns at most one running sequence per sphere and steps them each frame.
#[derive(Debug, Default)]
pub struct Scheduler {
    active: SecondaryMap<SphereId, ActiveSequence>,
    next_generation: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `sequence` on `sphere`, cancelling whatever was running there.
    ///
    /// A sequence that carries a reset value snaps the sphere's rotation to
    /// it immediately; otherwise the rotation is left as is until the first
    /// frame.
    pub fn start(
        &mut self,
        scene: &mut Scene,
        sphere: SphereId,
        sequence: AnimationSequence,
    ) -> Result<SequenceHandle> {
        let target = scene.sphere_mut(sphere).ok_or(SphereError::UnknownSphere)?;

        if let Some(previous) = self.active.remove(sphere) {
            tracing::debug!(
                replaced = ?previous.sequence.kind(),
                by = ?sequence.kind(),
                "cancelling in-flight sequence"
            );
        }

        if let Some(value) = sequence.reset_value() {
            target.rotation.z = value;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        tracing::info!(
            sphere = %target.descriptor.name,
            kind = ?sequence.kind(),
            phases = sequence.phases().len(),
            "sequence started"
        );
        self.active.insert(
            sphere,
            ActiveSequence {
                generation,
                sequence,
            },
        );

        Ok(SequenceHandle { sphere, generation })
    }

    /// Cancels the sequence behind `handle`. Idempotent; returns whether a
    /// running sequence was stopped.
    pub fn cancel(&mut self, handle: SequenceHandle) -> bool {
        let matches = self
            .active
            .get(handle.sphere)
            .map(|slot| slot.generation == handle.generation)
            .unwrap_or(false);
        if !matches {
            return false;
        }
        self.cancel_sphere(handle.sphere).is_some()
    }

    /// Cancels whatever runs on `sphere`, returning its kind.
    pub fn cancel_sphere(&mut self, sphere: SphereId) -> Option<SequenceKind> {
        let mut slot = self.active.remove(sphere)?;
        slot.sequence.cancel();
        tracing::debug!(kind = ?slot.sequence.kind(), "sequence cancelled");
        Some(slot.sequence.kind())
    }

    pub fn is_running(&self, handle: SequenceHandle) -> bool {
        self.active
            .get(handle.sphere)
            .map(|slot| slot.generation == handle.generation)
            .unwrap_or(false)
    }

    pub fn active_kind(&self, sphere: SphereId) -> Option<SequenceKind> {
        self.active.get(sphere).map(|slot| slot.sequence.kind())
    }

    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Steps every running sequence once and drops the ones that finished.
    pub fn tick(&mut self, now_ms: f64, scene: &mut Scene) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        self.active.retain(|sphere, slot| {
            let Some(target) = scene.sphere_mut(sphere) else {
                return false;
            };
            match slot.sequence.step(now_ms, &mut target.rotation.z) {
                StepOutcome::Continue => true,
                StepOutcome::Completed => {
                    tracing::info!(
                        sphere = %target.descriptor.name,
                        kind = ?slot.sequence.kind(),
                        "sequence completed"
                    );
                    events.push(SequenceEvent {
                        handle: SequenceHandle {
                            sphere,
                            generation: slot.generation,
                        },
                        kind: slot.sequence.kind(),
                    });
                    false
                }
                StepOutcome::Inactive => false,
            }
        });
        events
    }
}
