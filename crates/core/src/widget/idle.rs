use glam::DVec2;

use crate::{
    config::IdleSphereConfig,
    driver::SceneDriver,
    hit::test_hit,
    input::PointerState,
    scene::{Scene, SphereDescriptor, SphereId},
    sequence::spin_with_bounce,
    timeline::{Scheduler, SequenceEvent, SequenceHandle},
    Result,
};

/// Always-visible sphere that floats, follows the pointer and spins when
/// clicked.
#[derive(Debug)]
pub struct IdleSphere {
    id: SphereId,
    config: IdleSphereConfig,
    pointer: PointerState,
    spin: Option<SequenceHandle>,
}

impl IdleSphere {
    pub fn spawn(scene: &mut Scene, config: IdleSphereConfig) -> Self {
        let descriptor = SphereDescriptor {
            start_y: config.base_y,
            ..SphereDescriptor::new("idle-sphere", config.radius)
        };
        let id = scene.add_sphere(descriptor);
        Self {
            id,
            config,
            pointer: PointerState::default(),
            spin: None,
        }
    }

    pub fn id(&self) -> SphereId {
        self.id
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Tracks the pointer and reports whether it is over the sphere.
    pub fn on_pointer_move(&mut self, ndc: DVec2, gain: f64, scene: &Scene) -> bool {
        self.pointer.track(ndc, gain);
        scene
            .sphere(self.id)
            .is_some_and(|sphere| test_hit(ndc, &scene.camera, sphere))
    }

    /// Click handling picks against the last pointer-move position, not the
    /// click coordinates. Returns whether a spin was started.
    pub fn on_click(&mut self, scene: &mut Scene, scheduler: &mut Scheduler) -> Result<bool> {
        let Some(sphere) = scene.sphere(self.id) else {
            return Ok(false);
        };
        if !test_hit(self.pointer.ndc, &scene.camera, sphere) {
            return Ok(false);
        }

        let resting = sphere.resting_z();
        self.spin = Some(scheduler.start(scene, self.id, spin_with_bounce(resting))?);
        Ok(true)
    }

    pub fn on_sequence_event(&mut self, event: &SequenceEvent) {
        if self.spin == Some(event.handle) {
            self.spin = None;
        }
    }

    pub fn frame(&mut self, driver: &SceneDriver, scene: &mut Scene, elapsed_s: f64) {
        let Some(sphere) = scene.sphere_mut(self.id) else {
            return;
        };
        driver.follow_pointer(sphere, &self.pointer);
        driver.float(sphere, self.config.base_y, &self.config.float, elapsed_s);
    }
}
