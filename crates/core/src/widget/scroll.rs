use glam::DVec2;

use crate::{
    config::ScrollSphereConfig,
    driver::{Fade, SceneDriver},
    hit::test_hit,
    input::{HostRequest, PointerState},
    scene::{Scene, SphereDescriptor, SphereId},
    sequence::{appear, click_spin, SequenceKind},
    timeline::{Scheduler, SequenceEvent, SequenceHandle},
    Result,
};

/// Whether the appear sequence may still run in the current visibility
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearState {
    /// Will run the next time the sphere is revealed.
    Armed,
    Playing(SequenceHandle),
    /// Already ran (or was superseded) while the sphere stayed visible.
    Completed,
}

/// Sphere that fades in once the page is scrolled past a threshold.
#[derive(Debug)]
pub struct ScrollSphere {
    id: SphereId,
    config: ScrollSphereConfig,
    pointer: PointerState,
    fade: Fade,
    appear: AppearState,
    click: Option<SequenceHandle>,
}

impl ScrollSphere {
    pub fn spawn(scene: &mut Scene, config: ScrollSphereConfig) -> Self {
        let descriptor = SphereDescriptor {
            start_y: config.start_y,
            initial_opacity: 0.0,
            transparent: true,
            visible: false,
            ..SphereDescriptor::new("scroll-sphere", config.radius)
        };
        let id = scene.add_sphere(descriptor);
        Self {
            id,
            fade: Fade::new(config.fade_step, config.start_y, config.final_y),
            config,
            pointer: PointerState::default(),
            appear: AppearState::Armed,
            click: None,
        }
    }

    pub fn id(&self) -> SphereId {
        self.id
    }

    pub fn appear_state(&self) -> AppearState {
        self.appear
    }

    pub fn is_shown(&self) -> bool {
        self.fade.is_showing()
    }

    /// Tracks the pointer and reports whether it is over the sphere.
    pub fn on_pointer_move(&mut self, ndc: DVec2, gain: f64, scene: &Scene) -> bool {
        self.pointer.track(ndc, gain);
        scene
            .sphere(self.id)
            .is_some_and(|sphere| test_hit(ndc, &scene.camera, sphere))
    }

    /// Shows or hides the sphere when the scroll offset crosses the
    /// threshold. Scrolling exactly onto the threshold changes nothing.
    pub fn on_scroll(
        &mut self,
        scroll_y: f64,
        scene: &mut Scene,
        scheduler: &mut Scheduler,
    ) -> Result<()> {
        let threshold = self.config.appear_height;
        if scroll_y > threshold && !self.fade.is_showing() {
            tracing::info!(scroll_y, "scroll sphere revealed");
            self.fade.show();
            scene.require_mut(self.id)?.visible = true;
            self.trigger_appear(scene, scheduler)?;
        } else if scroll_y < threshold && self.fade.is_showing() {
            tracing::info!(scroll_y, "scroll sphere hidden");
            self.fade.hide();
            self.cancel_sequences(scheduler);
            self.reset_after_disappear(scene)?;
        }
        Ok(())
    }

    /// Starts the appear sequence unless it already ran in this visibility
    /// session.
    pub fn trigger_appear(&mut self, scene: &mut Scene, scheduler: &mut Scheduler) -> Result<()> {
        if self.appear != AppearState::Armed {
            tracing::debug!(state = ?self.appear, "appear already played this session");
            return Ok(());
        }
        let resting = scene.require_mut(self.id)?.resting_z();
        let handle = scheduler.start(scene, self.id, appear(resting))?;
        self.appear = AppearState::Playing(handle);
        Ok(())
    }

    /// Click at `ndc`. A hit restarts the click spin from the resting angle
    /// and returns true; a miss is ignored.
    pub fn on_click(
        &mut self,
        ndc: DVec2,
        scene: &mut Scene,
        scheduler: &mut Scheduler,
    ) -> Result<bool> {
        self.pointer.place(ndc);
        let Some(sphere) = scene.sphere(self.id) else {
            return Ok(false);
        };
        if !test_hit(ndc, &scene.camera, sphere) {
            return Ok(false);
        }

        let resting = sphere.resting_z();
        let handle = scheduler.start(scene, self.id, click_spin(resting, self.config.click))?;
        self.click = Some(handle);
        Ok(true)
    }

    /// What the page should do after a click lands on the sphere.
    pub fn click_request(&self) -> Option<HostRequest> {
        self.config
            .scroll_to_top_on_click
            .then_some(HostRequest::ScrollToTop)
    }

    pub fn on_sequence_event(&mut self, event: &SequenceEvent) {
        match (self.appear, event.kind) {
            (AppearState::Playing(handle), SequenceKind::Appear) if handle == event.handle => {
                self.appear = AppearState::Completed;
            }
            _ => {}
        }
        if self.click == Some(event.handle) {
            self.click = None;
        }
    }

    pub fn frame(&mut self, driver: &SceneDriver, scene: &mut Scene, elapsed_s: f64) {
        let Some(sphere) = scene.sphere_mut(self.id) else {
            return;
        };
        let base_y = self.fade.advance(sphere);
        driver.follow_pointer(sphere, &self.pointer);
        driver.float(sphere, base_y, &self.config.float, elapsed_s);
    }

    fn cancel_sequences(&mut self, scheduler: &mut Scheduler) {
        if let AppearState::Playing(handle) = self.appear {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.click.take() {
            scheduler.cancel(handle);
        }
    }

    fn reset_after_disappear(&mut self, scene: &mut Scene) -> Result<()> {
        let sphere = scene.require_mut(self.id)?;
        sphere.opacity = 0.0;
        sphere.position.y = self.fade.start_y();
        sphere.rotation.z = sphere.resting_z();
        sphere.visible = false;
        self.appear = AppearState::Armed;
        Ok(())
    }
}
