//! Headless page host: routes page events to the widgets and runs one
//! frame at a time.

use crate::{
    config::AppConfig,
    driver::SceneDriver,
    hit::HoverState,
    input::{CanvasRect, HostEvent, HostRequest},
    render::{RenderGraph, RenderTarget},
    scene::{Camera, Scene},
    timeline::{FrameClock, Scheduler},
    video::{VideoPlayback, VideoSource},
    widget::{IdleSphere, ScrollSphere},
    Result,
};

/// Everything one page needs to drive its spheres.
pub struct Stage<R: RenderTarget = RenderGraph> {
    config: AppConfig,
    scene: Scene,
    scheduler: Scheduler,
    driver: SceneDriver,
    clock: FrameClock,
    hover: HoverState,
    canvas: CanvasRect,
    video: VideoPlayback,
    renderer: R,
    scroll: Option<ScrollSphere>,
    idle: Option<IdleSphere>,
    requests: Vec<HostRequest>,
    loaded: bool,
}

impl<R: RenderTarget> Stage<R> {
    /// Validates `config` and prepares an empty stage. Spheres are created
    /// when the host reports [`HostEvent::ContentLoaded`].
    pub fn new(config: AppConfig, video: Box<dyn VideoSource>, renderer: R) -> Result<Self> {
        config.validate()?;
        let viewport = &config.viewport;
        let camera = Camera::from_config(&config.camera, viewport.aspect());
        Ok(Self {
            scene: Scene::new(camera),
            scheduler: Scheduler::new(),
            driver: SceneDriver::new(config.motion.clone()),
            clock: FrameClock::new(),
            hover: HoverState::new(),
            canvas: CanvasRect::from_size(viewport.width, viewport.height),
            video: VideoPlayback::new(video, &config.video)?,
            renderer,
            scroll: None,
            idle: None,
            requests: Vec::new(),
            loaded: false,
            config,
        })
    }

    /// Handle shared with whatever styles the cursor.
    pub fn hover_state(&self) -> HoverState {
        self.hover.clone()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn video(&self) -> &VideoPlayback {
        &self.video
    }

    pub fn scroll_sphere(&self) -> Option<&ScrollSphere> {
        self.scroll.as_ref()
    }

    pub fn idle_sphere(&self) -> Option<&IdleSphere> {
        self.idle.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Requests raised since the last call, oldest first.
    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn handle(&mut self, event: HostEvent) -> Result<()> {
        if !self.loaded && event != HostEvent::ContentLoaded {
            tracing::debug!(?event, "ignoring event before content loaded");
            return Ok(());
        }

        match event {
            HostEvent::ContentLoaded => self.init(),
            HostEvent::PointerMove { x, y } => {
                let ndc = self.canvas.to_ndc(x, y);
                let gain = self.driver.motion().pointer_gain;
                let over_scroll = self
                    .scroll
                    .as_mut()
                    .is_some_and(|scroll| scroll.on_pointer_move(ndc, gain, &self.scene));
                let over_idle = self
                    .idle
                    .as_mut()
                    .is_some_and(|idle| idle.on_pointer_move(ndc, gain, &self.scene));
                self.hover.set(over_scroll || over_idle);
                Ok(())
            }
            HostEvent::Click { x, y } => {
                self.video.resume_on_gesture();
                let ndc = self.canvas.to_ndc(x, y);
                let mut hit = false;
                if let Some(scroll) = self.scroll.as_mut() {
                    if scroll.on_click(ndc, &mut self.scene, &mut self.scheduler)? {
                        hit = true;
                        self.requests.extend(scroll.click_request());
                    }
                }
                // A click that lands on the scroll sphere is not passed on.
                if !hit {
                    if let Some(idle) = self.idle.as_mut() {
                        hit = idle.on_click(&mut self.scene, &mut self.scheduler)?;
                    }
                }
                self.hover.set(hit);
                Ok(())
            }
            HostEvent::Scroll { y } => match self.scroll.as_mut() {
                Some(scroll) => scroll.on_scroll(y, &mut self.scene, &mut self.scheduler),
                None => Ok(()),
            },
            HostEvent::Resize { width, height } => {
                self.resize(width, height);
                Ok(())
            }
        }
    }

    /// Runs one rendered frame: sequences first, then continuous motion,
    /// then the draw call.
    pub fn frame(&mut self, now_ms: f64) -> Result<()> {
        if !self.loaded {
            return Ok(());
        }

        let elapsed_s = self.clock.tick(now_ms);
        for event in self.scheduler.tick(now_ms, &mut self.scene) {
            if let Some(scroll) = self.scroll.as_mut() {
                scroll.on_sequence_event(&event);
            }
            if let Some(idle) = self.idle.as_mut() {
                idle.on_sequence_event(&event);
            }
        }

        if let Some(scroll) = self.scroll.as_mut() {
            scroll.frame(&self.driver, &mut self.scene, elapsed_s);
        }
        if let Some(idle) = self.idle.as_mut() {
            idle.frame(&self.driver, &mut self.scene, elapsed_s);
        }

        self.renderer.draw(&self.scene)
    }

    fn init(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        let viewport = &self.config.viewport;
        self.renderer
            .set_size(viewport.width, viewport.height, viewport.pixel_ratio);
        self.video.autoplay();

        if let Some(config) = self.config.scroll_sphere.clone() {
            self.scroll = Some(ScrollSphere::spawn(&mut self.scene, config));
        }
        if let Some(config) = self.config.idle_sphere.clone() {
            self.idle = Some(IdleSphere::spawn(&mut self.scene, config));
        }
        self.loaded = true;
        tracing::info!(spheres = self.scene.len(), "stage initialised");
        Ok(())
    }

    fn resize(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            tracing::debug!(width, height, "ignoring degenerate resize");
            return;
        }
        self.config.viewport.width = width;
        self.config.viewport.height = height;
        self.canvas = CanvasRect::from_size(width, height);
        self.scene.camera.set_aspect(width / height);
        self.renderer
            .set_size(width, height, self.config.viewport.pixel_ratio);
    }
}

impl<R: RenderTarget> std::fmt::Debug for Stage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("loaded", &self.loaded)
            .field("spheres", &self.scene.len())
            .field("video", &self.video)
            .field("hover", &self.hover.is_hover_sphere())
            .finish()
    }
}
