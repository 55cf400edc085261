//! Continuous per-frame motion that runs regardless of any sequence.
//!
//! Nothing in here writes `rotation.z`; that axis is reserved for the
//! scheduler.

use crate::{
    config::{FloatConfig, MotionConfig},
    input::PointerState,
    scene::Sphere,
};

/// Applies pointer-follow rotation and vertical float to spheres.
#[derive(Debug, Clone)]
pub struct SceneDriver {
    motion: MotionConfig,
}

impl SceneDriver {
    pub fn new(motion: MotionConfig) -> Self {
        Self { motion }
    }

    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    /// Eases pitch and yaw a fixed fraction of the way towards the pointer
    /// target. Yaw is offset so a centred pointer keeps the initial facing.
    pub fn follow_pointer(&self, sphere: &mut Sphere, pointer: &PointerState) {
        let k = self.motion.smoothing;
        let target_x = pointer.target_rotation.x;
        let target_y = pointer.target_rotation.y + self.motion.yaw_offset;
        sphere.rotation.x += (target_x - sphere.rotation.x) * k;
        sphere.rotation.y += (target_y - sphere.rotation.y) * k;
    }

    /// Places the sphere at `base_y` plus the sinusoidal float offset.
    pub fn float(&self, sphere: &mut Sphere, base_y: f64, float: &FloatConfig, elapsed_s: f64) {
        sphere.position.y = base_y + float.offset(elapsed_s);
    }
}

/// Frame-stepped fade in/out of the scroll-revealed sphere.
///
/// Progress advances by a fixed step per rendered frame rather than by
/// elapsed time, so the fade takes longer on slower displays.
#[derive(Debug, Clone)]
pub struct Fade {
    showing: bool,
    appear: f64,
    disappear: f64,
    step: f64,
    start_y: f64,
    final_y: f64,
}

impl Fade {
    /// A fade that starts fully hidden.
    pub fn new(step: f64, start_y: f64, final_y: f64) -> Self {
        Self {
            showing: false,
            appear: 0.0,
            disappear: 1.0,
            step,
            start_y,
            final_y,
        }
    }

    pub fn show(&mut self) {
        self.showing = true;
        self.appear = 0.0;
        self.disappear = 0.0;
    }

    pub fn hide(&mut self) {
        self.showing = false;
        self.disappear = 0.0;
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn start_y(&self) -> f64 {
        self.start_y
    }

    /// Advances one frame, writes opacity (and visibility once fully faded
    /// out) and returns the baseline height for this frame.
    pub fn advance(&mut self, sphere: &mut Sphere) -> f64 {
        let t = if self.showing {
            self.appear = (self.appear + self.step).min(1.0);
            self.appear * self.appear
        } else {
            self.disappear = (self.disappear + self.step).min(1.0);
            1.0 - self.disappear
        };

        sphere.opacity = t;
        if !self.showing && t <= 0.0 {
            sphere.visible = false;
        }
        self.start_y + (self.final_y - self.start_y) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SphereDescriptor;
    use glam::DVec2;

    fn sphere() -> Sphere {
        Sphere::new(SphereDescriptor::new("probe", 0.5))
    }

    #[test]
    fn follow_converges_towards_offset_target() {
        let driver = SceneDriver::new(MotionConfig::default());
        let mut target = sphere();
        let mut pointer = PointerState::default();
        pointer.track(DVec2::new(1.0, 1.0), 0.5);

        target.rotation.x = 0.0;
        driver.follow_pointer(&mut target, &pointer);
        assert!((target.rotation.x - (-0.05)).abs() < 1e-12);

        for _ in 0..500 {
            driver.follow_pointer(&mut target, &pointer);
        }
        assert!((target.rotation.x + 0.5).abs() < 1e-9);
        assert!((target.rotation.y - (0.5 - std::f64::consts::FRAC_PI_2)).abs() < 1e-9);
    }

    #[test]
    fn follow_leaves_animated_axis_alone() {
        let driver = SceneDriver::new(MotionConfig::default());
        let mut target = sphere();
        target.rotation.z = 1.234;
        let mut pointer = PointerState::default();
        pointer.track(DVec2::new(-0.3, 0.8), 0.5);
        for _ in 0..10 {
            driver.follow_pointer(&mut target, &pointer);
        }
        assert_eq!(target.rotation.z, 1.234);
    }

    #[test]
    fn float_oscillates_around_base() {
        let driver = SceneDriver::new(MotionConfig::default());
        let mut target = sphere();
        let float = FloatConfig {
            speed: 2.0,
            amplitude: 0.1,
        };
        driver.float(&mut target, 0.0, &float, std::f64::consts::FRAC_PI_4);
        assert!((target.position.y - 0.1).abs() < 1e-12);
        driver.float(&mut target, 0.0, &float, 0.0);
        assert_eq!(target.position.y, 0.0);
    }

    #[test]
    fn fade_in_reaches_full_opacity_within_about_twenty_frames() {
        let mut fade = Fade::new(0.05, -1.0, 0.0);
        let mut target = sphere();
        fade.show();

        let mut frames = 0;
        let mut last_opacity = 0.0;
        while target.opacity < 1.0 {
            let base = fade.advance(&mut target);
            assert!(target.opacity >= last_opacity);
            assert!(base <= 0.0 && base >= -1.0);
            last_opacity = target.opacity;
            frames += 1;
            assert!(frames <= 21, "fade took {frames} frames");
        }
        assert!(frames >= 20);
        assert_eq!(fade.advance(&mut target), 0.0);
    }

    #[test]
    fn fade_out_hides_mesh_when_transparent() {
        let mut fade = Fade::new(0.05, -1.0, 0.0);
        let mut target = sphere();
        fade.show();
        for _ in 0..25 {
            fade.advance(&mut target);
        }
        fade.hide();
        for _ in 0..25 {
            fade.advance(&mut target);
        }
        assert_eq!(target.opacity, 0.0);
        assert!(!target.visible);
        assert_eq!(fade.advance(&mut target), -1.0);
    }
}
