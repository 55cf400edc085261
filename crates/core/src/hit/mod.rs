//! Pointer picking against sphere meshes and the shared hover flag.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use glam::{DVec2, DVec3};

use crate::scene::{Camera, Sphere};

/// A ray in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Always normalised.
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from the camera through a point given in normalised device
    /// coordinates.
    pub fn from_camera(camera: &Camera, ndc: DVec2) -> Self {
        let through = camera.unproject(ndc.extend(0.5));
        Self::new(camera.position, through - camera.position)
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Distance to the nearest intersection with a sphere, if any lies ahead
    /// of the origin. A ray starting inside the sphere hits its far side.
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        [-b - root, -b + root].into_iter().find(|t| *t >= 0.0)
    }
}

/// Whether the pointer at `ndc` is over `target`.
///
/// Hidden targets never match; only hits between the camera's near and far
/// planes count.
pub fn test_hit(ndc: DVec2, camera: &Camera, target: &Sphere) -> bool {
    if !target.visible {
        return false;
    }
    let ray = Ray::from_camera(camera, ndc);
    ray.intersect_sphere(target.position, target.radius())
        .map(|t| t >= camera.near && t <= camera.far)
        .unwrap_or(false)
}

/// Process-wide "pointer is over a sphere" flag read by cursor styling.
///
/// Every clone shares the same flag and the last write wins.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    flag: Arc<AtomicBool>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, hovering: bool) {
        self.flag.store(hovering, Ordering::Relaxed);
    }

    pub fn is_hover_sphere(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::CameraConfig, scene::SphereDescriptor};

    fn camera() -> Camera {
        Camera::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }

    fn sphere(radius: f64) -> Sphere {
        Sphere::new(SphereDescriptor::new("target", radius))
    }

    #[test]
    fn ray_hits_sphere_in_front() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, 9.0), -DVec3::Z);
        let t = ray.intersect_sphere(DVec3::ZERO, 0.5).unwrap();
        assert!((t - 8.5).abs() < 1e-9);
        assert!((ray.at(t).z - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ray_inside_sphere_hits_far_side() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let t = ray.intersect_sphere(DVec3::ZERO, 2.0).unwrap();
        assert!((t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn spheres_behind_the_ray_are_missed() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, 9.0), DVec3::Z);
        assert!(ray.intersect_sphere(DVec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn centre_of_screen_hits_centred_sphere() {
        assert!(test_hit(DVec2::ZERO, &camera(), &sphere(0.5)));
    }

    #[test]
    fn corners_miss_small_sphere() {
        assert!(!test_hit(DVec2::new(0.9, 0.9), &camera(), &sphere(0.5)));
        assert!(!test_hit(DVec2::new(-0.5, 0.0), &camera(), &sphere(0.5)));
    }

    #[test]
    fn hidden_targets_never_hit() {
        let mut target = sphere(1.5);
        target.visible = false;
        assert!(!test_hit(DVec2::ZERO, &camera(), &target));
    }

    #[test]
    fn hover_state_is_shared_between_clones() {
        let hover = HoverState::new();
        let reader = hover.clone();
        hover.set(true);
        assert!(reader.is_hover_sphere());
        reader.set(false);
        assert!(!hover.is_hover_sphere());
    }
}
