use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::{config::CameraConfig, Result, SphereError};

new_key_type! {
    pub struct SphereId;
}

/// Static description of a sphere mesh and its initial placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDescriptor {
    pub name: String,
    pub radius: f64,
    pub segments: u32,
    /// Yaw applied at creation so the video seam faces away from the viewer.
    pub initial_yaw: f64,
    pub start_y: f64,
    pub initial_opacity: f64,
    pub transparent: bool,
    pub visible: bool,
}

impl SphereDescriptor {
    pub fn new(name: impl Into<String>, radius: f64) -> Self {
        Self {
            name: name.into(),
            radius,
            segments: 64,
            initial_yaw: -std::f64::consts::FRAC_PI_2,
            start_y: 0.0,
            initial_opacity: 1.0,
            transparent: false,
            visible: true,
        }
    }
}

/// Live state of one sphere.
///
/// `rotation.z` belongs to whichever sequence the scheduler runs for this
/// sphere; the per-frame driver only writes `rotation.x`, `rotation.y`,
/// `position`, `opacity` and `visible`.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub descriptor: SphereDescriptor,
    pub position: DVec3,
    pub rotation: DVec3,
    pub opacity: f64,
    pub visible: bool,
    resting_z: f64,
}

impl Sphere {
    pub fn new(descriptor: SphereDescriptor) -> Self {
        let rotation = DVec3::new(0.0, descriptor.initial_yaw, 0.0);
        Self {
            position: DVec3::new(0.0, descriptor.start_y, 0.0),
            opacity: descriptor.initial_opacity,
            visible: descriptor.visible,
            resting_z: rotation.z,
            rotation,
            descriptor,
        }
    }

    /// Angle the animated axis returns to once a sequence finishes.
    pub fn resting_z(&self) -> f64 {
        self.resting_z
    }

    pub fn radius(&self) -> f64 {
        self.descriptor.radius
    }
}

/// Perspective camera looking down -Z from `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: DVec3,
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f64) -> Self {
        Self {
            fov_deg: config.fov_deg,
            aspect,
            near: config.near,
            far: config.far,
            position: DVec3::new(0.0, 0.0, config.distance),
        }
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.position - DVec3::Z, DVec3::Y)
    }

    /// Maps a point in normalised device coordinates back into world space.
    pub fn unproject(&self, ndc: DVec3) -> DVec3 {
        (self.projection() * self.view()).inverse().project_point3(ndc)
    }
}

/// Arena of spheres plus the camera they are viewed through.
#[derive(Debug)]
pub struct Scene {
    spheres: SlotMap<SphereId, Sphere>,
    pub camera: Camera,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            spheres: SlotMap::with_key(),
            camera,
        }
    }

    pub fn add_sphere(&mut self, descriptor: SphereDescriptor) -> SphereId {
        tracing::debug!(name = %descriptor.name, radius = descriptor.radius, "adding sphere");
        self.spheres.insert(Sphere::new(descriptor))
    }

    pub fn remove_sphere(&mut self, id: SphereId) -> Option<Sphere> {
        self.spheres.remove(id)
    }

    pub fn sphere(&self, id: SphereId) -> Option<&Sphere> {
        self.spheres.get(id)
    }

    pub fn sphere_mut(&mut self, id: SphereId) -> Option<&mut Sphere> {
        self.spheres.get_mut(id)
    }

    /// Like [`Scene::sphere_mut`] but treats a missing sphere as an error.
    pub fn require_mut(&mut self, id: SphereId) -> Result<&mut Sphere> {
        self.spheres.get_mut(id).ok_or(SphereError::UnknownSphere)
    }

    pub fn spheres(&self) -> impl Iterator<Item = (SphereId, &Sphere)> {
        self.spheres.iter()
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn new_spheres_face_sideways_and_rest_at_zero() {
        let sphere = Sphere::new(SphereDescriptor::new("probe", 0.5));
        assert!((sphere.rotation.y + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(sphere.resting_z(), 0.0);
        assert_eq!(sphere.rotation.z, sphere.resting_z());
    }

    #[test]
    fn removed_spheres_are_unknown() {
        let mut scene = Scene::new(camera());
        let id = scene.add_sphere(SphereDescriptor::new("probe", 1.0));
        assert_eq!(scene.len(), 1);
        scene.remove_sphere(id);
        assert!(scene.sphere(id).is_none());
        assert!(matches!(scene.require_mut(id), Err(SphereError::UnknownSphere)));
    }

    #[test]
    fn unprojecting_screen_centre_stays_on_axis() {
        let cam = camera();
        let point = cam.unproject(DVec3::new(0.0, 0.0, 0.5));
        assert!(point.x.abs() < 1e-9);
        assert!(point.y.abs() < 1e-9);
        assert!(point.z < cam.position.z);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut cam = camera();
        cam.set_aspect(0.0);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-12);
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
    }
}
