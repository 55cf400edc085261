use serde::{Deserialize, Serialize};

use crate::{scene::Scene, Result};

/// Drawable state of one sphere at the moment of a draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereSnapshot {
    pub name: String,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub opacity: f64,
    pub visible: bool,
}

impl SphereSnapshot {
    pub fn capture(scene: &Scene) -> Vec<SphereSnapshot> {
        scene
            .spheres()
            .map(|(_, sphere)| SphereSnapshot {
                name: sphere.descriptor.name.clone(),
                position: sphere.position.to_array(),
                rotation: sphere.rotation.to_array(),
                opacity: sphere.opacity,
                visible: sphere.visible,
            })
            .collect()
    }
}

/// Whatever turns the scene into pixels.
pub trait RenderTarget {
    fn set_size(&mut self, width: f64, height: f64, pixel_ratio: f64);
    fn draw(&mut self, scene: &Scene) -> Result<()>;
}

/// Headless render target that keeps the most recent frame instead of
/// rasterising it.
#[derive(Debug, Default)]
pub struct RenderGraph {
    size: (f64, f64),
    pixel_ratio: f64,
    frames_drawn: u64,
    last_frame: Vec<SphereSnapshot>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self {
            pixel_ratio: 1.0,
            ..Self::default()
        }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn last_frame(&self) -> &[SphereSnapshot] {
        &self.last_frame
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

impl RenderTarget for RenderGraph {
    fn set_size(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.size = (width, height);
        self.pixel_ratio = pixel_ratio;
    }

    fn draw(&mut self, scene: &Scene) -> Result<()> {
        self.last_frame = SphereSnapshot::capture(scene);
        self.frames_drawn += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CameraConfig,
        scene::{Camera, SphereDescriptor},
    };

    #[test]
    fn draw_records_latest_scene_state() {
        let mut scene = Scene::new(Camera::from_config(&CameraConfig::default(), 1.0));
        let id = scene.add_sphere(SphereDescriptor::new("probe", 0.5));
        let mut graph = RenderGraph::new();
        graph.set_size(640.0, 480.0, 2.0);

        graph.draw(&scene).unwrap();
        scene.sphere_mut(id).unwrap().rotation.z = 1.0;
        graph.draw(&scene).unwrap();

        assert_eq!(graph.frames_drawn(), 2);
        assert_eq!(graph.size(), (640.0, 480.0));
        assert_eq!(graph.last_frame()[0].rotation[2], 1.0);
        assert_eq!(graph.last_frame()[0].name, "probe");
    }
}
