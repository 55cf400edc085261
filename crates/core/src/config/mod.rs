use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{sequence::ClickSpin, Result, SphereError};

/// Top-level configuration structure for the widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub video: VideoConfig,
    /// `None` leaves the scroll-revealed sphere off the page.
    pub scroll_sphere: Option<ScrollSphereConfig>,
    /// `None` leaves the idle sphere off the page.
    pub idle_sphere: Option<IdleSphereConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
            motion: MotionConfig::default(),
            video: VideoConfig::default(),
            scroll_sphere: Some(ScrollSphereConfig::default()),
            idle_sphere: Some(IdleSphereConfig::default()),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        positive("viewport.pixel_ratio", self.viewport.pixel_ratio)?;
        positive("camera.fov_deg", self.camera.fov_deg)?;
        positive("camera.near", self.camera.near)?;
        if self.camera.far <= self.camera.near {
            return Err(SphereError::InvalidConfig(
                "camera.far must exceed camera.near".to_string(),
            ));
        }
        positive("motion.smoothing", self.motion.smoothing)?;

        if let Some(scroll) = &self.scroll_sphere {
            positive("scroll_sphere.radius", scroll.radius)?;
            positive("scroll_sphere.fade_step", scroll.fade_step)?;
            positive("scroll_sphere.click.duration_ms", scroll.click.duration_ms)?;
            if scroll.click.revolutions < 3.0 {
                return Err(SphereError::InvalidConfig(format!(
                    "scroll_sphere.click.revolutions must be at least 3, got {}",
                    scroll.click.revolutions
                )));
            }
        }
        if let Some(idle) = &self.idle_sphere {
            positive("idle_sphere.radius", idle.radius)?;
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SphereError::InvalidConfig(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

/// Size of the canvas the spheres are drawn into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 1.0,
        }
    }
}

impl ViewportConfig {
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    /// Distance from the origin along +Z.
    pub distance: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 9.0,
        }
    }
}

/// Constants of the continuous pointer-follow motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f64,
    /// Scale from NDC pointer position to target rotation.
    pub pointer_gain: f64,
    /// Added to the pointer-derived yaw target.
    pub yaw_offset: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            pointer_gain: 0.5,
            yaw_offset: -std::f64::consts::FRAC_PI_2,
        }
    }
}

/// Sinusoidal vertical float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatConfig {
    /// Angular speed in radians per second.
    pub speed: f64,
    pub amplitude: f64,
}

impl FloatConfig {
    pub fn offset(&self, elapsed_seconds: f64) -> f64 {
        (elapsed_seconds * self.speed).sin() * self.amplitude
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub element_id: String,
    pub muted: bool,
    pub looping: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            element_id: "videoSfondo".to_string(),
            muted: true,
            looping: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSphereConfig {
    pub radius: f64,
    /// Scroll offset in pixels past which the sphere appears.
    pub appear_height: f64,
    pub start_y: f64,
    pub final_y: f64,
    /// Fade progress added per rendered frame.
    pub fade_step: f64,
    pub float: FloatConfig,
    pub click: ClickSpin,
    /// Ask the host to scroll back to the top after a successful click.
    pub scroll_to_top_on_click: bool,
}

impl Default for ScrollSphereConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            appear_height: 1800.0,
            start_y: -1.0,
            final_y: 0.0,
            fade_step: 0.05,
            float: FloatConfig {
                speed: 2.0,
                amplitude: 0.001,
            },
            click: ClickSpin::default(),
            scroll_to_top_on_click: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleSphereConfig {
    pub radius: f64,
    pub base_y: f64,
    pub float: FloatConfig,
}

impl Default for IdleSphereConfig {
    fn default() -> Self {
        Self {
            radius: 1.5,
            base_y: 0.0,
            float: FloatConfig {
                speed: 2.0,
                amplitude: 0.1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_both_spheres_and_validate() {
        let config = AppConfig::default();
        assert!(config.scroll_sphere.is_some());
        assert!(config.idle_sphere.is_some());
        config.validate().unwrap();
    }

    #[test]
    fn round_trips_through_json() {
        let config = AppConfig::default();
        let json = config.to_json_pretty().unwrap();
        let parsed = AppConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.viewport, config.viewport);
        assert_eq!(parsed.camera, config.camera);
        assert_eq!(parsed.video, config.video);
        assert_eq!(parsed.scroll_sphere, config.scroll_sphere);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = AppConfig::from_json_str(
            r#"{"camera":{"fov_deg":60,"near":0.1,"far":50,"distance":5}}"#,
        )
        .unwrap();
        assert_eq!(config.camera.fov_deg, 60.0);
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn partial_sections_fill_missing_fields() {
        let config = AppConfig::from_json_str(
            r#"{"camera":{"fov_deg":60},"scroll_sphere":{"appear_height":900,"click":{"revolutions":4}}}"#,
        )
        .unwrap();
        assert_eq!(config.camera.fov_deg, 60.0);
        assert_eq!(config.camera.far, CameraConfig::default().far);

        let scroll = config.scroll_sphere.unwrap();
        assert_eq!(scroll.appear_height, 900.0);
        assert_eq!(scroll.radius, ScrollSphereConfig::default().radius);
        assert_eq!(scroll.click.revolutions, 4.0);
        assert_eq!(scroll.click.duration_ms, 1500.0);
    }

    #[test]
    fn rejects_too_few_click_revolutions() {
        let mut config = AppConfig::default();
        if let Some(scroll) = config.scroll_sphere.as_mut() {
            scroll.click.revolutions = 2.0;
        }
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("revolutions"));
    }

    #[test]
    fn null_disables_a_sphere() {
        let config = AppConfig::from_json_str(r#"{"idle_sphere":null}"#).unwrap();
        assert!(config.idle_sphere.is_none());
        assert!(config.scroll_sphere.is_some());
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let mut config = AppConfig::default();
        config.camera.far = 0.05;
        assert!(matches!(config.validate(), Err(SphereError::InvalidConfig(_))));
    }
}
