use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Page events forwarded by the host into the widgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Pointer moved to client coordinates in CSS pixels.
    PointerMove { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    /// Vertical scroll offset of the page.
    Scroll { y: f64 },
    Resize { width: f64, height: f64 },
    ContentLoaded,
}

/// A page event scheduled at a point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub event: HostEvent,
}

/// Side effects the widgets ask the host page to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostRequest {
    /// Smooth-scroll the page back to the top.
    ScrollToTop,
}

/// Bounding rectangle of the canvas in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Converts client coordinates into normalised device coordinates with
    /// +Y pointing up.
    pub fn to_ndc(&self, client_x: f64, client_y: f64) -> DVec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return DVec2::ZERO;
        }
        DVec2::new(
            ((client_x - self.left) / self.width) * 2.0 - 1.0,
            -((client_y - self.top) / self.height) * 2.0 + 1.0,
        )
    }
}

/// Last known pointer position and the rotation it asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub ndc: DVec2,
    /// Pitch (x) and raw yaw (y) the sphere should ease towards.
    pub target_rotation: DVec2,
}

impl PointerState {
    /// Updates both the pointer position and the follow target.
    pub fn track(&mut self, ndc: DVec2, gain: f64) {
        self.ndc = ndc;
        self.target_rotation = DVec2::new(-ndc.y * gain, ndc.x * gain);
    }

    /// Updates the pointer position only, leaving the follow target alone.
    pub fn place(&mut self, ndc: DVec2) {
        self.ndc = ndc;
    }
}
